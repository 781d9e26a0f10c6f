//! History command: browse recent analyses.

use crate::cli::HistoryArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use tonal_domain::traits::HistoryStore;
use tonal_store::SqliteStore;

/// Execute the history command.
///
/// Reads straight from the store: no model, no session. A storage fault
/// degrades to the error message instead of a crash.
pub async fn execute_history(
    args: HistoryArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let limit = args.limit.unwrap_or(config.settings.history_limit);

    let store = SqliteStore::open(&config.database)?;
    let records = store.recent(limit)?;

    println!("{}", formatter.format_records(&records)?);
    Ok(())
}
