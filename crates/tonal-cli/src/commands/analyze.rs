//! Analyze command: one text through the model and into history.

use crate::cli::AnalyzeArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::fs;
use std::time::Duration;
use tonal_classifier::HttpClassifier;
use tonal_store::SqliteStore;
use tonal_workflow::{AnalysisEvent, AnalysisSession, FailureKind, DEFAULT_SHUTDOWN_GRACE};

/// How long to wait for a trailing storage-failure event after a completion.
const STORAGE_EVENT_GRACE: Duration = Duration::from_millis(250);

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let text = read_input(&args)?;

    // Build the gateway and load the model once, before anything is
    // dispatched. The blocking client and its probe request both belong on
    // the blocking pool; a load failure surfaces here, not on first use.
    let endpoint = config.endpoint.clone();
    let model = config.model.clone();
    let timeout = Duration::from_secs(config.request_timeout_secs);
    let gateway = tokio::task::spawn_blocking(move || {
        let gateway = HttpClassifier::with_timeout(endpoint, model, timeout)?;
        gateway.warm_up()?;
        Ok::<_, CliError>(gateway)
    })
    .await
    .map_err(|e| CliError::Analysis(e.to_string()))??;

    let store = SqliteStore::open(&config.database)?;
    let (mut session, mut events) = AnalysisSession::new(gateway, store);

    session.submit(&text)?;

    let outcome = match events.recv().await {
        Some(event) => event,
        None => {
            return Err(CliError::Analysis(
                "analysis ended without an outcome".to_string(),
            ))
        }
    };

    let result = match outcome {
        AnalysisEvent::Completed { record, summary } => {
            println!("{}", formatter.format_analysis(&record, &summary)?);

            // A storage fault, if any, follows the completion immediately.
            // The result above stays on screen either way.
            if let Ok(Some(AnalysisEvent::Failed { kind, message })) =
                tokio::time::timeout(STORAGE_EVENT_GRACE, events.recv()).await
            {
                if kind == FailureKind::Storage {
                    eprintln!("{}", formatter.warning(&message));
                }
            }
            Ok(())
        }
        AnalysisEvent::Failed { message, .. } => Err(CliError::Analysis(message)),
    };

    session.shutdown(DEFAULT_SHUTDOWN_GRACE).await;
    result
}

/// Resolve the input text from the arguments.
///
/// Files are read in full as UTF-8.
fn read_input(args: &AnalyzeArgs) -> Result<String> {
    match (&args.text, &args.file) {
        (Some(text), None) => Ok(text.clone()),
        (None, Some(path)) => Ok(fs::read_to_string(path)?),
        _ => Err(CliError::InvalidInput(
            "provide a text argument or --file".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_input_inline() {
        let args = AnalyzeArgs {
            text: Some("текст".to_string()),
            file: None,
        };
        assert_eq!(read_input(&args).unwrap(), "текст");
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Сегодня отличная погода").unwrap();

        let args = AnalyzeArgs {
            text: None,
            file: Some(file.path().to_path_buf()),
        };
        assert_eq!(read_input(&args).unwrap(), "Сегодня отличная погода");
    }

    #[test]
    fn test_read_input_requires_a_source() {
        let args = AnalyzeArgs {
            text: None,
            file: None,
        };
        assert!(matches!(
            read_input(&args),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_read_input_missing_file() {
        let args = AnalyzeArgs {
            text: None,
            file: Some("/nonexistent/input.txt".into()),
        };
        assert!(matches!(read_input(&args), Err(CliError::Io(_))));
    }
}
