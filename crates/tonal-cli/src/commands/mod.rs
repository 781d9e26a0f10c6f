//! Command implementations.

mod analyze;
mod history;

pub use analyze::execute_analyze;
pub use history::execute_history;
