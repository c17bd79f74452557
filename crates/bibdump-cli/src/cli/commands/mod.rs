//! CLI command handlers.

mod extract;
mod run;
mod tidy;

pub use extract::run_extract;
pub use run::run_pipeline;
pub use tidy::run_tidy;
