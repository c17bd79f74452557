use bibdump_core::error::BibdumpError;
use bibdump_core::logging;

mod cli;

use crate::cli::CliCommand;

/// Exit code for `err`: taken from the first typed error in the chain, else 1.
fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|e| e.downcast_ref::<BibdumpError>())
        .map_or(1, |e| e.kind().exit_code())
}

fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args() {
        eprintln!("bibdump error: {:#}", err);
        std::process::exit(exit_code(&err));
    }
}
