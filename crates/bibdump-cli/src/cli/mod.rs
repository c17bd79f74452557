//! CLI for bibdump.

mod commands;

use anyhow::Result;
use bibdump_core::config::{self, BibdumpConfig};
use bibdump_core::pipeline::RunOptions;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::{run_extract, run_pipeline, run_tidy};

/// Top-level CLI. Without a subcommand, runs the whole pipeline.
#[derive(Debug, Parser)]
#[command(name = "bibdump")]
#[command(
    about = "Download a batch of bibliographic dump archives, extract them and tidy member names",
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// Pipeline inputs. Unset flags fall back to config.toml, then to built-in defaults.
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// URL of the JSON dump index.
    #[arg(long, value_name = "URL")]
    pub index_url: Option<String>,

    /// Output directory. Absolute paths may already exist; relative ones must not.
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// 1-based position in the index of the first file to download.
    #[arg(long, value_name = "N")]
    pub start: Option<usize>,

    /// Number of files to download.
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Connect timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Whole-request timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Ignore config.toml and use built-in defaults for unset flags.
    #[arg(long)]
    pub no_config: bool,
}

impl RunArgs {
    /// Overlay the flags that were given onto `cfg`.
    pub fn apply(self, mut cfg: BibdumpConfig) -> RunOptions {
        if let Some(url) = self.index_url {
            cfg.index_url = url;
        }
        if let Some(dir) = self.out_dir {
            cfg.out_dir = dir;
        }
        if let Some(start) = self.start {
            cfg.start = start;
        }
        if let Some(limit) = self.limit {
            cfg.limit = Some(limit);
        }
        if let Some(secs) = self.connect_timeout {
            cfg.http.connect_timeout_secs = secs;
        }
        if let Some(secs) = self.timeout {
            cfg.http.timeout_secs = secs;
        }
        RunOptions::from(&cfg)
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Extract already-downloaded .tar.gz archives into their directories and delete them.
    Extract {
        /// Archives to extract, in order.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Rename extracted member files in a directory to `{base}_{NNN}.marcxml`.
    Tidy {
        /// Directory holding extracted members.
        dir: PathBuf,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            Some(CliCommand::Extract { paths }) => run_extract(&paths),
            Some(CliCommand::Tidy { dir }) => run_tidy(&dir),
            None => {
                let cfg = if cli.run.no_config {
                    BibdumpConfig::default()
                } else {
                    config::load_or_init()?
                };
                tracing::debug!("loaded config: {:?}", cfg);
                run_pipeline(&cli.run.apply(cfg))
            }
        }
    }
}

#[cfg(test)]
mod tests;
