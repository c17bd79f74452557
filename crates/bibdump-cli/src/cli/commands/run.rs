//! `bibdump` (no subcommand) – download, extract and tidy a batch of dumps.

use anyhow::Result;
use bibdump_core::pipeline::{self, RunOptions};

pub fn run_pipeline(opts: &RunOptions) -> Result<()> {
    tracing::info!(
        "fetching {} file(s) from position {} of {} into {}",
        opts.limit.map_or_else(|| "?".to_string(), |l| l.to_string()),
        opts.start,
        opts.index_url,
        opts.out_dir.display()
    );

    let summary = pipeline::run(opts)?;

    println!(
        "{} archive(s) extracted, {} file(s) renamed in {}",
        summary.downloaded.len(),
        summary.renamed.len(),
        summary.out_dir.display()
    );
    for skipped in &summary.skipped {
        println!("  left as-is: {}", skipped);
    }
    Ok(())
}
