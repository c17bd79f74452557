//! `bibdump tidy` – normalize member names in a directory.

use anyhow::{Context, Result};
use bibdump_core::tidy;
use std::path::Path;

pub fn run_tidy(dir: &Path) -> Result<()> {
    let report =
        tidy::tidy_names(dir).with_context(|| format!("tidy names in {}", dir.display()))?;
    for path in &report.renamed {
        println!("{}", path.display());
    }
    for skipped in &report.skipped {
        println!("  left as-is: {}", skipped);
    }
    Ok(())
}
