//! `bibdump extract` – extract archives left behind by an interrupted run.

use anyhow::Result;
use bibdump_core::extract;
use std::path::PathBuf;

pub fn run_extract(paths: &[PathBuf]) -> Result<()> {
    extract::untar_all(paths)?;
    println!("{} archive(s) extracted", paths.len());
    Ok(())
}
