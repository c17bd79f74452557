//! The full run: prepare directory → fetch index → download batch → extract → tidy.
//!
//! Strictly sequential. The first failure aborts the run with context naming the stage and,
//! where there is one, the item.

use crate::config::BibdumpConfig;
use crate::download;
use crate::extract;
use crate::http::HttpOptions;
use crate::index;
use crate::tidy::{self, NameError};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Inputs of one run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub index_url: String,
    pub out_dir: PathBuf,
    /// 1-based position of the first file to fetch.
    pub start: usize,
    /// Number of files to fetch; `None` is rejected before anything is downloaded.
    pub limit: Option<usize>,
    pub http: HttpOptions,
}

impl From<&BibdumpConfig> for RunOptions {
    fn from(cfg: &BibdumpConfig) -> Self {
        Self {
            index_url: cfg.index_url.clone(),
            out_dir: cfg.out_dir.clone(),
            start: cfg.start,
            limit: cfg.limit,
            http: HttpOptions::from(&cfg.http),
        }
    }
}

/// What a run produced.
#[derive(Debug)]
pub struct RunSummary {
    /// Resolved output directory.
    pub out_dir: PathBuf,
    /// Archives downloaded (already extracted and deleted by the time the run returns).
    pub downloaded: Vec<PathBuf>,
    /// Member files after renaming, in directory-listing order.
    pub renamed: Vec<PathBuf>,
    /// Member names that did not fit the naming pattern and were left as-is.
    pub skipped: Vec<NameError>,
}

pub fn run(opts: &RunOptions) -> Result<RunSummary> {
    let out_dir = download::prepare_out_dir(&opts.out_dir)
        .with_context(|| format!("prepare output directory {}", opts.out_dir.display()))?;

    let urls = index::fetch_index(&opts.index_url, &opts.http)
        .with_context(|| format!("fetch index {}", opts.index_url))?;

    let downloaded = download::download_batch(&urls, &out_dir, opts.start, opts.limit, &opts.http)?;
    tracing::info!("downloaded {} file(s) to {}", downloaded.len(), out_dir.display());

    extract::untar_all(&downloaded)?;

    let report = tidy::tidy_names(&out_dir)
        .with_context(|| format!("tidy names in {}", out_dir.display()))?;
    if !report.skipped.is_empty() {
        tracing::warn!(
            "{} file(s) in {} did not match the member naming pattern and were left as-is",
            report.skipped.len(),
            out_dir.display()
        );
    }

    Ok(RunSummary {
        out_dir,
        downloaded,
        renamed: report.renamed,
        skipped: report.skipped,
    })
}
