//! Batch download of dump files into the output directory.
//!
//! Files are fetched one at a time in index order. Each body is streamed into a temp file in
//! the output directory and renamed to `"{ordinal}_{filename}"` once the transfer and its
//! Content-Disposition header have both checked out. A failed item leaves nothing behind.

use crate::error::{BibdumpError, Result};
use crate::http::{self, HttpOptions};
use crate::url_model::saved_filename;
use anyhow::Context;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Prefix and suffix of in-flight download files.
const PART_PREFIX: &str = ".bibdump-";
const PART_SUFFIX: &str = ".part";

/// One file of a batch: its 1-based position within the batch and where to fetch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub ordinal: usize,
    pub url: String,
}

/// Resolve and create the output directory.
///
/// An absolute path is created with its parents and may already exist. A relative path is
/// resolved against the current directory and must not exist yet.
pub fn prepare_out_dir(path: &Path) -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| BibdumpError::io("read current directory", ".", e))?;
    prepare_out_dir_in(path, &cwd)
}

/// [`prepare_out_dir`] with an explicit base for relative paths.
pub fn prepare_out_dir_in(path: &Path, base: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        fs::create_dir_all(path).map_err(|e| BibdumpError::io("create directory", path, e))?;
        tracing::debug!("using output directory {}", path.display());
        return Ok(path.to_path_buf());
    }

    let dir = base.join(path);
    if let Some(parent) = dir.parent() {
        fs::create_dir_all(parent).map_err(|e| BibdumpError::io("create directory", parent, e))?;
    }
    match fs::create_dir(&dir) {
        Ok(()) => {
            tracing::debug!("created output directory {}", dir.display());
            Ok(dir)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Err(BibdumpError::DirectoryExists { path: dir })
        }
        Err(e) => Err(BibdumpError::io("create directory", dir, e)),
    }
}

/// Select positions `start ..= start + limit - 1` (1-based) of `urls`.
///
/// A range that runs past the end of the index is cut short with a warning; a start past the
/// end, a zero start or limit, and a missing limit are errors.
pub fn select_batch(urls: &[String], start: usize, limit: Option<usize>) -> Result<Vec<DownloadJob>> {
    let limit = limit.ok_or_else(|| BibdumpError::InvalidRange("no limit given".to_string()))?;
    if start == 0 {
        return Err(BibdumpError::InvalidRange("start is 1-based and must be at least 1".to_string()));
    }
    if limit == 0 {
        return Err(BibdumpError::InvalidRange("limit must be at least 1".to_string()));
    }
    if start > urls.len() {
        return Err(BibdumpError::InvalidRange(format!(
            "start {} is past the end of the index ({} files)",
            start,
            urls.len()
        )));
    }

    let first = start - 1;
    let end = first.saturating_add(limit).min(urls.len());
    if end - first < limit {
        tracing::warn!(
            "requested {} file(s) from position {} but the index only has {}; fetching {}",
            limit,
            start,
            urls.len(),
            end - first
        );
    }

    Ok(urls[first..end]
        .iter()
        .enumerate()
        .map(|(i, url)| DownloadJob {
            ordinal: i + 1,
            url: url.clone(),
        })
        .collect())
}

/// Download one file into `dir`. Returns the full path written.
pub fn download_file(job: &DownloadJob, dir: &Path, opts: &HttpOptions) -> Result<PathBuf> {
    let mut part = tempfile::Builder::new()
        .prefix(PART_PREFIX)
        .suffix(PART_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| BibdumpError::io("create temp file in", dir, e))?;
    let part_path = part.path().to_path_buf();

    // Resolved on the first chunk so a bad header aborts before the body is pulled.
    let mut file_name: Option<String> = None;
    let headers = http::get_streaming(&job.url, opts, |headers, chunk| {
        if file_name.is_none() {
            file_name = Some(saved_filename(job.ordinal, &job.url, headers.content_disposition())?);
        }
        part.write_all(chunk)
            .map_err(|e| BibdumpError::io("write", &part_path, e))
    })?;

    let file_name = match file_name {
        Some(name) => name,
        None => saved_filename(job.ordinal, &job.url, headers.content_disposition())?,
    };
    part.flush().map_err(|e| BibdumpError::io("write", &part_path, e))?;

    let full_path = dir.join(&file_name);
    part.persist(&full_path)
        .map_err(|e| BibdumpError::io("move download into place at", &full_path, e.error))?;

    tracing::info!("downloaded {} to {}", file_name, dir.display());
    Ok(full_path)
}

/// Download `limit` files starting at 1-based position `start` of `urls` into `dir`.
///
/// Returns the saved paths in download order. The first failure aborts the batch.
pub fn download_batch(
    urls: &[String],
    dir: &Path,
    start: usize,
    limit: Option<usize>,
    opts: &HttpOptions,
) -> anyhow::Result<Vec<PathBuf>> {
    let jobs = select_batch(urls, start, limit)?;
    let total = jobs.len();
    let mut files = Vec::with_capacity(total);
    for job in &jobs {
        tracing::info!("downloading file {}/{}", job.ordinal, total);
        let path = download_file(job, dir, opts)
            .with_context(|| format!("download {}/{} ({})", job.ordinal, total, job.url))?;
        files.push(path);
    }
    Ok(files)
}
