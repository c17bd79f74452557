//! Dump set index: a JSON listing of downloadable dump files.
//!
//! Shape: `{"files": {"bib_records": [{"dump_file": "<url>"}, ...]}}`. Other keys are ignored.

use crate::error::{BibdumpError, Result};
use crate::http::{self, HttpOptions};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DumpIndex {
    pub files: DumpFiles,
}

#[derive(Debug, Deserialize)]
pub struct DumpFiles {
    pub bib_records: Vec<DumpRecord>,
}

#[derive(Debug, Deserialize)]
pub struct DumpRecord {
    pub dump_file: String,
}

impl DumpIndex {
    /// Download URLs in document order.
    pub fn into_urls(self) -> Vec<String> {
        self.files
            .bib_records
            .into_iter()
            .map(|r| r.dump_file)
            .collect()
    }
}

/// Parse an index body. `source` names where it came from, for the error message.
pub fn parse_index(body: &[u8], source: &str) -> Result<Vec<String>> {
    let index: DumpIndex =
        serde_json::from_slice(body).map_err(|e| BibdumpError::IndexFormat {
            url: source.to_string(),
            source: e,
        })?;
    Ok(index.into_urls())
}

/// GET the index at `url` and return its dump file URLs.
pub fn fetch_index(url: &str, opts: &HttpOptions) -> Result<Vec<String>> {
    let body = http::get_bytes(url, opts)?;
    let urls = parse_index(&body, url)?;
    tracing::info!("index {} lists {} dump file(s)", url, urls.len());
    Ok(urls)
}
