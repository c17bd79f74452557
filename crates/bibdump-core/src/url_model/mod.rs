//! Local filename derivation for downloaded dump files.
//!
//! The saved name comes from the response's Content-Disposition header, prefixed with the
//! file's 1-based position in the batch so that repeated server names stay distinct.

mod content_disposition;

pub use content_disposition::parse_content_disposition_filename;

use crate::error::{BibdumpError, Result};

/// Derives the local filename for the `ordinal`-th file of a batch fetched from `url`.
///
/// A missing header is a hard error; there is no fallback to the URL path.
///
/// # Examples
///
/// - `saved_filename(3, "https://h/dumps/9", Some("attachment; filename=\"a.tar.gz\""))` → `"3_a.tar.gz"`
pub fn saved_filename(ordinal: usize, url: &str, content_disposition: Option<&str>) -> Result<String> {
    let header = content_disposition.ok_or_else(|| BibdumpError::MissingContentDisposition {
        url: url.to_string(),
    })?;
    let name = parse_content_disposition_filename(header)?;
    Ok(format!("{}_{}", ordinal, name))
}
