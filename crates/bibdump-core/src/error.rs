//! Typed errors for the pipeline stages.
//!
//! Stage functions return `BibdumpError`; the pipeline adds `anyhow` context naming the
//! stage and item, and the CLI maps the root `ErrorKind` to an exit code.

use std::io;
use std::path::PathBuf;

/// Broad class of a failure, used to pick the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection failure or non-2xx HTTP status.
    Network,
    /// Index not JSON / wrong shape, bad Content-Disposition, not a gzip tar.
    MalformedResponse,
    /// Directory already exists, permission denied, file not found.
    Filesystem,
    /// Bad start/limit or other caller input.
    InvalidInput,
}

impl ErrorKind {
    /// Process exit code. 1 is left for untyped failures and 2 for usage errors.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorKind::Network => 3,
            ErrorKind::MalformedResponse => 4,
            ErrorKind::Filesystem => 5,
            ErrorKind::InvalidInput => 6,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BibdumpError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    #[error("index at {url} is not a valid dump listing: {source}")]
    IndexFormat {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {url} has no Content-Disposition header")]
    MissingContentDisposition { url: String },

    #[error("Content-Disposition has no filename parameter: {value:?}")]
    MissingFilename { value: String },

    #[error("Content-Disposition filename is not usable ({reason}): {value:?}")]
    MalformedFilename { value: String, reason: &'static str },

    #[error("{} is not a gzip-compressed tar archive: {source}", path.display())]
    ArchiveFormat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("output directory {} already exists", path.display())]
    DirectoryExists { path: PathBuf },

    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid batch range: {0}")]
    InvalidRange(String),
}

impl BibdumpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BibdumpError::Transport { .. } | BibdumpError::HttpStatus { .. } => ErrorKind::Network,
            BibdumpError::IndexFormat { .. }
            | BibdumpError::MissingContentDisposition { .. }
            | BibdumpError::MissingFilename { .. }
            | BibdumpError::MalformedFilename { .. }
            | BibdumpError::ArchiveFormat { .. } => ErrorKind::MalformedResponse,
            BibdumpError::DirectoryExists { .. } | BibdumpError::Io { .. } => ErrorKind::Filesystem,
            BibdumpError::InvalidRange(_) => ErrorKind::InvalidInput,
        }
    }

    /// Shorthand for wrapping an `io::Error` with the path it concerns.
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        BibdumpError::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// True if this is a filesystem error whose cause is `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BibdumpError::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

pub type Result<T, E = BibdumpError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_distinct_exit_codes() {
        let http = BibdumpError::HttpStatus {
            url: "http://x/".into(),
            status: 404,
        };
        let missing = BibdumpError::MissingContentDisposition {
            url: "http://x/".into(),
        };
        let exists = BibdumpError::DirectoryExists {
            path: PathBuf::from("out"),
        };
        let range = BibdumpError::InvalidRange("limit must be at least 1".into());
        assert_eq!(http.kind().exit_code(), 3);
        assert_eq!(missing.kind().exit_code(), 4);
        assert_eq!(exists.kind().exit_code(), 5);
        assert_eq!(range.kind().exit_code(), 6);
    }

    #[test]
    fn not_found_detection() {
        let e = BibdumpError::io(
            "open",
            "/nope",
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(e.is_not_found());
        assert!(!BibdumpError::InvalidRange("x".into()).is_not_found());
    }

    #[test]
    fn display_names_the_url() {
        let e = BibdumpError::HttpStatus {
            url: "http://host/dump/7".into(),
            status: 503,
        };
        assert_eq!(e.to_string(), "GET http://host/dump/7 returned HTTP 503");
    }
}
