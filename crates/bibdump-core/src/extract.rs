//! In-place extraction of downloaded `.tar.gz` dump archives.

use crate::error::{BibdumpError, Result};
use anyhow::Context;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tar::Archive;

/// Extract the gzip-compressed tar at `archive_path` into its parent directory, then delete it.
///
/// Existing members are overwritten, so re-running after an interrupted run is safe. Not
/// atomic: if deletion fails the archive stays next to its extracted members. Returns the
/// directory the members were written to.
pub fn untar(archive_path: &Path) -> Result<PathBuf> {
    let dir = match archive_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let file =
        File::open(archive_path).map_err(|e| BibdumpError::io("open archive", archive_path, e))?;
    let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));
    archive.set_overwrite(true);
    let malformed = |e: io::Error| BibdumpError::ArchiveFormat {
        path: archive_path.to_path_buf(),
        source: e,
    };

    for entry in archive.entries().map_err(malformed)? {
        let mut entry = entry.map_err(malformed)?;
        let member = dir.join(entry.path().map_err(malformed)?);
        entry.unpack_in(&dir).map_err(|e| {
            if is_decode_error(&e) {
                malformed(e)
            } else {
                BibdumpError::io("extract member", &member, e)
            }
        })?;
    }

    fs::remove_file(archive_path)
        .map_err(|e| BibdumpError::io("remove archive", archive_path, e))?;
    tracing::info!("extracted {} to {}", archive_path.display(), dir.display());
    Ok(dir)
}

/// Member data is read lazily while unpacking, so a truncated or corrupt stream can
/// surface from `unpack_in` as well as from header reads.
fn is_decode_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::UnexpectedEof | io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput
    )
}

/// Extract every archive in order. The first failure aborts.
pub fn untar_all(archives: &[PathBuf]) -> anyhow::Result<()> {
    let total = archives.len();
    for (i, path) in archives.iter().enumerate() {
        untar(path).with_context(|| format!("extract {}/{} ({})", i + 1, total, path.display()))?;
    }
    Ok(())
}
