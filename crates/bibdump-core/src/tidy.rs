//! Normalize extracted member names to `{base}_{NNN}.marcxml`.
//!
//! Members come out of the dump archives named like `recs[1]_42`. The base is the text before
//! the first `[`, the number is the text after the last `_`, zero-padded to three digits.

use crate::error::{BibdumpError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Names ending in this are already in final form and are left alone.
pub const RESERVED_EXTENSION: &str = ".marcxml";
/// Width the numeric suffix is zero-padded to.
pub const SUFFIX_WIDTH: usize = 3;

/// Why a member name could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("{0:?} has no '[' to mark the end of the base name")]
    NoBracket(String),
    #[error("{0:?} has no '_' before the numeric suffix")]
    NoUnderscore(String),
    #[error("{name:?} would become {target:?}, which another member already took in this pass")]
    Duplicate { name: String, target: String },
}

/// Outcome of [`tidy_names`].
#[derive(Debug, Default)]
pub struct TidyReport {
    /// New full paths, in directory-listing order.
    pub renamed: Vec<PathBuf>,
    /// Entries left untouched because their names did not fit the member pattern.
    pub skipped: Vec<NameError>,
}

/// Normalized name for a member file, e.g. `recs[1]_42` → `recs_042.marcxml`.
pub fn tidy_name(name: &str) -> std::result::Result<String, NameError> {
    let (base, _) = name
        .split_once('[')
        .ok_or_else(|| NameError::NoBracket(name.to_string()))?;
    let (_, num) = name
        .rsplit_once('_')
        .ok_or_else(|| NameError::NoUnderscore(name.to_string()))?;
    Ok(format!(
        "{}_{:0>width$}{}",
        base,
        num,
        RESERVED_EXTENSION,
        width = SUFFIX_WIDTH
    ))
}

/// Rename every regular file in `dir` that is not already `*.marcxml`.
///
/// Names that don't fit the member pattern, and names that normalize to a target already
/// produced earlier in the same pass, are skipped with a warning and listed in the report.
/// A pre-existing `*.marcxml` target is overwritten. Directory-listing order is platform
/// dependent; callers must not rely on it.
pub fn tidy_names(dir: &Path) -> Result<TidyReport> {
    let mut report = TidyReport::default();
    let mut produced: HashSet<String> = HashSet::new();
    let entries = fs::read_dir(dir).map_err(|e| BibdumpError::io("list directory", dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| BibdumpError::io("list directory", dir, e))?;
        let old_name = entry.file_name();
        let Some(old_name) = old_name.to_str() else {
            tracing::warn!("skipping non-UTF-8 name {:?}", entry.file_name());
            continue;
        };
        if old_name.ends_with(RESERVED_EXTENSION) {
            continue;
        }
        let file_type = entry
            .file_type()
            .map_err(|e| BibdumpError::io("stat", entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }

        let new_name = match tidy_name(old_name) {
            Ok(n) if produced.contains(&n) => Err(NameError::Duplicate {
                name: old_name.to_string(),
                target: n,
            }),
            other => other,
        };
        let new_name = match new_name {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("not renaming {}: {}", entry.path().display(), e);
                report.skipped.push(e);
                continue;
            }
        };

        let old_path = entry.path();
        let new_path = dir.join(&new_name);
        fs::rename(&old_path, &new_path).map_err(|e| BibdumpError::io("rename", &old_path, e))?;
        tracing::info!("renamed {} to {}", old_path.display(), new_name);
        report.renamed.push(new_path);
        produced.insert(new_name);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn tidy_name_pads_suffix() {
        assert_eq!(tidy_name("recs[1]_42").unwrap(), "recs_042.marcxml");
        assert_eq!(tidy_name("recs[1]_7").unwrap(), "recs_007.marcxml");
        assert_eq!(tidy_name("recs[1]_123").unwrap(), "recs_123.marcxml");
        assert_eq!(tidy_name("recs[1]_1234").unwrap(), "recs_1234.marcxml");
    }

    #[test]
    fn tidy_name_uses_first_bracket_and_last_underscore() {
        assert_eq!(
            tidy_name("bib_export[2024][a]_part_9").unwrap(),
            "bib_export_009.marcxml"
        );
        assert_eq!(tidy_name("x[1]_").unwrap(), "x_000.marcxml");
    }

    #[test]
    fn tidy_name_malformed() {
        assert_eq!(
            tidy_name("recs_42"),
            Err(NameError::NoBracket("recs_42".to_string()))
        );
        assert_eq!(
            tidy_name("recs[1]42"),
            Err(NameError::NoUnderscore("recs[1]42".to_string()))
        );
    }

    #[test]
    fn tidy_names_renames_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("recs[1]_42"), b"a").unwrap();
        fs::write(dir.path().join("recs[1]_5"), b"b").unwrap();
        fs::write(dir.path().join("done_001.marcxml"), b"c").unwrap();
        fs::write(dir.path().join("README"), b"d").unwrap();
        fs::create_dir(dir.path().join("sub[1]_1")).unwrap();

        let report = tidy_names(dir.path()).unwrap();

        let renamed: BTreeSet<PathBuf> = report.renamed.into_iter().collect();
        let expected: BTreeSet<PathBuf> = [
            dir.path().join("recs_042.marcxml"),
            dir.path().join("recs_005.marcxml"),
        ]
        .into_iter()
        .collect();
        assert_eq!(renamed, expected);
        assert_eq!(fs::read(dir.path().join("recs_042.marcxml")).unwrap(), b"a");
        assert_eq!(fs::read(dir.path().join("done_001.marcxml")).unwrap(), b"c");
        assert!(dir.path().join("README").exists());
        assert!(dir.path().join("sub[1]_1").is_dir());
        assert_eq!(report.skipped, vec![NameError::NoBracket("README".to_string())]);
    }

    #[test]
    fn tidy_names_keeps_first_of_colliding_members() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("recs[1]_42"), b"one").unwrap();
        fs::write(dir.path().join("recs[2]_042"), b"two").unwrap();

        let report = tidy_names(dir.path()).unwrap();

        assert_eq!(report.renamed, vec![dir.path().join("recs_042.marcxml")]);
        assert_eq!(report.skipped.len(), 1);
        let NameError::Duplicate { name, target } = &report.skipped[0] else {
            panic!("unexpected {:?}", report.skipped);
        };
        assert_eq!(target, "recs_042.marcxml");
        let kept = fs::read(dir.path().join("recs_042.marcxml")).unwrap();
        let left = fs::read(dir.path().join(name)).unwrap();
        let mut contents = vec![kept, left];
        contents.sort();
        assert_eq!(contents, vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn tidy_names_overwrites_marcxml_from_earlier_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("recs_042.marcxml"), b"old").unwrap();
        fs::write(dir.path().join("recs[1]_42"), b"new").unwrap();

        let report = tidy_names(dir.path()).unwrap();
        assert_eq!(report.renamed.len(), 1);
        assert!(report.skipped.is_empty());
        assert_eq!(fs::read(dir.path().join("recs_042.marcxml")).unwrap(), b"new");
    }

    #[test]
    fn tidy_names_is_a_no_op_on_second_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("recs[1]_42"), b"a").unwrap();
        assert_eq!(tidy_names(dir.path()).unwrap().renamed.len(), 1);
        let again = tidy_names(dir.path()).unwrap();
        assert!(again.renamed.is_empty());
        assert!(again.skipped.is_empty());
    }

    #[test]
    fn tidy_names_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = tidy_names(&dir.path().join("gone")).unwrap_err();
        assert!(err.is_not_found());
    }
}
