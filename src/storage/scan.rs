// src/storage/scan.rs
//! Directory traversal over memo files.
//!
//! There is no index: every bulk operation re-reads the directory. That keeps
//! the files the only source of truth, at the cost of `list()` being linear in
//! the number of memos (see `warnings` for the size at which this hurts).

use std::fs::{self, ReadDir};
use std::io;
use std::path::Path;

use tracing::trace;

use crate::entity::MemoId;

/// Iterator over the ids of memo files in a directory.
///
/// Entries whose names are not `<canonical id>.md`, and anything that is not a
/// regular file, are skipped. Each call to [`scan_memo_ids`] starts over.
pub struct MemoIds {
    entries: ReadDir,
}

pub fn scan_memo_ids(dir: &Path) -> io::Result<MemoIds> {
    Ok(MemoIds {
        entries: fs::read_dir(dir)?,
    })
}

impl Iterator for MemoIds {
    type Item = io::Result<MemoId>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e)),
            };

            let file_name = entry.file_name();
            let Some(id) = file_name.to_str().and_then(MemoId::from_file_name) else {
                trace!(file = ?file_name, "Skipping non-memo entry");
                continue;
            };

            match entry.file_type() {
                Ok(kind) if kind.is_file() => return Some(Ok(id)),
                Ok(_) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_filters_entries() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path();
        fs::write(dir.join("2024-01-01-1.md"), "x").unwrap();
        fs::write(dir.join("2024-01-01-7.md"), "x").unwrap();
        fs::write(dir.join("2024-01-02-1.md"), "x").unwrap();
        fs::write(dir.join("README.md"), "x").unwrap();
        fs::write(dir.join("2024-01-01-2.txt"), "x").unwrap();
        fs::write(dir.join("2024-01-01-03.md"), "x").unwrap();
        fs::create_dir(dir.join("2024-01-01-9.md")).unwrap();

        let mut ids: Vec<String> = scan_memo_ids(dir)
            .unwrap()
            .map(|id| id.unwrap().to_string())
            .collect();
        ids.sort();

        assert_eq!(ids, vec!["2024-01-01-1", "2024-01-01-7", "2024-01-02-1"]);
    }

    #[test]
    fn test_scan_is_restartable() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("2024-01-01-1.md"), "x").unwrap();

        assert_eq!(scan_memo_ids(tmp.path()).unwrap().count(), 1);
        fs::write(tmp.path().join("2024-01-01-2.md"), "x").unwrap();
        assert_eq!(scan_memo_ids(tmp.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_scan_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(scan_memo_ids(&tmp.path().join("missing")).is_err());
    }
}
