//! Staging index.
//!
//! The index is an ordered buffer of `{path, hash}` pairs waiting for
//! the next commit, stored as a JSON array at `.silt/index`. Order is
//! add order. A path added more than once before a commit appears more
//! than once — entries are carried into the commit's file list verbatim,
//! with no dedup and no last-write-wins.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SiltResult;
use crate::fsutil::atomic_write;

/// A staged file: relative path and the blob hash of its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexEntry {
    /// Path relative to the repository root.
    pub path: String,
    /// SHA-1 hash of the file's content at add time.
    pub hash: String,
}

/// The ordered sequence of staged entries.
#[derive(Debug, Default, Clone)]
pub struct StagingIndex {
    entries: Vec<IndexEntry>,
}

impl StagingIndex {
    /// Load the index from a JSON file, or return an empty index.
    pub fn load(path: &Path) -> SiltResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        let entries: Vec<IndexEntry> = serde_json::from_str(&data)?;
        Ok(Self { entries })
    }

    /// Save the index to a JSON file (atomic: temp + fsync + rename).
    pub fn save(&self, path: &Path) -> SiltResult<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        atomic_write(path, json.as_bytes())
    }

    /// Reset the persisted index to an empty sequence.
    ///
    /// Invoked only as part of a successful commit (and by `init`).
    pub fn clear(path: &Path) -> SiltResult<()> {
        atomic_write(path, b"[]")
    }

    /// Append an entry at the end of the sequence.
    pub fn append(&mut self, entry: IndexEntry) {
        self.entries.push(entry);
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The staged entries, in add order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Consume the index, yielding its entries for a commit's file list.
    pub fn into_entries(self) -> Vec<IndexEntry> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(path: &str, hash: &str) -> IndexEntry {
        IndexEntry {
            path: path.to_string(),
            hash: hash.to_string(),
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let idx = StagingIndex::load(&dir.path().join("index")).unwrap();
        assert!(idx.is_empty());
    }

    #[test]
    fn test_append_save_load_preserves_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index");

        let mut idx = StagingIndex::default();
        idx.append(entry("b.txt", "hash-b"));
        idx.append(entry("a.txt", "hash-a"));
        idx.save(&path).unwrap();

        let loaded = StagingIndex::load(&path).unwrap();
        let paths: Vec<&str> = loaded.entries().iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["b.txt", "a.txt"]);
    }

    #[test]
    fn test_duplicate_paths_are_kept() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index");

        let mut idx = StagingIndex::default();
        idx.append(entry("a.txt", "old-hash"));
        idx.append(entry("a.txt", "new-hash"));
        idx.save(&path).unwrap();

        let loaded = StagingIndex::load(&path).unwrap();
        assert_eq!(loaded.entries().len(), 2);
        assert_eq!(loaded.entries()[0].hash, "old-hash");
        assert_eq!(loaded.entries()[1].hash, "new-hash");
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index");

        let mut idx = StagingIndex::default();
        idx.append(entry("a.txt", "hash"));
        idx.save(&path).unwrap();

        StagingIndex::clear(&path).unwrap();
        let loaded = StagingIndex::load(&path).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_malformed_index_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("index");
        fs::write(&path, "not json").unwrap();

        assert!(StagingIndex::load(&path).is_err());
    }
}
