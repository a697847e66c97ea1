//! Commit records and history traversal.
//!
//! A commit snapshots the staging index, carries a message and creation
//! time, and points at its parent, forming a strictly linear
//! backward-linked chain. A commit's identity is the SHA-1 of its
//! serialized JSON, assigned by the object store when the record is
//! written — the record never contains its own hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{SiltError, SiltResult};
use crate::index::IndexEntry;
use crate::object::ObjectStore;

/// An immutable snapshot of the staging index at commit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Commit {
    /// When this commit was created.
    pub timestamp: DateTime<Utc>,
    /// Commit message.
    pub message: String,
    /// The staged entries, in add order (duplicates preserved).
    pub files: Vec<IndexEntry>,
    /// Hash of the parent commit (None for the first commit).
    pub parent: Option<String>,
}

impl Commit {
    /// Assemble a commit record stamped with the current time.
    ///
    /// `parent` is the HEAD value captured before this commit is written.
    pub fn new(message: String, files: Vec<IndexEntry>, parent: Option<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message,
            files,
            parent,
        }
    }

    /// Serialize the record and write it through the object store.
    ///
    /// The returned hash is the commit's identity and the next HEAD
    /// value. The hash is computed from the serialized bytes, so it is
    /// always known before anything references it.
    pub fn persist(&self, objects: &ObjectStore) -> SiltResult<String> {
        let json = serde_json::to_string(self)?;
        objects.put(json.as_bytes())
    }

    /// Parse a commit record fetched from the object store.
    ///
    /// Objects that do not deserialize into a commit (blobs, truncated
    /// records) surface as `CorruptHistory` naming the offending id.
    pub fn from_bytes(id: &str, data: &[u8]) -> SiltResult<Self> {
        serde_json::from_slice(data).map_err(|e| {
            SiltError::CorruptHistory(format!("object {id} is not a commit record: {e}"))
        })
    }

    /// First entry in `files` with the given path, if any.
    ///
    /// With duplicate adds the first match wins; later entries for the
    /// same path are never consulted by comparisons.
    pub fn file(&self, path: &str) -> Option<&IndexEntry> {
        self.files.iter().find(|e| e.path == path)
    }
}

/// Lazy walk of the commit chain, newest first.
///
/// Yields `(id, commit)` pairs starting from HEAD and following `parent`
/// links until the first commit (`parent = None`). A hash that fails to
/// resolve mid-walk yields `CorruptHistory` and ends the iteration;
/// commits already yielded stand. Each walk starts fresh from the HEAD
/// it was constructed with.
pub struct History<'a> {
    objects: &'a ObjectStore,
    next: Option<String>,
}

impl<'a> History<'a> {
    /// Start a walk at the given commit hash (typically HEAD).
    pub fn new(objects: &'a ObjectStore, head: Option<String>) -> Self {
        Self {
            objects,
            next: head,
        }
    }
}

impl Iterator for History<'_> {
    type Item = SiltResult<(String, Commit)>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;

        let data = match self.objects.get(&id) {
            Ok(data) => data,
            Err(SiltError::ObjectNotFound(_)) => {
                return Some(Err(SiltError::CorruptHistory(format!(
                    "commit {id} is missing from the object store"
                ))));
            }
            Err(e) => return Some(Err(e)),
        };

        match Commit::from_bytes(&id, &data) {
            Ok(commit) => {
                self.next = commit.parent.clone();
                Some(Ok((id, commit)))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
