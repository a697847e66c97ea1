//! Repository — the main entry point for silt operations.
//!
//! A Repository ties together the object store, staging index, and
//! commit chain, and owns the `.silt/` layout:
//!
//! ```text
//! .silt/
//!   objects/<hex-hash>   one file per object (blob bytes or commit JSON)
//!   HEAD                 single line: commit hash, or empty
//!   index                JSON array of {path, hash}
//! ```
//!
//! Operations run to completion sequentially. There is no locking: the
//! design assumes a single active writer per repository, and concurrent
//! writers from other processes may corrupt the index or HEAD.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::commit::{Commit, History};
use crate::diff::{self, DiffSegment};
use crate::error::{SiltError, SiltResult};
use crate::fsutil::atomic_write;
use crate::index::{IndexEntry, StagingIndex};
use crate::object::ObjectStore;

/// The `.silt` directory name.
const SILT_DIR: &str = ".silt";

/// A silt repository.
pub struct Repository {
    /// Root of the working directory (where `.silt/` lives).
    root: PathBuf,
    /// Path to the `.silt/` directory.
    silt_dir: PathBuf,
    /// Content-addressable object store.
    objects: ObjectStore,
}

/// How a file entry in a commit relates to the parent commit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileChange {
    /// The path does not exist in the parent commit; no diff computed.
    Introduced,
    /// Line edits relative to the parent's blob for the same path.
    Modified(Vec<DiffSegment>),
}

/// One file of a commit, compared against the parent commit.
#[derive(Debug, Clone, Serialize)]
pub struct FileComparison {
    pub path: String,
    pub change: FileChange,
}

/// Everything `show` needs to render one commit.
#[derive(Debug, Clone, Serialize)]
pub struct CommitView {
    /// Full commit hash.
    pub id: String,
    pub commit: Commit,
    /// None when the commit has no parent — nothing to compare against.
    pub comparisons: Option<Vec<FileComparison>>,
}

impl Repository {
    /// Initialize a new silt repository in the given directory.
    ///
    /// Creates the `.silt/` structure: an empty object store, an empty
    /// HEAD, and an empty index. Returns `AlreadyInitialized` if `.silt/`
    /// exists — callers treat that as benign; existing data is never
    /// touched, so repeated init is safe.
    pub fn init(root: &Path) -> SiltResult<Self> {
        let silt_dir = root.join(SILT_DIR);

        if silt_dir.exists() {
            return Err(SiltError::AlreadyInitialized);
        }

        let objects = ObjectStore::new(&silt_dir.join("objects"));
        objects.init()?;
        fs::write(silt_dir.join("HEAD"), "")?;
        StagingIndex::clear(&silt_dir.join("index"))?;

        Self::open(root)
    }

    /// Open an existing silt repository.
    pub fn open(root: &Path) -> SiltResult<Self> {
        let silt_dir = root.join(SILT_DIR);

        if !silt_dir.exists() {
            return Err(SiltError::NotARepo);
        }

        let objects = ObjectStore::new(&silt_dir.join("objects"));

        Ok(Self {
            root: root.to_path_buf(),
            silt_dir,
            objects,
        })
    }

    /// Stage a file: store its content as a blob and record the
    /// path→hash mapping at the end of the index.
    ///
    /// Fails with `SourceNotFound` before anything is written if the
    /// file does not exist. Staging the same path again appends a second
    /// entry rather than replacing the first.
    pub fn add(&self, path: &str) -> SiltResult<IndexEntry> {
        let source = self.root.join(path);
        if !source.exists() {
            return Err(SiltError::SourceNotFound(path.to_string()));
        }

        let content = fs::read(&source)?;
        let hash = self.objects.put(&content)?;

        let mut index = StagingIndex::load(&self.index_path())?;
        let entry = IndexEntry {
            path: path.to_string(),
            hash,
        };
        index.append(entry.clone());
        index.save(&self.index_path())?;

        Ok(entry)
    }

    /// Snapshot the staging index as a new commit.
    ///
    /// Fails with `NothingToCommit` when the index is empty. The effect
    /// order bounds crash damage: the commit object is written first,
    /// HEAD moves second, and the index is cleared last. A crash in
    /// between can leave an unreferenced object or a stale index, but
    /// never a HEAD pointing at a missing commit.
    pub fn commit(&self, message: &str) -> SiltResult<(String, Commit)> {
        let index = StagingIndex::load(&self.index_path())?;
        if index.is_empty() {
            return Err(SiltError::NothingToCommit);
        }

        let parent = self.head()?;
        let commit = Commit::new(message.to_string(), index.into_entries(), parent);

        let id = commit.persist(&self.objects)?;
        atomic_write(&self.head_path(), id.as_bytes())?;
        StagingIndex::clear(&self.index_path())?;

        Ok((id, commit))
    }

    /// Current HEAD commit hash (None before the first commit).
    pub fn head(&self) -> SiltResult<Option<String>> {
        let head_path = self.head_path();
        if !head_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&head_path)?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            Ok(None)
        } else {
            Ok(Some(trimmed.to_string()))
        }
    }

    /// Walk the commit chain from HEAD, newest first.
    ///
    /// The walk is lazy and restartable: each call starts fresh from the
    /// current HEAD. An unresolvable hash mid-walk surfaces as
    /// `CorruptHistory` after the reachable prefix has been yielded.
    pub fn history(&self) -> SiltResult<History<'_>> {
        Ok(History::new(&self.objects, self.head()?))
    }

    /// The staged entries, in add order.
    pub fn staged(&self) -> SiltResult<Vec<IndexEntry>> {
        Ok(StagingIndex::load(&self.index_path())?.into_entries())
    }

    /// Load one commit and compare each of its files against the parent.
    ///
    /// `id` may be a unique short prefix. With no parent, `comparisons`
    /// is None and no diff is attempted. Otherwise each file entry is
    /// matched against the first entry with the same path in the
    /// parent's file list: a match diffs the two blobs, no match marks
    /// the file as newly introduced.
    pub fn show(&self, id: &str) -> SiltResult<CommitView> {
        let full_id = self.objects.resolve_prefix(id)?;
        let commit = self.load_commit(&full_id)?;

        let comparisons = match commit.parent.as_deref() {
            None => None,
            Some(parent_id) => {
                let parent = self.load_parent(parent_id)?;

                let mut comparisons = Vec::new();
                for entry in &commit.files {
                    let change = match parent.file(&entry.path) {
                        Some(prev) => {
                            let old = self.objects.get(&prev.hash)?;
                            let new = self.objects.get(&entry.hash)?;
                            FileChange::Modified(diff::diff_lines(
                                &String::from_utf8_lossy(&old),
                                &String::from_utf8_lossy(&new),
                            ))
                        }
                        None => FileChange::Introduced,
                    };
                    comparisons.push(FileComparison {
                        path: entry.path.clone(),
                        change,
                    });
                }
                Some(comparisons)
            }
        };

        Ok(CommitView {
            id: full_id,
            commit,
            comparisons,
        })
    }

    fn load_commit(&self, id: &str) -> SiltResult<Commit> {
        let data = self.objects.get(id)?;
        Commit::from_bytes(id, &data)
    }

    /// Load a parent commit, mapping a missing object to `CorruptHistory`:
    /// a dangling parent link is a broken chain, not a bad request.
    fn load_parent(&self, id: &str) -> SiltResult<Commit> {
        match self.load_commit(id) {
            Err(SiltError::ObjectNotFound(id)) => Err(SiltError::CorruptHistory(format!(
                "parent commit {id} is missing from the object store"
            ))),
            other => other,
        }
    }

    fn index_path(&self) -> PathBuf {
        self.silt_dir.join("index")
    }

    fn head_path(&self) -> PathBuf {
        self.silt_dir.join("HEAD")
    }
}
