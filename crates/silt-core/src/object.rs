//! Content-addressable object store.
//!
//! Objects are stored in `.silt/objects/` as one file per object, with
//! the full hex hash as the filename. Blobs and commit records share
//! this namespace; both are addressed by the SHA-1 of their bytes.
//! Objects are write-once: there is no update or delete.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SiltError, SiltResult};
use crate::hash::hash_bytes;

/// The object store manages content-addressable storage on disk.
pub struct ObjectStore {
    /// Root path: `.silt/objects/`
    root: PathBuf,
}

impl ObjectStore {
    /// Create a new ObjectStore rooted at the given path.
    pub fn new(objects_dir: &Path) -> Self {
        Self {
            root: objects_dir.to_path_buf(),
        }
    }

    /// Create the backing directory if it does not exist yet.
    ///
    /// Re-initializing an existing store is a no-op; stored objects are
    /// never touched.
    pub fn init(&self) -> SiltResult<()> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Store bytes and return their content hash.
    ///
    /// If an object with the same content already exists, this is a
    /// no-op and simply returns the existing hash.
    pub fn put(&self, data: &[u8]) -> SiltResult<String> {
        let hash = hash_bytes(data);
        let path = self.object_path(&hash);

        if path.exists() {
            return Ok(hash);
        }

        fs::write(&path, data)?;
        Ok(hash)
    }

    /// Retrieve an object by its hash.
    pub fn get(&self, id: &str) -> SiltResult<Vec<u8>> {
        let path = self.object_path(id);
        if !path.exists() {
            return Err(SiltError::ObjectNotFound(id.to_string()));
        }
        Ok(fs::read(&path)?)
    }

    /// Check if an object exists.
    pub fn exists(&self, id: &str) -> bool {
        self.object_path(id).exists()
    }

    /// Resolve a potentially-short object id to a full id.
    ///
    /// Scans the object directory for a unique prefix match.
    pub fn resolve_prefix(&self, prefix: &str) -> SiltResult<String> {
        // A full hash (40 chars) is looked up directly.
        if prefix.len() == 40 {
            if self.exists(prefix) {
                return Ok(prefix.to_string());
            }
            return Err(SiltError::ObjectNotFound(prefix.to_string()));
        }

        let mut matches = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with(prefix) {
                matches.push(name);
            }
        }

        match matches.len() {
            0 => Err(SiltError::ObjectNotFound(prefix.to_string())),
            1 => Ok(matches.into_iter().next().unwrap()),
            _ => Err(SiltError::AmbiguousId(prefix.to_string())),
        }
    }

    /// Get the filesystem path for an object hash.
    fn object_path(&self, id: &str) -> PathBuf {
        self.root.join(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_store(dir: &Path) -> ObjectStore {
        let store = ObjectStore::new(dir);
        store.init().unwrap();
        store
    }

    #[test]
    fn test_put_and_get() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());

        let data = b"hello world";
        let hash = store.put(data).unwrap();

        let retrieved = store.get(&hash).unwrap();
        assert_eq!(retrieved, data);
    }

    #[test]
    fn test_put_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());

        let data = b"same content";
        let h1 = store.put(data).unwrap();
        let h2 = store.put(data).unwrap();
        assert_eq!(h1, h2);

        // Exactly one copy on disk.
        let count = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_init_twice_preserves_objects() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());
        let hash = store.put(b"survives re-init").unwrap();

        store.init().unwrap();
        assert_eq!(store.get(&hash).unwrap(), b"survives re-init");
    }

    #[test]
    fn test_get_nonexistent() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());

        let result = store.get("deadbeef00");
        assert!(matches!(result, Err(SiltError::ObjectNotFound(_))));
    }

    #[test]
    fn test_exists() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());

        let hash = store.put(b"test").unwrap();
        assert!(store.exists(&hash));
        assert!(!store.exists("nonexistent"));
    }

    #[test]
    fn test_resolve_prefix_unique() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());

        let hash = store.put(b"only object").unwrap();
        let resolved = store.resolve_prefix(&hash[..8]).unwrap();
        assert_eq!(resolved, hash);
    }

    #[test]
    fn test_resolve_prefix_ambiguous() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());

        store.put(b"one").unwrap();
        store.put(b"two").unwrap();
        // The empty prefix matches every object.
        let result = store.resolve_prefix("");
        assert!(matches!(result, Err(SiltError::AmbiguousId(_))));
    }

    #[test]
    fn test_resolve_prefix_missing() {
        let dir = tempdir().unwrap();
        let store = open_store(dir.path());

        let result = store.resolve_prefix("abc123");
        assert!(matches!(result, Err(SiltError::ObjectNotFound(_))));
    }
}
