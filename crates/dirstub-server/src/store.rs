//! Content store abstraction.
//!
//! The routing engine addresses everything through store-rooted paths
//! (`/users/:id/$GET.json`) and never touches the filesystem directly.
//! `DiskStore` maps those paths onto a directory on disk.

use std::io;
use std::path::{Path, PathBuf};

/// A directory entry as reported by [`ContentStore::list_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read-only view over a rooted file hierarchy.
///
/// All paths are absolute within the store (leading `/`). Listing a
/// missing or unreadable directory yields no entries rather than an error,
/// so a walk degrades to "leaf" instead of failing the request.
pub trait ContentStore: Send + Sync {
    fn exists(&self, path: &str) -> bool;
    fn list_dir(&self, path: &str) -> Vec<DirEntry>;
    fn read(&self, path: &str) -> io::Result<Vec<u8>>;
}

/// Filesystem-backed content store.
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }
}

impl ContentStore for DiskStore {
    fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }

    fn list_dir(&self, path: &str) -> Vec<DirEntry> {
        let Ok(entries) = std::fs::read_dir(self.resolve(path)) else {
            return Vec::new();
        };
        let mut listed: Vec<DirEntry> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let is_dir = entry.file_type().ok()?.is_dir();
                Some(DirEntry { name, is_dir })
            })
            .collect();
        // read_dir order is platform-dependent; sort so traversal order,
        // and with it the route tie-break, is deterministic.
        listed.sort_by(|a, b| a.name.cmp(&b.name));
        listed
    }

    fn read(&self, path: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.resolve(path))
    }
}

impl std::fmt::Debug for DiskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskStore")
            .field("root", &self.root)
            .finish()
    }
}

impl DiskStore {
    /// The directory this store is rooted at.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_list_dir_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("zebra")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::write(dir.path().join("middle.json"), b"{}").unwrap();

        let store = DiskStore::new(dir.path());
        let names: Vec<String> = store.list_dir("/").into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["alpha", "middle.json", "zebra"]);
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        assert!(store.list_dir("/nope").is_empty());
    }

    #[test]
    fn test_exists_and_read() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("users")).unwrap();
        fs::write(dir.path().join("users/ok.json"), b"{\"id\": 1}").unwrap();

        let store = DiskStore::new(dir.path());
        assert!(store.exists("/users/ok.json"));
        assert!(!store.exists("/users/missing.json"));
        assert_eq!(store.read("/users/ok.json").unwrap(), b"{\"id\": 1}");
        assert!(store.read("/users/missing.json").is_err());
    }
}
