//! Route table construction.
//!
//! The route table for a method is rebuilt from the content store on every
//! request: a fresh depth-first walk keeps the on-disk hierarchy
//! authoritative without a cache-invalidation story. A directory becomes a
//! candidate pattern for method M exactly when it directly contains
//! `$M.json`; the walk still descends into it, since a directory and its
//! descendants may all be valid patterns.

use crate::descriptor::descriptor_file_name;
use crate::store::ContentStore;

/// Build the ordered candidate pattern list for a method.
///
/// `root` must carry a trailing slash (`/` or `/tests/`). Order is
/// depth-first pre-order with children in store listing order; later
/// entries win ties during matching.
pub fn build_route_table(store: &dyn ContentStore, root: &str, method: &str) -> Vec<String> {
    let descriptor = descriptor_file_name(method);
    let mut table = Vec::new();
    walk(store, root, &descriptor, &mut table);
    table
}

fn walk(store: &dyn ContentStore, dir: &str, descriptor: &str, table: &mut Vec<String>) {
    for entry in store.list_dir(dir) {
        if !entry.is_dir {
            continue;
        }
        let subdir = format!("{dir}{}/", entry.name);
        if store.exists(&format!("{subdir}{descriptor}")) {
            table.push(format!("{dir}{}", entry.name));
        }
        walk(store, &subdir, descriptor, table);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DiskStore;
    use std::fs;
    use std::path::Path;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"{}").unwrap();
    }

    #[test]
    fn test_registers_only_dirs_with_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "users/$GET.json");
        touch(dir.path(), "users/:id/$GET.json");
        touch(dir.path(), "items/readme.txt");
        fs::create_dir_all(dir.path().join("empty")).unwrap();

        let store = DiskStore::new(dir.path());
        let table = build_route_table(&store, "/", "GET");
        assert_eq!(table, vec!["/users", "/users/:id"]);
    }

    #[test]
    fn test_method_is_case_normalized() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "users/$POST.json");

        let store = DiskStore::new(dir.path());
        assert_eq!(build_route_table(&store, "/", "post"), vec!["/users"]);
        assert!(build_route_table(&store, "/", "GET").is_empty());
    }

    #[test]
    fn test_depth_first_pre_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/$GET.json");
        touch(dir.path(), "a/b/$GET.json");
        touch(dir.path(), "c/$GET.json");

        let store = DiskStore::new(dir.path());
        let table = build_route_table(&store, "/", "GET");
        assert_eq!(table, vec!["/a", "/a/b", "/c"]);
    }

    #[test]
    fn test_walk_respects_root_prefix() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "tests/users/$GET.json");
        touch(dir.path(), "users/$GET.json");

        let store = DiskStore::new(dir.path());
        let table = build_route_table(&store, "/tests/", "GET");
        assert_eq!(table, vec!["/tests/users"]);
    }
}
