use std::sync::Arc;

use chrono::{TimeZone, Utc};
use dfs_console::registry::repository::FILES_KEY;
use dfs_console::registry::seed::{seed_files, seed_users};
use dfs_console::registry::{
    FileRecord, MemoryRegistryRepository, RegistryRepository, RegistryStore,
    SledRegistryRepository,
};
use proptest::prelude::*;
use tempfile::TempDir;

fn record(id: u64, filename: &str, owner: &str) -> FileRecord {
    FileRecord {
        id: id.to_string(),
        filename: filename.to_string(),
        size_bytes: 1_000 + id,
        owner: owner.to_string(),
        uploaded_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        primary_node: "node-3".to_string(),
        replica_nodes: vec!["node-1".to_string(), "node-4".to_string()],
        mime_type: "application/zip".to_string(),
        chunk_count: 1,
    }
}

fn open_sled(dir: &TempDir) -> RegistryStore {
    let repo = SledRegistryRepository::open(&dir.path().join("registry.sled")).unwrap();
    RegistryStore::open(Arc::new(repo))
}

#[test]
fn sled_reopen_yields_equal_collections() {
    let temp_dir = TempDir::new().unwrap();

    let (files, users) = {
        let store = open_sled(&temp_dir);
        store.add_file(record(900, "backup.zip", "kanish"));
        assert!(store.delete_file("2"));
        store.add_user("Priya").unwrap();
        (store.list_files(), store.list_users())
    };

    let reopened = open_sled(&temp_dir);
    assert_eq!(reopened.list_files(), files);
    assert_eq!(reopened.list_users(), users);
    assert_eq!(reopened.list_files()[0].id, "900");
    assert!(reopened.contains_user("priya"));
}

#[test]
fn first_sled_open_persists_seed() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("registry.sled");
    {
        let repo = SledRegistryRepository::open(&path).unwrap();
        let store = RegistryStore::open(Arc::new(repo));
        assert_eq!(store.list_files(), seed_files());
    }
    let repo = SledRegistryRepository::open(&path).unwrap();
    assert_eq!(repo.load_files().unwrap(), Some(seed_files()));
    assert_eq!(repo.load_users().unwrap(), Some(seed_users()));
}

#[test]
fn corrupt_files_entry_falls_back_to_seed() {
    let repo = Arc::new(MemoryRegistryRepository::new().with_raw(FILES_KEY, "not json"));
    let store = RegistryStore::open(repo.clone());
    assert_eq!(store.list_files(), seed_files());
    assert_eq!(repo.load_files().unwrap(), Some(seed_files()));
}

#[test]
fn empty_persisted_list_is_not_replaced_by_seed() {
    let repo = Arc::new(MemoryRegistryRepository::new());
    repo.save_files(&[]).unwrap();
    let store = RegistryStore::open(repo);
    assert_eq!(store.file_count(), 0);
}

#[test]
fn delete_absent_id_leaves_collection_unchanged() {
    let repo = Arc::new(MemoryRegistryRepository::new());
    let store = RegistryStore::open(repo.clone());
    let before = store.list_files();
    assert!(!store.delete_file("missing"));
    assert_eq!(store.list_files(), before);
    assert_eq!(repo.load_files().unwrap(), Some(before));
}

#[derive(Debug, Clone)]
enum Op {
    Add,
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Add), (0usize..12).prop_map(Op::Delete)]
}

proptest! {
    #[test]
    fn list_is_most_recent_first_and_reloads_equal(ops in prop::collection::vec(op_strategy(), 0..30)) {
        let repo = Arc::new(MemoryRegistryRepository::new());
        let store = RegistryStore::open(repo.clone());
        let mut expected_len = seed_files().len();
        let mut added: Vec<String> = Vec::new();

        for (step, op) in ops.iter().enumerate() {
            match op {
                Op::Add => {
                    let id = 10_000 + step as u64;
                    store.add_file(record(id, "f.bin", "aditya"));
                    added.push(id.to_string());
                    expected_len += 1;
                }
                Op::Delete(index) => {
                    let files = store.list_files();
                    if let Some(target) = files.get(*index) {
                        prop_assert!(store.delete_file(&target.id));
                        added.retain(|id| id != &target.id);
                        expected_len -= 1;
                    } else {
                        prop_assert!(!store.delete_file("absent"));
                    }
                }
            }
        }

        let files = store.list_files();
        prop_assert_eq!(files.len(), expected_len);

        // Surviving added records appear newest first, ahead of any seed record.
        let head: Vec<String> = files.iter().take(added.len()).map(|f| f.id.clone()).collect();
        let newest_first: Vec<String> = added.iter().rev().cloned().collect();
        prop_assert_eq!(head, newest_first);

        let reloaded = RegistryStore::open(repo);
        prop_assert_eq!(reloaded.list_files(), files);
    }
}
