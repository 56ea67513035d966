#![allow(dead_code)]

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Mutex,
};

use compass_core::{
    core::{SequentialIds, SteppingClock},
    storage::{JsonFileStorage, MemoryStorage},
    Quest, QuestStore,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Opens a store over `storage` with a clock starting at 1000ms (+10 per read)
/// and ids `id-1`, `id-2`, ...
pub fn open_store(storage: &MemoryStorage) -> QuestStore {
    QuestStore::with_collaborators(
        Box::new(storage.clone()),
        Box::new(SteppingClock::new(1_000, 10)),
        Box::new(SequentialIds::new("id")),
    )
}

/// Creates a store over fresh in-memory storage and returns a handle to it.
pub fn setup_store() -> (QuestStore, MemoryStorage) {
    let storage = MemoryStorage::new();
    (open_store(&storage), storage)
}

/// Creates a unique directory for file-backed storage tests.
pub fn temp_data_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let dir = temp.path().join("data");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    dir
}

pub fn open_file_store(dir: &Path) -> QuestStore {
    let storage = JsonFileStorage::in_dir(dir).expect("create json file storage");
    QuestStore::open(Box::new(storage))
}

pub fn quest(id: &str, name: &str, created_at: i64) -> Quest {
    Quest::new(id, name, created_at)
}

pub fn quests_json(quests: &[Quest]) -> String {
    serde_json::to_string(quests).expect("encode quests")
}

pub fn stored_quests(storage: &MemoryStorage, key: &str) -> Vec<Quest> {
    use compass_core::storage::KeyValueStorage;
    let raw = storage
        .get(key)
        .expect("read storage")
        .unwrap_or_else(|| "[]".into());
    serde_json::from_str(&raw).expect("decode stored quests")
}

pub fn ids(quests: &[Quest]) -> Vec<&str> {
    quests.iter().map(|q| q.id.as_str()).collect()
}

/// Asserts the collection invariants that must hold after every operation.
pub fn assert_invariants(store: &QuestStore) {
    let mut seen = HashSet::new();
    for quest in store.active().iter().chain(store.archived()) {
        assert!(
            seen.insert(quest.id.clone()),
            "quest {} appears more than once",
            quest.id
        );
    }
    assert!(!seen.is_empty(), "store must never be empty");
    let selected = store.selected_id().expect("a quest must be selected");
    assert!(seen.contains(selected), "selection {selected} is dangling");
}
