//! Key-value persistence used by the quest store.
//!
//! Values are JSON documents stored under the fixed keys below. Backends only
//! move strings around; encoding and decoding happen in [`read_json`] and
//! [`write_json`].

pub mod json_backend;
pub mod memory;

use serde::{de::DeserializeOwned, Serialize};

use crate::errors::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Active quests.
pub const QUESTS_KEY: &str = "quests";
/// Archived quests.
pub const HISTORY_KEY: &str = "questHistory";
/// Id of the selected quest, or `null`.
pub const SELECTED_KEY: &str = "activeQuestId";
pub const SETTINGS_KEY: &str = "appSettings";

pub const ALL_KEYS: [&str; 4] = [QUESTS_KEY, HISTORY_KEY, SELECTED_KEY, SETTINGS_KEY];

/// Abstraction over string key-value stores (browser-style local storage).
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Reads and decodes the value under `key`; `Ok(None)` when the key is absent.
pub fn read_json<T: DeserializeOwned>(storage: &dyn KeyValueStorage, key: &str) -> Result<Option<T>> {
    match storage.get(key)? {
        Some(raw) => decode(key, &raw).map(Some),
        None => Ok(None),
    }
}

pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn KeyValueStorage,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|source| StorageError::Decode {
        key: key.to_string(),
        source,
    })
}

pub use json_backend::JsonFileStorage;
pub use memory::MemoryStorage;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StorageError;

    #[test]
    fn read_json_distinguishes_absent_and_malformed() {
        let storage = MemoryStorage::new();
        assert!(read_json::<Vec<String>>(&storage, QUESTS_KEY)
            .unwrap()
            .is_none());

        storage.set(QUESTS_KEY, "{not json").unwrap();
        let err = read_json::<Vec<String>>(&storage, QUESTS_KEY).unwrap_err();
        assert!(matches!(err, StorageError::Decode { ref key, .. } if key == QUESTS_KEY));
    }

    #[test]
    fn write_then_read_null_selection() {
        let storage = MemoryStorage::new();
        write_json(&storage, SELECTED_KEY, &Option::<String>::None).unwrap();
        assert_eq!(storage.get(SELECTED_KEY).unwrap().as_deref(), Some("null"));
        let value: Option<Option<String>> = read_json(&storage, SELECTED_KEY).unwrap();
        assert_eq!(value, Some(None));
    }
}
