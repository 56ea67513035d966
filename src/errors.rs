use thiserror::Error;

/// Failures raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Malformed value stored under `{key}`: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Error type reported by quest store operations.
///
/// Every variant is recoverable: an operation that returns one has left the
/// store exactly as it was.
#[derive(Debug, Error)]
pub enum QuestError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Quest `{0}` is archived")]
    Archived(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl QuestError {
    /// True when the operation was rejected by input or archive checks.
    pub fn is_validation(&self) -> bool {
        matches!(self, QuestError::Validation(_) | QuestError::Archived(_))
    }
}

pub type QuestResult<T> = Result<T, QuestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archived_counts_as_validation_rejection() {
        assert!(QuestError::Archived("q".into()).is_validation());
        assert!(QuestError::Validation("empty".into()).is_validation());
        assert!(!QuestError::NotFound("q".into()).is_validation());
    }

    #[test]
    fn storage_failures_propagate_as_quest_errors() {
        fn read() -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk gone".into()))
        }
        fn load() -> QuestResult<()> {
            read()?;
            Ok(())
        }
        let err = load().unwrap_err();
        assert!(matches!(err, QuestError::Storage(StorageError::Unavailable(_))));
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Storage unavailable: disk gone");
    }

    #[test]
    fn decode_error_names_the_key() {
        let source = serde_json::from_str::<u8>("nope").unwrap_err();
        let err = StorageError::Decode {
            key: "quests".into(),
            source,
        };
        assert!(err.to_string().contains("`quests`"));
    }
}
