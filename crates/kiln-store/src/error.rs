use kiln_types::{Key, TypeError};

/// Errors from datastore operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No entity is stored under the requested key.
    #[error("no such entity: {0}")]
    NoSuchEntity(Key),

    /// The key is malformed, or incomplete where a complete key is needed.
    #[error(transparent)]
    InvalidKey(#[from] TypeError),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid store configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error while loading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A thread panicked while holding a store lock.
    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    /// Returns `true` for the distinguished "not found" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NoSuchEntity(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
