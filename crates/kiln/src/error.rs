use kiln_store::StoreError;
use thiserror::Error;

/// Errors returned by lifecycle operations.
///
/// Store failures are passed through untouched in [`Error::Store`]; compare
/// against the store's own variants to tell "not found" from other failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Get or Delete was called on an entity with no key.
    #[error("entity does not have a key")]
    MissingKey,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// Returns `true` if the store reported that no entity exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Store(e) if e.is_not_found())
    }

    /// The underlying store error, if this is one.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Error::Store(e) => Some(e),
            Error::MissingKey => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
