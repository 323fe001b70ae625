use thiserror::Error;

/// Errors produced by key validation and decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid key encoding: {0}")]
    InvalidEncoding(String),

    #[error("invalid key {key}: {reason}")]
    InvalidKey { key: String, reason: String },
}
