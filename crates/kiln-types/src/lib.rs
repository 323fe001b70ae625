//! Foundation types for Kiln.
//!
//! Every entity stored through Kiln is addressed by a [`Key`]: a kind name,
//! an identifier and an optional parent key. This crate owns that type and
//! the rules for what makes a key valid. The store and the mapper both
//! depend on it.
//!
//! # Key Types
//!
//! - [`Key`] — Hierarchical storage address of one entity
//! - [`KeyId`] — Identifier component: string, integer or store-assigned
//! - [`TypeError`] — Validation and decoding failures

pub mod error;
pub mod key;

pub use error::TypeError;
pub use key::{Key, KeyId};
