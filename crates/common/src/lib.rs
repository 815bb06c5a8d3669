//! Shared error definitions, storage-area helpers, and resource reference
//! detection used across all wharf crates.
//!
//! Every module in a wharf process shares the same storage areas
//! (`files`, `downloads`, `temp`) under the data dir, and the same rules
//! for telling a remote URL from a local file reference.

pub mod error;
pub mod refs;
pub mod storage;

pub use {
    error::{Error, Result},
    refs::{extract_file_reference, is_url},
    storage::{StorageArea, file_path},
};
