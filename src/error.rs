//! Error types for the persisted selection store.
//!
//! Filtering and selection never fail; only the key-value store backing the
//! persisted tab index can, and the tracker logs those errors and carries on
//! as if nothing had been stored.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing persisted tab state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be read or written.
    #[error("I/O error accessing tab state: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file held invalid JSON, or the state could not be encoded.
    #[error("failed to parse tab state: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backing file parsed, but its top level is not a JSON object.
    #[error("tab state file {} does not hold a JSON object", .0.display())]
    NotAnObject(PathBuf),
}
