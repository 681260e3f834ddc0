use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::TryReserveError;
use thiserror::Error;

/// Failures of the diff core
///
/// Nothing in the core recovers locally: the first error aborts the whole
/// walk, render or print it occurred in and is handed back to the caller.
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("out of memory while building diff: {0}")]
    Allocation(#[from] TryReserveError),

    #[error("failed to look up object {oid}: {source}")]
    Lookup {
        oid: ObjectId,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to load the staged entries: {0}")]
    Index(#[source] anyhow::Error),

    #[error("expected {expected} object for {oid}")]
    InvalidObject {
        oid: ObjectId,
        expected: &'static str,
    },

    #[error("unsupported entry {path} with mode {mode}")]
    UnsupportedEntry { path: String, mode: EntryMode },

    #[error("failed to write diff output: {0}")]
    Formatting(#[source] anyhow::Error),
}

impl DiffError {
    pub(crate) fn lookup(oid: &ObjectId, source: anyhow::Error) -> Self {
        DiffError::Lookup {
            oid: oid.clone(),
            source,
        }
    }
}
