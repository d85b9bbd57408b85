// Record Service Errors
//
// Every failure a caller can observe. Storage failures are wrapped,
// never retried or swallowed.

use crate::storage::StorageError;

/// Why an insert did not happen.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum InsertFailure {
    /// The ledger declined the row without an error, which only happens
    /// when the key is already taken.
    #[error("duplicate key")]
    DuplicateKey,

    #[error(transparent)]
    Storage(StorageError),
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("incorrect number of arguments: expecting {expected}, got {actual}")]
    InvalidArgumentCount { expected: usize, actual: usize },

    #[error("received unknown function {surface}: {name}")]
    UnknownOperation { surface: &'static str, name: String },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("error inserting a new row into `{table}`: {cause}")]
    InsertFailed {
        table: String,
        #[source]
        cause: InsertFailure,
    },

    #[error("no record in `{table}` with key `{key}`")]
    RecordNotFound { table: String, key: String },
}

impl RecordError {
    pub fn is_duplicate_key(&self) -> bool {
        matches!(
            self,
            RecordError::InsertFailed {
                cause: InsertFailure::DuplicateKey,
                ..
            }
        )
    }
}

/// Fails with `InvalidArgumentCount` unless exactly `expected` args are present.
pub(crate) fn expect_args(args: &[String], expected: usize) -> Result<(), RecordError> {
    if args.len() != expected {
        return Err(RecordError::InvalidArgumentCount {
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}
