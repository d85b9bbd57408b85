// Tabula Kernel
//
// Stateless record service over a pluggable ledger: one typed employee
// table, a flat key/value space, and the named operations that reach them.

pub mod dispatch;
pub mod error;
pub mod records;
pub mod schema;
pub mod storage;

pub use dispatch::{dispatch, init, invoke, query, OperationClass, Payload};
pub use error::{InsertFailure, RecordError};
pub use storage::{InMemoryLedger, Ledger};
