// Storage Collaborator Contract
//
// Defines the table and flat key/value surface the record service is
// allowed to use. The service never owns data; everything it reads or
// writes goes through a `Ledger`.

use serde::{Deserialize, Serialize};

pub mod memory;

pub use memory::InMemoryLedger;

/// Scalar type of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    String,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Bytes,
    Bool,
}

/// One column in a table declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    pub is_key: bool,
}

impl ColumnDefinition {
    pub fn key(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            is_key: true,
        }
    }

    pub fn value(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            is_key: false,
        }
    }
}

/// A single typed cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnValue {
    String(String),
    Int32(i32),
    Int64(i64),
    Uint32(u32),
    Uint64(u64),
    Bytes(Vec<u8>),
    Bool(bool),
}

impl ColumnValue {
    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnValue::String(_) => ColumnType::String,
            ColumnValue::Int32(_) => ColumnType::Int32,
            ColumnValue::Int64(_) => ColumnType::Int64,
            ColumnValue::Uint32(_) => ColumnType::Uint32,
            ColumnValue::Uint64(_) => ColumnType::Uint64,
            ColumnValue::Bytes(_) => ColumnType::Bytes,
            ColumnValue::Bool(_) => ColumnType::Bool,
        }
    }

    /// String content of the value, `None` for every other type.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ColumnValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::String(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::String(value)
    }
}

/// Ordered column values of one record.
///
/// An empty row is how a ledger reports "no match" from `get_row`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub columns: Vec<ColumnValue>,
}

impl Row {
    pub fn new(columns: Vec<ColumnValue>) -> Self {
        Self { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("table `{0}` already exists")]
    TableExists(String),

    #[error("table `{0}` not found")]
    TableNotFound(String),

    #[error("invalid table definition: {0}")]
    InvalidTable(String),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("key encoding failed: {0}")]
    Encoding(String),
}

/// Storage backend for tables and flat state.
///
/// Properties required from implementations:
/// - Column order is fixed at `create_table` time
/// - Key column values are unique per table
/// - Table data and flat state live in separate namespaces
///
/// Implementations MUST NOT:
/// - Overwrite an existing row on `insert_row`
/// - Report a missing row as an error from `get_row`
pub trait Ledger: Send + Sync {
    /// Declare a new table.
    fn create_table(
        &mut self,
        name: &str,
        columns: Vec<ColumnDefinition>,
    ) -> Result<(), StorageError>;

    /// Insert a row.
    ///
    /// Returns `Ok(false)` when a row with the same key already exists.
    fn insert_row(&mut self, table: &str, row: Row) -> Result<bool, StorageError>;

    /// Fetch the row whose key columns equal `key`.
    ///
    /// Returns an empty row when nothing matches.
    fn get_row(&self, table: &str, key: &[ColumnValue]) -> Result<Row, StorageError>;

    /// Upsert a flat state entry.
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Read a flat state entry.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;
}
