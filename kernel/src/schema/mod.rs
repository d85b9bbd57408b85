// Schema Initializer
//
// Declares the employee table. Runs once at setup; nothing here alters
// or drops a table afterwards.

use crate::error::{expect_args, RecordError};
use crate::storage::{ColumnDefinition, ColumnType, Ledger};

/// Table the record operations read and write.
///
/// `initialize` accepts any name, so callers must pass this one for
/// inserts and lookups to find the table.
pub const EMPLOYEE_TABLE: &str = "EMP";

pub const EMP_ID: &str = "EMP_ID";
pub const EMP_LNAME: &str = "EMP_LNAME";
pub const EMP_FNAME: &str = "EMP_FNAME";

/// Column layout of the employee table, key first.
pub fn employee_columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::key(EMP_ID, ColumnType::String),
        ColumnDefinition::value(EMP_LNAME, ColumnType::String),
        ColumnDefinition::value(EMP_FNAME, ColumnType::String),
    ]
}

/// Create the employee table under `args[0]`.
pub fn initialize<L: Ledger + ?Sized>(ledger: &mut L, args: &[String]) -> Result<(), RecordError> {
    expect_args(args, 1)?;
    let table = &args[0];

    ledger.create_table(table, employee_columns())?;
    tracing::info!(table = %table, "table created");

    Ok(())
}
