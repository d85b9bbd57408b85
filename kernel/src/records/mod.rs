// Record Operations
//
// Handlers behind the dispatcher: flat key/value write, employee insert
// and employee lookup. Each call is one independent round trip to the
// ledger; nothing is cached between calls.

use crate::error::{expect_args, InsertFailure, RecordError};
use crate::schema::EMPLOYEE_TABLE;
use crate::storage::{ColumnValue, Ledger, Row};

/// Upsert `args[1]` under `args[0]` in flat state.
pub fn write<L: Ledger + ?Sized>(ledger: &mut L, args: &[String]) -> Result<(), RecordError> {
    expect_args(args, 2)?;
    let (key, value) = (&args[0], &args[1]);

    tracing::debug!(key = %key, "writing state entry");
    ledger.put_state(key, value.as_bytes())?;

    Ok(())
}

/// Insert `[EMP_ID, EMP_LNAME, EMP_FNAME]` into the employee table.
pub fn create_employee<L: Ledger + ?Sized>(
    ledger: &mut L,
    args: &[String],
) -> Result<(), RecordError> {
    expect_args(args, 3)?;

    let row = Row::new(args.iter().cloned().map(ColumnValue::from).collect());
    tracing::debug!(?row, "inserting row");

    match ledger.insert_row(EMPLOYEE_TABLE, row) {
        Ok(true) => {
            tracing::info!(table = EMPLOYEE_TABLE, id = %args[0], "employee inserted");
            Ok(())
        }
        Ok(false) => {
            tracing::warn!(table = EMPLOYEE_TABLE, id = %args[0], "employee id already taken");
            Err(RecordError::InsertFailed {
                table: EMPLOYEE_TABLE.to_string(),
                cause: InsertFailure::DuplicateKey,
            })
        }
        Err(err) => {
            tracing::warn!(table = EMPLOYEE_TABLE, error = %err, "employee insert failed");
            Err(RecordError::InsertFailed {
                table: EMPLOYEE_TABLE.to_string(),
                cause: InsertFailure::Storage(err),
            })
        }
    }
}

/// Look up an employee by key and return the concatenated column values.
///
/// Columns are joined with no separator, so `["1", "Smith", "Jane"]`
/// comes back as `1SmithJane`. Callers cannot split the result back into
/// fields without knowing their widths. Non-string columns contribute
/// nothing to the result.
pub fn get_employee_by_id<L: Ledger + ?Sized>(
    ledger: &L,
    emp_id: &str,
) -> Result<Vec<u8>, RecordError> {
    let key = [ColumnValue::from(emp_id)];
    tracing::debug!(table = EMPLOYEE_TABLE, id = emp_id, "querying for row");

    let row = ledger.get_row(EMPLOYEE_TABLE, &key)?;
    if row.is_empty() {
        return Err(RecordError::RecordNotFound {
            table: EMPLOYEE_TABLE.to_string(),
            key: emp_id.to_string(),
        });
    }

    Ok(concat_columns(&row))
}

fn concat_columns(row: &Row) -> Vec<u8> {
    row.columns
        .iter()
        .filter_map(ColumnValue::as_str)
        .collect::<String>()
        .into_bytes()
}
