// In-Memory Ledger
//
// Reference `Ledger` implementation backed by ordered maps. Enforces
// table shape, column types and key uniqueness the same way a durable
// backend would. Serializable so a transport can snapshot it.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{ColumnDefinition, ColumnValue, Ledger, Row, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TableData {
    columns: Vec<ColumnDefinition>,
    /// Rows keyed by the encoded key-column values.
    rows: BTreeMap<String, Row>,
}

impl TableData {
    fn key_columns(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter().filter(|c| c.is_key)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    tables: BTreeMap<String, TableData>,
    state: BTreeMap<String, Vec<u8>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declared columns of a table, if it exists.
    pub fn columns(&self, table: &str) -> Option<&[ColumnDefinition]> {
        self.tables.get(table).map(|t| t.columns.as_slice())
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables.get(table).map(|t| t.rows.len()).unwrap_or(0)
    }

    pub fn state_len(&self) -> usize {
        self.state.len()
    }

    fn table(&self, name: &str) -> Result<&TableData, StorageError> {
        self.tables
            .get(name)
            .ok_or_else(|| StorageError::TableNotFound(name.to_string()))
    }
}

fn encode_key(values: &[&ColumnValue]) -> Result<String, StorageError> {
    serde_json::to_string(values).map_err(|e| StorageError::Encoding(e.to_string()))
}

fn check_type(column: &ColumnDefinition, value: &ColumnValue) -> Result<(), StorageError> {
    if column.column_type != value.column_type() {
        return Err(StorageError::SchemaMismatch(format!(
            "column `{}` expects {:?}, got {:?}",
            column.name,
            column.column_type,
            value.column_type()
        )));
    }
    Ok(())
}

impl Ledger for InMemoryLedger {
    fn create_table(
        &mut self,
        name: &str,
        columns: Vec<ColumnDefinition>,
    ) -> Result<(), StorageError> {
        if name.trim().is_empty() {
            return Err(StorageError::InvalidTable("table name is empty".into()));
        }
        if columns.is_empty() {
            return Err(StorageError::InvalidTable(format!(
                "table `{name}` declares no columns"
            )));
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if column.name.trim().is_empty() {
                return Err(StorageError::InvalidTable(format!(
                    "table `{name}` has an unnamed column"
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(StorageError::InvalidTable(format!(
                    "table `{name}` declares column `{}` twice",
                    column.name
                )));
            }
        }
        if !columns.iter().any(|c| c.is_key) {
            return Err(StorageError::InvalidTable(format!(
                "table `{name}` has no key column"
            )));
        }

        if self.tables.contains_key(name) {
            return Err(StorageError::TableExists(name.to_string()));
        }

        self.tables.insert(
            name.to_string(),
            TableData {
                columns,
                rows: BTreeMap::new(),
            },
        );
        Ok(())
    }

    fn insert_row(&mut self, table: &str, row: Row) -> Result<bool, StorageError> {
        let data = self
            .tables
            .get_mut(table)
            .ok_or_else(|| StorageError::TableNotFound(table.to_string()))?;

        if row.columns.len() != data.columns.len() {
            return Err(StorageError::SchemaMismatch(format!(
                "table `{table}` has {} columns, row has {}",
                data.columns.len(),
                row.columns.len()
            )));
        }
        for (column, value) in data.columns.iter().zip(&row.columns) {
            check_type(column, value)?;
        }

        let key_values: Vec<&ColumnValue> = data
            .columns
            .iter()
            .zip(&row.columns)
            .filter(|(c, _)| c.is_key)
            .map(|(_, v)| v)
            .collect();
        let key = encode_key(&key_values)?;

        if data.rows.contains_key(&key) {
            tracing::trace!(table, key = %key, "row already present");
            return Ok(false);
        }

        data.rows.insert(key, row);
        Ok(true)
    }

    fn get_row(&self, table: &str, key: &[ColumnValue]) -> Result<Row, StorageError> {
        let data = self.table(table)?;

        let key_columns: Vec<&ColumnDefinition> = data.key_columns().collect();
        if key.len() != key_columns.len() {
            return Err(StorageError::SchemaMismatch(format!(
                "table `{table}` has {} key columns, lookup supplied {}",
                key_columns.len(),
                key.len()
            )));
        }
        for (column, value) in key_columns.iter().zip(key) {
            check_type(column, value)?;
        }

        let key_values: Vec<&ColumnValue> = key.iter().collect();
        let encoded = encode_key(&key_values)?;

        Ok(data.rows.get(&encoded).cloned().unwrap_or_default())
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.state.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.state.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::ColumnType;

    fn people() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::key("ID", ColumnType::String),
            ColumnDefinition::value("NAME", ColumnType::String),
        ]
    }

    fn row(id: &str, name: &str) -> Row {
        Row::new(vec![id.into(), name.into()])
    }

    #[test]
    fn create_table_rejects_duplicates() {
        let mut ledger = InMemoryLedger::new();
        ledger.create_table("PEOPLE", people()).unwrap();

        let err = ledger.create_table("PEOPLE", people()).unwrap_err();
        assert_eq!(err, StorageError::TableExists("PEOPLE".into()));
    }

    #[test]
    fn create_table_validates_definition() {
        let mut ledger = InMemoryLedger::new();

        assert!(matches!(
            ledger.create_table("", people()),
            Err(StorageError::InvalidTable(_))
        ));
        assert!(matches!(
            ledger.create_table("T", vec![]),
            Err(StorageError::InvalidTable(_))
        ));
        assert!(matches!(
            ledger.create_table(
                "T",
                vec![ColumnDefinition::value("A", ColumnType::String)]
            ),
            Err(StorageError::InvalidTable(_))
        ));
        assert!(matches!(
            ledger.create_table(
                "T",
                vec![
                    ColumnDefinition::key("A", ColumnType::String),
                    ColumnDefinition::value("A", ColumnType::Int64),
                ]
            ),
            Err(StorageError::InvalidTable(_))
        ));
        assert!(ledger.columns("T").is_none());
    }

    #[test]
    fn insert_reports_existing_key_as_not_inserted() {
        let mut ledger = InMemoryLedger::new();
        ledger.create_table("PEOPLE", people()).unwrap();

        assert!(ledger.insert_row("PEOPLE", row("1", "Ada")).unwrap());
        assert!(!ledger.insert_row("PEOPLE", row("1", "Grace")).unwrap());
        assert_eq!(ledger.row_count("PEOPLE"), 1);

        let stored = ledger.get_row("PEOPLE", &["1".into()]).unwrap();
        assert_eq!(stored, row("1", "Ada"));
    }

    #[test]
    fn insert_rejects_shape_and_type_mismatch() {
        let mut ledger = InMemoryLedger::new();
        ledger.create_table("PEOPLE", people()).unwrap();

        let short = Row::new(vec!["1".into()]);
        assert!(matches!(
            ledger.insert_row("PEOPLE", short),
            Err(StorageError::SchemaMismatch(_))
        ));

        let mistyped = Row::new(vec![ColumnValue::Int64(1), "Ada".into()]);
        assert!(matches!(
            ledger.insert_row("PEOPLE", mistyped),
            Err(StorageError::SchemaMismatch(_))
        ));

        assert!(matches!(
            ledger.insert_row("MISSING", row("1", "Ada")),
            Err(StorageError::TableNotFound(_))
        ));
    }

    #[test]
    fn get_row_returns_empty_row_on_miss() {
        let mut ledger = InMemoryLedger::new();
        ledger.create_table("PEOPLE", people()).unwrap();

        assert!(ledger.get_row("PEOPLE", &["404".into()]).unwrap().is_empty());
        assert!(matches!(
            ledger.get_row("PEOPLE", &["1".into(), "Ada".into()]),
            Err(StorageError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn state_is_overwritten_in_place() {
        let mut ledger = InMemoryLedger::new();
        ledger.put_state("k", b"v").unwrap();
        ledger.put_state("k", b"v2").unwrap();

        assert_eq!(ledger.get_state("k").unwrap(), Some(b"v2".to_vec()));
        assert_eq!(ledger.state_len(), 1);
        assert_eq!(ledger.get_state("other").unwrap(), None);
    }

    #[test]
    fn snapshot_survives_json() {
        let mut ledger = InMemoryLedger::new();
        ledger.create_table("PEOPLE", people()).unwrap();
        ledger.insert_row("PEOPLE", row("7", "Lin")).unwrap();
        ledger.put_state("k", b"v").unwrap();

        let json = serde_json::to_string(&ledger).unwrap();
        let restored: InMemoryLedger = serde_json::from_str(&json).unwrap();

        assert_eq!(
            restored.get_row("PEOPLE", &["7".into()]).unwrap(),
            row("7", "Lin")
        );
        assert_eq!(restored.get_state("k").unwrap(), Some(b"v".to_vec()));
    }
}
