//! In-memory settings table
//!
//! Not durable: rows are lost when the table is dropped. Useful for tests
//! and for embedding applications that seed settings programmatically.

use parking_lot::RwLock;

use crate::config::{DEFAULT_FORMAT_COLUMN, DEFAULT_KEY_COLUMN, DEFAULT_VALUE_COLUMN};
use crate::error::{ConfigError, Result};

use super::{Located, Row, RowIter, SettingsTable};

/// In-process table with a fixed column set
///
/// Rows keep insertion order; lookups by key return the first match.
pub struct MemoryTable {
    columns: Vec<String>,
    rows: RwLock<Vec<Row>>,
}

impl MemoryTable {
    /// Create an empty table exposing `columns`
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Create an empty table with the default key/value/format columns
    pub fn with_default_columns() -> Self {
        Self::new([DEFAULT_KEY_COLUMN, DEFAULT_VALUE_COLUMN, DEFAULT_FORMAT_COLUMN])
    }

    /// Append a row
    pub fn insert(&self, row: Row) -> Result<()> {
        self.check_columns(&row)?;
        self.rows.write().push(row);
        Ok(())
    }

    /// Snapshot of all rows
    pub fn rows(&self) -> Vec<Row> {
        self.rows.read().clone()
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }

    fn check_columns(&self, row: &Row) -> Result<()> {
        let unknown = row
            .columns()
            .find(|c| !self.columns.iter().any(|known| known.as_str() == *c));
        match unknown {
            Some(unknown) => Err(ConfigError::Table(format!("unknown column '{}'", unknown))),
            None => Ok(()),
        }
    }
}

impl Default for MemoryTable {
    fn default() -> Self {
        Self::with_default_columns()
    }
}

impl SettingsTable for MemoryTable {
    fn column_names(&self) -> Result<Vec<String>> {
        Ok(self.columns.clone())
    }

    fn scan(&self) -> Result<RowIter<'_>> {
        let rows = self.rows.read().clone();
        Ok(Box::new(rows.into_iter().map(Ok)))
    }

    fn find_or_create(
        &self,
        column: &str,
        key: &str,
        init: &mut dyn FnMut(&mut Row),
    ) -> Result<Located> {
        let mut rows = self.rows.write();

        if let Some(existing) = rows.iter().find(|r| r.get(column) == Some(key)) {
            return Ok(Located::Existing(existing.clone()));
        }

        let mut row = Row::new().with(column, key);
        init(&mut row);
        self.check_columns(&row)?;
        rows.push(row.clone());

        Ok(Located::Created(row))
    }

    fn update(&self, column: &str, key: &str, cells: Row) -> Result<bool> {
        self.check_columns(&cells)?;
        let mut rows = self.rows.write();

        match rows.iter_mut().find(|r| r.get(column) == Some(key)) {
            Some(row) => {
                row.merge(cells);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_scan() {
        let table = MemoryTable::with_default_columns();
        table
            .insert(Row::new().with("keyname", "a").with("value", "1"))
            .unwrap();

        let rows: Vec<Row> = table.scan().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("keyname"), Some("a"));
    }

    #[test]
    fn test_insert_rejects_unknown_column() {
        let table = MemoryTable::new(["keyname", "value"]);
        let err = table
            .insert(Row::new().with("value_format", "string"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Table(_)));
        assert!(table.is_empty());
    }

    #[test]
    fn test_find_or_create_creates_once() {
        let table = MemoryTable::with_default_columns();
        let mut calls = 0;

        let first = table
            .find_or_create("keyname", "a", &mut |row: &mut Row| {
                calls += 1;
                row.set("value", "1");
            })
            .unwrap();
        assert!(first.was_created());
        assert_eq!(first.row().get("value"), Some("1"));

        let second = table
            .find_or_create("keyname", "a", &mut |row: &mut Row| {
                calls += 1;
                row.set("value", "2");
            })
            .unwrap();
        assert!(!second.was_created());
        assert_eq!(second.row().get("value"), Some("1"));
        assert_eq!(calls, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_update() {
        let table = MemoryTable::with_default_columns();
        table
            .insert(Row::new().with("keyname", "a").with("value", "1"))
            .unwrap();

        assert!(table
            .update("keyname", "a", Row::new().with("value", "2"))
            .unwrap());
        assert!(!table
            .update("keyname", "missing", Row::new().with("value", "2"))
            .unwrap());
        assert_eq!(table.rows()[0].get("value"), Some("2"));
    }
}
