//! Table Module
//!
//! The backing-store contract and the tables shipped with the crate.
//!
//! ## Responsibilities
//! - Describe what the settings facade needs from persistent storage:
//!   column introspection, full enumeration, find-or-create by key, update
//! - Provide an in-process table and a single-file persistent table
//!
//! A table is generic over its column names; the facade decides which
//! columns hold the key, the stored value, and the format tag.

mod file;
mod memory;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use file::FileTable;
pub use memory::MemoryTable;

/// Iterator over table rows. Enumeration may fail partway through.
pub type RowIter<'a> = Box<dyn Iterator<Item = Result<Row>> + 'a>;

/// A single table row: column name → cell text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    cells: BTreeMap<String, String>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style cell assignment
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    /// Read a cell; `None` when the row has no value for the column
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Column names present in this row
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Overwrite this row's cells with those of `other`
    pub fn merge(&mut self, other: Row) {
        self.cells.extend(other.cells);
    }
}

/// Result of a find-or-create lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// The first row already matching the key, untouched
    Existing(Row),
    /// A new row, built by the caller's initializer
    Created(Row),
}

impl Located {
    pub fn row(&self) -> &Row {
        match self {
            Located::Existing(row) | Located::Created(row) => row,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, Located::Created(_))
    }
}

/// Persistent tabular source of settings rows
pub trait SettingsTable: Send + Sync {
    /// Names of every column the table exposes
    fn column_names(&self) -> Result<Vec<String>>;

    /// Enumerate all rows
    fn scan(&self) -> Result<RowIter<'_>>;

    /// Return the first row whose `column` equals `key`, or create one.
    ///
    /// `init` only runs on creation; the created row already carries `key`
    /// in `column`.
    fn find_or_create(
        &self,
        column: &str,
        key: &str,
        init: &mut dyn FnMut(&mut Row),
    ) -> Result<Located>;

    /// Merge `cells` into the first row whose `column` equals `key`.
    ///
    /// Returns false when no row matches.
    fn update(&self, column: &str, key: &str, cells: Row) -> Result<bool>;
}
