//! Configuration for AtlasConfig
//!
//! Describes which table settings are loaded from and how its columns map
//! onto keys, values and format tags.

use std::fmt;
use std::sync::Arc;

use crate::table::SettingsTable;

/// Default column holding the setting key
pub const DEFAULT_KEY_COLUMN: &str = "keyname";

/// Default column holding the stored value
pub const DEFAULT_VALUE_COLUMN: &str = "value";

/// Default column holding the format tag
pub const DEFAULT_FORMAT_COLUMN: &str = "value_format";

/// Source options, replaced wholesale on every `configure`
#[derive(Clone)]
pub struct SourceOptions {
    // -------------------------------------------------------------------------
    // Source
    // -------------------------------------------------------------------------
    /// Backing table; loading fails while unset
    pub table: Option<Arc<dyn SettingsTable>>,

    // -------------------------------------------------------------------------
    // Column Mapping
    // -------------------------------------------------------------------------
    pub key_column: String,
    pub value_column: String,
    pub format_column: String,

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------
    /// What `save` does with rows that already exist
    pub save_policy: SavePolicy,
}

/// How `save` treats a key that already has a row in the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SavePolicy {
    /// Rewrite the existing row's value and format when they differ
    #[default]
    Upsert,

    /// Only create missing rows; existing rows are left untouched
    CreateOnly,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            table: None,
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            value_column: DEFAULT_VALUE_COLUMN.to_string(),
            format_column: DEFAULT_FORMAT_COLUMN.to_string(),
            save_policy: SavePolicy::default(),
        }
    }
}

impl fmt::Debug for SourceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceOptions")
            .field("table", &self.table.as_ref().map(|_| "<table>"))
            .field("key_column", &self.key_column)
            .field("value_column", &self.value_column)
            .field("format_column", &self.format_column)
            .field("save_policy", &self.save_policy)
            .finish()
    }
}

impl SourceOptions {
    /// Create a new options builder
    pub fn builder() -> SourceOptionsBuilder {
        SourceOptionsBuilder::default()
    }

    /// Options for `table` with default column names
    pub fn for_table(table: Arc<dyn SettingsTable>) -> Self {
        Self::builder().table(table).build()
    }

    /// The three structural columns: key, value, format
    pub fn structural_columns(&self) -> [&str; 3] {
        [&self.key_column, &self.value_column, &self.format_column]
    }
}

/// Builder for SourceOptions
#[derive(Default)]
pub struct SourceOptionsBuilder {
    options: SourceOptions,
}

impl SourceOptionsBuilder {
    /// Set the backing table
    pub fn table(mut self, table: Arc<dyn SettingsTable>) -> Self {
        self.options.table = Some(table);
        self
    }

    /// Set the key column name
    pub fn key_column(mut self, name: impl Into<String>) -> Self {
        self.options.key_column = name.into();
        self
    }

    /// Set the value column name
    pub fn value_column(mut self, name: impl Into<String>) -> Self {
        self.options.value_column = name.into();
        self
    }

    /// Set the format column name
    pub fn format_column(mut self, name: impl Into<String>) -> Self {
        self.options.format_column = name.into();
        self
    }

    /// Set the save policy
    pub fn save_policy(mut self, policy: SavePolicy) -> Self {
        self.options.save_policy = policy;
        self
    }

    pub fn build(self) -> SourceOptions {
        self.options
    }
}
