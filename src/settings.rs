//! Settings Module
//!
//! The settings facade: coordinates the source options, the record cache,
//! the codec and the backing table.
//!
//! ## Responsibilities
//! - Load all rows from the table, decoding each by its own format column
//! - Keep the cache unchanged when a load fails partway
//! - Write cached values back to the table
//! - Typed key access, plus a name-checked attribute-style access path

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{CacheEntry, RecordCache};
use crate::config::{SavePolicy, SourceOptions};
use crate::error::{ConfigError, Result};
use crate::table::{Located, Row, SettingsTable};
use crate::value::{self, FormatTag, Value};

/// Names that attribute-style access refuses because they collide with the
/// facade's own operations.
pub const RESERVED_NAMES: &[&str] = &[
    "id",
    "keys",
    "configure",
    "save",
    "source_model",
    "configuration",
    "empty?",
    "exist?",
    "reload",
    "flush",
    "load",
    "to_s",
    "get",
    "set",
    "set_key",
    "attr",
    "set_attr",
    "remove",
    "exists",
    "is_empty",
    "len",
    "snapshot",
    "options",
    "source_table",
];

/// Returns true if `name` cannot be used through attribute-style access
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}

/// Result of a best-effort [`Settings::reload`]
#[derive(Debug)]
pub enum ReloadOutcome {
    /// The cache was replaced with this many settings
    Loaded(usize),

    /// Fetching failed; the cache is now empty
    Degraded(ConfigError),
}

impl ReloadOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, ReloadOutcome::Degraded(_))
    }
}

/// Per-row outcome counts of a [`Settings::save`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Rows created for keys the table did not have
    pub created: usize,

    /// Existing rows rewritten with new value/format
    pub updated: usize,

    /// Existing rows already holding the cached value
    pub unchanged: usize,

    /// Existing, differing rows left alone under `SavePolicy::CreateOnly`
    pub skipped: usize,
}

/// Cached, typed view over a settings table
///
/// ## Concurrency
/// One mutex guards the options and the cache together. Load, reload and
/// save hold it for their whole validate → fetch → decode → swap sequence,
/// so readers never observe a half-applied load.
pub struct Settings {
    state: Mutex<State>,
}

struct State {
    options: SourceOptions,
    records: RecordCache,
}

impl Settings {
    /// Create an unconfigured, empty settings instance
    pub fn new() -> Self {
        Self::with_options(SourceOptions::default())
    }

    /// Create an empty settings instance with the given source options
    pub fn with_options(options: SourceOptions) -> Self {
        Self {
            state: Mutex::new(State {
                options,
                records: RecordCache::new(),
            }),
        }
    }

    // =========================================================================
    // Source Management
    // =========================================================================

    /// Replace the source options. The cache and the table are untouched.
    pub fn configure(&self, options: SourceOptions) {
        tracing::debug!("Configured settings source: {:?}", options);
        self.state.lock().options = options;
    }

    /// Current backing table, if any
    pub fn source_table(&self) -> Option<Arc<dyn SettingsTable>> {
        self.state.lock().options.table.clone()
    }

    /// Current source options
    pub fn options(&self) -> SourceOptions {
        self.state.lock().options.clone()
    }

    /// Check that the table exposes the key, value and format columns
    pub fn check_structure(&self) -> Result<bool> {
        let state = self.state.lock();
        let table = require_table(&state.options)?;
        let missing = missing_columns(&state.options, table.as_ref())?;
        Ok(missing.is_empty())
    }

    /// Replace the cache with every row of the table.
    ///
    /// Fails with `InvalidSource` if the table is unset, lacks a structural
    /// column, or fails while enumerating. On any failure the previous cache
    /// is kept as it was.
    pub fn load(&self) -> Result<usize> {
        let mut state = self.state.lock();
        let fresh = fetch(&state.options)?;
        let count = fresh.len();
        state.records.replace_all(fresh);

        tracing::info!("Loaded {} settings", count);
        Ok(count)
    }

    /// Like [`load`](Self::load), but a failure empties the cache instead of
    /// propagating.
    pub fn reload(&self) -> ReloadOutcome {
        let mut state = self.state.lock();
        match fetch(&state.options) {
            Ok(fresh) => {
                let count = fresh.len();
                state.records.replace_all(fresh);
                tracing::debug!("Reloaded {} settings", count);
                ReloadOutcome::Loaded(count)
            }
            Err(e) => {
                state.records.clear();
                tracing::warn!("Reload failed, settings cache emptied: {}", e);
                ReloadOutcome::Degraded(e)
            }
        }
    }

    /// Drop every cached setting. The table is untouched.
    pub fn flush(&self) {
        self.state.lock().records.clear();
    }

    /// Write every cached setting to the table.
    ///
    /// Missing rows are created. Existing rows are rewritten or left alone
    /// according to the configured [`SavePolicy`]. Every entry is encoded
    /// before the first write, so an unencodable value leaves the table
    /// untouched. Table errors propagate as-is; rows written before the
    /// error stay written.
    pub fn save(&self) -> Result<SaveReport> {
        let state = self.state.lock();
        let options = &state.options;
        let table = require_table(options)?;

        let mut entries: Vec<(&String, &CacheEntry)> = state.records.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        // Encode everything up front so an unencodable entry writes nothing
        let encoded_entries = entries
            .into_iter()
            .map(|(key, entry)| {
                let encoded = value::encode(&entry.value, entry.format)?;
                Ok((key, entry.format, encoded))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut report = SaveReport::default();
        for (key, format, encoded) in encoded_entries {
            let cells = Row::new()
                .with(options.value_column.as_str(), encoded.as_str())
                .with(options.format_column.as_str(), format.as_str());

            let located = table.find_or_create(&options.key_column, key, &mut |row: &mut Row| {
                row.merge(cells.clone())
            })?;

            let existing = match located {
                Located::Created(_) => {
                    report.created += 1;
                    continue;
                }
                Located::Existing(row) => row,
            };

            let same = existing.get(&options.value_column) == Some(encoded.as_str())
                && existing.get(&options.format_column) == Some(format.as_str());
            if same {
                report.unchanged += 1;
                continue;
            }

            match options.save_policy {
                SavePolicy::Upsert => {
                    table.update(&options.key_column, key, cells)?;
                    report.updated += 1;
                }
                SavePolicy::CreateOnly => {
                    tracing::debug!("Leaving existing row for '{}' untouched", key);
                    report.skipped += 1;
                }
            }
        }

        tracing::info!(
            "Saved settings: {} created, {} updated, {} unchanged, {} skipped",
            report.created,
            report.updated,
            report.unchanged,
            report.skipped
        );
        Ok(report)
    }

    // =========================================================================
    // Cache Queries
    // =========================================================================

    /// All cached keys, in no particular order
    pub fn keys(&self) -> Vec<String> {
        self.state.lock().records.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.state.lock().records.len()
    }

    /// Returns true if `key` is cached
    pub fn exists(&self, key: &str) -> bool {
        self.state.lock().records.contains(key)
    }

    /// Copy of every cached key and value
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.state
            .lock()
            .records
            .iter()
            .map(|(k, e)| (k.clone(), e.value.clone()))
            .collect()
    }

    // =========================================================================
    // Indexed Access (no name checks)
    // =========================================================================

    /// Get a cached value by key
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.lock().records.get(key).cloned()
    }

    /// Get a cached value along with its format
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.state.lock().records.entry(key).cloned()
    }

    /// Set a value by key; its format is inferred on save
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.state.lock().records.set(key, value.into());
    }

    /// Remove a cached key. The table is untouched.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.state.lock().records.remove(key)
    }

    // =========================================================================
    // Attribute-Style Access (reserved names rejected)
    // =========================================================================

    /// Read a setting by attribute name
    pub fn attr(&self, name: &str) -> Result<Option<Value>> {
        check_name(name)?;
        Ok(self.get(name))
    }

    /// Write a setting by attribute name
    pub fn set_attr(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        check_name(name)?;
        self.set(name, value);
        Ok(())
    }

    /// Write a setting from its stored string form and format tag
    pub fn set_key(&self, name: &str, raw: &str, format: &str) -> Result<()> {
        check_name(name)?;
        let format: FormatTag = format.parse()?;
        let value = value::decode(raw, format)?;
        self.state
            .lock()
            .records
            .insert(name, CacheEntry { value, format });
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Private Helpers
// =============================================================================

fn check_name(name: &str) -> Result<()> {
    if is_reserved(name) {
        return Err(ConfigError::NamingCollision(name.to_string()));
    }
    Ok(())
}

fn require_table(options: &SourceOptions) -> Result<&Arc<dyn SettingsTable>> {
    options
        .table
        .as_ref()
        .ok_or_else(|| ConfigError::InvalidSource("Table is not configured".to_string()))
}

/// Wrap any failure other than `InvalidSource` as one
fn source_error(err: ConfigError) -> ConfigError {
    match err {
        ConfigError::InvalidSource(_) => err,
        other => ConfigError::InvalidSource(other.to_string()),
    }
}

fn missing_columns<'a>(
    options: &'a SourceOptions,
    table: &dyn SettingsTable,
) -> Result<Vec<&'a str>> {
    let columns = table.column_names().map_err(source_error)?;
    Ok(options
        .structural_columns()
        .into_iter()
        .filter(|required| !columns.iter().any(|c| c == required))
        .collect())
}

/// Build a fresh cache from the table without touching the current one
fn fetch(options: &SourceOptions) -> Result<RecordCache> {
    let table = require_table(options)?;

    let missing = missing_columns(options, table.as_ref())?;
    if !missing.is_empty() {
        return Err(ConfigError::InvalidSource(format!(
            "Table is missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut records = RecordCache::new();
    for row in table.scan().map_err(source_error)? {
        let row = row.map_err(source_error)?;

        let key = row.get(&options.key_column).ok_or_else(|| {
            ConfigError::InvalidSource(format!("Row has no '{}' value", options.key_column))
        })?;
        let raw = row.get(&options.value_column).unwrap_or("");
        let tag = row.get(&options.format_column).ok_or_else(|| {
            ConfigError::InvalidFormat(format!("setting '{}' has no format tag", key))
        })?;

        let format: FormatTag = tag.parse()?;
        let value = value::decode(raw, format).map_err(|e| {
            ConfigError::InvalidSource(format!("Cannot decode setting '{}': {}", key, e))
        })?;

        tracing::trace!("Fetched setting '{}' as {}", key, format);
        records.insert(key, CacheEntry { value, format });
    }

    Ok(records)
}
