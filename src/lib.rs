//! # AtlasConfig
//!
//! A cached, typed key/value settings store with:
//! - Typed values (string, array, hash, boolean, integer, float)
//! - A pluggable settings table as the persistent source
//! - All-or-nothing loads and best-effort reloads
//! - Write-back of cached changes to the table
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Embedding Application                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  get / set / attr / set_key
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Settings                              │
//! │            (SourceOptions + RecordCache, one Mutex)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  load / reload / save
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────┐
//!   │    Codec    │          │ SettingsTable│
//!   │ (FormatTag) │          │ (Memory/File)│
//!   └─────────────┘          └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use atlasconfig::{MemoryTable, Row, Settings, SourceOptions, Value};
//!
//! let table = Arc::new(MemoryTable::with_default_columns());
//! table.insert(
//!     Row::new()
//!         .with("keyname", "timeout")
//!         .with("value", "30")
//!         .with("value_format", "integer"),
//! )?;
//!
//! let settings = Settings::with_options(SourceOptions::for_table(table));
//! settings.load()?;
//! assert_eq!(settings.get("timeout"), Some(Value::Integer(30)));
//!
//! settings.set("timeout", 60);
//! settings.save()?;
//! # Ok::<(), atlasconfig::ConfigError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod value;
pub mod cache;
pub mod table;
pub mod settings;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ConfigError, Result};
pub use config::{SavePolicy, SourceOptions};
pub use settings::{ReloadOutcome, SaveReport, Settings};
pub use table::{FileTable, MemoryTable, Row, SettingsTable};
pub use value::{FormatTag, Value};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of AtlasConfig
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
