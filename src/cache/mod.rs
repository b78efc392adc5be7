//! Cache Module
//!
//! In-memory record map holding decoded settings.
//!
//! ## Responsibilities
//! - Key → decoded value lookups
//! - Unconditional upserts (validation happens in the facade)
//! - Bulk clear and atomic bulk replace
//!
//! ## Data Structure Choice
//! A plain HashMap owned by the facade, which provides the locking.
//! Each entry remembers the format it was loaded or written with so that
//! saving does not re-infer a different tag.

mod records;

pub use records::RecordCache;

use crate::value::{FormatTag, Value};

/// A cached setting
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The decoded value
    pub value: Value,

    /// Format used when the entry was loaded or explicitly written
    pub format: FormatTag,
}

impl CacheEntry {
    /// Entry whose format is inferred from the value's kind
    pub fn inferred(value: Value) -> Self {
        let format = value.format();
        Self { value, format }
    }
}
