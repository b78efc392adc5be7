//! Record cache implementation
//!
//! HashMap-based record store. Not synchronized on its own.

use std::collections::HashMap;

use crate::value::Value;

use super::CacheEntry;

/// In-memory map of setting key → cached entry
#[derive(Debug, Clone, Default)]
pub struct RecordCache {
    entries: HashMap<String, CacheEntry>,
}

impl RecordCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|e| &e.value)
    }

    /// Get the full entry (value and format) by key
    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Upsert a value, inferring its format
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.insert(key, CacheEntry::inferred(value));
    }

    /// Upsert an entry with an explicit format
    pub fn insert(&mut self, key: impl Into<String>, entry: CacheEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Remove a single key, returning its value if present
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key).map(|e| e.value)
    }

    /// All keys, in no particular order
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Swap in a freshly built cache wholesale
    pub fn replace_all(&mut self, other: RecordCache) {
        self.entries = other.entries;
    }

    /// Iterate over `(key, entry)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CacheEntry)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FormatTag;

    #[test]
    fn test_set_and_get() {
        let mut cache = RecordCache::new();
        cache.set("timeout", Value::from(30));

        assert_eq!(cache.get("timeout"), Some(&Value::Integer(30)));
        assert_eq!(cache.entry("timeout").unwrap().format, FormatTag::Integer);
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let mut cache = RecordCache::new();
        cache.set("name", Value::from("a"));
        cache.set("name", Value::from(false));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.entry("name").unwrap().format, FormatTag::Boolean);
    }

    #[test]
    fn test_insert_keeps_explicit_format() {
        let mut cache = RecordCache::new();
        cache.insert(
            "raw",
            CacheEntry {
                value: Value::from("1"),
                format: FormatTag::String,
            },
        );
        assert_eq!(cache.entry("raw").unwrap().format, FormatTag::String);
    }

    #[test]
    fn test_clear_and_empty() {
        let mut cache = RecordCache::new();
        assert!(cache.is_empty());
        cache.set("a", Value::from(1));
        cache.set("b", Value::from(2));
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains("a"));
    }

    #[test]
    fn test_replace_all() {
        let mut cache = RecordCache::new();
        cache.set("old", Value::from(1));

        let mut fresh = RecordCache::new();
        fresh.set("new", Value::from(2));
        cache.replace_all(fresh);

        assert!(!cache.contains("old"));
        assert!(cache.contains("new"));
    }

    #[test]
    fn test_remove() {
        let mut cache = RecordCache::new();
        cache.set("a", Value::from(1));
        assert_eq!(cache.remove("a"), Some(Value::Integer(1)));
        assert_eq!(cache.remove("a"), None);
    }

    #[test]
    fn test_keys() {
        let mut cache = RecordCache::new();
        cache.set("a", Value::from(1));
        cache.set("b", Value::from(2));

        let mut keys = cache.keys();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }
}
