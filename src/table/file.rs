//! File-backed settings table
//!
//! Persists the whole table to a single file, rewritten on every mutation.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header (14 bytes)                                       │
//! │   Magic: "ATCF" (4) | Version: u16 (2) | Rows: u64 (8)  │
//! ├─────────────────────────────────────────────────────────┤
//! │ Body (variable)                                         │
//! │   bincode(TableData { columns, rows })                  │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (16 bytes)                                       │
//! │   BodyLen: u64 (8) | BodyCRC: u32 (4) | Padding (4)     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Writes go to a sibling temp file which is synced and renamed over the
//! original, so a crash leaves either the old or the new table on disk.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::{Buf, BufMut, BytesMut};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

use super::{Located, Row, RowIter, SettingsTable};

/// Magic bytes identifying an AtlasConfig table file
const MAGIC: &[u8; 4] = b"ATCF";

/// Current table file format version
const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + RowCount (8) = 14 bytes
const HEADER_SIZE: usize = 14;

/// Footer size: BodyLen (8) + BodyCRC (4) + Padding (4) = 16 bytes
const FOOTER_SIZE: usize = 16;

/// Table contents as serialized into the body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TableData {
    columns: Vec<String>,
    rows: Vec<Row>,
}

/// Persistent table stored in a single file
pub struct FileTable {
    path: PathBuf,
    data: RwLock<TableData>,
}

impl FileTable {
    /// Create a new, empty table file (truncating any existing file)
    pub fn create<I, S>(path: impl Into<PathBuf>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.into();
        let data = TableData {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        };
        write_file(&path, &data)?;

        tracing::debug!("Created table file {}", path.display());

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Open an existing table file, validating magic, version and checksum
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = read_file(&path)?;

        tracing::debug!(
            "Opened table file {} ({} rows)",
            path.display(),
            data.rows.len()
        );

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Open the table file if it exists, otherwise create it with `columns`
    pub fn open_or_create<I, S>(path: impl Into<PathBuf>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.into();
        if path.exists() {
            Self::open(path)
        } else {
            Self::create(path, columns)
        }
    }

    /// Append a row and persist
    pub fn insert(&self, row: Row) -> Result<()> {
        let mut data = self.data.write();
        check_columns(&data.columns, &row)?;

        let mut next = data.clone();
        next.rows.push(row);
        write_file(&self.path, &next)?;
        *data = next;
        Ok(())
    }

    /// Remove every row whose `column` equals `key`, returning how many went
    pub fn delete(&self, column: &str, key: &str) -> Result<usize> {
        let mut data = self.data.write();

        let mut next = data.clone();
        next.rows.retain(|r| r.get(column) != Some(key));
        let removed = data.rows.len() - next.rows.len();
        if removed > 0 {
            write_file(&self.path, &next)?;
            *data = next;
        }
        Ok(removed)
    }

    /// Snapshot of all rows
    pub fn rows(&self) -> Vec<Row> {
        self.data.read().rows.clone()
    }

    pub fn len(&self) -> usize {
        self.data.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().rows.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsTable for FileTable {
    fn column_names(&self) -> Result<Vec<String>> {
        Ok(self.data.read().columns.clone())
    }

    fn scan(&self) -> Result<RowIter<'_>> {
        let rows = self.rows();
        Ok(Box::new(rows.into_iter().map(Ok)))
    }

    fn find_or_create(
        &self,
        column: &str,
        key: &str,
        init: &mut dyn FnMut(&mut Row),
    ) -> Result<Located> {
        let mut data = self.data.write();

        if let Some(existing) = data.rows.iter().find(|r| r.get(column) == Some(key)) {
            return Ok(Located::Existing(existing.clone()));
        }

        let mut row = Row::new().with(column, key);
        init(&mut row);
        check_columns(&data.columns, &row)?;

        let mut next = data.clone();
        next.rows.push(row.clone());
        write_file(&self.path, &next)?;
        *data = next;

        Ok(Located::Created(row))
    }

    fn update(&self, column: &str, key: &str, cells: Row) -> Result<bool> {
        let mut data = self.data.write();
        check_columns(&data.columns, &cells)?;

        let mut next = data.clone();
        match next.rows.iter_mut().find(|r| r.get(column) == Some(key)) {
            Some(row) => row.merge(cells),
            None => return Ok(false),
        }
        write_file(&self.path, &next)?;
        *data = next;
        Ok(true)
    }
}

// =============================================================================
// Private Helpers
// =============================================================================

fn check_columns(columns: &[String], row: &Row) -> Result<()> {
    let unknown = row
        .columns()
        .find(|c| !columns.iter().any(|known| known.as_str() == *c));
    match unknown {
        Some(column) => Err(ConfigError::Table(format!("unknown column '{}'", column))),
        None => Ok(()),
    }
}

/// Serialize `data` and atomically replace the file at `path`
fn write_file(path: &Path, data: &TableData) -> Result<()> {
    let body = bincode::serialize(data)?;

    let mut buf = BytesMut::with_capacity(HEADER_SIZE + body.len() + FOOTER_SIZE);
    buf.put_slice(MAGIC);
    buf.put_u16_le(VERSION);
    buf.put_u64_le(data.rows.len() as u64);
    buf.put_slice(&body);
    buf.put_u64_le(body.len() as u64);
    buf.put_u32_le(crc32fast::hash(&body));
    buf.put_bytes(0, 4); // Padding for alignment

    let tmp_path = temp_path(path);
    {
        let mut file = File::create(&tmp_path)?;
        file.write_all(&buf)?;
        file.sync_all()?;
    }
    fs::rename(&tmp_path, path)?;

    Ok(())
}

/// Sibling temp file: `settings.tbl` → `settings.tbl.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Read and validate the table file at `path`
fn read_file(path: &Path) -> Result<TableData> {
    let bytes = fs::read(path)?;

    if bytes.len() < HEADER_SIZE + FOOTER_SIZE {
        return Err(ConfigError::Corruption(format!(
            "Table file too short: {} bytes",
            bytes.len()
        )));
    }

    let mut header = &bytes[..HEADER_SIZE];
    if &header[0..4] != MAGIC {
        return Err(ConfigError::Corruption(format!(
            "Invalid table magic: expected ATCF, got {:?}",
            &header[0..4]
        )));
    }
    header.advance(4);

    let version = header.get_u16_le();
    if version != VERSION {
        return Err(ConfigError::Corruption(format!(
            "Unsupported table version: {}",
            version
        )));
    }
    let row_count = header.get_u64_le();

    let mut footer = &bytes[bytes.len() - FOOTER_SIZE..];
    let body_len = footer.get_u64_le() as usize;
    let expected_crc = footer.get_u32_le();

    let stored_len = bytes.len() - FOOTER_SIZE - HEADER_SIZE;
    if body_len != stored_len {
        return Err(ConfigError::Corruption(format!(
            "Body length mismatch: footer says {}, file holds {}",
            body_len, stored_len
        )));
    }

    let body = &bytes[HEADER_SIZE..HEADER_SIZE + body_len];
    let actual_crc = crc32fast::hash(body);
    if actual_crc != expected_crc {
        return Err(ConfigError::Corruption(format!(
            "CRC mismatch: expected {:08x}, got {:08x}",
            expected_crc, actual_crc
        )));
    }

    let data: TableData = bincode::deserialize(body)?;
    if data.rows.len() as u64 != row_count {
        return Err(ConfigError::Corruption(format!(
            "Row count mismatch: header says {}, body holds {}",
            row_count,
            data.rows.len()
        )));
    }

    Ok(data)
}
