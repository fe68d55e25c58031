//! Flat on-disk bookmark collection

use marginalia_core::BookmarkRecord;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::io::atomic_write;

/// Bookmark records persisted as one JSON array.
///
/// Records are kept as they arrived; validation is the analyzer's job.
#[derive(Debug, Clone)]
pub struct BookmarkStore {
    path: PathBuf,
    records: Vec<BookmarkRecord>,
}

impl BookmarkStore {
    /// Load the store at `path`, empty if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let records = if path.exists() {
            load_records(&path)?
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), records = records.len(), "opened bookmark store");
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[BookmarkRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add records whose id is not stored yet; returns how many were added
    /// or repaired.
    ///
    /// Stored records win over incoming ones with the same id, unless the
    /// stored one is unreadable and the incoming one is not. Records without
    /// an id are always kept so the analyzer can report them.
    pub fn merge<I>(&mut self, incoming: I) -> usize
    where
        I: IntoIterator<Item = BookmarkRecord>,
    {
        let mut known: HashMap<String, usize> = self
            .records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| record_id(r).map(|id| (id.to_string(), i)))
            .collect();

        let mut changed = 0;
        for record in incoming {
            let Some(id) = record_id(&record).map(str::to_string) else {
                self.records.push(record);
                changed += 1;
                continue;
            };
            match known.get(&id) {
                Some(&slot) => {
                    if self.records[slot].is_unreadable() && !record.is_unreadable() {
                        debug!(%id, "replacing unreadable bookmark");
                        self.records[slot] = record;
                        changed += 1;
                    }
                }
                None => {
                    known.insert(id, self.records.len());
                    self.records.push(record);
                    changed += 1;
                }
            }
        }
        info!(changed, total = self.records.len(), "merged bookmarks");
        changed
    }

    pub fn unreadable_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_unreadable()).count()
    }

    /// Write the collection; unreadable entries are written back as they were read
    pub fn save(&self) -> Result<()> {
        let json_error = |source: serde_json::Error| StoreError::Json {
            path: self.path.clone(),
            source,
        };
        let values = self
            .records
            .iter()
            .map(|record| match &record.unreadable {
                Some(unreadable) => Ok(unreadable.source.clone()),
                None => serde_json::to_value(record),
            })
            .collect::<std::result::Result<Vec<Value>, _>>()
            .map_err(json_error)?;
        let json = serde_json::to_vec_pretty(&values).map_err(json_error)?;
        atomic_write(&self.path, &json)?;
        debug!(path = %self.path.display(), records = self.records.len(), "saved bookmark store");
        Ok(())
    }
}

fn record_id(record: &BookmarkRecord) -> Option<&str> {
    record
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
}

/// Read records from a JSON array, a single JSON object or a JSONL file
pub fn load_records(path: &Path) -> Result<Vec<BookmarkRecord>> {
    let content = std::fs::read_to_string(path)?;
    parse_records(&content).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn record_from_value(value: Value) -> BookmarkRecord {
    match BookmarkRecord::deserialize(&value) {
        Ok(record) => record,
        Err(e) => {
            warn!(id = ?value.get("id"), error = %e, "unreadable bookmark entry");
            BookmarkRecord::unreadable(value, e)
        }
    }
}

/// Parse a JSON array, a single JSON object or a JSONL document.
///
/// Entries that are not valid records are kept as unreadable records so the
/// analyzer counts them as skipped. A JSON document that fails to parse as a
/// whole is an error, as is a JSONL document where no line is JSON.
pub fn parse_records(content: &str) -> std::result::Result<Vec<BookmarkRecord>, serde_json::Error> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        let values: Vec<Value> = serde_json::from_str(trimmed)?;
        return Ok(values.into_iter().map(record_from_value).collect());
    }

    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Ok(vec![record_from_value(value)]);
    }

    let mut records = Vec::new();
    let mut first_error = None;
    let mut parsed_lines = 0;
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(value) => {
                parsed_lines += 1;
                records.push(record_from_value(value));
            }
            Err(e) => {
                warn!(line = number + 1, error = %e, "unparseable bookmark line");
                records.push(BookmarkRecord::unreadable(
                    Value::String(line.to_string()),
                    &e,
                ));
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) if parsed_lines == 0 => Err(e),
        _ => Ok(records),
    }
}
