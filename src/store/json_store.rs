//! JSON-backed connection record storage.
//!
//! The whole record set lives in one JSON object keyed by connection name.
//! Every mutating operation validates first, then mutates, then persists the
//! full set, so there is never partial state visible outside one call. Saves
//! go through a temp file and rename for atomic replacement.

use crate::config::Paths;
use crate::error::{StoreError, StoreResult};
use crate::types::{ConnectionRecord, RecordSet};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// JSON file-based connection record store.
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Create a store at the default XDG data location.
    pub fn new() -> StoreResult<Self> {
        Ok(Self::open(Paths::get().records_file()))
    }

    /// Create a store backed by a specific file.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read all persisted records.
    ///
    /// A missing store file is initialized empty. Loaded records always have
    /// `is_alive == false`; liveness is never persisted.
    pub fn load(&self) -> StoreResult<RecordSet> {
        if !self.path.exists() {
            let empty = RecordSet::new();
            self.save(&empty)?;
            return Ok(empty);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let mut records: RecordSet = serde_json::from_str(&content)?;

        // The map key is authoritative; keep the embedded name in sync in
        // case the file was hand-edited.
        for (name, record) in records.iter_mut() {
            record.name = name.clone();
        }

        debug!(count = records.len(), path = %self.path.display(), "loaded records");
        Ok(records)
    }

    /// Atomically persist the full record set, replacing prior contents.
    pub fn save(&self, records: &RecordSet) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::Unavailable(e.to_string()))?;

        debug!(count = records.len(), "saved records");
        Ok(())
    }

    /// Insert a new record and persist.
    ///
    /// Fails with `DuplicateName` if the name is taken and `InvalidRecord`
    /// if the record has neither hostname nor IP; in either case nothing
    /// changes.
    pub fn add(&self, records: &mut RecordSet, record: ConnectionRecord) -> StoreResult<()> {
        if !record.is_valid() {
            return Err(StoreError::InvalidRecord);
        }
        if records.contains_key(&record.name) {
            return Err(StoreError::DuplicateName(record.name));
        }

        records.insert(record.name.clone(), record);
        self.save(records)
    }

    /// Replace `old_name` with `record` (whose name may differ) and persist.
    ///
    /// All-or-nothing: validation happens before the old key is removed, so
    /// a rejected edit leaves the set untouched. Renaming a record to its
    /// own current name is allowed.
    pub fn rename(
        &self,
        records: &mut RecordSet,
        old_name: &str,
        record: ConnectionRecord,
    ) -> StoreResult<()> {
        if !record.is_valid() {
            return Err(StoreError::InvalidRecord);
        }
        if record.name != old_name && records.contains_key(&record.name) {
            return Err(StoreError::DuplicateName(record.name));
        }

        records.remove(old_name);
        records.insert(record.name.clone(), record);
        self.save(records)
    }

    /// Delete a record and persist. A missing key is not an error; whether
    /// the record existed is the caller's concern.
    pub fn remove(&self, records: &mut RecordSet, name: &str) -> StoreResult<()> {
        records.remove(name);
        self.save(records)
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}
