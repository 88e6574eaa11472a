// Wed Mar 11 2026 - Alex

use crate::dump::RecordInfo;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted mapping from record name to its last-committed description.
///
/// The driver's caller refreshes entries after a run for every record of
/// the *current* dump that landed in the imported set; records absent from
/// the new dump keep their old snapshots.
#[derive(Debug)]
pub struct SnapshotStore {
    path: PathBuf,
    records: HashMap<String, RecordInfo>,
}

impl SnapshotStore {
    /// Load snapshots from disk. A missing or unreadable file yields an
    /// empty store; stale caches must never block an import.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match File::open(&path) {
            Ok(file) => match serde_json::from_reader(BufReader::new(file)) {
                Ok(records) => records,
                Err(err) => {
                    log::warn!("ignoring unreadable snapshot cache {}: {}", path.display(), err);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, records }
    }

    pub fn records(&self) -> &HashMap<String, RecordInfo> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record (or refresh) the snapshot for one name.
    pub fn absorb(&mut self, name: String, record: RecordInfo) {
        self.records.insert(name, record);
    }

    pub fn save(&self) -> Result<(), SnapshotError> {
        let file = File::create(&self.path)?;
        serde_json::to_writer(BufWriter::new(file), &self.records)?;
        Ok(())
    }
}
