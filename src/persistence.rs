use crate::errors::PersistenceError;
use crate::ledger::Ledger;
use crate::roster::Student;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// The single key the attendance snapshot is stored under.
pub const STORAGE_KEY: &str = "attendanceTrackerData";

/// A durable key-value store holding opaque text blobs.
pub trait BlobStore {
    /// Fetch the blob stored under `key`, or `None` if nothing was stored.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the blob stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Keeps blobs in process memory; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each blob as `<key>.json` inside a directory. The directory is
/// created on the first write.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;

        // Readers only ever see a complete blob: stage, then rename.
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        Ok(())
    }
}

/// The unit of persistence: the whole roster plus the whole ledger.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Snapshot {
    pub students: Vec<Student>,

    #[serde(rename = "attendanceData")]
    pub attendance: Ledger,
}

impl Snapshot {
    pub fn encode(&self) -> Result<String, PersistenceError> {
        serde_json::to_string(self).map_err(PersistenceError::EncodeError)
    }

    pub fn decode(raw: &str) -> Result<Self, PersistenceError> {
        serde_json::from_str(raw).map_err(PersistenceError::DecodeError)
    }
}

/// Loads and saves snapshots through a [`BlobStore`].
#[derive(Debug)]
pub struct SnapshotStore<S: BlobStore> {
    backend: S,
}

impl<S: BlobStore> SnapshotStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Read the stored snapshot, if there is one.
    pub fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let raw = match self.backend.get(STORAGE_KEY)? {
            Some(raw) => raw,
            None => {
                debug!("event=snapshot_load module=persistence status=empty");
                return Ok(None);
            }
        };

        let snapshot = Snapshot::decode(&raw)?;
        info!(
            "event=snapshot_load module=persistence status=ok students={} dates={}",
            snapshot.students.len(),
            snapshot.attendance.dates().count()
        );

        Ok(Some(snapshot))
    }

    pub fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let encoded = snapshot.encode()?;
        self.backend.set(STORAGE_KEY, &encoded)?;
        debug!(
            "event=snapshot_save module=persistence status=ok bytes={}",
            encoded.len()
        );

        Ok(())
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }
}
