//! JSON snapshot file.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{DataDirLock, Snapshot, SnapshotStore, StoreError, SNAPSHOT_VERSION};

/// Snapshot kept as `eco-state.json` inside a locked data directory.
pub struct JsonFileStore {
    path: PathBuf,
    tmp_path: PathBuf,
    lock: DataDirLock,
}

impl JsonFileStore {
    const SNAPSHOT_FILE: &'static str = "eco-state.json";
    const TMP_FILE: &'static str = "eco-state.json.tmp";

    /// Create the directory if needed and take its lock.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(data_dir).map_err(|source| StoreError::Io {
            path: data_dir.to_path_buf(),
            source,
        })?;
        let lock = DataDirLock::acquire(data_dir)?;
        info!(dir = %data_dir.display(), "Snapshot store opened");
        Ok(Self {
            path: data_dir.join(Self::SNAPSHOT_FILE),
            tmp_path: data_dir.join(Self::TMP_FILE),
            lock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lock(&self) -> &DataDirLock {
        &self.lock
    }

    fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
        move |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No snapshot on disk");
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path).map_err(Self::io_err(&self.path))?;
        let snapshot: Snapshot =
            serde_json::from_str(&raw).map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: snapshot.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(snapshot).map_err(StoreError::Encode)?;

        let mut file = File::create(&self.tmp_path).map_err(Self::io_err(&self.tmp_path))?;
        file.write_all(&bytes)
            .map_err(Self::io_err(&self.tmp_path))?;
        file.sync_all().map_err(Self::io_err(&self.tmp_path))?;
        drop(file);

        fs::rename(&self.tmp_path, &self.path).map_err(Self::io_err(&self.path))?;
        debug!(bytes = bytes.len(), "Snapshot written");
        Ok(())
    }
}
