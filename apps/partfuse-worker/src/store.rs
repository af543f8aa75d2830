use std::fs;
use std::path::PathBuf;

use partfuse::partfuse_job::{ObjectStore, StorageError};

/// Object store backed by a local directory; keys are relative paths under
/// the root. Stands in for the remote object-storage service.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ObjectStore for FsStore {
    fn get(&mut self, key: &str) -> Result<Vec<u8>, StorageError> {
        fs::read(self.root.join(key)).map_err(StorageError::new)
    }

    fn put(&mut self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(StorageError::new)?;
        }
        fs::write(path, data).map_err(StorageError::new)
    }
}
