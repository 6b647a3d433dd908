use super::fs_backend::FsBackend;
use super::record_store::RecordStore;
use std::path::PathBuf;

pub type FileStore = RecordStore<FsBackend>;

impl FileStore {
    /// A store rooted at `data_dir`; user directories are created on first write.
    pub fn new(data_dir: PathBuf) -> Self {
        RecordStore::with_backend(FsBackend::new(data_dir))
    }
}
