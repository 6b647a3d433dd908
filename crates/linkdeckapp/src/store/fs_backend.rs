use super::backend::StorageBackend;
use crate::error::{LinkDeckError, Result};
use crate::model::{LinkRecord, UserScope};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const RECORDS_FILE: &str = "links.json";

/// Filesystem backend: `<root>/users/<user>/links.json`.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn user_dir(&self, user: &UserScope) -> PathBuf {
        self.root.join("users").join(user.dir_name())
    }

    pub fn records_path(&self, user: &UserScope) -> PathBuf {
        self.user_dir(user).join(RECORDS_FILE)
    }
}

impl StorageBackend for FsBackend {
    fn load_records(&self, user: &UserScope) -> Result<Vec<LinkRecord>> {
        let path = self.records_path(user);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&path).map_err(LinkDeckError::Io)?;
        let records = serde_json::from_str(&content).map_err(LinkDeckError::Serialization)?;
        Ok(records)
    }

    fn save_records(&self, user: &UserScope, records: &[LinkRecord]) -> Result<()> {
        let dir = self.user_dir(user);
        fs::create_dir_all(&dir).map_err(LinkDeckError::Io)?;

        let content = serde_json::to_string_pretty(records).map_err(LinkDeckError::Serialization)?;
        let tmp_file = dir.join(format!(".links-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(LinkDeckError::Io)?;
        fs::rename(&tmp_file, self.records_path(user)).map_err(LinkDeckError::Io)?;
        Ok(())
    }
}
