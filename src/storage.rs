use crate::constants::SESSION_STORAGE_KEY;
use crate::models::User;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// On-device persistence of the session snapshot.
///
/// One key, one file: the whole [`User`] is serialized on every save and the
/// file is removed on clear. There is no partial or delta write.
#[derive(Clone, Debug)]
pub struct SessionStorage {
    data_dir: PathBuf,
}

impl SessionStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        SessionStorage {
            data_dir: data_dir.into(),
        }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", SESSION_STORAGE_KEY))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }

    /// Read the snapshot, `None` if nothing is stored
    pub fn load(&self) -> Result<Option<User>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let user = serde_json::from_str(&content)?;
        Ok(Some(user))
    }

    /// Replace the snapshot wholesale
    pub fn save(&self, user: &User) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string(user)?;
        fs::write(self.path(), content)?;
        Ok(())
    }

    /// Remove the snapshot; clearing an absent snapshot is not an error
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
