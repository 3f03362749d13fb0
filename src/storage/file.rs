use super::repository::CollectionStore;
use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// File-based storage, one YAML document per collection key
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
}

impl FileStorage {
    /// Creates a storage rooted at `base_dir`
    ///
    /// The directory is created lazily on the first save.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Directory that holds the collection files
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Creates the data directory if it is missing
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;
        Ok(())
    }

    fn collection_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.yaml"))
    }
}

impl CollectionStore for FileStorage {
    fn load<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let path = self.collection_path(key);
        if !path.exists() {
            return Ok(default);
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(default);
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    fn save<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        self.ensure_directories()?;
        let path = self.collection_path(key);
        let tmp_path = path.with_extension("yaml.tmp");

        let content = serde_yaml::to_string(value)?;
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &path)?;
        tracing::debug!(key, path = %path.display(), "saved collection");
        Ok(())
    }
}
