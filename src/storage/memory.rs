use super::repository::CollectionStore;
use crate::error::{DeskError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// In-process storage that keeps collections as JSON values
///
/// Values go through serde on every save and load, so what comes back is
/// exactly what a persistent store would return.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    collections: Mutex<HashMap<String, Value>>,
    saves: AtomicUsize,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful saves since creation
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl CollectionStore for MemoryStorage {
    fn load<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let collections = self
            .collections
            .lock()
            .map_err(|_| DeskError::custom("memory storage lock poisoned"))?;
        match collections.get(key) {
            Some(value) => Ok(serde_json::from_value(value.clone())?),
            None => Ok(default),
        }
    }

    fn save<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let value = serde_json::to_value(value)?;
        self.collections
            .lock()
            .map_err(|_| DeskError::custom("memory storage lock poisoned"))?
            .insert(key.to_string(), value);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
