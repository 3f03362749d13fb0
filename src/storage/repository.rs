use crate::error::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key under which the ticket collection is stored
pub const TICKETS_KEY: &str = "tickets";

/// Key under which the reply collection is stored
pub const REPLIES_KEY: &str = "ticket_replies";

/// Key under which the audit log collection is stored
pub const SYSTEM_LOGS_KEY: &str = "system_logs";

/// Key-value storage for whole collections
///
/// Collections are always loaded and saved in full. There are no
/// transactions and no partial writes; the last save for a key wins.
pub trait CollectionStore: Send + Sync {
    /// Loads the collection stored under `key`, or `default` when nothing is stored
    fn load<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: DeserializeOwned;

    /// Replaces the collection stored under `key`
    fn save<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized;
}

impl<S: CollectionStore> CollectionStore for &S {
    fn load<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: DeserializeOwned,
    {
        (**self).load(key, default)
    }

    fn save<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        (**self).save(key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Category, Ticket, TicketBuilder};
    use crate::storage::{FileStorage, MemoryStorage};
    use tempfile::TempDir;

    fn sample_tickets() -> Vec<Ticket> {
        vec![
            TicketBuilder::new()
                .student("s-1", "Ada")
                .category(Category::Hours)
                .subject("Volunteer hours missing")
                .build(),
            TicketBuilder::new()
                .student("s-2", "Ben")
                .category(Category::Counseling)
                .subject("Appointment")
                .build(),
        ]
    }

    fn exercise_store(store: &impl CollectionStore) {
        let empty: Vec<Ticket> = store.load(TICKETS_KEY, Vec::new()).unwrap();
        assert!(empty.is_empty());

        let tickets = sample_tickets();
        store.save(TICKETS_KEY, &tickets).unwrap();
        let loaded: Vec<Ticket> = store.load(TICKETS_KEY, Vec::new()).unwrap();
        assert_eq!(loaded, tickets);

        store.save(TICKETS_KEY, &tickets[..1]).unwrap();
        let loaded: Vec<Ticket> = store.load(TICKETS_KEY, Vec::new()).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join(".campus-desk"));
        exercise_store(&storage);
    }

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        exercise_store(&storage);
        assert_eq!(storage.save_count(), 2);
    }

    #[test]
    fn test_store_through_reference() {
        let storage = MemoryStorage::new();
        exercise_store(&&storage);
    }
}
