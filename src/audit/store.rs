use crate::core::SystemLog;
use crate::error::Result;
use crate::storage::{CollectionStore, SYSTEM_LOGS_KEY};

/// Append-only collection of audit entries
///
/// Any subsystem may append. Entries are never edited or removed.
pub struct AuditLogStore<S: CollectionStore> {
    storage: S,
    logs: Vec<SystemLog>,
}

impl<S: CollectionStore> AuditLogStore<S> {
    pub fn load(storage: S) -> Result<Self> {
        let logs: Vec<SystemLog> = storage.load(SYSTEM_LOGS_KEY, Vec::new())?;
        tracing::debug!(entries = logs.len(), "loaded audit log");
        Ok(Self { storage, logs })
    }

    /// Record `entry` and persist the log
    pub fn append(&mut self, entry: SystemLog) -> Result<()> {
        tracing::debug!(action = %entry.action_type, risk = %entry.risk_level, "audit entry appended");
        self.logs.push(entry);
        self.storage.save(SYSTEM_LOGS_KEY, &self.logs)
    }

    /// Snapshot of every entry in insertion order
    pub fn entries(&self) -> &[SystemLog] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}
