//! Nullable queue store: thread-safe in-memory storage for testing.

use std::collections::HashMap;
use std::sync::Mutex;

use registrar_store::{QueueKind, QueueRecord, QueueStore, StoreError};

/// An in-memory queue store. The conditional insert holds the map lock
/// across check and write, matching the atomicity the trait requires.
#[derive(Default)]
pub struct NullQueueStore {
    records: Mutex<HashMap<(QueueKind, String), QueueRecord>>,
}

impl NullQueueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QueueStore for NullQueueStore {
    fn contains(&self, queue: QueueKind, name: &str) -> Result<bool, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .contains_key(&(queue, name.to_string())))
    }

    fn insert_new(&self, queue: QueueKind, record: &QueueRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().unwrap();
        let key = (queue, record.name.as_str().to_string());
        if records.contains_key(&key) {
            return Err(StoreError::Duplicate(format!(
                "{}/{}",
                queue,
                record.name.as_str()
            )));
        }
        records.insert(key, record.clone());
        Ok(())
    }

    fn get(&self, queue: QueueKind, name: &str) -> Result<Option<QueueRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&(queue, name.to_string()))
            .cloned())
    }

    fn remove(&self, queue: QueueKind, name: &str) -> Result<(), StoreError> {
        self.records
            .lock()
            .unwrap()
            .remove(&(queue, name.to_string()))
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("{queue}/{name}")))
    }

    fn list(&self, queue: QueueKind) -> Result<Vec<QueueRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|((k, _), _)| *k == queue)
            .map(|(_, r)| r.clone())
            .collect())
    }

    fn count(&self, queue: QueueKind) -> Result<u64, StoreError> {
        Ok(self.list(queue)?.len() as u64)
    }
}
