//! LMDB implementation of the queue store.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use registrar_store::{QueueKind, QueueRecord, QueueStore, StoreError};

use crate::LmdbError;

/// Default map size: 256 MiB, far above what pending queues ever hold.
const DEFAULT_MAP_SIZE: usize = 256 * 1024 * 1024;

pub struct LmdbQueueStore {
    env: Arc<Env>,
    preorder_db: Database<Bytes, Bytes>,
    register_db: Database<Bytes, Bytes>,
    update_db: Database<Bytes, Bytes>,
    transfer_db: Database<Bytes, Bytes>,
}

impl LmdbQueueStore {
    /// Open or create the queue environment at `path` (a directory).
    pub fn open(path: &Path) -> Result<Self, LmdbError> {
        Self::open_with_map_size(path, DEFAULT_MAP_SIZE)
    }

    pub fn open_with_map_size(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LmdbError::Heed(format!("cannot create {}: {e}", path.display())))?;
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(QueueKind::ALL.len() as u32)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let preorder_db = env.create_database(&mut wtxn, Some("preorder_queue"))?;
        let register_db = env.create_database(&mut wtxn, Some("register_queue"))?;
        let update_db = env.create_database(&mut wtxn, Some("update_queue"))?;
        let transfer_db = env.create_database(&mut wtxn, Some("transfer_queue"))?;
        wtxn.commit()?;

        Ok(Self {
            env: Arc::new(env),
            preorder_db,
            register_db,
            update_db,
            transfer_db,
        })
    }

    fn db(&self, queue: QueueKind) -> &Database<Bytes, Bytes> {
        match queue {
            QueueKind::Preorder => &self.preorder_db,
            QueueKind::Register => &self.register_db,
            QueueKind::Update => &self.update_db,
            QueueKind::Transfer => &self.transfer_db,
        }
    }
}

impl QueueStore for LmdbQueueStore {
    fn contains(&self, queue: QueueKind, name: &str) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let found = self
            .db(queue)
            .get(&rtxn, name.as_bytes())
            .map_err(LmdbError::from)?
            .is_some();
        Ok(found)
    }

    fn insert_new(&self, queue: QueueKind, record: &QueueRecord) -> Result<(), StoreError> {
        let key = record.name.as_str().as_bytes();
        let value = bincode::serialize(record).map_err(LmdbError::from)?;

        // Check and put share one write transaction: LMDB serializes
        // writers, so a concurrent insert for the same name cannot slip
        // between them.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let db = self.db(queue);
        if db.get(&wtxn, key).map_err(LmdbError::from)?.is_some() {
            return Err(StoreError::Duplicate(format!(
                "{}/{}",
                queue,
                record.name.as_str()
            )));
        }
        db.put(&mut wtxn, key, &value).map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get(&self, queue: QueueKind, name: &str) -> Result<Option<QueueRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self
            .db(queue)
            .get(&rtxn, name.as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => {
                let record: QueueRecord = bincode::deserialize(bytes).map_err(LmdbError::from)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn remove(&self, queue: QueueKind, name: &str) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let removed = self
            .db(queue)
            .delete(&mut wtxn, name.as_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        if !removed {
            return Err(StoreError::NotFound(format!("{queue}/{name}")));
        }
        Ok(())
    }

    fn list(&self, queue: QueueKind) -> Result<Vec<QueueRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.db(queue).iter(&rtxn).map_err(LmdbError::from)?;
        let mut records = Vec::new();
        for entry in iter {
            let (_key, value) = entry.map_err(LmdbError::from)?;
            records.push(bincode::deserialize(value).map_err(LmdbError::from)?);
        }
        Ok(records)
    }

    fn count(&self, queue: QueueKind) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.db(queue).len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_store::RecordPayload;
    use registrar_types::{ChainAddress, NameId};

    fn record(name: &str) -> QueueRecord {
        QueueRecord {
            name: NameId::new(name),
            tx_hash: "deadbeef".repeat(8),
            owner_address: ChainAddress::new("id_owner"),
            queued_at: 1_700_000_000,
            payload: RecordPayload::Transfer {
                transfer_address: ChainAddress::new("id_bob"),
            },
        }
    }

    fn open_store() -> (tempfile::TempDir, LmdbQueueStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LmdbQueueStore::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn insert_then_contains_and_get() {
        let (_dir, store) = open_store();
        assert!(!store.contains(QueueKind::Transfer, "alice.id").unwrap());

        store
            .insert_new(QueueKind::Transfer, &record("alice.id"))
            .unwrap();

        assert!(store.contains(QueueKind::Transfer, "alice.id").unwrap());
        let got = store.get(QueueKind::Transfer, "alice.id").unwrap().unwrap();
        assert_eq!(got.name.as_str(), "alice.id");
        assert_eq!(got.tx_hash, "deadbeef".repeat(8));
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let (_dir, store) = open_store();
        store
            .insert_new(QueueKind::Update, &record("alice.id"))
            .unwrap();
        let err = store
            .insert_new(QueueKind::Update, &record("alice.id"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.count(QueueKind::Update).unwrap(), 1);
    }

    #[test]
    fn queues_are_isolated() {
        let (_dir, store) = open_store();
        store
            .insert_new(QueueKind::Update, &record("alice.id"))
            .unwrap();
        assert!(!store.contains(QueueKind::Transfer, "alice.id").unwrap());
        // Same name can be queued in a different queue.
        store
            .insert_new(QueueKind::Transfer, &record("alice.id"))
            .unwrap();
    }

    #[test]
    fn remove_deletes_the_record() {
        let (_dir, store) = open_store();
        store
            .insert_new(QueueKind::Transfer, &record("alice.id"))
            .unwrap();
        store.remove(QueueKind::Transfer, "alice.id").unwrap();
        assert!(!store.contains(QueueKind::Transfer, "alice.id").unwrap());
    }

    #[test]
    fn remove_missing_is_not_found() {
        let (_dir, store) = open_store();
        let err = store.remove(QueueKind::Transfer, "ghost.id").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn list_returns_all_records() {
        let (_dir, store) = open_store();
        store
            .insert_new(QueueKind::Transfer, &record("alice.id"))
            .unwrap();
        store
            .insert_new(QueueKind::Transfer, &record("bob.id"))
            .unwrap();
        let records = store.list(QueueKind::Transfer).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = LmdbQueueStore::open(dir.path()).unwrap();
            store
                .insert_new(QueueKind::Update, &record("alice.id"))
                .unwrap();
        }
        let store = LmdbQueueStore::open(dir.path()).unwrap();
        assert!(store.contains(QueueKind::Update, "alice.id").unwrap());
    }
}
