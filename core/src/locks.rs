//! Per-name in-flight guard.
//!
//! Serializes submissions for the same name in the same queue within this
//! process: the second caller is turned away instead of racing the first
//! to the duplicate check. The store's conditional insert covers the
//! cross-process window.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use registrar_store::QueueKind;
use registrar_types::NameId;

#[derive(Clone, Default)]
pub struct InFlightNames {
    inner: Arc<Mutex<HashSet<(QueueKind, String)>>>,
}

impl InFlightNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `(queue, name)`. Returns `None` when another submission for
    /// the pair is already running; the claim is released when the guard
    /// drops.
    pub fn acquire(&self, queue: QueueKind, name: &NameId) -> Option<InFlightGuard> {
        let key = (queue, name.as_str().to_string());
        let mut set = self.inner.lock().expect("in-flight lock poisoned");
        if !set.insert(key.clone()) {
            return None;
        }
        Some(InFlightGuard {
            set: Arc::clone(&self.inner),
            key,
        })
    }
}

pub struct InFlightGuard {
    set: Arc<Mutex<HashSet<(QueueKind, String)>>>,
    key: (QueueKind, String),
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if let Ok(mut set) = self.set.lock() {
            set.remove(&self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_refused_until_drop() {
        let names = InFlightNames::new();
        let name = NameId::new("alice.id");

        let guard = names.acquire(QueueKind::Update, &name);
        assert!(guard.is_some());
        assert!(names.acquire(QueueKind::Update, &name).is_none());

        drop(guard);
        assert!(names.acquire(QueueKind::Update, &name).is_some());
    }

    #[test]
    fn different_queues_do_not_conflict() {
        let names = InFlightNames::new();
        let name = NameId::new("alice.id");

        let _update = names.acquire(QueueKind::Update, &name).unwrap();
        assert!(names.acquire(QueueKind::Transfer, &name).is_some());
    }

    #[test]
    fn different_names_do_not_conflict() {
        let names = InFlightNames::new();
        let _a = names.acquire(QueueKind::Update, &NameId::new("a.id")).unwrap();
        assert!(names
            .acquire(QueueKind::Update, &NameId::new("b.id"))
            .is_some());
    }
}
