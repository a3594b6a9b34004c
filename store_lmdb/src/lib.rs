//! LMDB storage backend for the registrar queues.
//!
//! Implements [`registrar_store::QueueStore`] with the `heed` LMDB
//! bindings: one named database per queue, name bytes as keys, bincode
//! records as values. The conditional insert runs check and put inside a
//! single write transaction, which is what makes duplicate suppression
//! race-free across processes sharing the environment.

pub mod error;
pub mod queue;

pub use error::LmdbError;
pub use queue::LmdbQueueStore;
