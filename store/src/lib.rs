//! Abstract queue storage for the registrar.
//!
//! Every storage backend (LMDB, in-memory for testing) implements
//! [`QueueStore`]; the rest of the workspace depends only on the trait.

pub mod error;
pub mod queue;

pub use error::StoreError;
pub use queue::{QueueKind, QueueRecord, QueueStore, RecordPayload};
