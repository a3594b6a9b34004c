//! Operation orchestrator for subsidized name operations.
//!
//! The pipeline at the heart of the registrar: verify chain-state
//! preconditions, obtain an unsigned subsidized transaction from the name
//! service, co-sign as owner, broadcast, and durably record the outcome.
//! Nothing is persisted unless a transaction has actually been broadcast,
//! and a queued name refuses resubmission until its record resolves.

pub mod broker;
pub mod locks;
pub mod orchestrator;
pub mod outcome;

pub use broker::{cosign_and_broadcast, BrokerError};
pub use orchestrator::Orchestrator;
pub use outcome::{RejectReason, Submission};
