//! Identity-chain client for the registrar.
//!
//! Wraps the chain node's JSON "action" RPC behind typed methods and the
//! trait seams the orchestrator consumes: [`ChainReader`] for name-record
//! lookups, [`TxBroadcaster`] for raw-transaction submission, and
//! [`AddressOracle`] for payment/recipient health queries.

pub mod client;
pub mod oracle;
pub mod traits;

pub use client::ChainClient;
pub use oracle::{FundingOracle, OracleThresholds};
pub use traits::{AddressOracle, BroadcastResult, ChainReader, TxBroadcaster};
