//! Control endpoint for the registrar.
//!
//! A small axum server carrying the process-control surface (liveness,
//! graceful shutdown) and the operation entry points that feed the
//! orchestrator, plus a read view of the queues for the confirmation
//! monitor.

pub mod error;
pub mod handlers;
pub mod server;
pub mod shutdown;

pub use error::RpcError;
pub use server::{ControlServer, ControlState};
pub use shutdown::ShutdownController;
