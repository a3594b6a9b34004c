//! Client for the remote name service.
//!
//! The name service holds the payer's authorization and builds unsigned
//! subsidized transactions: its response embeds the payer's signature on
//! the fee inputs, leaving the owner inputs for local co-signing.

pub mod client;
pub mod traits;

pub use client::NameSvcClient;
pub use traits::SubsidyBuilder;
