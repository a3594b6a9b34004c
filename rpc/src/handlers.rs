//! Control endpoint request and response models.

use serde::{Deserialize, Serialize};

use registrar_core::{RejectReason, Submission};

// ── Liveness ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
}

#[derive(Serialize)]
pub struct ShutdownResponse {
    pub status: &'static str,
}

// ── Operations ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateRequest {
    pub name: String,
    pub profile: serde_json::Value,
    /// Hex-encoded owner private key.
    pub owner_key: String,
    pub payment_address: String,
    /// Hex-encoded payment private key; resolved via the wallet if absent.
    #[serde(default)]
    pub payment_key: Option<String>,
}

#[derive(Deserialize)]
pub struct TransferRequest {
    pub name: String,
    pub recipient: String,
    /// Hex-encoded owner private key.
    pub owner_key: String,
    pub payment_address: String,
    /// Hex-encoded payment private key; resolved via the wallet if absent.
    #[serde(default)]
    pub payment_key: Option<String>,
}

#[derive(Serialize)]
pub struct SubmissionResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<RejectReason>,
}

impl From<Submission> for SubmissionResponse {
    fn from(submission: Submission) -> Self {
        match submission {
            Submission::Accepted { tx_hash } => SubmissionResponse {
                status: "accepted",
                tx_hash: tx_hash.map(|h| h.to_hex()),
                reason: None,
            },
            Submission::Rejected { reason } => SubmissionResponse {
                status: "rejected",
                tx_hash: None,
                reason: Some(reason),
            },
        }
    }
}

// ── Queues ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct QueueListResponse {
    pub queue: String,
    pub records: Vec<registrar_store::QueueRecord>,
}
