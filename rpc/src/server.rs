//! The axum control server.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use registrar_core::Orchestrator;
use registrar_store::{QueueKind, QueueStore};
use registrar_types::{ChainAddress, NameId, NameOperation, PrivateKey, SubmitRequest};

use crate::error::RpcError;
use crate::handlers::{
    PingResponse, QueueListResponse, ShutdownResponse, SubmissionResponse, TransferRequest,
    UpdateRequest,
};
use crate::shutdown::ShutdownController;

/// Shared state behind every control route.
pub struct ControlState {
    pub orchestrator: Orchestrator,
    pub queues: Arc<dyn QueueStore>,
    pub shutdown: ShutdownController,
    started_at: Instant,
}

impl ControlState {
    pub fn new(
        orchestrator: Orchestrator,
        queues: Arc<dyn QueueStore>,
        shutdown: ShutdownController,
    ) -> Self {
        Self {
            orchestrator,
            queues,
            shutdown,
            started_at: Instant::now(),
        }
    }
}

/// The control server, bound to a port with shared state.
pub struct ControlServer {
    pub port: u16,
    pub state: Arc<ControlState>,
}

impl ControlServer {
    pub fn new(port: u16, state: Arc<ControlState>) -> Self {
        Self { port, state }
    }

    /// Serve until the shutdown controller fires.
    pub async fn start(&self) -> Result<(), RpcError> {
        let mut shutdown_rx = self.state.shutdown.subscribe();
        let app = router(self.state.clone());

        let addr = format!("127.0.0.1:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(format!("cannot bind {addr}: {e}")))?;
        info!("control endpoint listening on {addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}

fn router(state: Arc<ControlState>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/shutdown", post(shutdown))
        .route("/v1/names/update", post(submit_update))
        .route("/v1/names/transfer", post(submit_transfer))
        .route("/v1/queues/:kind", get(list_queue))
        .with_state(state)
}

async fn ping(State(state): State<Arc<ControlState>>) -> Json<PingResponse> {
    Json(PingResponse {
        status: "alive",
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}

async fn shutdown(State(state): State<Arc<ControlState>>) -> Json<ShutdownResponse> {
    info!("shutdown requested via control endpoint");
    state.shutdown.shutdown();
    Json(ShutdownResponse {
        status: "shutting_down",
    })
}

async fn submit_update(
    State(state): State<Arc<ControlState>>,
    Json(request): Json<UpdateRequest>,
) -> Result<Json<SubmissionResponse>, RpcError> {
    let name = parse_name(&request.name)?;
    let owner_key = parse_key("owner_key", &request.owner_key)?;
    let payment_key = request
        .payment_key
        .as_deref()
        .map(|k| parse_key("payment_key", k))
        .transpose()?;

    let submission = state
        .orchestrator
        .submit(SubmitRequest {
            operation: NameOperation::Update {
                name,
                profile: request.profile,
            },
            owner_key,
            payment_address: ChainAddress::new(request.payment_address),
            payment_key,
        })
        .await;
    Ok(Json(submission.into()))
}

async fn submit_transfer(
    State(state): State<Arc<ControlState>>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<SubmissionResponse>, RpcError> {
    let name = parse_name(&request.name)?;
    let owner_key = parse_key("owner_key", &request.owner_key)?;
    let payment_key = request
        .payment_key
        .as_deref()
        .map(|k| parse_key("payment_key", k))
        .transpose()?;

    let submission = state
        .orchestrator
        .submit(SubmitRequest {
            operation: NameOperation::Transfer {
                name,
                recipient: ChainAddress::new(request.recipient),
            },
            owner_key,
            payment_address: ChainAddress::new(request.payment_address),
            payment_key,
        })
        .await;
    Ok(Json(submission.into()))
}

async fn list_queue(
    State(state): State<Arc<ControlState>>,
    Path(kind): Path<String>,
) -> Result<Json<QueueListResponse>, RpcError> {
    let queue = QueueKind::parse(&kind).ok_or_else(|| RpcError::UnknownQueue(kind.clone()))?;
    let records = state
        .queues
        .list(queue)
        .map_err(|e| RpcError::Store(e.to_string()))?;
    Ok(Json(QueueListResponse {
        queue: queue.as_str().to_string(),
        records,
    }))
}

fn parse_name(raw: &str) -> Result<NameId, RpcError> {
    let name = NameId::new(raw);
    if !name.is_valid() {
        return Err(RpcError::InvalidRequest(format!("invalid name: {raw}")));
    }
    Ok(name)
}

fn parse_key(field: &str, hex: &str) -> Result<PrivateKey, RpcError> {
    PrivateKey::from_hex(hex)
        .ok_or_else(|| RpcError::InvalidRequest(format!("{field} is not a 32-byte hex key")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use registrar_crypto::{derive_address, generate_keypair};
    use registrar_nullables::{NullChain, NullKeyResolver, NullQueueStore, NullSubsidyBuilder};

    fn state() -> (Arc<NullChain>, Arc<NullQueueStore>, Arc<ControlState>) {
        let chain = Arc::new(NullChain::new());
        let builder = Arc::new(NullSubsidyBuilder::new());
        let wallet = Arc::new(NullKeyResolver::new());
        let store = Arc::new(NullQueueStore::new());
        let orchestrator = Orchestrator::new(
            chain.clone(),
            chain.clone(),
            chain.clone(),
            builder,
            wallet,
            store.clone(),
        );
        let control = Arc::new(ControlState::new(
            orchestrator,
            store.clone(),
            ShutdownController::new(),
        ));
        (chain, store, control)
    }

    #[tokio::test]
    async fn ping_reports_alive() {
        let (_chain, _store, control) = state();
        let Json(reply) = ping(State(control)).await;
        assert_eq!(reply.status, "alive");
    }

    #[tokio::test]
    async fn shutdown_route_fires_the_controller() {
        let (_chain, _store, control) = state();
        let mut rx = control.shutdown.subscribe();
        let Json(reply) = shutdown(State(control)).await;
        assert_eq!(reply.status, "shutting_down");
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn update_route_rejects_malformed_key() {
        let (_chain, _store, control) = state();
        let result = submit_update(
            State(control),
            Json(UpdateRequest {
                name: "alice.id".into(),
                profile: serde_json::json!({}),
                owner_key: "zz".into(),
                payment_address: "id_pay".into(),
                payment_key: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(RpcError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn update_route_rejects_malformed_name() {
        let (_chain, _store, control) = state();
        let kp = generate_keypair();
        let result = submit_update(
            State(control),
            Json(UpdateRequest {
                name: "Not A Name".into(),
                profile: serde_json::json!({}),
                owner_key: kp.private.to_hex(),
                payment_address: "id_pay".into(),
                payment_key: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(RpcError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn update_route_runs_the_pipeline() {
        let (chain, store, control) = state();
        let owner = generate_keypair();
        let payment = generate_keypair();
        let name = NameId::new("alice.id");
        chain.register_name(&name, &derive_address(&owner.public));

        let Json(reply) = submit_update(
            State(control),
            Json(UpdateRequest {
                name: "alice.id".into(),
                profile: serde_json::json!({ "name": "Alice" }),
                owner_key: owner.private.to_hex(),
                payment_address: derive_address(&payment.public).as_str().into(),
                payment_key: Some(payment.private.to_hex()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(reply.status, "accepted");
        assert!(reply.tx_hash.is_some());
        assert_eq!(store.count(QueueKind::Update).unwrap(), 1);
    }

    #[tokio::test]
    async fn queue_listing_rejects_unknown_kind() {
        let (_chain, _store, control) = state();
        let result = list_queue(State(control), Path("bogus".into())).await;
        assert!(matches!(result, Err(RpcError::UnknownQueue(_))));
    }
}
