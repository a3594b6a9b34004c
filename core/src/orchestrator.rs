//! The operation orchestrator.
//!
//! One `submit` call walks an ordered pipeline of guards; any guard
//! failure is a terminal rejection with no side effects. The queue record
//! is written only after the chain node has accepted the broadcast, so a
//! crash at any earlier point leaves no state behind and a resubmission
//! is always safe.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use registrar_chain::{AddressOracle, ChainReader, TxBroadcaster};
use registrar_crypto::{address_from_private, profile_hash, public_from_private};
use registrar_namesvc::SubsidyBuilder;
use registrar_store::{QueueKind, QueueRecord, QueueStore, RecordPayload};
use registrar_types::{
    ChainAddress, NameId, NameOperation, NameRecord, OperationKind, PrivateKey, RemoteError,
    SubmitRequest, TxHash,
};
use registrar_utils::{unix_now_secs, StatsCounter};
use registrar_wallet::KeyResolver;

use crate::broker::{cosign_and_broadcast, BrokerError};
use crate::locks::InFlightNames;
use crate::outcome::{RejectReason, Submission};

/// Sequences precondition checks, remote build, co-sign, broadcast, and
/// the queue commit for update and transfer operations.
///
/// Every collaborator is an explicit handle injected at construction;
/// the orchestrator holds no hidden session state.
pub struct Orchestrator {
    chain: Arc<dyn ChainReader>,
    broadcaster: Arc<dyn TxBroadcaster>,
    oracle: Arc<dyn AddressOracle>,
    builder: Arc<dyn SubsidyBuilder>,
    wallet: Arc<dyn KeyResolver>,
    queues: Arc<dyn QueueStore>,
    in_flight: InFlightNames,
    stats: StatsCounter,
}

impl Orchestrator {
    pub fn new(
        chain: Arc<dyn ChainReader>,
        broadcaster: Arc<dyn TxBroadcaster>,
        oracle: Arc<dyn AddressOracle>,
        builder: Arc<dyn SubsidyBuilder>,
        wallet: Arc<dyn KeyResolver>,
        queues: Arc<dyn QueueStore>,
    ) -> Self {
        Self {
            chain,
            broadcaster,
            oracle,
            builder,
            wallet,
            queues,
            in_flight: InFlightNames::new(),
            stats: StatsCounter::new(&["accepted", "rejected"]),
        }
    }

    /// Submission counters (`accepted` / `rejected`).
    pub fn stats(&self) -> &StatsCounter {
        &self.stats
    }

    /// Submit one name operation. Never panics and never returns a raw
    /// collaborator error: every failure maps to a [`RejectReason`].
    pub async fn submit(&self, request: SubmitRequest) -> Submission {
        let name = request.operation.name().clone();
        let queue = queue_for(request.operation.kind());

        match self.run(queue, &name, request).await {
            Ok(submission) => {
                self.stats.increment("accepted");
                submission
            }
            Err(reason) => {
                self.stats.increment("rejected");
                info!(name = %name, queue = %queue, %reason, "submission rejected");
                Submission::Rejected { reason }
            }
        }
    }

    async fn run(
        &self,
        queue: QueueKind,
        name: &NameId,
        request: SubmitRequest,
    ) -> Result<Submission, RejectReason> {
        let SubmitRequest {
            operation,
            owner_key,
            payment_address,
            payment_key,
        } = request;

        // Step 1: duplicate suppression, before any remote work. The
        // in-flight guard turns away a concurrent submission for the same
        // name; the store check turns away a resubmission of a pending one.
        let Some(_guard) = self.in_flight.acquire(queue, name) else {
            return Err(RejectReason::AlreadyQueued);
        };
        let queued = self.queues.contains(queue, name.as_str()).map_err(|e| {
            error!(name = %name, error = %e, "queue lookup failed");
            RejectReason::ChainUnavailable
        })?;
        if queued {
            debug!(name = %name, queue = %queue, "already queued");
            return Err(RejectReason::AlreadyQueued);
        }

        // Step 2: the name must exist on chain.
        let record = self
            .chain
            .name_record(name)
            .await
            .map_err(read_failure)?
            .ok_or(RejectReason::NotRegistered)?;

        match operation {
            NameOperation::Update { profile, .. } => {
                self.run_update(name, profile, record, owner_key, payment_address, payment_key)
                    .await
            }
            NameOperation::Transfer { recipient, .. } => {
                self.run_transfer(
                    name,
                    recipient,
                    record,
                    owner_key,
                    payment_address,
                    payment_key,
                )
                .await
            }
        }
    }

    async fn run_update(
        &self,
        name: &NameId,
        profile: serde_json::Value,
        record: NameRecord,
        owner_key: PrivateKey,
        payment_address: ChainAddress,
        payment_key: Option<PrivateKey>,
    ) -> Result<Submission, RejectReason> {
        self.verify_ownership(&owner_key, &record)?;
        self.check_payment(&payment_address).await?;
        let subsidy_key = self.resolve_payment_key(&payment_address, payment_key)?;

        let profile_text = profile.to_string();
        let value_hash = profile_hash(&profile);
        let owner_public = public_from_private(&owner_key);

        debug!(name = %name, value_hash = %value_hash, payment = %payment_address,
               "requesting subsidized update transaction");
        let tx = self
            .builder
            .build_update(name, &value_hash, &owner_public, &subsidy_key)
            .await
            .map_err(build_failure)?;

        let tx_hash = cosign_and_broadcast(&owner_key, tx, self.broadcaster.as_ref())
            .await
            .map_err(broadcast_failure)?;

        self.commit(
            QueueKind::Update,
            QueueRecord {
                name: name.clone(),
                tx_hash: tx_hash.to_hex(),
                owner_address: record.owner_address,
                queued_at: unix_now_secs(),
                payload: RecordPayload::Update {
                    profile: profile_text,
                    profile_hash: value_hash,
                },
            },
            tx_hash,
        )
    }

    async fn run_transfer(
        &self,
        name: &NameId,
        recipient: ChainAddress,
        record: NameRecord,
        owner_key: PrivateKey,
        payment_address: ChainAddress,
        payment_key: Option<PrivateKey>,
    ) -> Result<Submission, RejectReason> {
        // Step 3: the effect may already be on chain (a prior transfer
        // confirmed without being queued here). Idempotent success, and
        // nothing is broadcast.
        if record.owner_address == recipient {
            info!(name = %name, recipient = %recipient, "name already transferred");
            return Ok(Submission::Accepted { tx_hash: None });
        }

        // Step 4: recipient capacity, before the ownership proof.
        if self
            .oracle
            .recipient_not_ready(&recipient)
            .await
            .map_err(read_failure)?
        {
            return Err(RejectReason::RecipientNotReady);
        }

        self.verify_ownership(&owner_key, &record)?;
        self.check_payment(&payment_address).await?;
        let subsidy_key = self.resolve_payment_key(&payment_address, payment_key)?;

        let owner_public = public_from_private(&owner_key);

        debug!(name = %name, recipient = %recipient, payment = %payment_address,
               "requesting subsidized transfer transaction");
        let tx = self
            .builder
            .build_transfer(name, &recipient, true, &owner_public, &subsidy_key)
            .await
            .map_err(build_failure)?;

        let tx_hash = cosign_and_broadcast(&owner_key, tx, self.broadcaster.as_ref())
            .await
            .map_err(broadcast_failure)?;

        self.commit(
            QueueKind::Transfer,
            QueueRecord {
                name: name.clone(),
                tx_hash: tx_hash.to_hex(),
                owner_address: record.owner_address,
                queued_at: unix_now_secs(),
                payload: RecordPayload::Transfer {
                    transfer_address: recipient,
                },
            },
            tx_hash,
        )
    }

    /// Step 5: the caller must hold the key behind the on-chain owner
    /// address. Local derivation only; ownership claims are never taken
    /// from the request.
    fn verify_ownership(
        &self,
        owner_key: &PrivateKey,
        record: &NameRecord,
    ) -> Result<(), RejectReason> {
        let derived = address_from_private(owner_key);
        if derived != record.owner_address {
            debug!(derived = %derived, owner = %record.owner_address,
                   "owner key does not control this name");
            return Err(RejectReason::NotOwner);
        }
        Ok(())
    }

    /// Step 6: usability strictly before funding, since an unusable address's
    /// balance is meaningless.
    async fn check_payment(&self, payment_address: &ChainAddress) -> Result<(), RejectReason> {
        if self
            .oracle
            .dont_use(payment_address)
            .await
            .map_err(read_failure)?
        {
            return Err(RejectReason::PaymentAddressUnusable);
        }
        if self
            .oracle
            .underfunded(payment_address)
            .await
            .map_err(read_failure)?
        {
            return Err(RejectReason::PaymentAddressUnderfunded);
        }
        Ok(())
    }

    /// Step 7: the subsidy key travels with the request or comes from the
    /// wallet; without it the attempt is over.
    fn resolve_payment_key(
        &self,
        payment_address: &ChainAddress,
        payment_key: Option<PrivateKey>,
    ) -> Result<PrivateKey, RejectReason> {
        match payment_key {
            Some(key) => Ok(key),
            None => self.wallet.resolve_key(payment_address).ok_or_else(|| {
                warn!(payment = %payment_address, "no key available for payment address");
                RejectReason::PaymentKeyUnavailable
            }),
        }
    }

    /// Step 10: durably record the broadcast outcome.
    fn commit(
        &self,
        queue: QueueKind,
        record: QueueRecord,
        tx_hash: TxHash,
    ) -> Result<Submission, RejectReason> {
        if let Err(e) = self.queues.insert_new(queue, &record) {
            // The transaction is already on the wire; rejecting now would
            // invite a resubmission and a duplicate fee spend. Surface the
            // gap to the operator and report the broadcast that happened.
            error!(name = %record.name, queue = %queue, tx_hash = %tx_hash, error = %e,
                   "broadcast succeeded but queue commit failed");
        } else {
            info!(name = %record.name, queue = %queue, tx_hash = %tx_hash,
                  "operation broadcast and queued");
        }
        Ok(Submission::Accepted {
            tx_hash: Some(tx_hash),
        })
    }
}

fn queue_for(kind: OperationKind) -> QueueKind {
    match kind {
        OperationKind::Update => QueueKind::Update,
        OperationKind::Transfer => QueueKind::Transfer,
    }
}

/// A chain-state read failed during the guard phase: no transaction was
/// attempted, so the caller may simply retry later.
fn read_failure(e: RemoteError) -> RejectReason {
    warn!(error = %e, "chain read failed");
    if e.is_timeout() {
        RejectReason::RemoteTimeout
    } else {
        RejectReason::ChainUnavailable
    }
}

fn build_failure(e: RemoteError) -> RejectReason {
    if e.is_timeout() {
        warn!("remote build timed out");
        return RejectReason::RemoteTimeout;
    }
    warn!(error = %e, "remote build failed");
    RejectReason::RemoteBuildFailed
}

fn broadcast_failure(e: BrokerError) -> RejectReason {
    if let BrokerError::Remote(RemoteError::Timeout) = e {
        warn!("broadcast timed out");
        return RejectReason::RemoteTimeout;
    }
    warn!(error = %e, "broadcast failed");
    RejectReason::BroadcastFailed
}
