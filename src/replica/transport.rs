//! Outbound HTTP calls this replica makes to its peers: the four core
//! endpoints plus the write-forward call that rides on top of them.
//! Every call here is wrapped in `tokio::time::timeout` and maps any
//! failure mode, connection refused, timeout, malformed body, to a
//! `CoreError`.

use std::time::Duration;

use reqwest::Client;
use tokio::time::timeout;

use crate::domain::{Snapshot, WriteOp};
use crate::utils::CoreError;
use crate::wire::{
    ForwardRequest, HealthReply, NodeId, PushStateRequest, TimeReply, UpdateCoordinatorRequest,
    WriteReply,
};

/// Builds the base URL of a peer from its node id; every replica binds
/// to `127.0.0.1:<node id>`.
pub fn peer_url(id: NodeId) -> String {
    format!("http://127.0.0.1:{}", id)
}

/// Peer health probe. Any error or timeout is folded into `false`, this
/// must never propagate a `CoreError`, since election and push-round
/// logic treat liveness as a plain boolean.
pub async fn is_alive(client: &Client, id: NodeId, bound: Duration) -> bool {
    let url = format!("{}/health", peer_url(id));
    match timeout(bound, client.get(&url).send()).await {
        Ok(Ok(resp)) if resp.status().is_success() => {
            matches!(resp.json::<HealthReply>().await, Ok(h) if h.status == "alive")
        }
        _ => false,
    }
}

/// Fetches the peer's current time for Cristian's algorithm.
pub async fn get_time(client: &Client, id: NodeId, bound: Duration) -> Result<f64, CoreError> {
    let url = format!("{}/time", peer_url(id));
    let resp = timeout(bound, client.get(&url).send())
        .await
        .map_err(|_| CoreError::Timeout)??;
    let reply: TimeReply = resp.json().await?;
    Ok(reply.time)
}

/// Best-effort notification of a newly-elected coordinator.
pub async fn update_coordinator(
    client: &Client,
    id: NodeId,
    new_coordinator: NodeId,
    bound: Duration,
) -> Result<(), CoreError> {
    let url = format!("{}/update_coordinator", peer_url(id));
    let body = UpdateCoordinatorRequest {
        port: new_coordinator,
    };
    let resp = timeout(bound, client.post(&url).json(&body).send())
        .await
        .map_err(|_| CoreError::Timeout)??;
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(CoreError::MalformedCoordinatorUpdate)
    }
}

/// Pushes a full snapshot to a follower.
pub async fn push_state(
    client: &Client,
    id: NodeId,
    snapshot: &Snapshot,
    bound: Duration,
) -> Result<(), CoreError> {
    let url = format!("{}/push_state", peer_url(id));
    let body: &PushStateRequest = snapshot;
    let resp = timeout(bound, client.post(&url).json(body).send())
        .await
        .map_err(|_| CoreError::Timeout)??;
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(CoreError::MalformedSnapshot)
    }
}

/// Replays a write at the believed coordinator. Returns the
/// coordinator's reply verbatim; only a *network* failure (not a
/// domain error carried inside the reply) is surfaced as `Err`, since
/// domain errors are a successful round-trip.
pub async fn forward_write(
    client: &Client,
    id: NodeId,
    op: WriteOp,
    bound: Duration,
) -> Result<WriteReply, CoreError> {
    let url = format!("{}/internal/forward", peer_url(id));
    let body = ForwardRequest { op };
    let resp = timeout(bound, client.post(&url).json(&body).send())
        .await
        .map_err(|_| CoreError::Timeout)??;
    let reply: WriteReply = resp.json().await?;
    Ok(reply)
}
