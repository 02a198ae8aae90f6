//! Wire request/reply shapes for the core protocol endpoints
//! (`/health`, `/time`, `/update_coordinator`, `/push_state`) and for the
//! funnelled write that rides on top of them. All bodies are plain JSON
//! over HTTP.

use crate::domain::{Snapshot, WriteOp, WriteResult};
use serde::{Deserialize, Serialize};

pub type NodeId = u16;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReply {
    pub status: String,
}

impl HealthReply {
    pub fn alive() -> Self {
        HealthReply {
            status: "alive".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeReply {
    pub time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCoordinatorRequest {
    pub port: NodeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: String,
}

impl StatusReply {
    pub fn ok() -> Self {
        StatusReply {
            status: "ok".to_string(),
        }
    }

    pub fn synced() -> Self {
        StatusReply {
            status: "synced".to_string(),
        }
    }
}

/// Body of a `push_state` request: the coordinator's full snapshot.
pub type PushStateRequest = Snapshot;

/// Body forwarded follower-to-coordinator for a funnelled write. Carries
/// the same `WriteOp` the follower itself would have applied, so
/// replaying it at the coordinator is semantically identical to a
/// client talking to the coordinator directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardRequest {
    pub op: WriteOp,
}

/// The outcome of a funnelled write, as exchanged between replicas over
/// `/internal/forward`. This is an internal RPC shape, not the
/// client-facing JSON contract (see `clinic_replica`'s HTTP handlers for
/// that). `DomainError` and `RoutingError` are kept as distinct variants,
/// not folded into one `Error { detail }` case, so a receiving replica
/// never has to guess which kind of failure a detail string came from:
/// a nested routing failure (e.g. the coordinator itself failed to
/// re-elect) must never be mistaken for a domain-level rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WriteReply {
    Success { result: WriteResult },
    DomainError { detail: String },
    RoutingError { detail: String },
}

impl WriteReply {
    pub fn from_result(r: Result<WriteResult, crate::utils::DomainError>) -> Self {
        match r {
            Ok(result) => WriteReply::Success { result },
            Err(e) => WriteReply::DomainError {
                detail: e.to_string(),
            },
        }
    }

    pub fn from_routing_error(e: &crate::utils::CoreError) -> Self {
        WriteReply::RoutingError {
            detail: e.to_string(),
        }
    }
}

/// Generic detail body used when a routing-level error (not a domain
/// error) must be surfaced to the client, e.g. `CoordinatorUnreachable`
/// or `NoBackends`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}
