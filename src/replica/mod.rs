//! The coordination core: a `Replica` value whose lifecycle equals the
//! process, holding one mutex that guards `AppState`, the coordinator
//! belief, and the domain id counters together, and is passed explicitly
//! into every handler.

pub mod clock;
pub mod election;
pub mod funnel;
pub mod health;
pub mod snapshot;
pub mod transport;

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Mutex;

use crate::domain::AppState;
use crate::wire::NodeId;

/// Everything the replica mutex guards: the application state, the
/// current coordinator belief, the logical clock, and the running set
/// of peers known to have answered the most recent push round.
pub struct ReplicaState {
    pub app: AppState,
    pub coordinator_id: NodeId,
    pub logical_clock: f64,
    /// Peers that both passed the liveness probe and accepted the
    /// snapshot in the most recent push round. Only narrows fan-out
    /// between elections; an election always rebuilds it from `peers`.
    pub last_known_live: HashSet<NodeId>,
}

/// A replica process: immutable identity and peer set, plus the mutex
/// that guards everything mutable.
pub struct Replica {
    pub id: NodeId,
    pub peers: Vec<NodeId>,
    pub health_timeout: Duration,
    pub req_timeout: Duration,
    pub state: Mutex<ReplicaState>,
    pub http: Client,
}

impl Replica {
    /// Constructs a replica with the built-in seed state and the initial
    /// coordinator belief `max(peers)`.
    pub fn new(id: NodeId, peers: Vec<NodeId>) -> Self {
        assert!(peers.contains(&id), "peers must include self");
        let coordinator_id = *peers.iter().max().expect("peers must be non-empty");
        Replica {
            id,
            peers: peers.clone(),
            health_timeout: crate::utils::HEALTH_TIMEOUT,
            req_timeout: crate::utils::REQ_TIMEOUT,
            state: Mutex::new(ReplicaState {
                app: AppState::seeded(),
                coordinator_id,
                logical_clock: now_secs(),
                last_known_live: peers.into_iter().collect(),
            }),
            http: Client::new(),
        }
    }

    /// Every peer except `self`.
    pub fn others(&self) -> Vec<NodeId> {
        self.peers.iter().copied().filter(|p| *p != self.id).collect()
    }
}

/// Current wall time in fractional seconds since the Unix epoch.
pub fn now_secs() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
