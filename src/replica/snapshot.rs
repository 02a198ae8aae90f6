//! Full-state replication: the coordinator's best-effort push round and
//! the follower-side receipt of a pushed snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;

use super::{transport, Replica};
use crate::domain::Snapshot;
use crate::utils::CoreError;
use crate::wire::NodeId;
use crate::{pf_debug, pf_warn};

impl Replica {
    /// Follower-side receipt of a `/push_state` body. Validates
    /// structural shape before replacing `AppState`; an invalid shape
    /// leaves local state untouched and is reported as a protocol error.
    pub async fn receive_push_state(&self, snapshot: Snapshot) -> Result<(), CoreError> {
        if !snapshot.validate_shape() {
            return Err(CoreError::MalformedSnapshot);
        }
        let mut state = self.state.lock().await;
        state.app = snapshot;
        Ok(())
    }

    /// One push round servicing one committed write. Probes each
    /// currently-believed-live peer, pushes the snapshot to the ones
    /// that answer, and narrows `last_known_live` to the peers that
    /// passed both the liveness probe and the snapshot delivery this
    /// round. The narrowing only applies to this round's fan-out; the
    /// next election rebuilds `last_known_live` from the full peer set.
    pub async fn push_round(self: Arc<Self>, snapshot: Snapshot) {
        let targets: Vec<NodeId> = {
            let state = self.state.lock().await;
            state
                .last_known_live
                .iter()
                .copied()
                .filter(|p| *p != self.id)
                .collect()
        };

        let pushes = targets.into_iter().map(|peer| {
            let snapshot = snapshot.clone();
            let this = Arc::clone(&self);
            async move {
                if !this.is_alive(peer).await {
                    pf_debug!("push round: peer {} not alive, skipping", peer);
                    return None;
                }
                match transport::push_state(&this.http, peer, &snapshot, this.req_timeout).await {
                    Ok(()) => Some(peer),
                    Err(e) => {
                        // Replication errors are logged and tolerated:
                        // the write is already durable on the
                        // coordinator.
                        pf_warn!("push to peer {} failed: {}", peer, e);
                        None
                    }
                }
            }
        });

        let acked: HashSet<NodeId> = join_all(pushes).await.into_iter().flatten().collect();
        let mut live = acked;
        live.insert(self.id);
        self.state.lock().await.last_known_live = live;
    }
}

/// Spawns [`Replica::push_round`] as a detached worker so the write
/// handler never blocks on follower convergence: the push happens after
/// the client has already been answered.
pub fn spawn_push_round(replica: Arc<Replica>, snapshot: Snapshot) {
    tokio::spawn(async move {
        replica.push_round(snapshot).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{apply_write, AppState, WriteOp};

    #[tokio::test]
    async fn receiving_a_valid_snapshot_replaces_state_exactly() {
        let replica = Replica::new(1, vec![1]);
        let mut snapshot = AppState::seeded();
        apply_write(
            &mut snapshot,
            WriteOp::Signup {
                username: "x".into(),
                password: "y".into(),
            },
        )
        .unwrap();

        replica.receive_push_state(snapshot.clone()).await.unwrap();
        assert_eq!(replica.state.lock().await.app, snapshot);
    }

    #[tokio::test]
    async fn malformed_snapshot_is_rejected_and_state_is_untouched() {
        let replica = Replica::new(1, vec![1]);
        let before = replica.state.lock().await.app.clone();

        let mut bad = AppState::seeded();
        bad.appointments.insert(
            99,
            crate::domain::Appointment {
                id: 99,
                user_id: 404, // no such user: dangling reference
                doctor_id: 1,
                slot: "x".into(),
                cancelled: false,
            },
        );

        let err = replica.receive_push_state(bad).await.unwrap_err();
        assert_eq!(err.to_string(), "malformed snapshot payload");
        assert_eq!(replica.state.lock().await.app, before);
    }
}
