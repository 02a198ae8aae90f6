//! Coordinator election: highest-id-wins, bully-style, with best-effort
//! notification of the rest of the cluster.

use futures::future::join_all;

use super::Replica;
use crate::wire::NodeId;
use crate::{pf_info, pf_warn};

impl Replica {
    /// If I already believe I'm the coordinator, say so; otherwise probe
    /// the believed coordinator and only run a full election if it's
    /// unreachable.
    ///
    /// Returns the **post-election** belief when an election runs,
    /// since `elect_coordinator` already produces the fresh value and
    /// there is no reason to hand the caller a belief already known to
    /// be stale.
    pub async fn ensure_coordinator_alive(&self) -> NodeId {
        let current = self.state.lock().await.coordinator_id;
        if current == self.id {
            return self.id;
        }
        if self.is_alive(current).await {
            return current;
        }
        self.elect_coordinator().await
    }

    /// Probes every peer, sets the local belief to `max(aliveSet)`, and
    /// best-effort notifies the rest of the cluster if the belief
    /// changed. Always terminates: at most one probe per peer.
    pub async fn elect_coordinator(&self) -> NodeId {
        let others = self.others();
        let mut alive = vec![self.id];
        for peer in &others {
            if self.is_alive(*peer).await {
                alive.push(*peer);
            }
        }
        let new = *alive.iter().max().expect("self is always in alive set");

        let old = {
            let mut state = self.state.lock().await;
            let old = state.coordinator_id;
            state.coordinator_id = new;
            // Rebuild the push-round fan-out from the full peer set on
            // every election, so a transiently-down follower is
            // reconsidered once it starts answering probes again.
            state.last_known_live = self.peers.iter().copied().collect();
            old
        };

        if new != old {
            pf_info!("elected coordinator {} (was {})", new, old);
            let notifications = others.into_iter().map(|peer| async move {
                if let Err(e) = super::transport::update_coordinator(
                    &self.http,
                    peer,
                    new,
                    self.health_timeout,
                )
                .await
                {
                    pf_warn!("failed to notify peer {} of new coordinator: {}", peer, e);
                }
            });
            join_all(notifications).await;
        }

        new
    }

    /// Handler for an incoming `/update_coordinator` notification. Later
    /// beliefs simply overwrite earlier ones; no term/epoch comparison.
    pub async fn receive_coordinator_update(&self, new_coordinator: NodeId) {
        let mut state = self.state.lock().await;
        if state.coordinator_id != new_coordinator {
            pf_info!(
                "told of new coordinator {} (was {})",
                new_coordinator,
                state.coordinator_id
            );
        }
        state.coordinator_id = new_coordinator;
    }
}
