//! Approximate clock synchronisation: one-shot Cristian's algorithm
//! against the believed coordinator. Purely observational, the logical
//! clock is never used for ordering or correctness.

use std::sync::Arc;

use super::{now_secs, Replica};
use crate::pf_debug;

impl Replica {
    /// Runs one round of clock sync. Meant to be spawned as a detached
    /// background task so it never blocks a request-handling path, see
    /// [`spawn_clock_sync`].
    pub async fn sync_clock_once(&self) {
        let coordinator_id = self.state.lock().await.coordinator_id;

        if coordinator_id == self.id {
            let t = now_secs();
            self.state.lock().await.logical_clock = t;
            return;
        }

        let t0 = now_secs();
        match super::transport::get_time(&self.http, coordinator_id, self.req_timeout).await {
            Ok(t_master) => {
                let t1 = now_secs();
                let estimate = t_master + (t1 - t0) / 2.0;
                self.state.lock().await.logical_clock = estimate;
                pf_debug!(
                    "clock sync against {} succeeded: rtt={:.3}s estimate={:.3}",
                    coordinator_id,
                    t1 - t0,
                    estimate
                );
            }
            Err(e) => {
                // Leave logical_clock unchanged; a skipped round is not
                // an error worth surfacing.
                pf_debug!("clock sync against {} failed: {}", coordinator_id, e);
            }
        }
    }
}

/// Spawns [`Replica::sync_clock_once`] as a detached `tokio` task so it
/// never blocks a request-handling path.
pub fn spawn_clock_sync(replica: Arc<Replica>) {
    tokio::spawn(async move {
        replica.sync_clock_once().await;
    });
}
