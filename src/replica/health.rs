//! Peer health probe.

use super::Replica;
use crate::wire::NodeId;

impl Replica {
    /// Probes whether `peer` is alive. The `.await` resolves within
    /// `health_timeout` no matter what: errors, timeouts, and malformed
    /// replies all map to `false`.
    pub async fn is_alive(&self, peer: NodeId) -> bool {
        if peer == self.id {
            return true;
        }
        super::transport::is_alive(&self.http, peer, self.health_timeout).await
    }
}
