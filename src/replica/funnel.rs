//! The write funnel: the single public entry point for every mutating
//! operation. Forwards to the coordinator when `self` is a follower;
//! commits locally and schedules a background snapshot push when `self`
//! is the coordinator.

use std::sync::Arc;

use crate::domain::{apply_write, WriteOp, WriteResult};
use crate::utils::{CoreError, DomainError};
use crate::{pf_debug, pf_warn};

use super::{snapshot, transport, Replica};

/// Outcome of [`Replica::apply_write`]: either the domain-level result
/// of a write that reached *some* coordinator (possibly not `self`), or
/// a domain error (never replicated), or a routing error.
pub enum FunnelOutcome {
    Applied(Result<WriteResult, DomainError>),
    RoutingError(CoreError),
}

impl Replica {
    /// The entry point for every mutating operation.
    ///
    /// 1. make sure the believed coordinator is actually alive
    /// 2. if not `self`, forward once; on network failure, re-elect and
    ///    fail if still not `self` (one hop only, to bound worst-case
    ///    latency)
    /// 3. if `self`, commit under the mutex, snapshot, and schedule an
    ///    asynchronous push
    pub async fn apply_write(self: Arc<Self>, op: WriteOp) -> FunnelOutcome {
        let current = self.ensure_coordinator_alive().await;

        if current != self.id {
            match transport::forward_write(&self.http, current, op.clone(), self.req_timeout)
                .await
            {
                Ok(reply) => return reply.into_outcome(),
                Err(e) => {
                    pf_warn!(
                        "forward to believed coordinator {} failed ({}), re-electing",
                        current,
                        e
                    );
                    let new_coordinator = self.elect_coordinator().await;
                    if new_coordinator != self.id {
                        // We have no proof the new coordinator is
                        // reachable from here; surface a retriable
                        // error rather than recursively re-forwarding.
                        return FunnelOutcome::RoutingError(CoreError::CoordinatorUnreachable);
                    }
                    // Fall through: election made us the coordinator.
                }
            }
        }

        FunnelOutcome::Applied(self.commit_local(op).await)
    }

    /// Commits a write locally: I am the coordinator. Validation,
    /// mutation, and the snapshot copy all happen under one critical
    /// section so followers never observe a torn state; the push itself
    /// is scheduled *after* the lock is released, no handler holds the
    /// mutex across an outbound call.
    async fn commit_local(self: Arc<Self>, op: WriteOp) -> Result<WriteResult, DomainError> {
        let (result, snapshot_to_push) = {
            let mut state = self.state.lock().await;
            match apply_write(&mut state.app, op) {
                Ok(result) => {
                    let snap = state.app.clone();
                    (Ok(result), Some(snap))
                }
                // Domain failures never mutate state and never trigger
                // a snapshot push.
                Err(e) => (Err(e), None),
            }
        };

        if let Some(snap) = snapshot_to_push {
            pf_debug!("committed write locally, scheduling push round");
            snapshot::spawn_push_round(self, snap);
        }

        result
    }
}

impl crate::wire::WriteReply {
    /// Converts a wire-level reply back into the `FunnelOutcome` shape
    /// the funnel and the HTTP handlers operate on. A `DomainError`
    /// variant is reconstructed from its string detail since the wire
    /// format intentionally discards the original variant identity; an
    /// unrecognized detail string falls back to a routing error instead
    /// of guessing a domain variant. A `RoutingError` variant is never
    /// run through `DomainError::from_detail` at all, so a nested
    /// routing failure (e.g. the coordinator itself could not
    /// re-elect) can never be mistaken for a domain rejection.
    pub fn into_outcome(self) -> FunnelOutcome {
        match self {
            crate::wire::WriteReply::Success { result } => FunnelOutcome::Applied(Ok(result)),
            crate::wire::WriteReply::DomainError { detail } => {
                match DomainError::from_detail(&detail) {
                    Some(e) => FunnelOutcome::Applied(Err(e)),
                    None => FunnelOutcome::RoutingError(CoreError::Transport(detail)),
                }
            }
            crate::wire::WriteReply::RoutingError { detail } => {
                FunnelOutcome::RoutingError(CoreError::Transport(detail))
            }
        }
    }
}
