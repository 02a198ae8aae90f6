//! Coordination core for a small replicated clinic/pharmacy service:
//! coordinator election, the write funnel, full-state replication, the
//! round-robin routing gateway, and approximate clock sync. The clinic
//! business logic itself is an external collaborator -- an opaque,
//! serializable `AppState` the core snapshots and overwrites (see
//! `domain`).

#[macro_use]
pub mod utils;

pub mod domain;
pub mod gateway;
pub mod replica;
pub mod wire;

pub use replica::{Replica, ReplicaState};
pub use utils::{CoreError, DomainError};
