//! The clinic/pharmacy domain state.
//!
//! This module is deliberately thin. Its only job towards the
//! coordination core is to be an honest `AppState` that can be mutated,
//! snapshotted, and overwritten wholesale, see [`crate::replica::snapshot`].

mod ops;
mod seed;

pub use ops::{apply_write, WriteOp, WriteResult};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type UserId = u64;
pub type DoctorId = u64;
pub type AppointmentId = u64;
pub type ConsultationId = u64;
pub type RatingId = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Doctor {
    pub id: DoctorId,
    pub name: String,
    pub specialty: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: AppointmentId,
    pub user_id: UserId,
    pub doctor_id: DoctorId,
    /// Opaque slot identifier (e.g. "2026-07-27T09:00"); the core never
    /// interprets this, it is just a uniqueness key per doctor.
    pub slot: String,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Consultation {
    pub id: ConsultationId,
    pub appointment_id: AppointmentId,
    pub diagnosis: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Medicine {
    pub name: String,
    pub price_cents: u64,
    pub stock: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rating {
    pub id: RatingId,
    pub user_id: UserId,
    pub doctor_id: DoctorId,
    pub stars: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaleRecord {
    pub medicine: String,
    pub quantity: u64,
    pub total_cents: u64,
}

/// The entire replicated application state. Opaque to the coordination
/// core: it is only ever serialized whole, mutated under the replica
/// mutex, or overwritten whole by `push_state`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppState {
    pub users: HashMap<UserId, User>,
    pub next_user_id: UserId,

    pub doctors: HashMap<DoctorId, Doctor>,

    pub appointments: HashMap<AppointmentId, Appointment>,
    pub next_appointment_id: AppointmentId,

    pub consultations: HashMap<ConsultationId, Consultation>,
    pub next_consultation_id: ConsultationId,

    pub medicines: Vec<Medicine>,

    pub ratings: HashMap<RatingId, Rating>,
    pub next_rating_id: RatingId,

    pub sales: Vec<SaleRecord>,
}

/// A complete, structurally independent copy of [`AppState`], suitable
/// for replacing another replica's state atomically. `AppState` is
/// already a self-contained, `Clone`-able, serde value, so `Snapshot` is
/// a transparent alias rather than a separate type: there is no
/// partial-diff representation.
pub type Snapshot = AppState;

impl AppState {
    /// Builds the process's initial state from the built-in seed. Every
    /// replica re-loads the same seed doctor and medicine lists from
    /// process code at start-up rather than reading them from disk.
    pub fn seeded() -> Self {
        seed::seeded_state()
    }

    /// Structural validation performed before a follower accepts a
    /// pushed snapshot. Deliberately shallow: the only requirement is
    /// that every referenced id is internally consistent, since the wire
    /// format is just `AppState`'s own serde encoding with no separate
    /// schema to diverge from.
    pub fn validate_shape(&self) -> bool {
        self.appointments.values().all(|a| {
            self.users.contains_key(&a.user_id) && self.doctors.contains_key(&a.doctor_id)
        }) && self
            .consultations
            .values()
            .all(|c| self.appointments.contains_key(&c.appointment_id))
            && self
                .ratings
                .values()
                .all(|r| self.users.contains_key(&r.user_id) && self.doctors.contains_key(&r.doctor_id))
    }
}
