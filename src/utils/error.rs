//! Error types for the coordination core and the clinic domain layer.
//!
//! Kept as two separate enums on purpose: a [`DomainError`] never
//! triggers a snapshot push or an election, while a [`CoreError`] never
//! crosses the gateway, which only ever passes a backend's reply body
//! through verbatim.

use thiserror::Error;

/// Routing and protocol errors raised by the coordination core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Raised after one re-election hop still does not make `self` the
    /// coordinator.
    #[error("coordinator unreachable after re-election")]
    CoordinatorUnreachable,

    /// Raised by the gateway when `pickLive` exhausts every backend.
    #[error("no live backends")]
    NoBackends,

    /// A `/push_state` body failed structural validation.
    #[error("malformed snapshot payload")]
    MalformedSnapshot,

    /// An `/update_coordinator` body failed structural validation.
    #[error("malformed coordinator-update payload")]
    MalformedCoordinatorUpdate,

    /// Outbound HTTP call failed (refused, reset, or malformed reply).
    #[error("transport error: {0}")]
    Transport(String),

    /// Outbound HTTP call exceeded its bound.
    #[error("request timed out")]
    Timeout,
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        CoreError::Transport(e.to_string())
    }
}

/// Domain-level failures: never replication concerns. Each carries
/// enough detail to pick an HTTP status at the call site without
/// needing a second enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("username already taken")]
    UsernameTaken,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("doctor not found")]
    DoctorNotFound,
    #[error("appointment not found")]
    AppointmentNotFound,
    #[error("that slot is already booked")]
    SlotTaken,
    #[error("medicine not found")]
    MedicineNotFound,
    #[error("insufficient stock")]
    InsufficientStock,
    #[error("rating must be between 1 and 5")]
    InvalidRating,
}

impl DomainError {
    /// Reconstructs a `DomainError` from the detail string carried over
    /// the wire (see `wire::WriteReply::DomainError`). The forwarding
    /// follower and the gateway never need this -- they pass the reply
    /// through verbatim -- but the *coordinator's own caller*, when it
    /// is itself a follower that just forwarded, needs a typed
    /// `DomainError` back so its HTTP handler can still pick the right
    /// status code. Returns `None` on an unrecognized detail string
    /// rather than guessing a variant: the caller should treat that as
    /// a routing-level failure, not fabricate a domain rejection.
    pub fn from_detail(detail: &str) -> Option<Self> {
        Some(match detail {
            "username already taken" => DomainError::UsernameTaken,
            "user not found" => DomainError::UserNotFound,
            "invalid credentials" => DomainError::InvalidCredentials,
            "doctor not found" => DomainError::DoctorNotFound,
            "appointment not found" => DomainError::AppointmentNotFound,
            "that slot is already booked" => DomainError::SlotTaken,
            "medicine not found" => DomainError::MedicineNotFound,
            "insufficient stock" => DomainError::InsufficientStock,
            "rating must be between 1 and 5" => DomainError::InvalidRating,
            _ => return None,
        })
    }

    /// HTTP status code this domain error should be surfaced as.
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            DomainError::UsernameTaken | DomainError::SlotTaken => StatusCode::CONFLICT,
            DomainError::UserNotFound
            | DomainError::DoctorNotFound
            | DomainError::AppointmentNotFound
            | DomainError::MedicineNotFound => StatusCode::NOT_FOUND,
            DomainError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            DomainError::InsufficientStock | DomainError::InvalidRating => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}
