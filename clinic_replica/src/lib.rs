//! The replica's HTTP surface, split out of `main` so integration tests
//! can build the same `Router` against an in-process `Replica` without
//! going through argv and a real bound socket.

pub mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use clinic_repl::Replica;

/// Builds the full router for one replica process: the four core
/// protocol endpoints plus the clinic domain surface.
pub fn app(replica: Arc<Replica>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/time", get(handlers::time))
        .route("/update_coordinator", post(handlers::update_coordinator))
        .route("/push_state", post(handlers::push_state))
        .route("/internal/forward", post(handlers::internal_forward))
        .route("/users/signup", post(handlers::signup))
        .route("/users/login", post(handlers::login))
        .route("/users", get(handlers::list_users))
        .route("/doctors", get(handlers::list_doctors))
        .route(
            "/appointments",
            post(handlers::book_appointment).get(handlers::list_appointments),
        )
        .route(
            "/appointments/:id/cancel",
            post(handlers::cancel_appointment),
        )
        .route("/consultations", post(handlers::record_consultation))
        .route("/medicines", get(handlers::list_medicines))
        .route("/medicines/restock", post(handlers::restock_medicine))
        .route("/medicines/sell", post(handlers::sell_medicine))
        .route("/ratings", post(handlers::rate_doctor))
        .route("/sales/report", get(handlers::sales_report))
        .with_state(replica)
}
