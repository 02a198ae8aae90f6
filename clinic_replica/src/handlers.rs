//! HTTP handlers for one replica process: the four core protocol
//! endpoints and the clinic domain surface riding on top of the write
//! funnel.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use clinic_repl::domain::{WriteOp, WriteResult};
use clinic_repl::replica::funnel::FunnelOutcome;
use clinic_repl::wire::{
    ErrorDetail, ForwardRequest, HealthReply, StatusReply, TimeReply, UpdateCoordinatorRequest,
    WriteReply,
};
use clinic_repl::{CoreError, DomainError, Replica};

pub type SharedReplica = Arc<Replica>;

// ---- core protocol endpoints ----

pub async fn health() -> Json<HealthReply> {
    Json(HealthReply::alive())
}

pub async fn time(State(replica): State<SharedReplica>) -> Json<TimeReply> {
    let t = replica.state.lock().await.logical_clock;
    Json(TimeReply { time: t })
}

pub async fn update_coordinator(
    State(replica): State<SharedReplica>,
    Json(req): Json<UpdateCoordinatorRequest>,
) -> impl IntoResponse {
    replica.receive_coordinator_update(req.port).await;
    (StatusCode::OK, Json(StatusReply::ok()))
}

pub async fn push_state(
    State(replica): State<SharedReplica>,
    Json(snapshot): Json<clinic_repl::domain::AppState>,
) -> impl IntoResponse {
    match replica.receive_push_state(snapshot).await {
        Ok(()) => (StatusCode::OK, Json(StatusReply::synced())).into_response(),
        Err(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorDetail {
                detail: "malformed snapshot".to_string(),
            }),
        )
            .into_response(),
    }
}

/// Replica-to-replica write replay. Reuses the exact same funnel entry a
/// client-facing handler would use: whichever replica receives this
/// believes itself close enough to being the coordinator to be worth a
/// try, and `apply_write` re-validates that.
pub async fn internal_forward(
    State(replica): State<SharedReplica>,
    Json(req): Json<ForwardRequest>,
) -> Json<WriteReply> {
    let outcome = replica.apply_write(req.op).await;
    Json(match outcome {
        FunnelOutcome::Applied(r) => WriteReply::from_result(r),
        FunnelOutcome::RoutingError(e) => WriteReply::from_routing_error(&e),
    })
}

// ---- domain surface ----

fn funnel_response(outcome: FunnelOutcome) -> axum::response::Response {
    match outcome {
        FunnelOutcome::Applied(Ok(result)) => {
            (StatusCode::OK, Json(success_json(&result))).into_response()
        }
        FunnelOutcome::Applied(Err(e)) => (e.status_code(), Json(error_json(&e))).into_response(),
        FunnelOutcome::RoutingError(e) => routing_error_response(e),
    }
}

fn routing_error_response(e: CoreError) -> axum::response::Response {
    let status = match e {
        CoreError::CoordinatorUnreachable | CoreError::NoBackends | CoreError::Timeout => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorDetail {
            detail: e.to_string(),
        }),
    )
        .into_response()
}

fn success_json(result: &WriteResult) -> Value {
    let mut v = match result {
        WriteResult::Signup { user_id } => json!({ "user_id": user_id }),
        WriteResult::Login { user_id } => json!({ "user_id": user_id }),
        WriteResult::BookAppointment { appointment_id } => {
            json!({ "appointment_id": appointment_id })
        }
        WriteResult::CancelAppointment => json!({}),
        WriteResult::RecordConsultation { consultation_id } => {
            json!({ "consultation_id": consultation_id })
        }
        WriteResult::RestockMedicine { new_stock } => json!({ "new_stock": new_stock }),
        WriteResult::SellMedicine { total_cents } => json!({ "total_cents": total_cents }),
        WriteResult::RateDoctor { rating_id } => json!({ "rating_id": rating_id }),
    };
    v.as_object_mut()
        .expect("all success payloads are JSON objects")
        .insert("status".to_string(), json!("SUCCESS"));
    v
}

fn error_json(e: &DomainError) -> Value {
    json!({ "status": "ERROR", "detail": e.to_string() })
}

#[derive(Debug, Deserialize)]
pub struct SignupBody {
    pub username: String,
    pub password: String,
}

pub async fn signup(
    State(replica): State<SharedReplica>,
    Json(body): Json<SignupBody>,
) -> axum::response::Response {
    let outcome = replica
        .apply_write(WriteOp::Signup {
            username: body.username,
            password: body.password,
        })
        .await;
    funnel_response(outcome)
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(replica): State<SharedReplica>,
    Json(body): Json<LoginBody>,
) -> axum::response::Response {
    let outcome = replica
        .apply_write(WriteOp::Login {
            username: body.username,
            password: body.password,
        })
        .await;
    funnel_response(outcome)
}

pub async fn list_users(State(replica): State<SharedReplica>) -> Json<Value> {
    let state = replica.state.lock().await;
    let users: Vec<Value> = state
        .app
        .users
        .values()
        .map(|u| json!({ "id": u.id, "username": u.username }))
        .collect();
    Json(json!({ "users": users }))
}

pub async fn list_doctors(State(replica): State<SharedReplica>) -> Json<Value> {
    let state = replica.state.lock().await;
    let doctors: Vec<_> = state.app.doctors.values().cloned().collect();
    Json(json!({ "doctors": doctors }))
}

#[derive(Debug, Deserialize)]
pub struct BookAppointmentBody {
    pub user_id: u64,
    pub doctor_id: u64,
    pub slot: String,
}

pub async fn book_appointment(
    State(replica): State<SharedReplica>,
    Json(body): Json<BookAppointmentBody>,
) -> axum::response::Response {
    let outcome = replica
        .apply_write(WriteOp::BookAppointment {
            user_id: body.user_id,
            doctor_id: body.doctor_id,
            slot: body.slot,
        })
        .await;
    funnel_response(outcome)
}

pub async fn cancel_appointment(
    State(replica): State<SharedReplica>,
    Path(appointment_id): Path<u64>,
) -> axum::response::Response {
    let outcome = replica
        .apply_write(WriteOp::CancelAppointment { appointment_id })
        .await;
    funnel_response(outcome)
}

pub async fn list_appointments(State(replica): State<SharedReplica>) -> Json<Value> {
    let state = replica.state.lock().await;
    let appts: Vec<_> = state.app.appointments.values().cloned().collect();
    Json(json!({ "appointments": appts }))
}

#[derive(Debug, Deserialize)]
pub struct ConsultationBody {
    pub appointment_id: u64,
    pub diagnosis: String,
}

pub async fn record_consultation(
    State(replica): State<SharedReplica>,
    Json(body): Json<ConsultationBody>,
) -> axum::response::Response {
    let outcome = replica
        .apply_write(WriteOp::RecordConsultation {
            appointment_id: body.appointment_id,
            diagnosis: body.diagnosis,
        })
        .await;
    funnel_response(outcome)
}

pub async fn list_medicines(State(replica): State<SharedReplica>) -> Json<Value> {
    let state = replica.state.lock().await;
    Json(json!({ "medicines": state.app.medicines }))
}

#[derive(Debug, Deserialize)]
pub struct StockBody {
    pub medicine: String,
    pub quantity: u64,
}

pub async fn restock_medicine(
    State(replica): State<SharedReplica>,
    Json(body): Json<StockBody>,
) -> axum::response::Response {
    let outcome = replica
        .apply_write(WriteOp::RestockMedicine {
            medicine: body.medicine,
            quantity: body.quantity,
        })
        .await;
    funnel_response(outcome)
}

pub async fn sell_medicine(
    State(replica): State<SharedReplica>,
    Json(body): Json<StockBody>,
) -> axum::response::Response {
    let outcome = replica
        .apply_write(WriteOp::SellMedicine {
            medicine: body.medicine,
            quantity: body.quantity,
        })
        .await;
    funnel_response(outcome)
}

#[derive(Debug, Deserialize)]
pub struct RatingBody {
    pub user_id: u64,
    pub doctor_id: u64,
    pub stars: u8,
}

pub async fn rate_doctor(
    State(replica): State<SharedReplica>,
    Json(body): Json<RatingBody>,
) -> axum::response::Response {
    let outcome = replica
        .apply_write(WriteOp::RateDoctor {
            user_id: body.user_id,
            doctor_id: body.doctor_id,
            stars: body.stars,
        })
        .await;
    funnel_response(outcome)
}

/// Read-only aggregation over the append-only sales log: totals per
/// medicine. Not incremental, not indexed; it walks the full log on
/// every call.
pub async fn sales_report(State(replica): State<SharedReplica>) -> Json<Value> {
    let state = replica.state.lock().await;
    let mut totals: std::collections::BTreeMap<String, (u64, u64)> = Default::default();
    for sale in &state.app.sales {
        let entry = totals.entry(sale.medicine.clone()).or_insert((0, 0));
        entry.0 += sale.quantity;
        entry.1 += sale.total_cents;
    }
    let report: Vec<Value> = totals
        .into_iter()
        .map(|(medicine, (quantity, total_cents))| {
            json!({ "medicine": medicine, "quantity": quantity, "total_cents": total_cents })
        })
        .collect();
    Json(json!({ "report": report }))
}
