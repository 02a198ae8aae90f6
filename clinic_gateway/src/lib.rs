//! The gateway's HTTP surface, split out of `main` so integration tests
//! can build the same `Router` against an in-process `Gateway`.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::{OriginalUri, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use clinic_repl::gateway::Gateway;
use serde_json::json;

pub type SharedGateway = Arc<Gateway>;

/// Builds the gateway's router: its own `/health` plus a catch-all
/// reverse proxy to whichever backend is currently live.
pub fn app(gateway: SharedGateway) -> Router {
    Router::new()
        .route("/health", get(gateway_health))
        .fallback(proxy)
        .with_state(gateway)
}

/// The gateway's own liveness, independent of backend health.
async fn gateway_health() -> Json<serde_json::Value> {
    Json(json!({ "status": "alive" }))
}

/// Forwards method, path, query, and body to whichever backend
/// `pick_live` selects, and returns its response body verbatim.
async fn proxy(
    State(gateway): State<SharedGateway>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let backend = match gateway.pick_live_or_err().await {
        Ok(b) => b,
        Err(_) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "detail": "No backends" })),
            )
                .into_response();
        }
    };

    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or(uri.path());
    let target = format!("http://127.0.0.1:{}{}", backend, path_and_query);

    let mut req = gateway.http.request(method, &target);
    for (name, value) in headers.iter() {
        // hop-by-hop headers are dropped; everything else (notably
        // content-type) rides through unchanged.
        if name != axum::http::header::HOST && name != axum::http::header::CONTENT_LENGTH {
            req = req.header(name, value);
        }
    }
    req = req.body(body.to_vec());

    match tokio::time::timeout(gateway.route_timeout, req.send()).await {
        Ok(Ok(resp)) => {
            let status =
                StatusCode::from_u16(resp.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
            let bytes = resp.bytes().await.unwrap_or_default();
            (status, Body::from(bytes)).into_response()
        }
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "backend request failed" })),
        )
            .into_response(),
    }
}
