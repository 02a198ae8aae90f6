//! Round-robin health-aware routing against real loopback servers.

use axum::routing::get;
use axum::Router;
use clinic_repl::gateway::Gateway;

async fn spawn_health_stub(port: u16) {
    let app = Router::new().route(
        "/health",
        get(|| async { axum::Json(serde_json::json!({ "status": "alive" })) }),
    );
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .expect("bind health stub");
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    // give the listener a moment to start accepting
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
}

#[tokio::test]
async fn round_robin_visits_every_healthy_backend_in_order() {
    let ports = [28001u16, 28002, 28003];
    for p in ports {
        spawn_health_stub(p).await;
    }

    let gw = Gateway::new(ports.to_vec());
    let mut seen = Vec::new();
    for _ in 0..6 {
        seen.push(gw.pick_live().await.expect("a backend should be live"));
    }
    assert_eq!(
        seen,
        vec![28001, 28002, 28003, 28001, 28002, 28003],
        "six sequential picks over three healthy backends should cycle in order"
    );
}

#[tokio::test]
async fn dead_backend_is_skipped_but_still_consumes_its_turn() {
    // 28012 is never started; 28011 and 28013 answer health checks.
    spawn_health_stub(28011).await;
    spawn_health_stub(28013).await;

    let gw = Gateway::new(vec![28011, 28012, 28013]);
    let mut results = Vec::new();
    for _ in 0..10 {
        results.push(gw.pick_live().await);
    }

    assert!(
        results.iter().all(|r| r != &Some(28012)),
        "the dead backend must never be the chosen target"
    );
    assert!(
        results.iter().all(|r| r.is_some()),
        "every pick should still resolve to a live backend"
    );
}

#[tokio::test]
async fn no_live_backend_surfaces_routing_error() {
    // Nothing listens on these ports.
    let gw = Gateway::new(vec![28021, 28022]);
    let err = gw.pick_live_or_err().await.unwrap_err();
    assert_eq!(err.to_string(), "no live backends");
}
