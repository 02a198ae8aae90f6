//! Gateway behavior when every backend is unreachable.

use std::sync::Arc;
use std::time::Duration;

use clinic_repl::gateway::Gateway;
use serde_json::Value;

#[tokio::test]
async fn no_backends_returns_500_with_detail() {
    let gateway = Arc::new(Gateway::new(vec![29001, 29002]));
    let app = clinic_gateway::app(gateway);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:29100")
        .await
        .unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let resp = reqwest::get("http://127.0.0.1:29100/doctors")
        .await
        .expect("request to gateway");
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "No backends");
}

#[tokio::test]
async fn gateway_own_health_is_independent_of_backends() {
    let gateway = Arc::new(Gateway::new(vec![29003]));
    let app = clinic_gateway::app(gateway);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:29101")
        .await
        .unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let resp = reqwest::get("http://127.0.0.1:29101/health")
        .await
        .expect("gateway health check");
    assert_eq!(resp.status(), 200);
}
