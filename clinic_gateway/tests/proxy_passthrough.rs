//! The gateway forwards a real request to a live backend and returns its
//! body verbatim.

use std::sync::Arc;
use std::time::Duration;

use clinic_repl::gateway::Gateway;
use clinic_repl::Replica;
use serde_json::Value;

#[tokio::test]
async fn get_doctors_through_gateway_matches_backend_directly() {
    let backend_port = 29201u16;
    let replica = Arc::new(Replica::new(backend_port, vec![backend_port]));
    let backend_app = clinic_replica::app(replica);
    let backend_listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", backend_port))
        .await
        .unwrap();
    tokio::spawn(async move {
        axum::serve(backend_listener, backend_app).await.unwrap();
    });

    let gateway = Arc::new(Gateway::new(vec![backend_port]));
    let gateway_app = clinic_gateway::app(gateway);
    let gateway_listener = tokio::net::TcpListener::bind("127.0.0.1:29200")
        .await
        .unwrap();
    tokio::spawn(async move {
        axum::serve(gateway_listener, gateway_app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(30)).await;

    let direct: Value = reqwest::get(format!("http://127.0.0.1:{}/doctors", backend_port))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let via_gateway: Value = reqwest::get("http://127.0.0.1:29200/doctors")
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(direct, via_gateway);
    assert_eq!(via_gateway["doctors"].as_array().unwrap().len(), 3);
}
