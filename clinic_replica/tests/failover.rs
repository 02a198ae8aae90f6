//! Coordinator failover: peers `{1, 2, 3}`, replica 3 never starts
//! (standing in for "killed" -- unreachable from the first probe).

use std::sync::Arc;
use std::time::Duration;

use clinic_repl::Replica;
use serde_json::{json, Value};

async fn spawn_replica(id: u16, peers: Vec<u16>) -> Arc<Replica> {
    let replica = Arc::new(Replica::new(id, peers));
    let app = clinic_replica::app(Arc::clone(&replica));
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", id))
        .await
        .unwrap_or_else(|e| panic!("bind replica {}: {}", id, e));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    replica
}

#[tokio::test]
async fn signup_elects_new_coordinator_when_believed_one_is_dead() {
    let peers = vec![18101u16, 18102, 18103];
    let r1 = spawn_replica(18101, peers.clone()).await;
    let r2 = spawn_replica(18102, peers.clone()).await;
    // 18103 is deliberately never started.

    assert_eq!(r1.state.lock().await.coordinator_id, 18103);
    assert_eq!(r2.state.lock().await.coordinator_id, 18103);

    let client = reqwest::Client::new();
    let resp = client
        .post("http://127.0.0.1:18101/users/signup")
        .json(&json!({ "username": "a", "password": "p" }))
        .send()
        .await
        .expect("signup request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "SUCCESS");
    assert_eq!(body["user_id"], 1);

    // both replicas that probed during the election should now agree
    // the coordinator is 18102, the highest alive peer.
    assert_eq!(r1.state.lock().await.coordinator_id, 18102);
    assert_eq!(r2.state.lock().await.coordinator_id, 18102);

    tokio::time::sleep(Duration::from_millis(200)).await;
    let users: Value = client
        .get("http://127.0.0.1:18101/users")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(users["users"].as_array().unwrap().len(), 1);
}
