//! Cristian's algorithm against a real loopback "coordinator" stub.

use axum::routing::get;
use axum::Router;
use clinic_repl::replica::clock::spawn_clock_sync;
use clinic_repl::wire::TimeReply;
use clinic_repl::Replica;
use std::sync::Arc;
use std::time::Duration;

async fn spawn_time_stub(port: u16) {
    let app = Router::new().route(
        "/time",
        get(|| async {
            let now = std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_secs_f64();
            axum::Json(TimeReply { time: now })
        }),
    );
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .expect("bind time stub");
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn synced_clock_tracks_coordinator_within_generous_epsilon() {
    let coordinator_port = 28101u16;
    spawn_time_stub(coordinator_port).await;

    // replica 1 believes 28101 is the coordinator; its own process never
    // binds a server since only the outbound /time call is exercised.
    let replica = Arc::new(Replica::new(1, vec![1, coordinator_port]));
    {
        let mut state = replica.state.lock().await;
        state.coordinator_id = coordinator_port;
    }

    spawn_clock_sync(Arc::clone(&replica));
    tokio::time::sleep(Duration::from_millis(100)).await;

    let observed = replica.state.lock().await.logical_clock;
    let actual_now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs_f64();

    // loopback RTT is a few milliseconds at most; 100ms epsilon is
    // generous enough to absorb scheduler jitter without being vacuous.
    assert!(
        (observed - actual_now).abs() <= 0.1,
        "observed={} actual={}",
        observed,
        actual_now
    );
}

#[tokio::test]
async fn coordinator_syncs_to_its_own_wall_clock() {
    let replica = Arc::new(Replica::new(5, vec![5]));
    replica.sync_clock_once().await;
    let observed = replica.state.lock().await.logical_clock;
    let actual_now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs_f64();
    assert!((observed - actual_now).abs() <= 0.05);
}
