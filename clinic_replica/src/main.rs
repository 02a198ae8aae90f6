//! Clinic replica server executable.
//!
//! Start-up contract: argv provides `(self_id, peer_ids...)`. No
//! environment variables, no config file. Binds to `127.0.0.1:<self_id>`.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use clinic_repl::replica::clock::spawn_clock_sync;
use clinic_repl::utils::logger_init;
use clinic_repl::wire::NodeId;
use clinic_repl::Replica;

/// One replica in the clinic/pharmacy cluster.
#[derive(Parser, Debug)]
#[command(about = "Clinic replica server")]
struct Args {
    /// This replica's node ID (also its listening port).
    self_id: NodeId,

    /// The node IDs of every other replica in the cluster.
    #[arg(required = true)]
    peer_ids: Vec<NodeId>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger_init(args.self_id);

    let mut peers = args.peer_ids.clone();
    peers.push(args.self_id);
    peers.sort_unstable();
    peers.dedup();

    let replica = Arc::new(Replica::new(args.self_id, peers));

    let ticker = Arc::clone(&replica);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(5));
        loop {
            interval.tick().await;
            spawn_clock_sync(Arc::clone(&ticker));
        }
    });

    let app = clinic_replica::app(replica);

    let addr = format!("127.0.0.1:{}", args.self_id);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", addr, e));

    log::info!("clinic replica {} listening on {}", args.self_id, addr);

    let shutdown_id = args.self_id;
    ctrlc::set_handler(move || {
        log::info!("replica {} shutting down", shutdown_id);
        std::process::exit(0);
    })
    .expect("failed to install Ctrl-C handler");

    axum::serve(listener, app)
        .await
        .expect("server error");
}
