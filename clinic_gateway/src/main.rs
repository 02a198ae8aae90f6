//! Round-robin health-aware routing gateway executable.
//!
//! A purely stateless reverse proxy: it owns no domain state, no
//! coordinator knowledge, and no health history. Every external request
//! re-probes the backend set from scratch via [`clinic_repl::gateway::Gateway::pick_live`].

use std::sync::Arc;

use clap::Parser;
use clinic_repl::gateway::Gateway;
use clinic_repl::utils::logger_init;

#[derive(Parser, Debug)]
#[command(about = "Round-robin health-aware routing gateway")]
struct Args {
    /// Listening port for the gateway itself.
    #[arg(long, default_value_t = 9000)]
    port: u16,

    /// Node IDs (== ports) of the backend replicas, in round-robin
    /// order.
    #[arg(required = true)]
    backends: Vec<u16>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    logger_init(0);

    let gateway = Arc::new(Gateway::new(args.backends.clone()));
    let app = clinic_gateway::app(gateway);

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", addr, e));

    log::info!(
        "clinic gateway listening on {} (backends: {:?})",
        addr,
        args.backends
    );

    ctrlc::set_handler(move || {
        log::info!("gateway shutting down");
        std::process::exit(0);
    })
    .expect("failed to install Ctrl-C handler");

    axum::serve(listener, app).await.expect("server error");
}
