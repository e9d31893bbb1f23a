//! tcp-sock - Entry Point
//!
//! Echo server driven by the tcp-sock socket utilities.

use log::{error, info};
use std::process;

use tcp_sock::error::handlers::handle_error;
use tcp_sock::server::{Server, ServerConfig};
use tcp_sock::utils::logging::setup_logging;

#[tokio::main]
async fn main() {
    setup_logging();

    info!("Launching tcp-sock server...");

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let mut server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            handle_error(&e);
            process::exit(1);
        }
    };

    if let Err(e) = server.start().await {
        handle_error(&e);
        process::exit(1);
    }

    info!("Server stopped");
}
