//! RAX Chat Server - Entry Point
//!
//! Binds the listening socket on the port given on the command line and
//! serves the chat session until killed.

use std::env;
use std::process;

use log::{error, info};

use rax_chat_server::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: {} <port>", args[0]);
        process::exit(1);
    }

    let port: u16 = match args[1].parse() {
        Ok(port) => port,
        Err(_) => {
            eprintln!("invalid port: {}", args[1]);
            process::exit(1);
        }
    };

    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    info!("Launching chat server...");

    let server = match Server::bind(config, port).await {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to bind listening socket on port {}: {}", port, e);
            process::exit(1);
        }
    };

    server.run().await;
}
