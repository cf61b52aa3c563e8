pub mod agent;
pub mod models;
pub mod server;
pub mod llm;
pub mod cli;
pub mod error;
pub mod history;

use agent::TurnHandler;
use cli::Args;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Model: {}", args.groq_model);
    info!("Chat Base URL: {}", args.groq_base_url);
    info!("Completion Timeout: {}s", args.completion_timeout_secs);
    info!("Completion Retries: {}", args.completion_max_retries);
    info!("Message Store Configured: {}", args.store_uri().is_some());
    info!("TLS Enabled: {}", args.tls_paths().is_some());
    info!("-------------------------");

    let handler = Arc::new(TurnHandler::from_args(&args).await?);
    if !handler.logging_enabled() {
        info!("Replies will be served without conversation logging");
    }

    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, handler, args);
    server.run().await?;

    Ok(())
}
