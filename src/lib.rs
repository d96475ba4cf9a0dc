pub mod agent;
pub mod models;
pub mod server;
pub mod config;
pub mod content;
pub mod llm;
pub mod cli;
pub mod history;

use cli::Args;
use config::AssistantConfig;
use config::title::load_title;
use log::info;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = AssistantConfig::from_args(&args)?;
    let title = load_title(&args.title_path);

    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Webhook URL: {}", config.webhook_url);
    info!("Title Path: {}", args.title_path);
    info!("-------------------------");

    let client = llm::new_client(&config);
    info!("Starting server on: {}", args.server_addr);
    let server = Server::new(args.server_addr.clone(), client, title);
    server.run().await?;

    Ok(())
}
