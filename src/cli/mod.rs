use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Remote Assistant Args ---
    /// Webhook URL of the remote assistant (e.g., https://n8n.example.com/webhook/chat)
    #[arg(long, env = "WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// Static bearer token attached to every outbound call
    #[arg(long, env = "BEARER_TOKEN", hide_env_values = true)]
    pub bearer_token: Option<String>,

    // --- General App Args ---
    /// Host address and port for the WebSocket server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Path to the plain-text greeting title sent to new sessions.
    #[arg(long, env = "TITLE_PATH", default_value = "00.xinchao.txt")]
    pub title_path: String,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
