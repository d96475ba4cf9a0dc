pub mod websocket;

use crate::llm::AssistantClient;
use std::error::Error;
use std::sync::Arc;

/// Shared by every connection; sessions themselves are never shared.
pub struct ServerContext {
    pub client: Arc<dyn AssistantClient>,
    pub title: String,
}

pub struct Server {
    addr: String,
    ctx: Arc<ServerContext>,
}

impl Server {
    pub fn new(addr: String, client: Arc<dyn AssistantClient>, title: String) -> Self {
        Self {
            addr,
            ctx: Arc::new(ServerContext { client, title }),
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        websocket::start_ws_server(&self.addr, Arc::clone(&self.ctx)).await
    }
}
