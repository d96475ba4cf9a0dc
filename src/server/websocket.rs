use crate::agent::{ ConversationObserver, TurnController, TurnState };
use crate::history::{ format_transcript, Session };
use crate::models::chat::{ ConversationId, Turn };
use crate::models::websocket::{ ClientMessage, ServerMessage };
use super::ServerContext;

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{ TcpListener, TcpStream };
use tokio::io::{ AsyncRead, AsyncWrite };
use tokio::sync::mpsc;

use tokio_tungstenite::{ accept_async, WebSocketStream };
use tokio_tungstenite::tungstenite::protocol::Message;

use log::{ debug, info, warn, error };
use futures::{ SinkExt, StreamExt };

const MAX_MESSAGE_SIZE: usize = 1 * 1024 * 1024;

/// Renders every log change as a `conversation` frame on the connection's outbox.
struct ConnectionRenderer {
    outbox: mpsc::UnboundedSender<Message>,
}

impl ConversationObserver for ConnectionRenderer {
    fn conversation_changed(&self, conversation_id: &ConversationId, state: TurnState, turns: &[Turn]) {
        queue(&self.outbox, &ServerMessage::Conversation {
            conversation_id: conversation_id.clone(),
            state,
            turns: turns.to_vec(),
        });
    }
}

fn queue(outbox: &mpsc::UnboundedSender<Message>, msg: &ServerMessage) {
    match serde_json::to_string(msg) {
        Ok(json) => {
            // closed outbox means the peer is gone
            let _ = outbox.send(Message::Text(json));
        }
        Err(e) => error!("Failed to serialize server message: {}", e),
    }
}

pub async fn start_ws_server(
    addr: &str,
    ctx: Arc<ServerContext>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;
    info!("WS server listening on: {}", addr);
    serve(listener, ctx).await
}

/// Accepts connections forever; each one gets its own session.
pub async fn serve(
    listener: TcpListener,
    ctx: Arc<ServerContext>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    loop {
        let (stream, peer) = listener.accept().await?;
        info!("Incoming connection from: {}", peer);
        let ctx_clone = Arc::clone(&ctx);

        tokio::spawn(async move {
            if let Err(e) = process_connection(peer, stream, ctx_clone).await {
                error!("Failed to process connection for {}: {}", peer, e);
            }
        });
    }
}

async fn process_connection(
    peer: SocketAddr,
    stream: TcpStream,
    ctx: Arc<ServerContext>
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let websocket = accept_async(stream).await?;
    handle_connection(peer, websocket, ctx).await;
    Ok(())
}

pub async fn handle_connection<S>(peer: SocketAddr, websocket: WebSocketStream<S>, ctx: Arc<ServerContext>)
    where S: AsyncRead + AsyncWrite + Unpin + Send + 'static
{
    info!("New WebSocket connection: {}", peer);

    let (mut tx, mut rx) = websocket.split();
    let (outbox, mut outbox_rx) = mpsc::unbounded_channel::<Message>();

    let writer = tokio::spawn(async move {
        while let Some(message) = outbox_rx.recv().await {
            let closing = matches!(message, Message::Close(_));
            match tx.send(message).await {
                Ok(()) => {}
                Err(
                    | tokio_tungstenite::tungstenite::Error::ConnectionClosed
                    | tokio_tungstenite::tungstenite::Error::AlreadyClosed,
                ) => {
                    debug!("Connection to {} already closed", peer);
                    break;
                }
                Err(e) => {
                    error!("Error sending message to {}: {}", peer, e);
                    break;
                }
            }
            if closing {
                break;
            }
        }
    });

    let controller = Arc::new(TurnController::new(Session::new(), Arc::clone(&ctx.client)));
    let conversation_id = controller.session().id().clone();
    info!("Assigned conversation ID {} to {}", conversation_id, peer);
    controller.subscribe(Arc::new(ConnectionRenderer { outbox: outbox.clone() }));

    queue(&outbox, &ServerMessage::Welcome {
        conversation_id: conversation_id.clone(),
        title: ctx.title.clone(),
    });

    while let Some(msg) = rx.next().await {
        match msg {
            Ok(message) => {
                if message.len() > MAX_MESSAGE_SIZE {
                    warn!(
                        "Message from {} exceeds size limit ({} > {})",
                        peer,
                        message.len(),
                        MAX_MESSAGE_SIZE
                    );
                    queue(&outbox, &ServerMessage::Error {
                        message: "Message too large".to_string(),
                    });
                    let _ = outbox.send(Message::Close(None));
                    break;
                }

                match message {
                    Message::Text(text) => {
                        match serde_json::from_str::<ClientMessage>(&text) {
                            Ok(ClientMessage::Chat { content }) => {
                                match controller.begin(&content) {
                                    Ok(pending) => {
                                        tokio::spawn(pending.complete());
                                    }
                                    Err(e) => {
                                        queue(&outbox, &ServerMessage::Error {
                                            message: e.to_string(),
                                        });
                                    }
                                }
                            }
                            Ok(ClientMessage::History) => controller.refresh(),
                            Err(e) => {
                                error!("Failed to parse message from {}: {}", peer, e);
                                queue(&outbox, &ServerMessage::Error {
                                    message: format!("Failed to parse message: {}", e),
                                });
                            }
                        }
                    }
                    Message::Close(_) => {
                        info!("Received close frame from {}", peer);
                        // flushes the close reply tungstenite has queued
                        let _ = outbox.send(Message::Close(None));
                        break;
                    }
                    Message::Ping(ping_data) => {
                        let _ = outbox.send(Message::Pong(ping_data));
                    }
                    Message::Pong(_) => {}
                    Message::Binary(_) => {
                        warn!("Ignoring binary message from {}", peer);
                    }
                    Message::Frame(_) => {}
                }
            }
            Err(e) => {
                match e {
                    | tokio_tungstenite::tungstenite::Error::ConnectionClosed
                    | tokio_tungstenite::tungstenite::Error::Protocol(_)
                    | tokio_tungstenite::tungstenite::Error::Utf8 => {
                        info!("WebSocket connection closed or protocol error for {}: {}", peer, e);
                    }
                    tokio_tungstenite::tungstenite::Error::Io(ref io_err) if
                        io_err.kind() == std::io::ErrorKind::ConnectionReset
                    => {
                        info!("WebSocket connection reset by peer {}", peer);
                    }
                    _ => {
                        error!("Error receiving message from {}: {}", peer, e);
                    }
                }
                break;
            }
        }
    }

    debug!(
        "Transcript for {}:\n{}",
        conversation_id,
        format_transcript(&controller.session().log().all())
    );
    info!("WebSocket connection closed for {} (Conv ID: {})", peer, conversation_id);

    // An in-flight turn still holds the controller and its renderer; the writer
    // stops once that turn finishes and the last sender is gone.
    drop(controller);
    drop(outbox);
    if let Err(e) = writer.await {
        error!("Writer task for {} failed: {}", peer, e);
    }
}
