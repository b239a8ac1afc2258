//! Message channel carried over a WebSocket host relay.
//!
//! For apps that run outside a browser window (native shells, test rigs)
//! the host frame can be reached through a relay that forwards each JSON
//! text frame to the embedding page and back.
//!
//! # Event Loop
//!
//! The channel spawns a tokio task that handles:
//!
//! - Incoming text frames from the relay, dispatched to subscribed handlers
//! - Outgoing messages posted through [`MessageChannel::post`]
//! - Shutdown on request, on close from the relay, or on socket error

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::{Value, from_str, to_string};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, trace, warn};
use url::Url;

use crate::error::{Error, Result};

use super::channel::{MessageChannel, MessageHandler};

// ============================================================================
// Types
// ============================================================================

/// Handlers shared with the event loop.
type HandlerList = Arc<Mutex<Vec<MessageHandler>>>;

/// Internal commands for the event loop.
enum ChannelCommand {
    /// Send a serialized message.
    Post(String),
    /// Close the socket.
    Shutdown,
}

// ============================================================================
// WebSocketChannel
// ============================================================================

/// WebSocket connection to a host relay.
///
/// # Thread Safety
///
/// `WebSocketChannel` is `Send + Sync` and cheap to clone; clones share
/// the same socket and event loop.
#[derive(Clone)]
pub struct WebSocketChannel {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<ChannelCommand>,
    /// Subscribed handlers (shared with event loop).
    handlers: HandlerList,
    /// Set once the event loop has exited.
    closed: Arc<AtomicBool>,
}

impl WebSocketChannel {
    /// Connects to a relay at a `ws://` or `wss://` URL.
    ///
    /// # Errors
    ///
    /// - [`Error::Url`] if the URL does not parse
    /// - [`Error::Config`] if the scheme is not `ws` or `wss`
    /// - [`Error::WebSocket`] if the handshake fails
    pub async fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(Error::config(format!(
                "Host relay URL must use ws or wss, got {}",
                url.scheme()
            )));
        }

        let (ws_stream, _) = tokio_tungstenite::connect_async(url.as_str()).await?;
        debug!(%url, "Host relay connected");

        Ok(Self::from_stream(ws_stream))
    }

    /// Wraps an established WebSocket stream.
    ///
    /// Spawns the event loop task internally, so this must be called from
    /// within a tokio runtime.
    pub fn from_stream<S>(ws_stream: WebSocketStream<S>) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let handlers: HandlerList = Arc::new(Mutex::new(Vec::new()));
        let closed = Arc::new(AtomicBool::new(false));

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&handlers),
            Arc::clone(&closed),
        ));

        Self {
            command_tx,
            handlers,
            closed,
        }
    }

    /// Returns `true` once the relay connection has ended.
    #[inline]
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Closes the relay connection.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(ChannelCommand::Shutdown);
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop<S>(
        ws_stream: WebSocketStream<S>,
        mut command_rx: mpsc::UnboundedReceiver<ChannelCommand>,
        handlers: HandlerList,
        closed: Arc<AtomicBool>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (mut ws_write, mut ws_read) = ws_stream.split();

        loop {
            tokio::select! {
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::handle_incoming_message(&text, &handlers);
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("Host relay closed by remote");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "Host relay error");
                            break;
                        }

                        None => {
                            debug!("Host relay stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                command = command_rx.recv() => {
                    match command {
                        Some(ChannelCommand::Post(json)) => {
                            if let Err(e) = ws_write.send(Message::Text(json.into())).await {
                                warn!(error = %e, "Failed to post to host relay");
                                break;
                            }
                            trace!("Message posted to host relay");
                        }

                        Some(ChannelCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        closed.store(true, Ordering::Release);
        handlers.lock().clear();

        debug!("Host relay event loop terminated");
    }

    /// Parses a text frame and hands it to every handler.
    fn handle_incoming_message(text: &str, handlers: &HandlerList) {
        let message: Value = match from_str(text) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Failed to parse host relay message");
                return;
            }
        };

        let handlers: Vec<MessageHandler> = handlers.lock().clone();
        for handler in &handlers {
            handler(&message);
        }
    }
}

impl MessageChannel for WebSocketChannel {
    fn subscribe(&self, handler: MessageHandler) -> Result<()> {
        if self.is_closed() {
            return Err(Error::unavailable("host relay closed"));
        }
        self.handlers.lock().push(handler);
        Ok(())
    }

    fn post(&self, message: Value, target_origin: &str) -> Result<()> {
        if self.is_closed() {
            return Err(Error::unavailable("host relay closed"));
        }

        // The relay forwards to the embedding page's origin itself.
        trace!(target_origin, "Posting through host relay");

        let json = to_string(&message)?;
        self.command_tx
            .send(ChannelCommand::Post(json))
            .map_err(|_| Error::unavailable("host relay closed"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use serde_json::json;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tracing_subscriber::EnvFilter;

    use crate::bridge::FrameAuth;
    use crate::model::Capability;

    /// Binds a relay that answers every `getToken` with `TokenCreated`.
    async fn spawn_token_relay(token: &'static str) -> (String, oneshot::Receiver<Value>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let url = format!("ws://{}", listener.local_addr().expect("addr"));
        let (seen_tx, seen_rx) = oneshot::channel();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = tokio_tungstenite::accept_async(stream).await.expect("upgrade");

            if let Some(Ok(Message::Text(text))) = ws.next().await {
                let request: Value = from_str(&text).expect("json request");
                let _ = seen_tx.send(request);

                let reply = json!({ "event": "TokenCreated", "userToken": token });
                ws.send(Message::Text(reply.to_string().into()))
                    .await
                    .expect("send reply");
            }

            // Keep the socket open until the client goes away.
            while let Some(Ok(_)) = ws.next().await {}
        });

        (url, seen_rx)
    }

    #[tokio::test]
    async fn test_connect_rejects_http_scheme() {
        let err = WebSocketChannel::connect("http://127.0.0.1:1")
            .await
            .err()
            .expect("should fail");
        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn test_token_round_trip_over_relay() -> anyhow::Result<()> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let (url, seen_rx) = spawn_token_relay("relay-token").await;
        let channel = WebSocketChannel::connect(&url).await?;
        let auth = FrameAuth::new(Arc::new(channel.clone()));

        let token = tokio::time::timeout(
            Duration::from_secs(5),
            auth.get_token(&[Capability::Username]),
        )
        .await??;

        assert_eq!(token.as_str(), "relay-token");

        let request = seen_rx.await?;
        assert_eq!(request, json!({ "_event": "getToken", "grants": ["username"] }));

        channel.shutdown();
        Ok(())
    }

    #[tokio::test]
    async fn test_post_after_shutdown_is_unavailable() {
        let (url, _seen_rx) = spawn_token_relay("unused").await;
        let channel = WebSocketChannel::connect(&url).await.expect("connect");

        channel.shutdown();
        for _ in 0..50 {
            if channel.is_closed() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(channel.is_closed());
        let err = channel.post(json!({}), "*").unwrap_err();
        assert!(err.is_unavailable());
    }
}
