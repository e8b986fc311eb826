//! Persistent WebSocket client for the push event stream.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use assist_core::config::realtime::RealtimeConfig;
use assist_entity::Notification;

use crate::frame::{OutboundFrame, PushFrame};

/// Maintains one persistent connection to the notification endpoint.
///
/// On disconnect (or failure to connect) the client retries after a fixed
/// delay, forever: the always-eventually-reconnect policy of a single-user
/// local tool. Incoming frames parse as one notification each; a parse
/// failure drops the frame without closing the connection. Sending is fire
/// and forget and logs if attempted while disconnected.
#[derive(Debug)]
pub struct EventSource {
    config: RealtimeConfig,
    connected: AtomicBool,
    last_message: Mutex<Option<PushFrame>>,
    notifications_tx: broadcast::Sender<Notification>,
    outbound_tx: mpsc::UnboundedSender<OutboundFrame>,
    outbound_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<OutboundFrame>>,
}

impl EventSource {
    /// Create an event source for the configured endpoint.
    pub fn new(config: RealtimeConfig) -> Self {
        let (notifications_tx, _) = broadcast::channel(config.channel_buffer_size.max(1));
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();

        Self {
            config,
            connected: AtomicBool::new(false),
            last_message: Mutex::new(None),
            notifications_tx,
            outbound_tx,
            outbound_rx: tokio::sync::Mutex::new(outbound_rx),
        }
    }

    /// Subscribe to parsed notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications_tx.subscribe()
    }

    /// Whether the connection is currently up.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// The most recently received frame, if any.
    pub fn last_message(&self) -> Option<PushFrame> {
        self.last_message
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Queue an outbound frame. Logs and drops if disconnected.
    pub fn send(&self, frame: OutboundFrame) {
        if !self.is_connected() {
            warn!("Event stream is not connected; dropping outbound frame");
            return;
        }
        if self.outbound_tx.send(frame).is_err() {
            warn!("Outbound channel closed; dropping frame");
        }
    }

    /// Drive the connect/pump/reconnect loop until shutdown.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let delay = Duration::from_secs(self.config.reconnect_delay_seconds);

        loop {
            if *shutdown.borrow() {
                break;
            }

            match connect_async(self.config.endpoint.as_str()).await {
                Ok((stream, _response)) => {
                    info!("Event stream connected to {}", self.config.endpoint);
                    self.connected.store(true, Ordering::SeqCst);
                    self.pump(stream, &mut shutdown).await;
                    self.connected.store(false, Ordering::SeqCst);
                }
                Err(e) => {
                    warn!("Event stream connection failed: {e}");
                }
            }

            if *shutdown.borrow() {
                break;
            }

            // Fixed delay, no backoff growth, no retry cap.
            tokio::select! {
                _ = sleep(delay) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!("Event stream client stopped");
    }

    /// Pump one live connection until it drops or shutdown is signalled.
    async fn pump(
        &self,
        stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
        shutdown: &mut watch::Receiver<bool>,
    ) {
        let (mut write, mut read) = stream.split();
        let mut outbound = self.outbound_rx.lock().await;

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        let _ = write.send(Message::Close(None)).await;
                        break;
                    }
                }
                frame = outbound.recv() => {
                    let Some(frame) = frame else { break };
                    match serde_json::to_string(&frame) {
                        Ok(raw) => {
                            if let Err(e) = write.send(Message::text(raw)).await {
                                warn!("Failed to send outbound frame: {e}");
                                break;
                            }
                        }
                        Err(e) => warn!("Failed to serialize outbound frame: {e}"),
                    }
                }
                message = read.next() => {
                    match message {
                        Some(Ok(Message::Text(raw))) => self.handle_frame(raw.as_str()),
                        Some(Ok(Message::Close(_))) => {
                            warn!("Event stream closed by remote");
                            break;
                        }
                        // Pings are answered by the protocol layer.
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            warn!("Event stream read error: {e}");
                            break;
                        }
                        None => {
                            warn!("Event stream disconnected");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Parse one frame; malformed payloads are logged and dropped.
    fn handle_frame(&self, raw: &str) {
        match serde_json::from_str::<PushFrame>(raw) {
            Ok(frame) => {
                debug!("Received notification frame {}", frame.id);
                {
                    let mut last = self.last_message.lock().unwrap_or_else(|e| e.into_inner());
                    *last = Some(frame.clone());
                }
                // No receivers just means nobody is listening yet.
                let _ = self.notifications_tx.send(frame.into());
            }
            Err(e) => {
                warn!("Dropping malformed notification frame: {e}; raw={raw}");
            }
        }
    }
}
