//! Push-channel listener for server-initiated notifications.
//!
//! The backend announces task activity over a WebSocket at
//! [`taskdeck_api::push::PUSH_PATH`]. The listener connects once, subscribes
//! to the notification stream, and forwards every decoded payload into the
//! same [`NetEvent`] channel the REST worker uses, so the TUI drains a
//! single event stream.
//!
//! The channel is one-way and best-effort. Malformed frames are logged and
//! skipped. There is no reconnect: when the socket drops, the listener emits
//! [`NetEvent::PushClosed`] and exits, and the client runs on without push
//! until restarted.

use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use url::Url;

use taskdeck_api::push;

use crate::net::NetEvent;

/// Write half of the push socket.
type WsSender = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Read half of the push socket.
type WsReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Errors from establishing the push subscription.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// The WebSocket connection did not complete in time.
    #[error("push connect timed out")]
    ConnectTimeout,

    /// The WebSocket connection failed outright.
    #[error("push connect failed: {0}")]
    Connect(#[source] tokio_tungstenite::tungstenite::Error),

    /// The subscribe frame could not be sent.
    #[error("push subscribe failed: {0}")]
    Subscribe(#[source] tokio_tungstenite::tungstenite::Error),

    /// The subscribe frame could not be encoded.
    #[error(transparent)]
    Frame(#[from] push::FrameError),
}

/// Handle to the background push listener.
///
/// Dropping the handle also stops the listener, but [`ListenerHandle::close`]
/// waits for the socket to shut down cleanly.
#[derive(Debug)]
pub struct ListenerHandle {
    shutdown: oneshot::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl ListenerHandle {
    /// Stops the listener: sends a close frame and waits for the loop to
    /// finish. Consuming `self` makes the teardown single-shot.
    pub async fn close(self) {
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "push listener task failed");
        }
    }
}

/// Connects to the push endpoint, subscribes to the notification stream,
/// and spawns a background task that forwards decoded notifications into
/// `events`.
///
/// # Errors
///
/// Returns [`ListenerError`] when the connection cannot be established or
/// the subscription frame cannot be sent. The caller is expected to carry on
/// without push in that case.
pub async fn spawn_listener(
    url: &Url,
    connect_timeout: Duration,
    events: mpsc::Sender<NetEvent>,
) -> Result<ListenerHandle, ListenerError> {
    let (stream, _response) = timeout(connect_timeout, connect_async(url.as_str()))
        .await
        .map_err(|_elapsed| ListenerError::ConnectTimeout)?
        .map_err(ListenerError::Connect)?;
    let (mut sender, reader) = stream.split();

    let frame = push::encode_client(&push::subscribe_notifications())?;
    sender
        .send(Message::Text(frame.into()))
        .await
        .map_err(ListenerError::Subscribe)?;
    tracing::info!(url = %url, "subscribed to push notifications");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let task = tokio::spawn(listen_loop(sender, reader, events, shutdown_rx));
    Ok(ListenerHandle {
        shutdown: shutdown_tx,
        task,
    })
}

/// Background task: forward inbound notification frames until the socket
/// closes or shutdown is requested.
async fn listen_loop(
    mut sender: WsSender,
    mut reader: WsReader,
    events: mpsc::Sender<NetEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                if let Err(e) = sender.send(Message::Close(None)).await {
                    tracing::debug!(error = %e, "push close frame not sent");
                }
                tracing::info!("push listener stopped");
                return;
            }
            frame = reader.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if !forward(text.as_str(), &events).await {
                        return;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("push channel closed by server");
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "push channel read error");
                    break;
                }
            }
        }
    }
    let _ = events.send(NetEvent::PushClosed).await;
}

/// Decodes one text frame and forwards it if it is a notification.
///
/// Returns `false` when the event receiver is gone and the loop should stop.
async fn forward(text: &str, events: &mpsc::Sender<NetEvent>) -> bool {
    let notification = match push::decode_server(text) {
        Ok(frame) => match frame.notification() {
            Ok(Some(n)) => n,
            Ok(None) => {
                tracing::debug!(event = %frame.event, "ignoring push event");
                return true;
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed notification");
                return true;
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "skipping malformed push frame");
            return true;
        }
    };
    tracing::debug!(message = %notification.message, "notification received");
    events.send(NetEvent::Notification(notification)).await.is_ok()
}
