//! Upstream realtime session client.
//!
//! Owns the outbound WebSocket to the realtime service for one call. The
//! client builds the authenticated handshake, pumps events in both
//! directions through channels, and sends the one-shot session
//! configuration after a settling delay so the remote session has
//! initialized before the first configuration message arrives.
//!
//! There is no reconnect policy: a failed or dropped upstream connection
//! ends the call.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;

use crate::broadcast::LogBroadcaster;
use crate::config::{ServerConfig, VoiceConfig};
use crate::core::relay::tools;

use super::config::{
    OPENAI_BETA_HEADER, OPENAI_BETA_VALUE, RESPONSE_TEMPERATURE, SETTLE_DELAY,
    TELEPHONY_AUDIO_FORMAT,
};
use super::error::UpstreamError;
use super::messages::{ClientEvent, ServerEvent, SessionConfig, TurnDetection};

/// Channel capacity for upstream traffic.
const CHANNEL_CAPACITY: usize = 1024;

/// Incoming side of an upstream connection.
#[derive(Debug)]
pub enum UpstreamIncoming {
    /// A parsed server event plus its raw JSON for observability.
    Event(ServerEvent, String),
    /// Transport error; the connection is gone.
    Error(String),
    /// The service closed the connection.
    Closed,
}

/// Handle to one upstream connection.
///
/// Dropping the handle ends the I/O task and closes the socket. Sends
/// after close are silently dropped, never a fault.
#[derive(Debug)]
pub struct UpstreamConnection {
    outgoing: mpsc::Sender<ClientEvent>,
    /// Server events, in arrival order.
    pub incoming: mpsc::Receiver<UpstreamIncoming>,
    io_task: tokio::task::JoinHandle<()>,
}

impl UpstreamConnection {
    /// Queue an event for the realtime service.
    pub async fn send(&self, event: ClientEvent) {
        if self.outgoing.send(event).await.is_err() {
            tracing::debug!("upstream connection closed, dropping outbound event");
        }
    }

    /// Sender half for tasks that outlive a borrow of the handle.
    pub fn sender(&self) -> mpsc::Sender<ClientEvent> {
        self.outgoing.clone()
    }
}

impl Drop for UpstreamConnection {
    fn drop(&mut self) {
        self.io_task.abort();
    }
}

/// Open the upstream connection and schedule the session configuration.
///
/// The configuration message is built from the voice settings snapshot
/// taken at call start and sent exactly once per connection, after
/// [`SETTLE_DELAY`]. The timer is a one-shot and not cancellable; if the
/// session has closed by the time it fires, the queued configuration is
/// dropped with the channel.
pub async fn connect(
    config: &ServerConfig,
    snapshot: VoiceConfig,
    logs: LogBroadcaster,
) -> Result<UpstreamConnection, UpstreamError> {
    let request = build_request(config)?;
    let (ws_stream, _) = tokio_tungstenite::connect_async(request)
        .await
        .map_err(|e| UpstreamError::ConnectionFailed(e.to_string()))?;

    let (mut sink, mut stream) = ws_stream.split();
    let (out_tx, mut out_rx) = mpsc::channel::<ClientEvent>(CHANNEL_CAPACITY);
    let (in_tx, in_rx) = mpsc::channel::<UpstreamIncoming>(CHANNEL_CAPACITY);

    let io_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                outgoing = out_rx.recv() => {
                    let Some(event) = outgoing else { break };
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("failed to serialize client event: {e}");
                            continue;
                        }
                    };
                    if let Err(e) = sink.send(Message::Text(json.into())).await {
                        tracing::error!("failed to send to realtime service: {e}");
                        let _ = in_tx.send(UpstreamIncoming::Error(e.to_string())).await;
                        break;
                    }
                }
                incoming = stream.next() => {
                    match incoming {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<ServerEvent>(&text) {
                                Ok(event) => {
                                    if in_tx
                                        .send(UpstreamIncoming::Event(event, text.to_string()))
                                        .await
                                        .is_err()
                                    {
                                        break;
                                    }
                                }
                                Err(e) => {
                                    // malformed message: recoverable, keep reading
                                    tracing::warn!("failed to parse server event: {e}");
                                }
                            }
                        }
                        Some(Ok(Message::Ping(data))) => {
                            if let Err(e) = sink.send(Message::Pong(data)).await {
                                tracing::error!("failed to send pong: {e}");
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            let _ = in_tx.send(UpstreamIncoming::Closed).await;
                            break;
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => {
                            let _ = in_tx.send(UpstreamIncoming::Error(e.to_string())).await;
                            break;
                        }
                    }
                }
            }
        }
    });

    // One-shot settling timer carrying the single session.update.
    let settle_tx = out_tx.clone();
    let update = ClientEvent::SessionUpdate {
        session: session_config(&snapshot),
    };
    tokio::spawn(async move {
        tokio::time::sleep(SETTLE_DELAY).await;
        if let Ok(json) = serde_json::to_string(&update) {
            logs.publish(format!("Sending session update: {json}"));
        }
        if settle_tx.send(update).await.is_err() {
            tracing::debug!("session closed before settling delay elapsed");
        }
    });

    Ok(UpstreamConnection {
        outgoing: out_tx,
        incoming: in_rx,
        io_task,
    })
}

/// Build the authenticated WebSocket handshake request.
fn build_request(config: &ServerConfig) -> Result<Request, UpstreamError> {
    let url = format!("{}?model={}", config.realtime_url, config.realtime_model);
    let mut request = url
        .into_client_request()
        .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?;
    let authorization = format!("Bearer {}", config.openai_api_key)
        .parse()
        .map_err(|e: http::header::InvalidHeaderValue| {
            UpstreamError::InvalidRequest(e.to_string())
        })?;
    request
        .headers_mut()
        .insert(http::header::AUTHORIZATION, authorization);
    request.headers_mut().insert(
        OPENAI_BETA_HEADER,
        http::HeaderValue::from_static(OPENAI_BETA_VALUE),
    );
    Ok(request)
}

/// Build the one-shot session configuration from a settings snapshot.
pub fn session_config(snapshot: &VoiceConfig) -> SessionConfig {
    SessionConfig {
        turn_detection: TurnDetection::ServerVad {
            threshold: snapshot.threshold,
            silence_duration_ms: snapshot.silence_timeout,
        },
        input_audio_format: TELEPHONY_AUDIO_FORMAT.to_string(),
        output_audio_format: TELEPHONY_AUDIO_FORMAT.to_string(),
        voice: snapshot.voice.clone(),
        instructions: snapshot.system_message.clone(),
        tools: vec![tools::tool_schema()],
        modalities: vec!["text".to_string(), "audio".to_string()],
        temperature: RESPONSE_TEMPERATURE,
    }
}

// =============================================================================
// Tests
// =============================================================================
