//! Per-call relay session.
//!
//! One session ties a telephony WebSocket to one upstream realtime
//! connection: two pump loops run concurrently, exchange events through the
//! stateless translator, and tear down together through a shared
//! cancellation token whichever side goes first. Teardown is idempotent —
//! cancelling an already-cancelled session and sending on a closed channel
//! are both no-ops.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::broadcast::LogBroadcaster;
use crate::core::relay::translate::{self, UpstreamDisposition};
use crate::core::relay::tools;
use crate::core::telephony::messages::{TelephonyEvent, TelephonyOutbound};
use crate::core::upstream;
use crate::core::upstream::client::{UpstreamConnection, UpstreamIncoming};
use crate::state::AppState;

/// Outbound frames queued per session ahead of the socket writer.
const OUTBOUND_CAPACITY: usize = 1024;

/// Run one relay session over an accepted telephony socket.
///
/// Returns once both sides are torn down. Exactly one upstream connection
/// is opened per telephony connection; if it cannot be opened the telephony
/// side is closed and the call ends (no retry).
pub async fn run(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    info!(%session_id, "telephony client connected");
    state.logs.publish("Client connected to media-stream");

    let snapshot = state.settings.snapshot();
    let upstream = match upstream::connect(&state.config, snapshot, state.logs.clone()).await {
        Ok(connection) => connection,
        Err(e) => {
            error!(%session_id, "failed to open upstream connection: {e}");
            state.logs.publish(format!("OpenAI WebSocket error: {e}"));
            let mut socket = socket;
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };
    info!(%session_id, "connected to realtime service");
    state.logs.publish("Connected to OpenAI Realtime API");

    let cancel = CancellationToken::new();
    let stream_sid: Arc<RwLock<Option<String>>> = Arc::new(RwLock::new(None));
    let upstream_out = upstream.sender();

    let (mut sink, mut stream) = socket.split();

    // Writer task: the only owner of the telephony sink.
    let (frame_tx, mut frame_rx) = mpsc::channel::<TelephonyOutbound>(OUTBOUND_CAPACITY);
    let writer_cancel = cancel.clone();
    let writer = tokio::spawn(async move {
        while let Some(frame) = frame_rx.recv().await {
            let json = match serde_json::to_string(&frame) {
                Ok(json) => json,
                Err(e) => {
                    error!("failed to serialize telephony frame: {e}");
                    continue;
                }
            };
            if let Err(e) = sink.send(Message::Text(json.into())).await {
                debug!("telephony send failed, closing session: {e}");
                writer_cancel.cancel();
                break;
            }
        }
        let _ = sink.send(Message::Close(None)).await;
    });

    // Upstream pump: realtime events -> telephony frames / tool follow-ups.
    let upstream_task = tokio::spawn(pump_upstream(
        upstream,
        cancel.clone(),
        stream_sid.clone(),
        frame_tx.clone(),
        state.logs.clone(),
    ));

    // Telephony pump: caller frames -> upstream client events.
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<TelephonyEvent>(&text) {
                            Ok(TelephonyEvent::Start { start }) => {
                                info!(%session_id, stream_sid = %start.stream_sid, "incoming stream started");
                                state
                                    .logs
                                    .publish(format!("Incoming stream started: {}", start.stream_sid));
                                *stream_sid.write() = Some(start.stream_sid);
                            }
                            Ok(TelephonyEvent::Media { media }) => {
                                if upstream_out.send(translate::append_audio(media)).await.is_err() {
                                    debug!(%session_id, "upstream closed, dropping caller audio");
                                }
                            }
                            Ok(TelephonyEvent::Other) => {
                                debug!(%session_id, "received non-media event");
                                state.logs.publish(format!("Received non-media event: {text}"));
                            }
                            Err(e) => {
                                // per-message fault isolation: log and keep reading
                                warn!(%session_id, "error parsing telephony message: {e}");
                                state
                                    .logs
                                    .publish(format!("Error parsing telephony message: {e}"));
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!(%session_id, "telephony client disconnected");
                        state.logs.publish("Client disconnected from media-stream");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(%session_id, "telephony socket error: {e}");
                        break;
                    }
                }
            }
        }
    }

    // Idempotent teardown: first trigger wins, later ones are no-ops.
    cancel.cancel();
    drop(frame_tx);
    let _ = upstream_task.await;
    let _ = writer.await;
    info!(%session_id, "relay session terminated");
}

/// Consume upstream events until the connection or the session ends.
///
/// Dropping the connection on exit aborts its I/O task, closing the
/// upstream socket at most once.
async fn pump_upstream(
    mut upstream: UpstreamConnection,
    cancel: CancellationToken,
    stream_sid: Arc<RwLock<Option<String>>>,
    frames: mpsc::Sender<TelephonyOutbound>,
    logs: LogBroadcaster,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            incoming = upstream.incoming.recv() => {
                let Some(incoming) = incoming else {
                    cancel.cancel();
                    break;
                };
                match incoming {
                    UpstreamIncoming::Event(event, raw) => {
                        let sid = stream_sid.read().clone();
                        match translate::translate_upstream(event, sid.as_deref()) {
                            UpstreamDisposition::Forward(frame) => {
                                if frames.send(frame).await.is_err() {
                                    cancel.cancel();
                                    break;
                                }
                            }
                            UpstreamDisposition::ToolCall { name, arguments } => {
                                handle_tool_call(name, &arguments, &upstream, &logs).await;
                            }
                            UpstreamDisposition::Observe(event_type) => {
                                debug!("received event: {event_type}");
                                logs.publish(format!("Received event: {event_type}, Data: {raw}"));
                            }
                            UpstreamDisposition::Ignore => {}
                        }
                    }
                    UpstreamIncoming::Error(reason) => {
                        error!("realtime connection error: {reason}");
                        logs.publish(format!("OpenAI WebSocket error: {reason}"));
                        cancel.cancel();
                        break;
                    }
                    UpstreamIncoming::Closed => {
                        info!("realtime connection closed");
                        logs.publish("Disconnected from OpenAI Realtime API");
                        cancel.cancel();
                        break;
                    }
                }
            }
        }
    }
}

/// Interpret a completed tool call and inject the follow-up events.
///
/// Malformed arguments abort only this tool call; both connections stay up.
async fn handle_tool_call(
    name: Option<String>,
    arguments: &str,
    upstream: &UpstreamConnection,
    logs: &LogBroadcaster,
) {
    if let Some(name) = name.as_deref() {
        if name != tools::TOOL_NAME {
            info!(tool = name, "ignoring unrecognized tool call");
            logs.publish(format!("Ignoring unrecognized tool call: {name}"));
            return;
        }
    }
    info!("function call completed");
    logs.publish("FUNCTION CALLED successfully");

    match tools::follow_up_events(arguments) {
        Ok(events) => {
            for event in events {
                upstream.send(event).await;
            }
            logs.publish("Breathing exercise suggestion triggered");
        }
        Err(e) => {
            warn!("malformed tool-call arguments: {e}");
            logs.publish(format!("Error processing tool-call arguments: {e}"));
        }
    }
}
