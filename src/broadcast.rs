//! Observer log fan-out
//!
//! Every relay lifecycle event is pushed to all currently connected
//! log-stream observers as `{timestamp, message}`. Publishing is
//! fire-and-forget: a publish with no observers, or one racing an observer
//! disconnect, is not an error. These entries are observability signals
//! only and never feed back into relay control flow.

use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::broadcast;

/// Buffered entries per observer before a lagging one starts dropping.
const LOG_CHANNEL_CAPACITY: usize = 256;

/// A single log entry pushed to observers.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    /// RFC 3339 timestamp of the event
    pub timestamp: String,
    /// Human-readable log line
    pub message: String,
}

impl LogEntry {
    fn now(message: impl Into<String>) -> Self {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default();
        Self {
            timestamp,
            message: message.into(),
        }
    }
}

/// Fan-out registry for log observers.
///
/// Backed by a broadcast channel: [`subscribe`](Self::subscribe) registers
/// an observer, dropping the receiver removes it, and
/// [`publish`](Self::publish) fans out to whoever is connected at that
/// moment.
#[derive(Debug, Clone)]
pub struct LogBroadcaster {
    tx: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(LOG_CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Register a new observer.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.tx.subscribe()
    }

    /// Number of currently connected observers.
    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Push a log line to all observers.
    pub fn publish(&self, message: impl Into<String>) {
        // send only errors when nobody is subscribed
        let _ = self.tx.send(LogEntry::now(message));
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
