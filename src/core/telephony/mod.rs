//! Telephony-side protocol: the framed JSON vocabulary spoken by the
//! media-stream WebSocket.

pub mod messages;

pub use messages::{MediaPayload, OutboundMedia, StreamStart, TelephonyEvent, TelephonyOutbound};
