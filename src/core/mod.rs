//! Core relay logic: the telephony frame vocabulary, the upstream realtime
//! session client, and the per-call relay session tying them together.

pub mod relay;
pub mod telephony;
pub mod upstream;
