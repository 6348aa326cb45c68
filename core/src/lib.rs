//! Shared types for the punch relay: untyped record access, the typed punch
//! view, flex card synthesis and the response envelope.

pub mod card;
pub mod envelope;
pub mod punch;
pub mod record;
pub mod request;
pub mod time;
