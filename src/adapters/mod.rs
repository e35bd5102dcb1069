//! Adapter implementations for port traits.
//!
//! - `live/` — Gemini API implementation
//! - `recording/` — Record interactions to cassettes
//! - `replaying/` — Replay interactions from cassettes

pub mod live;
pub mod recording;
pub mod replaying;
