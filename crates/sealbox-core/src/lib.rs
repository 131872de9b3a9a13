//! Framework-agnostic core for sealbox front ends.
//!
//! Everything here is synchronous and clock-explicit: expiration math takes
//! `now` from the caller, retry helpers compute delays without sleeping, and
//! the wire model is plain serde structs. Front ends (the bundled CLI, a
//! future TUI or web form) stay thin adapters over this crate.

pub mod expiry;
pub mod model;
pub mod retry;
