//! Sealbox CLI: seal a secret on a sealbox server and hand out the share link.

pub mod client;
pub mod config;
pub mod ops;
