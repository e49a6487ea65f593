//! Expiry monitoring for TLS certificates and domain registrations.
//!
//! A batch of `host[:port]` targets is probed concurrently, either over TLS (leaf
//! certificate `notAfter`) or over RDAP (registration `expiration` event). Results are
//! sorted by urgency and the ones close to expiry, or failing, are sent to Telegram.

pub mod alerts;
pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod probe;
pub mod result;
pub mod schedule;
pub mod service;
pub mod targets;
