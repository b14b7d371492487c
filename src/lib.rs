//! Translation and text-to-speech API gateway.
//!
//! Requests are validated against the language catalog, source languages are
//! resolved (with a fallback to English when detection fails), and work is
//! delegated to the configured translation engine or speech backend. A small
//! file-backed registry records which offline models a client has marked as
//! downloaded.

pub mod batch;
pub mod config;
pub mod detection;
pub mod engine;
pub mod error;
pub mod i18n;
pub mod metrics;
pub mod model_registry;
pub mod server;
pub mod speech;
