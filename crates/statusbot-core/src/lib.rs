#![deny(unsafe_code)]

//! statusbot core: a self-describing status responder.
//!
//! Resolves the running build's identity once per process and composes a
//! bounded info reply (narrative text, key/value facts, navigation links)
//! from it, the configured content, and fresh runtime facts. Transport and
//! rendering belong to the host.

/// Compact duration formatting.
pub mod humanize;
/// Build identity resolution and the process-wide cache.
pub mod identity;
/// Per-request facade over identity, content and composition.
pub mod responder;
/// Reply document model and composition.
pub mod response;
/// Process uptime and per-request runtime facts.
pub mod runtime;

pub use identity::{BuildIdentity, IdentityResolver};
pub use responder::Responder;
pub use response::{InfoReply, ResponseDocument, Section};
pub use runtime::RuntimeSnapshot;
