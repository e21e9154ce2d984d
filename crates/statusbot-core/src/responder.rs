//! The info responder: cached identity plus configured content, composed
//! into a fresh reply per request.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use statusbot_config::AppConfig;

use crate::identity::{self, BuildIdentity, IdentityResolver};
use crate::response::{InfoContent, InfoReply, LinkDescriptor, compose};
use crate::runtime::RuntimeSnapshot;

/// Answers info requests.
///
/// Holds everything that is fixed for the process lifetime; only the
/// [`RuntimeSnapshot`] changes between replies.
#[derive(Debug, Clone)]
pub struct Responder {
    identity: BuildIdentity,
    content: InfoContent,
    links: Vec<LinkDescriptor>,
    icons: HashMap<String, String>,
}

impl Responder {
    /// Create a responder with an already resolved identity.
    pub fn new(config: &AppConfig, identity: BuildIdentity) -> Self {
        Self {
            identity,
            content: InfoContent::from(&config.info),
            links: config.links.iter().map(LinkDescriptor::from).collect(),
            icons: config.icons.clone(),
        }
    }

    /// Create a responder backed by the process-wide identity, resolving it
    /// from `config.identity` if this is the first call in the process.
    pub async fn from_config(config: &AppConfig) -> Self {
        let resolver = IdentityResolver::from_config(&config.identity);
        let identity = identity::cached(&resolver).await;
        if identity.is_unknown() {
            warn!("No build identity available, replies will omit version and commit");
        } else {
            info!(identity = %identity, "Build identity ready");
        }
        Self::new(config, identity.clone())
    }

    pub fn identity(&self) -> &BuildIdentity {
        &self.identity
    }

    /// Compose the reply for one request.
    pub fn respond(&self, runtime: RuntimeSnapshot) -> InfoReply {
        if !runtime.latency_measured() {
            debug!("Platform latency not measured yet");
        }
        info!(
            uptime_secs = runtime.uptime_seconds,
            latency_ms = runtime.latency_millis,
            "Composing info reply"
        );
        compose(
            &self.content,
            &self.identity,
            &self.links,
            &self.icons,
            runtime,
        )
    }
}
