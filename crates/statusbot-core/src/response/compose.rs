use serde::Serialize;

use statusbot_config::InfoConfig;

use super::{IconResolver, LinkControl, LinkDescriptor, ResponseDocument};
use crate::humanize::format_uptime;
use crate::identity::BuildIdentity;
use crate::runtime::RuntimeSnapshot;

/// Static text of the info reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoContent {
    pub title: Option<String>,
    pub intro: String,
    /// Paragraphs after the intro, each preceded by a spacer.
    pub notes: Vec<String>,
    /// Paragraphs after the facts.
    pub footer: Vec<String>,
    pub repository_url: Option<String>,
    pub commit_link_title: String,
    pub ephemeral: bool,
}

impl InfoContent {
    /// Content with only an introduction.
    pub fn new(intro: &str) -> Self {
        Self::from(&InfoConfig {
            intro: intro.to_string(),
            ..InfoConfig::default()
        })
    }

    /// The commit fact: a link to the source tree at `revision`, or the bare
    /// revision when no repository is configured.
    fn commit_link(&self, revision: &str) -> String {
        match &self.repository_url {
            Some(repo) => format!(
                "[{revision}]({}/tree/{revision} \"{}\")",
                repo.trim_end_matches('/'),
                self.commit_link_title
                    .replace('\\', "\\\\")
                    .replace('"', "\\\""),
            ),
            None => revision.to_string(),
        }
    }
}

impl From<&InfoConfig> for InfoContent {
    fn from(config: &InfoConfig) -> Self {
        Self {
            title: config.title.clone(),
            intro: config.intro.clone(),
            notes: config.notes.clone(),
            footer: config.footer.clone(),
            repository_url: config.repository_url.clone(),
            commit_link_title: config.commit_link_title.clone(),
            ephemeral: config.ephemeral,
        }
    }
}

/// Everything the host needs to send the info reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoReply {
    pub document: ResponseDocument,
    /// Link controls in configured order.
    pub links: Vec<LinkControl>,
    /// Shown only to the requester.
    pub ephemeral: bool,
}

/// Compose the info reply.
///
/// Layout, in order: intro, each note after a spacer, a spacer closing the
/// notes, `Version` and `Commit`
/// (each only when known), `Uptime`, `Ping`, then the footer paragraphs.
/// Links keep their configured order whether or not their icons resolve.
pub fn compose(
    content: &InfoContent,
    identity: &BuildIdentity,
    links: &[LinkDescriptor],
    icons: &dyn IconResolver,
    runtime: RuntimeSnapshot,
) -> InfoReply {
    let mut doc = ResponseDocument::builder();
    if let Some(title) = &content.title {
        doc = doc.title(title);
    }

    doc = doc.line(&content.intro);
    for note in &content.notes {
        doc = doc.spacer().line(note);
    }
    if !content.notes.is_empty() {
        doc = doc.spacer();
    }

    doc = doc
        .pair_if("Version", identity.version.as_deref())
        .pair_if(
            "Commit",
            identity.revision.as_deref().map(|rev| content.commit_link(rev)),
        )
        .pair("Uptime", format_uptime(runtime.uptime_seconds))
        .pair("Ping", format!("{}ms", runtime.latency_millis));
    for block in &content.footer {
        doc = doc.line(block);
    }

    InfoReply {
        document: doc.build(),
        links: links.iter().map(|link| link.to_control(icons)).collect(),
        ephemeral: content.ephemeral,
    }
}
