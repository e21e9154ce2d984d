#![deny(unsafe_code)]

//! Configuration loading and validation for statusbot.
//!
//! Loads TOML configuration files and validates them. [`AppConfig`] is the
//! central configuration structure: where build identity comes from, what the
//! info reply says, and which links it carries.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Maximum number of link controls in one reply (a single control row).
pub const MAX_LINKS: usize = 5;

/// Upper bound on the combined narrative text of a reply, in characters.
pub const MAX_NARRATIVE_CHARS: usize = 4096;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Build identity sources.
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Static content of the info reply.
    #[serde(default)]
    pub info: InfoConfig,

    /// Navigation links, in display order.
    #[serde(default)]
    pub links: Vec<LinkConfig>,

    /// Icon key → icon (emoji or custom emoji markup).
    #[serde(default)]
    pub icons: HashMap<String, String>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the build identity is read from.
///
/// ## TOML Example
///
/// ```toml
/// [identity]
/// manifest_path = "Cargo.toml"
/// revision_env = "STATUSBOT_COMMIT_HASH"
/// revision_command = ["git", "rev-parse", "--short", "HEAD"]
/// timeout_ms = 2000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Manifest holding the release `version` (`.toml` or JSON).
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,

    /// Environment variable that overrides the revision when set.
    #[serde(default = "default_revision_env")]
    pub revision_env: String,

    /// Command line that prints the short revision of the checkout.
    #[serde(default = "default_revision_command")]
    pub revision_command: Vec<String>,

    /// Working directory for the revision command (default: process cwd).
    #[serde(default)]
    pub workdir: Option<String>,

    /// Wall-clock limit for the revision command in milliseconds.
    #[serde(default = "default_identity_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            manifest_path: default_manifest_path(),
            revision_env: default_revision_env(),
            revision_command: default_revision_command(),
            workdir: None,
            timeout_ms: default_identity_timeout_ms(),
        }
    }
}

fn default_manifest_path() -> String {
    "Cargo.toml".to_string()
}

fn default_revision_env() -> String {
    "STATUSBOT_COMMIT_HASH".to_string()
}

fn default_revision_command() -> Vec<String> {
    ["git", "rev-parse", "--short", "HEAD"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_identity_timeout_ms() -> u64 {
    2000
}

/// Static content of the info reply.
///
/// `notes` follow the introduction, each preceded by a blank spacer.
/// `footer` blocks come after the key/value facts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoConfig {
    /// Header shown above the reply.
    #[serde(default)]
    pub title: Option<String>,

    /// Introductory paragraph.
    #[serde(default = "default_intro")]
    pub intro: String,

    /// Additional paragraphs between the introduction and the facts.
    #[serde(default)]
    pub notes: Vec<String>,

    /// Paragraphs after the facts.
    #[serde(default)]
    pub footer: Vec<String>,

    /// Source repository; commits link to `<repository_url>/tree/<commit>`.
    #[serde(default)]
    pub repository_url: Option<String>,

    /// Hover title of the commit link.
    #[serde(default = "default_commit_link_title")]
    pub commit_link_title: String,

    /// Whether the reply is shown only to the requester.
    #[serde(default = "default_ephemeral")]
    pub ephemeral: bool,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            title: None,
            intro: default_intro(),
            notes: Vec::new(),
            footer: Vec::new(),
            repository_url: None,
            commit_link_title: default_commit_link_title(),
            ephemeral: default_ephemeral(),
        }
    }
}

fn default_intro() -> String {
    "A bot that knows which build it is running.".to_string()
}

fn default_commit_link_title() -> String {
    "View on GitHub".to_string()
}

fn default_ephemeral() -> bool {
    true
}

/// A navigation link as expressed in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Button label.
    pub label: String,
    /// Target URL.
    pub url: String,
    /// Key into the `[icons]` table.
    #[serde(default)]
    pub icon: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), links = config.links.len(), "Loaded config");
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let identity = &self.identity;
        if identity.manifest_path.is_empty() {
            return Err(ConfigError::Validation(
                "identity.manifest_path must not be empty".to_string(),
            ));
        }
        if identity.revision_env.is_empty() {
            return Err(ConfigError::Validation(
                "identity.revision_env must not be empty".to_string(),
            ));
        }
        match identity.revision_command.first() {
            Some(program) if !program.is_empty() => {}
            _ => {
                return Err(ConfigError::Validation(
                    "identity.revision_command must name a program".to_string(),
                ));
            }
        }
        if identity.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "identity.timeout_ms must be non-zero".to_string(),
            ));
        }

        if self.info.intro.trim().is_empty() {
            return Err(ConfigError::Validation(
                "info.intro must not be empty".to_string(),
            ));
        }
        if let Some(repo) = &self.info.repository_url {
            if !is_http_url(repo) {
                return Err(ConfigError::Validation(format!(
                    "info.repository_url must be an http(s) URL, got {repo:?}"
                )));
            }
        }
        let narrative: usize = std::iter::once(&self.info.intro)
            .chain(&self.info.notes)
            .chain(&self.info.footer)
            .map(|block| block.chars().count())
            .sum();
        if narrative > MAX_NARRATIVE_CHARS {
            return Err(ConfigError::Validation(format!(
                "info text is {narrative} characters, limit is {MAX_NARRATIVE_CHARS}"
            )));
        }

        if self.links.len() > MAX_LINKS {
            return Err(ConfigError::Validation(format!(
                "at most {MAX_LINKS} links are allowed, got {}",
                self.links.len()
            )));
        }
        for (i, link) in self.links.iter().enumerate() {
            if link.label.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "links[{i}].label must not be empty"
                )));
            }
            if !is_http_url(&link.url) {
                return Err(ConfigError::Validation(format!(
                    "links[{i}].url must be an http(s) URL, got {:?}",
                    link.url
                )));
            }
        }

        Ok(())
    }
}
