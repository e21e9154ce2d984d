//! Build identity resolution.
//!
//! Works out which release (`version` from a manifest) and which source
//! revision (environment override, else `git rev-parse --short HEAD`) the
//! running process was built from. Every source is optional: a missing
//! manifest or a failing VCS query resolves to `None` and is only logged.
//!
//! The first resolution is cached for the lifetime of the process, see
//! [`cached`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use statusbot_config::IdentityConfig;

/// Release version and source revision of the running build.
///
/// Fields are `None` when their source was unavailable, never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildIdentity {
    pub version: Option<String>,
    pub revision: Option<String>,
}

impl BuildIdentity {
    /// Whether neither field could be resolved.
    pub fn is_unknown(&self) -> bool {
        self.version.is_none() && self.revision.is_none()
    }
}

impl fmt::Display for BuildIdentity {
    /// Example: `1.2.3 (abc1234)`, `unknown (abc1234)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = self.version.as_deref().unwrap_or("unknown");
        match &self.revision {
            Some(rev) => write!(f, "{version} ({rev})"),
            None => f.write_str(version),
        }
    }
}

/// Resolves a [`BuildIdentity`] from a manifest, an environment override and
/// a version-control query.
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    manifest_path: PathBuf,
    revision_override: Option<String>,
    revision_command: Vec<String>,
    workdir: Option<PathBuf>,
    timeout: Duration,
}

impl IdentityResolver {
    /// Resolver reading `manifest_path`, with no override and the default
    /// `git rev-parse --short HEAD` query.
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        let defaults = IdentityConfig::default();
        Self {
            manifest_path: manifest_path.into(),
            revision_override: None,
            revision_command: defaults.revision_command,
            workdir: None,
            timeout: Duration::from_millis(defaults.timeout_ms),
        }
    }

    /// Build a resolver from configuration.
    ///
    /// The override variable is read here, once.
    pub fn from_config(config: &IdentityConfig) -> Self {
        let revision_override = std::env::var_os(&config.revision_env).map(|value| {
            value.into_string().unwrap_or_else(|raw| {
                warn!(
                    variable = %config.revision_env,
                    "Revision override is not valid UTF-8, using a lossy copy"
                );
                raw.to_string_lossy().into_owned()
            })
        });
        Self {
            manifest_path: PathBuf::from(&config.manifest_path),
            revision_override: None,
            revision_command: config.revision_command.clone(),
            workdir: config.workdir.as_ref().map(PathBuf::from),
            timeout: Duration::from_millis(config.timeout_ms),
        }
        .with_revision_override(revision_override)
    }

    /// Use `revision` verbatim instead of querying version control.
    /// An empty string counts as unset.
    pub fn with_revision_override(mut self, revision: Option<String>) -> Self {
        self.revision_override = revision.filter(|r| !r.is_empty());
        self
    }

    /// Replace the command that prints the current revision.
    pub fn with_revision_command<I, S>(mut self, command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.revision_command = command.into_iter().map(Into::into).collect();
        self
    }

    /// Run the revision command in `dir` instead of the process cwd.
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Wall-clock limit for the revision command.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Resolve both fields. Never fails; unavailable sources yield `None`.
    pub async fn resolve(&self) -> BuildIdentity {
        let (version, revision) = tokio::join!(self.resolve_version(), self.resolve_revision());
        let identity = BuildIdentity { version, revision };
        debug!(
            version = ?identity.version,
            revision = ?identity.revision,
            "Resolved build identity"
        );
        identity
    }

    async fn resolve_version(&self) -> Option<String> {
        let content = match tokio::fs::read_to_string(&self.manifest_path).await {
            Ok(content) => content,
            Err(e) => {
                debug!(path = %self.manifest_path.display(), error = %e, "Manifest unreadable");
                return None;
            }
        };
        let version = manifest_version(&self.manifest_path, &content);
        if version.is_none() {
            debug!(path = %self.manifest_path.display(), "Manifest has no usable version");
        }
        version
    }

    async fn resolve_revision(&self) -> Option<String> {
        if let Some(revision) = &self.revision_override {
            debug!(revision = %revision, "Using revision override");
            return Some(revision.clone());
        }
        self.query_revision().await
    }

    async fn query_revision(&self) -> Option<String> {
        let (program, args) = self.revision_command.split_first()?;

        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }

        let child = match command.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(program = %program, error = %e, "Revision command could not be started");
                return None;
            }
        };

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(program = %program, error = %e, "Revision command wait failed");
                return None;
            }
            Err(_) => {
                warn!(
                    program = %program,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Revision command timed out"
                );
                return None;
            }
        };

        if !output.status.success() {
            debug!(program = %program, code = ?output.status.code(), "Revision command failed");
            return None;
        }

        let stdout = String::from_utf8(output.stdout).ok()?;
        non_empty(stdout.trim_end())
    }
}

/// Where a TOML manifest may declare its version, in priority order.
const TOML_VERSION_PATHS: [&[&str]; 3] = [
    &["version"],
    &["package", "version"],
    &["workspace", "package", "version"],
];

/// Extract the `version` field from manifest text.
///
/// `.toml` manifests are read as TOML: the first string among top-level
/// `version`, `[package].version` and `[workspace.package].version`.
/// Everything else is read as JSON.
fn manifest_version(path: &Path, content: &str) -> Option<String> {
    if path.extension().is_some_and(|ext| ext == "toml") {
        let doc: toml::Table = toml::from_str(content).ok()?;
        TOML_VERSION_PATHS.iter().find_map(|path| {
            let (first, rest) = path.split_first()?;
            let field = rest
                .iter()
                .try_fold(doc.get(*first)?, |value, key| value.get(*key))?;
            non_empty(field.as_str()?)
        })
    } else {
        let doc: serde_json::Value = serde_json::from_str(content).ok()?;
        non_empty(doc.get("version")?.as_str()?)
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

static IDENTITY: OnceCell<BuildIdentity> = OnceCell::const_new();

/// The process-wide build identity, resolved by `resolver` on first call.
///
/// Concurrent first callers wait on the same resolution. Later calls return
/// the cached value and ignore `resolver`.
pub async fn cached(resolver: &IdentityResolver) -> &'static BuildIdentity {
    IDENTITY.get_or_init(|| resolver.resolve()).await
}

/// The process-wide build identity, if it has been resolved.
pub fn current() -> Option<&'static BuildIdentity> {
    IDENTITY.get()
}
