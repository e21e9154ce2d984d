//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries.

use statusbot_config::{AppConfig, LinkConfig};

/// Fluent builder for [`AppConfig`] in tests.
///
/// Starts from the defaults with version control disabled, so tests never
/// depend on the checkout they run in.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .intro("Hello")
///     .link("Docs", "https://example.com/docs", Some("book"))
///     .icon("book", "📖")
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.identity.manifest_path = "/nonexistent/statusbot-test/package.json".to_string();
        config.identity.revision_command = vec!["statusbot-test-missing-vcs-binary".to_string()];
        Self { config }
    }

    pub fn manifest_path(mut self, path: &std::path::Path) -> Self {
        self.config.identity.manifest_path = path.display().to_string();
        self
    }

    pub fn revision_command(mut self, command: &[&str]) -> Self {
        self.config.identity.revision_command = command.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn revision_env(mut self, name: &str) -> Self {
        self.config.identity.revision_env = name.to_string();
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.config.info.title = Some(title.to_string());
        self
    }

    pub fn intro(mut self, intro: &str) -> Self {
        self.config.info.intro = intro.to_string();
        self
    }

    pub fn note(mut self, note: &str) -> Self {
        self.config.info.notes.push(note.to_string());
        self
    }

    pub fn footer(mut self, footer: &str) -> Self {
        self.config.info.footer.push(footer.to_string());
        self
    }

    pub fn repository_url(mut self, url: &str) -> Self {
        self.config.info.repository_url = Some(url.to_string());
        self
    }

    pub fn link(mut self, label: &str, url: &str, icon: Option<&str>) -> Self {
        self.config.links.push(LinkConfig {
            label: label.to_string(),
            url: url.to_string(),
            icon: icon.map(str::to_string),
        });
        self
    }

    pub fn icon(mut self, key: &str, icon: &str) -> Self {
        self.config.icons.insert(key.to_string(), icon.to_string());
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
