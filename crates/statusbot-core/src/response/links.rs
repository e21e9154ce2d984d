use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use statusbot_config::LinkConfig;

/// A configured navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDescriptor {
    pub label: String,
    pub url: String,
    /// Icon lookup key, resolved through an [`IconResolver`].
    pub icon_key: Option<String>,
}

impl LinkDescriptor {
    pub fn new(label: &str, url: &str) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
            icon_key: None,
        }
    }

    pub fn with_icon(mut self, key: &str) -> Self {
        self.icon_key = Some(key.to_string());
        self
    }

    /// Resolve the icon and produce the control handed to the host.
    /// An unknown icon key leaves the control without an icon.
    pub fn to_control(&self, icons: &dyn IconResolver) -> LinkControl {
        let icon = self.icon_key.as_deref().and_then(|key| {
            let icon = icons.icon(key);
            if icon.is_none() {
                debug!(key = %key, label = %self.label, "Icon not found, linking without one");
            }
            icon
        });
        LinkControl {
            label: self.label.clone(),
            url: self.url.clone(),
            icon,
        }
    }
}

impl From<&LinkConfig> for LinkDescriptor {
    fn from(config: &LinkConfig) -> Self {
        Self {
            label: config.label.clone(),
            url: config.url.clone(),
            icon_key: config.icon.clone(),
        }
    }
}

/// A link button ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkControl {
    pub label: String,
    pub url: String,
    pub icon: Option<String>,
}

/// Looks up icons by key.
pub trait IconResolver {
    /// The icon for `key`, or `None` if there is none.
    fn icon(&self, key: &str) -> Option<String>;
}

impl IconResolver for HashMap<String, String> {
    fn icon(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Resolver with no icons at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIcons;

impl IconResolver for NoIcons {
    fn icon(&self, _key: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_icon_resolved_from_map() {
        let icons = HashMap::from([("discord".to_string(), "💬".to_string())]);
        let control = LinkDescriptor::new("Discord", "https://discord.gg/example")
            .with_icon("discord")
            .to_control(&icons);
        assert_eq!(control.icon.as_deref(), Some("💬"));
        assert_eq!(control.label, "Discord");
        assert_eq!(control.url, "https://discord.gg/example");
    }

    #[test]
    fn test_unknown_icon_falls_back_to_none() {
        let control = LinkDescriptor::new("Privacy", "https://example.com/privacy")
            .with_icon("privacy")
            .to_control(&NoIcons);
        assert_eq!(control.icon, None);
        assert_eq!(control.label, "Privacy");
    }

    #[test]
    fn test_from_config() {
        let config = LinkConfig {
            label: "Docs".to_string(),
            url: "https://example.com/docs".to_string(),
            icon: Some("book".to_string()),
        };
        let link = LinkDescriptor::from(&config);
        assert_eq!(
            link,
            LinkDescriptor::new("Docs", "https://example.com/docs").with_icon("book")
        );
    }
}
