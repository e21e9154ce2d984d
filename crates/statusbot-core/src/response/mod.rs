//! Render-agnostic reply structure.
//!
//! A [`ResponseDocument`] is an ordered list of [`Section`]s under an
//! optional title. Hosts with rich rendering walk [`ResponseDocument::sections`];
//! plain hosts use the [`Display`](std::fmt::Display) impl, which emits chat
//! markdown.

use std::fmt;

use serde::Serialize;

/// Reply composition from identity, links and runtime facts.
pub mod compose;
/// Navigation links and icon lookup.
pub mod links;

pub use compose::{InfoContent, InfoReply, compose};
pub use links::{IconResolver, LinkControl, LinkDescriptor, NoIcons};

/// One block of a [`ResponseDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// A paragraph of narrative text.
    Text(String),
    /// A labelled fact.
    KeyValue { key: String, value: String },
    /// Vertical space between blocks.
    Spacer,
}

/// An ordered, immutable reply document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResponseDocument {
    title: Option<String>,
    sections: Vec<Section>,
}

impl ResponseDocument {
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::default()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Value of the first fact with the given key.
    pub fn value_of(&self, key: &str) -> Option<&str> {
        self.facts().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// All key/value facts in order.
    pub fn facts(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections.iter().filter_map(|section| match section {
            Section::KeyValue { key, value } => Some((key.as_str(), value.as_str())),
            _ => None,
        })
    }
}

impl fmt::Display for ResponseDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, "## {title}")?;
        }
        for section in &self.sections {
            match section {
                Section::Text(text) => writeln!(f, "{text}")?,
                Section::KeyValue { key, value } => writeln!(f, "**{key}:** {value}")?,
                Section::Spacer => writeln!(f)?,
            }
        }
        Ok(())
    }
}

/// Builds a [`ResponseDocument`] section by section.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    title: Option<String>,
    sections: Vec<Section>,
}

impl DocumentBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.sections.push(Section::Text(text.into()));
        self
    }

    pub fn spacer(mut self) -> Self {
        self.sections.push(Section::Spacer);
        self
    }

    pub fn pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.sections.push(Section::KeyValue {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Add the pair only when `value` is present.
    pub fn pair_if(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.pair(key, value),
            None => self,
        }
    }

    pub fn build(self) -> ResponseDocument {
        ResponseDocument {
            title: self.title,
            sections: self.sections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_preserves_order() {
        let doc = ResponseDocument::builder()
            .line("intro")
            .spacer()
            .pair("Uptime", "1m")
            .pair("Ping", "5ms")
            .build();
        assert_eq!(
            doc.sections(),
            &[
                Section::Text("intro".to_string()),
                Section::Spacer,
                Section::KeyValue {
                    key: "Uptime".to_string(),
                    value: "1m".to_string()
                },
                Section::KeyValue {
                    key: "Ping".to_string(),
                    value: "5ms".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_pair_if_skips_absent_values() {
        let doc = ResponseDocument::builder()
            .pair_if("Version", None::<String>)
            .pair_if("Commit", Some("abc1234"))
            .build();
        assert_eq!(doc.sections().len(), 1);
        assert_eq!(doc.value_of("Commit"), Some("abc1234"));
        assert_eq!(doc.value_of("Version"), None);
    }

    #[test]
    fn test_display_renders_markdown() {
        let doc = ResponseDocument::builder()
            .title("Status Bot")
            .line("Hello.")
            .spacer()
            .pair("Ping", "12ms")
            .build();
        assert_eq!(doc.to_string(), "## Status Bot\nHello.\n\n**Ping:** 12ms\n");
    }

    #[test]
    fn test_serializes_sections() {
        let doc = ResponseDocument::builder()
            .line("Hello.")
            .spacer()
            .pair("Ping", "12ms")
            .build();
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "title": null,
                "sections": [
                    {"text": "Hello."},
                    "spacer",
                    {"key_value": {"key": "Ping", "value": "12ms"}},
                ],
            })
        );
    }
}
