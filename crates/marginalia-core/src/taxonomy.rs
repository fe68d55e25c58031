//! Topic taxonomy: topic name -> trigger keywords, loaded as data

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;

const BUILTIN_TAXONOMY: &str = include_str!("../data/default_taxonomy.json");

/// One topic of the taxonomy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TopicSpec")]
pub struct TopicDefinition {
    /// Keywords or phrases that place a bookmark in this topic
    pub triggers: BTreeSet<String>,
    /// Human-readable name; falls back to a title-cased key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// What a summary of this topic should concentrate on
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub focus: Vec<String>,
}

impl TopicDefinition {
    pub fn new<I, S>(triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            triggers: triggers.into_iter().map(Into::into).collect(),
            label: None,
            focus: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_focus<I, S>(mut self, focus: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focus = focus.into_iter().map(Into::into).collect();
        self
    }
}

/// Accepts both `"topic": ["a", "b"]` and the full object form
#[derive(Deserialize)]
#[serde(untagged)]
enum TopicSpec {
    Triggers(BTreeSet<String>),
    Full {
        triggers: BTreeSet<String>,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        focus: Vec<String>,
    },
}

impl From<TopicSpec> for TopicDefinition {
    fn from(spec: TopicSpec) -> Self {
        match spec {
            TopicSpec::Triggers(triggers) => TopicDefinition {
                triggers,
                label: None,
                focus: Vec::new(),
            },
            TopicSpec::Full {
                triggers,
                label,
                focus,
            } => TopicDefinition {
                triggers,
                label,
                focus,
            },
        }
    }
}

/// Static topic configuration consulted by the classifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Taxonomy {
    topics: BTreeMap<String, TopicDefinition>,
}

impl Taxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// The taxonomy bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TAXONOMY)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_topic<I, S>(mut self, name: impl Into<String>, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, TopicDefinition::new(triggers));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, definition: TopicDefinition) {
        self.topics.insert(name.into(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&TopicDefinition> {
        self.topics.get(name)
    }

    pub fn topics(&self) -> impl Iterator<Item = (&str, &TopicDefinition)> {
        self.topics.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn topic_names(&self) -> impl Iterator<Item = &str> {
        self.topics.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Label for display: the configured label, else `ai_ml` -> `Ai Ml`
    pub fn display_name(&self, topic: &str) -> String {
        if let Some(label) = self.get(topic).and_then(|def| def.label.as_ref()) {
            return label.clone();
        }
        topic
            .split(['_', '-'])
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_parses() {
        let taxonomy = Taxonomy::builtin().unwrap();
        assert!(taxonomy.len() >= 5);
        let ai = taxonomy.get("ai_ml").unwrap();
        assert!(ai.triggers.contains("machine learning"));
        assert!(!ai.focus.is_empty());
        assert_eq!(taxonomy.display_name("ai_ml"), "AI / ML");
    }

    #[test]
    fn test_short_and_long_forms() {
        let json = r#"{
            "AI/ML": ["machine learning", "transformers"],
            "Programming": {"triggers": ["python"], "label": "Code", "focus": ["Idioms"]}
        }"#;
        let taxonomy = Taxonomy::from_json(json).unwrap();
        assert_eq!(taxonomy.len(), 2);
        assert_eq!(taxonomy.get("AI/ML").unwrap().triggers.len(), 2);
        let prog = taxonomy.get("Programming").unwrap();
        assert_eq!(prog.label.as_deref(), Some("Code"));
        assert_eq!(prog.focus, vec!["Idioms".to_string()]);
    }

    #[test]
    fn test_empty_taxonomy_is_valid() {
        let taxonomy = Taxonomy::from_json("{}").unwrap();
        assert!(taxonomy.is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Taxonomy::from_json(r#"{"topic": 5}"#).is_err());
        assert!(Taxonomy::from_json("not json").is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let taxonomy = Taxonomy::new()
            .with_topic("rust", ["cargo", "borrow checker"])
            .with_topic("go", ["goroutine"]);
        let json = taxonomy.to_json_pretty().unwrap();
        assert_eq!(Taxonomy::from_json(&json).unwrap(), taxonomy);
    }

    #[test]
    fn test_display_name_fallback() {
        let taxonomy = Taxonomy::new().with_topic("web_dev", ["html"]);
        assert_eq!(taxonomy.display_name("web_dev"), "Web Dev");
        assert_eq!(taxonomy.display_name("unlisted"), "Unlisted");
    }
}
