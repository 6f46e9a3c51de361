//! Child agent descriptor — the unit the master agent delegates to.
//!
//! A descriptor names a notional specialist, says what it handles, lists the
//! capability tags the classifier matches on, and carries the persona
//! instructions a real specialist would run with.

use serde::{Deserialize, Serialize};

/// A child agent capability descriptor.
///
/// Example YAML:
/// ```yaml
/// name: "TranslationAgent"
/// description: "Translates text between languages"
/// capabilities: ["translation", "localization"]
/// systemPrompt: "You are a professional translator."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityDescriptor {
    /// Unique identifier, also matched against model replies.
    pub name: String,

    /// Human-readable description shown in the system prompt.
    pub description: String,

    /// Lowercase capability tags.
    #[serde(default)]
    pub capabilities: Vec<String>,

    /// Seed instructions guiding the specialist's persona.
    #[serde(default)]
    pub system_prompt: String,
}

impl CapabilityDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        capabilities: &[&str],
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            system_prompt: system_prompt.into(),
        }
    }

    /// Lower-case every capability tag in place.
    pub(crate) fn normalize_tags(&mut self) {
        for tag in &mut self.capabilities {
            *tag = tag.to_lowercase();
        }
    }
}

/// The three descriptors every master agent starts with, in listing order.
pub fn default_descriptors() -> Vec<CapabilityDescriptor> {
    vec![
        CapabilityDescriptor::new(
            "DataAnalysisAgent",
            "Handles data analysis and processing tasks",
            &["data_analysis", "statistics", "visualization"],
            "You are a data analysis specialist. Focus on providing insights and statistical analysis.",
        ),
        CapabilityDescriptor::new(
            "ContentGenerationAgent",
            "Handles content creation and text generation",
            &["content_creation", "summarization", "translation"],
            "You are a content creation specialist. Focus on generating high-quality text content.",
        ),
        CapabilityDescriptor::new(
            "CodeAssistantAgent",
            "Handles coding and technical tasks",
            &["code_generation", "debugging", "optimization"],
            "You are a coding assistant. Focus on providing clean, efficient code solutions.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_wire_names() {
        let descriptor = CapabilityDescriptor::new("A", "does a", &["x"], "be a");
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["systemPrompt"], "be a");
        assert_eq!(json["capabilities"][0], "x");
    }

    #[test]
    fn test_descriptor_from_yaml() {
        let yaml = r#"
name: "TranslationAgent"
description: "Translates text"
capabilities: ["Translation", "localization"]
"#;
        let mut descriptor: CapabilityDescriptor = serde_yaml::from_str(yaml).unwrap();
        descriptor.normalize_tags();
        assert_eq!(descriptor.capabilities, vec!["translation", "localization"]);
        assert!(descriptor.system_prompt.is_empty());
    }

    #[test]
    fn test_default_descriptors_order() {
        let names: Vec<String> = default_descriptors().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec!["DataAnalysisAgent", "ContentGenerationAgent", "CodeAssistantAgent"]
        );
    }
}
