//! Prompt types for ragnews.
//!
//! This module defines the domain entities for the prompt system.

use serde::{Deserialize, Serialize};

/// A prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// System message template (Handlebars)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    /// User message template (Handlebars)
    pub template: String,

    /// Output specification
    pub output: PromptOutputSpec,
}

/// Output specification for the prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptOutputSpec {
    /// Output format (e.g., "text", "lines", "tokens")
    pub format: String,
}

/// A fully built prompt ready for LLM execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPrompt {
    /// System message (optional)
    pub system: Option<String>,

    /// User message (required)
    pub user: String,

    /// Metadata about the built prompt
    pub metadata: BuiltPromptMetadata,
}

/// Metadata about a built prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltPromptMetadata {
    /// Source prompt ID
    #[serde(rename = "sourcePromptId")]
    pub source_prompt_id: String,

    /// Names of the top-level template variables that were supplied
    #[serde(rename = "resolvedVariables")]
    pub resolved_variables: Vec<String>,
}

impl BuiltPrompt {
    /// Create a new built prompt.
    pub fn new(
        system: Option<String>,
        user: String,
        source_prompt_id: String,
        resolved_variables: Vec<String>,
    ) -> Self {
        Self {
            system,
            user,
            metadata: BuiltPromptMetadata {
                source_prompt_id,
                resolved_variables,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: test.prompt
title: Test Prompt
apiVersion: "1.0"
system: "Be brief. Today is {{now}}."
template: "{{question}}"
output:
  format: text
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "test.prompt");
        assert_eq!(def.system.as_deref(), Some("Be brief. Today is {{now}}."));
        assert_eq!(def.output.format, "text");
    }

    #[test]
    fn test_system_is_optional() {
        let yaml = r#"
id: test.user-only
title: User only
apiVersion: "1.0"
template: "{{masked_text}}"
output:
  format: tokens
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert!(def.system.is_none());
    }

    #[test]
    fn test_built_prompt_creation() {
        let built = BuiltPrompt::new(
            Some("System message".to_string()),
            "User message".to_string(),
            "test.prompt".to_string(),
            vec!["question".to_string()],
        );

        assert_eq!(built.system, Some("System message".to_string()));
        assert_eq!(built.user, "User message");
        assert_eq!(built.metadata.source_prompt_id, "test.prompt");
        assert_eq!(built.metadata.resolved_variables, vec!["question"]);
    }
}
