//! Declarative description of a multi-step form

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Schema for a single field within a step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Key under which the field's value is stored in the form data
    pub name: String,
    /// Label shown above the input
    pub title: String,
    /// Helper text shown below the input
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Name of the field extension that renders and validates this field.
    /// Fields without one use the built-in text input.
    #[serde(default)]
    pub field: Option<String>,
}

impl FieldSchema {
    /// Create a schema for a plain text field
    pub fn text(name: &str, title: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            description: None,
            required: false,
            field: None,
        }
    }

    /// Create a schema bound to a named field extension
    pub fn extension(name: &str, title: &str, field: &str) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            description: None,
            required: false,
            field: Some(field.to_string()),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// One step of a multi-step form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormStep {
    pub title: String,
    /// Fields rendered on this step, in declaration order
    pub schema: Vec<FieldSchema>,
}

impl FormStep {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            schema: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.schema.push(field);
        self
    }
}

/// Declarative manifest describing a multi-step form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub title: String,
    pub steps: Vec<FormStep>,
}

impl Manifest {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            steps: Vec::new(),
        }
    }

    pub fn with_step(mut self, step: FormStep) -> Self {
        self.steps.push(step);
        self
    }

    /// Parse a manifest from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builders_produce_expected_shape() {
        let manifest = Manifest::new("Onboard Service").with_step(
            FormStep::new("Details")
                .with_field(FieldSchema::text("name", "Name").required())
                .with_field(
                    FieldSchema::extension("check", "Test Field", "DelayingInput")
                        .with_description("type pass to continue"),
                ),
        );

        assert_eq!(manifest.title, "Onboard Service");
        assert_eq!(manifest.step_count(), 1);
        let step = &manifest.steps[0];
        assert_eq!(step.schema.len(), 2);
        assert!(step.schema[0].required);
        assert!(step.schema[0].field.is_none());
        assert_eq!(step.schema[1].field.as_deref(), Some("DelayingInput"));
        assert_eq!(
            step.schema[1].description.as_deref(),
            Some("type pass to continue")
        );
    }

    #[test]
    fn test_from_json_with_defaults() {
        let json = r#"{
            "title": "Demo",
            "steps": [
                {
                    "title": "First",
                    "schema": [{ "name": "owner", "title": "Owner" }]
                }
            ]
        }"#;

        let manifest = Manifest::from_json(json).unwrap();
        assert_eq!(manifest.step_count(), 1);
        let field = &manifest.steps[0].schema[0];
        assert_eq!(field.name, "owner");
        assert!(!field.required);
        assert!(field.description.is_none());
        assert!(field.field.is_none());
    }

    #[test]
    fn test_from_json_rejects_missing_title() {
        let json = r#"{ "steps": [] }"#;
        assert!(Manifest::from_json(json).is_err());
    }

    #[test]
    fn test_roundtrip_keeps_extension_binding() {
        let manifest = Manifest::new("Demo").with_step(
            FormStep::new("Check")
                .with_field(FieldSchema::extension("check", "Test Field", "DelayingInput")),
        );

        let json = serde_json::to_string(&manifest).unwrap();
        let parsed = Manifest::from_json(&json).unwrap();
        assert_eq!(
            parsed.steps[0].schema[0].field.as_deref(),
            Some("DelayingInput")
        );
    }
}
