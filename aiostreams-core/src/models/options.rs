//! Declarative option schema consumed by configuration loaders and UIs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Option value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptionType {
    String,
    Password,
    Number,
    Boolean,
    Select,
    MultiSelect,
    Url,
    /// Informational links, never carries a value
    Socials,
}

/// Choice for select and multi-select options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectChoice {
    pub value: String,
    pub label: String,
}

impl SelectChoice {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Numeric bounds (inclusive)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialKind {
    Website,
    Github,
    Discord,
    #[serde(rename = "ko-fi")]
    KoFi,
    Patreon,
    Donate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: SocialKind,
    pub url: String,
}

/// One user-configurable field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Constraints>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub socials: Vec<SocialLink>,
}

impl OptionDefinition {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, option_type: OptionType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            option_type,
            required: false,
            default: None,
            options: Vec::new(),
            constraints: None,
            socials: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    #[must_use]
    pub fn with_choices(mut self, choices: Vec<SelectChoice>) -> Self {
        self.options = choices;
        self
    }

    #[must_use]
    pub const fn with_constraints(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.constraints = Some(Constraints { min, max });
        self
    }

    #[must_use]
    pub fn with_socials(mut self, socials: Vec<SocialLink>) -> Self {
        self.socials = socials;
        self
    }

    /// Whether this entry is informational only
    #[must_use]
    pub fn is_informational(&self) -> bool {
        self.option_type == OptionType::Socials
    }
}
