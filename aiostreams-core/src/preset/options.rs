//! Shared option baseline and option validation

use super::PresetError;
use crate::config::PresetDefaults;
use crate::models::{MediaType, OptionDefinition, OptionType, PresetOptions, Resource, SelectChoice};
use serde_json::{json, Value};
use std::time::Duration;

/// Options every preset starts from, in display order:
/// `name`, `url`, `timeout`, `resources`, `mediaTypes`.
#[must_use]
pub fn base_options(
    name: &str,
    resources: &[Resource],
    timeout: Duration,
    limits: &PresetDefaults,
) -> Vec<OptionDefinition> {
    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

    vec![
        OptionDefinition::new("name", "Name", OptionType::String)
            .with_description("What to call this addon")
            .with_default(json!(name)),
        OptionDefinition::new("url", "Override URL", OptionType::Url)
            .with_description("Override the URL used for this addon"),
        OptionDefinition::new("timeout", "Timeout (ms)", OptionType::Number)
            .with_description("The timeout for this addon")
            .with_default(json!(timeout_ms))
            .with_constraints(
                Some(limits.min_timeout_ms as f64),
                Some(limits.max_timeout_ms as f64),
            ),
        OptionDefinition::new("resources", "Resources", OptionType::MultiSelect)
            .with_description("Optionally override the resources to use")
            .with_choices(
                resources
                    .iter()
                    .map(|r| SelectChoice::new(r.as_str(), r.as_str()))
                    .collect(),
            )
            .with_default(json!(resources.iter().map(|r| r.as_str()).collect::<Vec<_>>())),
        OptionDefinition::new("mediaTypes", "Media Types", OptionType::MultiSelect)
            .with_description("Limit this addon to the selected media types")
            .with_choices(
                [MediaType::Movie, MediaType::Series, MediaType::Anime]
                    .iter()
                    .map(|m| SelectChoice::new(m.as_str(), m.as_str()))
                    .collect(),
            )
            .with_default(json!([])),
    ]
}

/// Check resolved options against a preset's option schema
///
/// Absent or `null` optional values are accepted. Informational entries
/// (`socials`) are ignored.
pub fn validate_options(
    definitions: &[OptionDefinition],
    options: &PresetOptions,
) -> Result<(), PresetError> {
    for def in definitions.iter().filter(|d| !d.is_informational()) {
        let value = options.get(&def.id).filter(|v| !is_empty_value(v));
        match value {
            None if def.required => return Err(PresetError::MissingOption(def.id.clone())),
            None => {}
            Some(value) => validate_value(def, value)?,
        }
    }
    Ok(())
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn validate_value(def: &OptionDefinition, value: &Value) -> Result<(), PresetError> {
    match def.option_type {
        OptionType::String | OptionType::Password => {
            if !value.is_string() {
                return Err(PresetError::invalid(&def.id, "expected a string"));
            }
        }
        OptionType::Url => {
            let raw = value
                .as_str()
                .ok_or_else(|| PresetError::invalid(&def.id, "expected a URL string"))?;
            let url = url::Url::parse(raw.trim())
                .map_err(|e| PresetError::invalid(&def.id, format!("invalid URL: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(PresetError::invalid(
                    &def.id,
                    format!("unsupported URL scheme: {}", url.scheme()),
                ));
            }
        }
        OptionType::Number => {
            let number = value
                .as_f64()
                .ok_or_else(|| PresetError::invalid(&def.id, "expected a number"))?;
            if let Some(constraints) = def.constraints {
                if constraints.min.is_some_and(|min| number < min)
                    || constraints.max.is_some_and(|max| number > max)
                {
                    return Err(PresetError::invalid(
                        &def.id,
                        format!(
                            "{number} is outside [{}, {}]",
                            constraints.min.map_or("-".to_string(), |v| v.to_string()),
                            constraints.max.map_or("-".to_string(), |v| v.to_string())
                        ),
                    ));
                }
            }
        }
        OptionType::Boolean => {
            if !value.is_boolean() {
                return Err(PresetError::invalid(&def.id, "expected a boolean"));
            }
        }
        OptionType::Select => {
            let choice = value
                .as_str()
                .ok_or_else(|| PresetError::invalid(&def.id, "expected a string"))?;
            check_choice(def, choice)?;
        }
        OptionType::MultiSelect => {
            let values = value
                .as_array()
                .ok_or_else(|| PresetError::invalid(&def.id, "expected a list"))?;
            for item in values {
                let choice = item
                    .as_str()
                    .ok_or_else(|| PresetError::invalid(&def.id, "expected a list of strings"))?;
                check_choice(def, choice)?;
            }
        }
        OptionType::Socials => {}
    }
    Ok(())
}

fn check_choice(def: &OptionDefinition, choice: &str) -> Result<(), PresetError> {
    if def.options.is_empty() || def.options.iter().any(|c| c.value == choice) {
        Ok(())
    } else {
        Err(PresetError::invalid(&def.id, format!("unknown choice: {choice}")))
    }
}
