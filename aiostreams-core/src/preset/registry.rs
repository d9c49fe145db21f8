// Preset Registry
//
// Maps preset ids to presets. Built once at startup, read-only afterwards.

use super::{validate_options, Preset, PresetError, PresetMetadata, Result};
use crate::models::{Addon, PresetConfig, UserData};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// An addon together with the preset that built it
#[derive(Clone)]
pub struct ConfiguredAddon {
    pub preset: Arc<dyn Preset>,
    pub addon: Arc<Addon>,
}

/// Preset registry
pub struct PresetRegistry {
    /// Registered presets by id
    presets: BTreeMap<String, Arc<dyn Preset>>,
}

impl PresetRegistry {
    /// Create new empty registry
    #[must_use]
    pub const fn new() -> Self {
        Self {
            presets: BTreeMap::new(),
        }
    }

    /// Register a preset under its metadata id
    pub fn register(&mut self, preset: Arc<dyn Preset>) -> Result<()> {
        let id = preset.metadata().id.clone();
        if self.presets.contains_key(&id) {
            return Err(PresetError::AlreadyRegistered(id));
        }
        info!(preset = %id, name = %preset.metadata().name, "Registered preset");
        self.presets.insert(id, preset);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn Preset>> {
        self.presets.get(id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.presets.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Metadata of every registered preset, ordered by id
    #[must_use]
    pub fn list(&self) -> Vec<&PresetMetadata> {
        self.presets.values().map(|p| p.metadata()).collect()
    }

    /// Validate one preset entry and build its addons
    pub fn build_addons(&self, user: &UserData, config: &PresetConfig) -> Result<Vec<Addon>> {
        let preset = self
            .get(&config.preset_type)
            .ok_or_else(|| PresetError::UnknownPreset(config.preset_type.clone()))?;

        validate_options(&preset.metadata().options, &config.options)?;
        preset.generate_addons(user, config)
    }

    /// Build addons for every enabled preset entry of a user configuration
    ///
    /// Fails on the first invalid entry. Disabled entries and disabled addons
    /// are left out.
    pub fn build_user_addons(&self, user: &UserData) -> Result<Vec<ConfiguredAddon>> {
        let mut configured = Vec::new();

        for config in &user.presets {
            if !config.enabled {
                debug!(preset = %config.preset_type, "Skipping disabled preset");
                continue;
            }

            let preset = self
                .get(&config.preset_type)
                .ok_or_else(|| PresetError::UnknownPreset(config.preset_type.clone()))?;

            for addon in self.build_addons(user, config)? {
                if !addon.enabled {
                    debug!(addon = %addon.name, "Skipping disabled addon");
                    continue;
                }
                configured.push(ConfiguredAddon {
                    preset: Arc::clone(&preset),
                    addon: Arc::new(addon),
                });
            }
        }

        Ok(configured)
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
