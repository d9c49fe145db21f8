// AIOStreams presets
//
// Concrete addon integrations built on the preset and parser extension points
// of aiostreams-core.

pub mod custom;
pub mod streamnzb;

pub use custom::CustomPreset;
pub use streamnzb::StreamNzbPreset;

use aiostreams_core::preset::{PresetContext, PresetError, PresetRegistry};
use std::sync::Arc;

/// Register every built-in preset
pub fn register_builtin_presets(
    registry: &mut PresetRegistry,
    ctx: &PresetContext,
) -> Result<(), PresetError> {
    registry.register(Arc::new(StreamNzbPreset::new(ctx)))?;
    registry.register(Arc::new(CustomPreset::new(ctx)))?;
    Ok(())
}

/// Registry holding the built-in presets
pub fn builtin_registry(ctx: &PresetContext) -> Result<PresetRegistry, PresetError> {
    let mut registry = PresetRegistry::new();
    register_builtin_presets(&mut registry, ctx)?;
    Ok(registry)
}
