//! Built-in effects
//!
//! This module contains the material modes and post-process passes that ship
//! with charviewer.

mod materials;
mod post_process;

pub use materials::{material_descriptors, DEFAULT_MATERIAL};
pub use post_process::{post_process_descriptors, POST_PROCESS_PASSES};

use super::EffectRegistry;
use crate::pipeline::PassPipeline;

/// Register all built-in effects with the registry
pub fn register_builtin_effects(registry: &mut EffectRegistry) {
    for descriptor in material_descriptors() {
        registry.register(descriptor);
    }
    for descriptor in post_process_descriptors() {
        registry.register(descriptor);
    }
}

/// Register all built-in passes with the pipeline, in composition order
pub fn register_builtin_passes(pipeline: &mut PassPipeline) {
    for (id, traits) in POST_PROCESS_PASSES {
        pipeline.register(*id, *traits);
    }
}
