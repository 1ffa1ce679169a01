//! Built-in post-process passes
//!
//! The order of `POST_PROCESS_PASSES` is the pass registration order and
//! therefore the fixed composition order of the pipeline.

use crate::effects::{CostTier, EffectDescriptor};
use crate::pipeline::PassTraits;

const TIME: PassTraits = PassTraits {
    time_based: true,
    resolution_dependent: false,
};
const RESOLUTION: PassTraits = PassTraits {
    time_based: false,
    resolution_dependent: true,
};
const TIME_AND_RESOLUTION: PassTraits = PassTraits {
    time_based: true,
    resolution_dependent: true,
};
const STATIC: PassTraits = PassTraits {
    time_based: false,
    resolution_dependent: false,
};

/// Pass ids with their uniform requirements, in composition order
pub const POST_PROCESS_PASSES: &[(&str, PassTraits)] = &[
    ("ascii", RESOLUTION),
    ("sketch", RESOLUTION),
    ("celshading", RESOLUTION),
    ("glitch", TIME_AND_RESOLUTION),
    ("dithered", STATIC),
    ("pixelated", RESOLUTION),
    ("crt", TIME),
    ("psychedelic", TIME),
    ("vhs", TIME),
    ("gameboy", RESOLUTION),
    ("vaporwave", TIME),
    ("thermal", TIME),
    ("xray", RESOLUTION),
    ("filmgrain", TIME),
    ("bloom", RESOLUTION),
    ("dof", STATIC),
    ("halftone", RESOLUTION),
    ("outline", RESOLUTION),
];

/// Descriptors for every built-in post-process effect, in pass order
pub fn post_process_descriptors() -> Vec<EffectDescriptor> {
    use CostTier::*;

    vec![
        EffectDescriptor::post_process("ascii", "ASCII", 5.0, Medium)
            .with_shortcut('4')
            .with_param("cellSize", "Cell Size", 4.0, 30.0, 1.0, 8.0)
            .with_param("scanlines", "Scanlines", 0.0, 1.0, 0.05, 0.0)
            .with_param("brightness", "Brightness", 0.5, 2.0, 0.05, 1.0)
            .with_param("colorMix", "Color Mix", 0.0, 1.0, 0.05, 1.0),
        EffectDescriptor::post_process("sketch", "Sketch", 6.0, Medium)
            .with_shortcut('0')
            .with_param("edgeThreshold", "Edge Strength", 0.02, 0.4, 0.01, 0.04)
            .with_param("hatchDensity", "Hatch Density", 20.0, 200.0, 5.0, 80.0)
            .with_param("inkDarkness", "Ink Darkness", 0.0, 1.0, 0.05, 0.0)
            .with_param("paperTone", "Paper Tone", 0.7, 1.0, 0.01, 0.95),
        EffectDescriptor::post_process("celshading", "Cel Shading", 8.0, Medium)
            .with_shortcut('8')
            .with_param("colorLevels", "Color Levels", 2.0, 10.0, 1.0, 4.0)
            .with_param("edgeThreshold", "Edge Thickness", 0.02, 0.5, 0.01, 0.15)
            .with_param("edgeDarkness", "Edge Darkness", 0.0, 1.0, 0.05, 0.0),
        EffectDescriptor::post_process("glitch", "Glitch", 9.0, Light)
            .with_shortcut('9')
            .with_param("glitchIntensity", "Intensity", 0.0, 2.0, 0.05, 0.5),
        EffectDescriptor::post_process("dithered", "1-bit Dithered", 10.0, Medium)
            .with_shortcut('5')
            .with_param("threshold", "Threshold", 0.1, 0.9, 0.05, 0.5)
            .with_param("ditherScale", "Scale", 0.3, 3.0, 0.1, 1.0),
        EffectDescriptor::post_process("pixelated", "8-bit Pixel", 11.0, Medium)
            .with_shortcut('6')
            .with_param("pixelSize", "Pixel Size", 2.0, 20.0, 1.0, 6.0)
            .with_param("colorDepth", "Color Depth", 2.0, 32.0, 1.0, 8.0),
        EffectDescriptor::post_process("crt", "CRT Screen", 12.0, Light)
            .with_shortcut('7')
            .with_param("curvature", "Curvature", 0.0, 10.0, 0.5, 3.0)
            .with_param("scanlineIntensity", "Scanlines", 0.0, 0.5, 0.01, 0.15)
            .with_param("vignetteIntensity", "Vignette", 0.0, 1.0, 0.05, 0.3),
        EffectDescriptor::post_process("psychedelic", "Psychedelic", 13.0, Light)
            .with_param("intensity", "Intensity", 0.0, 2.0, 0.05, 1.0),
        EffectDescriptor::post_process("vhs", "VHS Tape", 14.0, Light)
            .with_param("noiseIntensity", "Noise", 0.0, 0.5, 0.01, 0.15),
        EffectDescriptor::post_process("gameboy", "Game Boy", 15.0, Light)
            .with_param("pixelSize", "Pixel Size", 1.0, 10.0, 0.5, 4.0),
        EffectDescriptor::post_process("vaporwave", "Vaporwave", 16.0, Light)
            .with_param("intensity", "Intensity", 0.2, 2.0, 0.1, 1.0),
        EffectDescriptor::post_process("thermal", "Thermal Vision", 17.0, Medium)
            .with_param("noiseAmount", "Noise", 0.0, 0.3, 0.01, 0.1)
            .with_param("scanlineIntensity", "Scanlines", 0.0, 0.15, 0.005, 0.05),
        EffectDescriptor::post_process("xray", "X-Ray", 18.0, Medium)
            .with_param("glowIntensity", "Glow", 0.5, 5.0, 0.1, 2.0),
        EffectDescriptor::post_process("filmgrain", "Film Grain", 21.0, Trivial)
            .with_param("intensity", "Intensity", 0.0, 1.0, 0.01, 0.35)
            .with_param("speed", "Speed", 0.0, 5.0, 0.1, 1.0),
        EffectDescriptor::post_process("bloom", "Bloom", 19.0, Light)
            .with_param("strength", "Strength", 0.0, 3.0, 0.05, 1.5)
            .with_param("threshold", "Threshold", 0.0, 1.0, 0.05, 0.5)
            .with_param("radius", "Radius", 0.0, 2.0, 0.05, 0.4),
        EffectDescriptor::post_process("dof", "Depth of Field", 20.0, Heavy)
            .with_param("focus", "Focus", 0.1, 20.0, 0.1, 2.0)
            .with_param("aperture", "Aperture", 0.0, 0.1, 0.001, 0.025)
            .with_param("maxblur", "Max Blur", 0.0, 0.02, 0.001, 0.01),
        EffectDescriptor::post_process("halftone", "Halftone", 22.0, Medium)
            .with_param("dotSize", "Dot Size", 2.0, 20.0, 1.0, 6.0)
            .with_param("shape", "Shape", 1.0, 4.0, 1.0, 1.0),
        EffectDescriptor::post_process("outline", "Outline", 23.0, Heavy)
            .with_param("edgeStrength", "Edge Strength", 0.5, 5.0, 0.1, 1.0)
            .with_param("edgeGlow", "Edge Glow", 0.0, 5.0, 0.1, 2.0)
            .with_param("edgeThickness", "Thickness", 0.5, 5.0, 0.1, 1.0),
    ]
}
