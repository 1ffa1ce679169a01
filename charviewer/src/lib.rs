//! Charviewer core library
//!
//! Render-mode, effect-stack and camera orchestration for an interactive
//! 3D character viewer. Rendering and scene access go through the
//! `RenderBackend` and `SceneBackend` ports; `headless` provides recording
//! implementations of both.

pub mod camera;
pub mod effects;
pub mod events;
pub mod headless;
pub mod lighting;
pub mod pipeline;
pub mod preset;
pub mod settings;
pub mod shortcuts;
pub mod telemetry;
pub mod viewer;

pub use camera::{CameraAnimator, CameraMode, ModelBounds};
pub use effects::{EffectRegistry, EffectStackController, SceneBackend, ToggleOutcome};
pub use events::{EventBus, ViewerCommand, ViewerEvent};
pub use lighting::LightingController;
pub use pipeline::{PassPipeline, RenderBackend};
pub use preset::{Preset, PresetError, PresetManager};
pub use settings::{SettingsError, ViewerSettings};
pub use viewer::{Viewer, ViewerError};
