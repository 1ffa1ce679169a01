//! Viewer - the application-scoped composition root
//!
//! `Viewer` wires the effect registry, the effect stack controller (with its
//! pass pipeline and scene port), the camera animator, lighting and presets
//! onto one event bus, and routes `ViewerCommand`s to their owners.

use std::rc::Rc;
use std::sync::Arc;

use crate::camera::{CameraAnimator, ModelBounds};
use crate::effects::builtin::register_builtin_passes;
use crate::effects::{EffectRegistry, EffectStackController, SceneBackend, ToggleOutcome};
use crate::events::{EventBus, SubscriptionId, ViewerCommand, ViewerEvent};
use crate::headless::{HeadlessBackend, HeadlessScene};
use crate::lighting::LightingController;
use crate::pipeline::{PassPipeline, RenderBackend};
use crate::preset::{
    FileStore, MemoryStore, PortablePreset, Preset, PresetError, PresetManager, PresetSources, PresetStore,
    PresetTargets, StorageError,
};
use crate::settings::{SettingsError, ViewerSettings};
use crate::shortcuts;

/// Errors surfaced by `Viewer` operations
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("preset error: {0}")]
    Preset(#[from] PresetError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

/// Interactive character viewer core
pub struct Viewer {
    settings: ViewerSettings,
    events: Rc<EventBus>,
    registry: Arc<EffectRegistry>,
    effects: EffectStackController,
    camera: CameraAnimator,
    lighting: LightingController,
    presets: PresetManager,
}

impl Viewer {
    /// Build a viewer over the given backends and preset store
    pub fn new(
        settings: ViewerSettings,
        render: Box<dyn RenderBackend>,
        scene: Box<dyn SceneBackend>,
        store: Box<dyn PresetStore>,
    ) -> Self {
        let mut settings = settings;
        settings.clamp();

        let events = Rc::new(EventBus::new());
        let registry = Arc::new(EffectRegistry::with_builtins(settings.budget_policy()));

        let mut pipeline = PassPipeline::new(render, settings.viewport_width, settings.viewport_height);
        register_builtin_passes(&mut pipeline);

        let effects = EffectStackController::new(Arc::clone(&registry), pipeline, scene, Rc::clone(&events));
        let camera = CameraAnimator::new(
            Rc::clone(&events),
            settings.default_fov,
            settings.default_camera_speed,
            aspect(settings.viewport_width, settings.viewport_height),
        );
        let lighting = LightingController::new(Rc::clone(&events));
        let presets = PresetManager::new(store, Arc::clone(&registry), Rc::clone(&events), settings.preset_capacity);

        tracing::info!(
            effects = registry.len(),
            max_budget = settings.max_budget,
            max_stack = settings.max_stack,
            "Viewer initialized"
        );

        Self {
            settings,
            events,
            registry,
            effects,
            camera,
            lighting,
            presets,
        }
    }

    /// Viewer with presets stored on disk.
    ///
    /// Uses `presetsDir` from the settings, or the config directory when unset.
    pub fn with_file_store(
        settings: ViewerSettings,
        render: Box<dyn RenderBackend>,
        scene: Box<dyn SceneBackend>,
    ) -> Result<Self, ViewerError> {
        let store = match settings.presets_dir() {
            Some(dir) => FileStore::new(dir),
            None => FileStore::in_config_dir()?,
        };
        tracing::debug!(dir = %store.dir().display(), "Using preset directory");
        Ok(Self::new(settings, render, scene, Box::new(store)))
    }

    /// Viewer over recording backends and an in-memory store.
    ///
    /// The returned backend handles share their call logs with the viewer.
    pub fn headless(settings: ViewerSettings) -> (Self, HeadlessBackend, HeadlessScene) {
        let backend = HeadlessBackend::new();
        let scene = HeadlessScene::new();
        let viewer = Self::new(
            settings,
            Box::new(backend.clone()),
            Box::new(scene.clone()),
            Box::new(MemoryStore::new()),
        );
        (viewer, backend, scene)
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn registry(&self) -> &EffectRegistry {
        &self.registry
    }

    pub fn effects(&self) -> &EffectStackController {
        &self.effects
    }

    pub fn camera(&self) -> &CameraAnimator {
        &self.camera
    }

    pub fn lighting(&self) -> &LightingController {
        &self.lighting
    }

    pub fn presets(&self) -> &PresetManager {
        &self.presets
    }

    pub fn events(&self) -> &Rc<EventBus> {
        &self.events
    }

    /// Register a notification subscriber
    pub fn subscribe(&self, subscriber: impl Fn(&ViewerEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(subscriber)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Route a user intent to the component that owns the state
    pub fn dispatch(&mut self, command: ViewerCommand) -> Result<(), ViewerError> {
        tracing::debug!(?command, "Dispatching command");
        match command {
            ViewerCommand::ApplyMaterial { id } => {
                self.effects.apply_material(&id);
            }
            ViewerCommand::CycleMaterial { step } => {
                self.effects.cycle_material(step);
            }
            ViewerCommand::SetMaterialParameter { key, value } => {
                self.effects.update_material_parameter(&key, value);
            }
            ViewerCommand::ToggleEffect { id } => {
                self.toggle_effect(&id);
            }
            ViewerCommand::SetEffectParameter { id, key, value } => {
                self.effects.update_effect_parameter(&id, &key, value);
            }
            ViewerCommand::ToggleWireframe => {
                self.effects.toggle_wireframe();
            }
            ViewerCommand::SetCameraMode { mode } => self.camera.set_mode(mode),
            ViewerCommand::SetCameraSpeed { speed } => self.camera.set_speed(speed),
            ViewerCommand::SetCameraFov { fov } => self.camera.set_fov(fov),
            ViewerCommand::OrbitCamera { delta_yaw, delta_pitch } => self.camera.orbit(delta_yaw, delta_pitch),
            ViewerCommand::DollyCamera { delta } => self.camera.dolly(delta),
            ViewerCommand::FitCamera => self.camera.fit(),
            ViewerCommand::ResetCamera => self.camera.reset(),
            ViewerCommand::ApplyLightingPreset { id } => {
                self.lighting.apply_preset(&id);
            }
            ViewerCommand::SetLightIntensity { role, value } => self.lighting.set_intensity(role, value),
            ViewerCommand::SavePreset { name } => {
                self.save_preset(&name)?;
            }
            ViewerCommand::ApplyPreset { timestamp } => {
                self.apply_stored_preset(timestamp)?;
            }
            ViewerCommand::DeletePreset { timestamp } => {
                self.presets.delete(timestamp)?;
            }
            ViewerCommand::ImportPreset { json } => {
                self.import_preset(&json)?;
            }
            ViewerCommand::Resize { width, height } => self.resize(width, height),
        }
        Ok(())
    }

    /// Dispatch the command bound to a key; returns false for unbound keys
    pub fn handle_key(&mut self, key: char) -> Result<bool, ViewerError> {
        match shortcuts::command_for_key(&self.registry, key) {
            Some(command) => {
                self.dispatch(command)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Toggle a post-process effect and report the outcome
    pub fn toggle_effect(&mut self, id: &str) -> ToggleOutcome {
        self.effects.toggle_effect(id)
    }

    /// Advance one display frame.
    ///
    /// Runs the camera update, then the pass pipeline. Returns true if a
    /// composited frame was produced.
    pub fn frame(&mut self, delta_time: f32) -> bool {
        self.camera.update(delta_time);
        self.effects.pipeline_mut().render_frame(delta_time)
    }

    /// A new model finished loading
    pub fn on_model_loaded(&mut self, bounds: ModelBounds) {
        tracing::info!(radius = bounds.radius, "Model loaded");
        self.camera.set_model_bounds(bounds);
        self.effects.reapply_material();
    }

    /// The viewport changed size
    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        self.effects.pipeline_mut().resize(width, height);
        self.camera.set_aspect(aspect(width, height));
        tracing::debug!(width, height, "Viewport resized");
    }

    /// Capture and store the current state under `name`
    pub fn save_preset(&mut self, name: &str) -> Result<Preset, ViewerError> {
        let sources = PresetSources {
            effects: &self.effects,
            lighting: &self.lighting,
            camera: &self.camera,
        };
        Ok(self.presets.save(name, sources)?)
    }

    /// Stored presets, most recent first
    pub fn list_presets(&self) -> Vec<Preset> {
        self.presets.list()
    }

    /// Restore a preset value
    pub fn apply_preset(&mut self, preset: &Preset) {
        let targets = PresetTargets {
            effects: &mut self.effects,
            lighting: &mut self.lighting,
            camera: &mut self.camera,
        };
        self.presets.apply(preset, targets);
    }

    /// Restore the stored preset with the given timestamp
    pub fn apply_stored_preset(&mut self, timestamp: i64) -> Result<Preset, ViewerError> {
        let targets = PresetTargets {
            effects: &mut self.effects,
            lighting: &mut self.lighting,
            camera: &mut self.camera,
        };
        Ok(self.presets.apply_stored(timestamp, targets)?)
    }

    /// Portable JSON for the stored preset with the given timestamp
    pub fn export_preset(&self, timestamp: i64) -> Result<String, ViewerError> {
        let preset = self.presets.find(timestamp)?;
        Ok(self.presets.export(&preset)?)
    }

    /// Parse portable JSON and apply it.
    ///
    /// Nothing changes if the payload is rejected.
    pub fn import_preset(&mut self, json: &str) -> Result<PortablePreset, ViewerError> {
        let imported = self.presets.import(json)?;
        let targets = PresetTargets {
            effects: &mut self.effects,
            lighting: &mut self.lighting,
            camera: &mut self.camera,
        };
        self.presets.apply_imported(&imported, targets);
        Ok(imported)
    }
}

fn aspect(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use glam::Vec3;

    use super::*;
    use crate::camera::CameraMode;
    use crate::headless::BackendCall;

    fn viewer() -> (Viewer, HeadlessBackend, HeadlessScene) {
        Viewer::headless(ViewerSettings::default())
    }

    #[test]
    fn test_initial_state() {
        let (viewer, _, _) = viewer();
        assert_eq!(viewer.effects().current_material(), "standard");
        assert!(viewer.effects().active_ids().is_empty());
        assert_eq!(viewer.camera().mode(), CameraMode::None);
        assert_eq!(viewer.lighting().current_preset(), "3-point");
        assert!(viewer.list_presets().is_empty());
    }

    #[test]
    fn test_frame_without_effects_renders_directly() {
        let (mut viewer, backend, _) = viewer();
        assert!(!viewer.frame(0.016));
        assert_eq!(backend.calls().last(), Some(&BackendCall::RenderDirect));
    }

    #[test]
    fn test_frame_composes_in_registration_order() {
        let (mut viewer, backend, _) = viewer();
        viewer.dispatch(ViewerCommand::ToggleEffect { id: "filmgrain".into() }).unwrap();
        viewer.dispatch(ViewerCommand::ToggleEffect { id: "ascii".into() }).unwrap();

        assert!(viewer.frame(0.016));
        assert_eq!(
            backend.last_plan(),
            Some(vec!["scene".to_string(), "ascii".to_string(), "filmgrain".to_string()])
        );
    }

    #[test]
    fn test_budget_block_is_notified() {
        let (mut viewer, _, _) = viewer();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        viewer.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        viewer.dispatch(ViewerCommand::ToggleEffect { id: "dof".into() }).unwrap();
        viewer.dispatch(ViewerCommand::ToggleEffect { id: "ascii".into() }).unwrap();
        viewer.dispatch(ViewerCommand::ToggleEffect { id: "outline".into() }).unwrap();

        assert_eq!(viewer.effects().active_ids(), vec!["dof", "ascii"]);
        assert!(events
            .borrow()
            .iter()
            .any(|e| matches!(e, ViewerEvent::BudgetBlocked { effect_id, .. } if effect_id == "outline")));
    }

    #[test]
    fn test_settings_drive_budget() {
        let settings = ViewerSettings {
            max_stack: 1,
            ..ViewerSettings::default()
        };
        let (mut viewer, _, _) = Viewer::headless(settings);
        assert!(matches!(viewer.toggle_effect("crt"), ToggleOutcome::Enabled { .. }));
        assert!(matches!(viewer.toggle_effect("vhs"), ToggleOutcome::Blocked(_)));
    }

    #[test]
    fn test_model_loaded_frames_camera_and_reapplies_material() {
        let (mut viewer, _, scene) = viewer();
        viewer.dispatch(ViewerCommand::ApplyMaterial { id: "chrome".into() }).unwrap();
        scene.clear();

        viewer.on_model_loaded(ModelBounds::from_sphere(Vec3::ZERO, 1.0));
        assert!(viewer.camera().bounds().is_some());
        assert_eq!(scene.current_material().as_deref(), Some("chrome"));
    }

    #[test]
    fn test_handle_key() {
        let (mut viewer, _, _) = viewer();
        viewer.on_model_loaded(ModelBounds::from_sphere(Vec3::ZERO, 1.0));

        assert!(viewer.handle_key('2').unwrap());
        assert_eq!(viewer.effects().current_material(), "matcap");

        assert!(viewer.handle_key('r').unwrap());
        assert_eq!(viewer.camera().mode(), CameraMode::Turntable);

        assert!(viewer.handle_key('w').unwrap());
        assert!(viewer.effects().wireframe());

        assert!(!viewer.handle_key('z').unwrap());
    }

    #[test]
    fn test_resize_updates_pipeline_and_camera() {
        let (mut viewer, backend, _) = viewer();
        viewer.dispatch(ViewerCommand::Resize { width: 800, height: 400 }).unwrap();
        assert_eq!(viewer.effects().pipeline().size(), (800, 400));
        assert!(backend.calls().contains(&BackendCall::Resize(800, 400)));
    }

    #[test]
    fn test_preset_round_trip_through_commands() {
        let (mut viewer, _, _) = viewer();
        viewer.dispatch(ViewerCommand::ApplyMaterial { id: "cinematic".into() }).unwrap();
        viewer.dispatch(ViewerCommand::ToggleEffect { id: "bloom".into() }).unwrap();
        viewer
            .dispatch(ViewerCommand::ApplyLightingPreset { id: "dramatic".into() })
            .unwrap();
        let saved = viewer.save_preset("Moody").unwrap();

        viewer.dispatch(ViewerCommand::ApplyMaterial { id: "normals".into() }).unwrap();
        viewer.dispatch(ViewerCommand::ToggleEffect { id: "bloom".into() }).unwrap();
        viewer.dispatch(ViewerCommand::ApplyLightingPreset { id: "studio".into() }).unwrap();

        viewer
            .dispatch(ViewerCommand::ApplyPreset {
                timestamp: saved.timestamp,
            })
            .unwrap();
        assert_eq!(viewer.effects().current_material(), "cinematic");
        assert_eq!(viewer.effects().active_ids(), vec!["bloom"]);
        assert_eq!(viewer.lighting().current_preset(), "dramatic");
    }

    #[test]
    fn test_missing_preset_is_an_error() {
        let (mut viewer, _, _) = viewer();
        let err = viewer.dispatch(ViewerCommand::ApplyPreset { timestamp: 7 }).unwrap_err();
        assert!(matches!(err, ViewerError::Preset(PresetError::NotFound(7))));
    }

    #[test]
    fn test_rejected_import_changes_nothing() {
        let (mut viewer, _, _) = viewer();
        viewer.dispatch(ViewerCommand::ToggleEffect { id: "crt".into() }).unwrap();

        let result = viewer.dispatch(ViewerCommand::ImportPreset {
            json: r#"{"material": {"id": "chrome"}, "effects": [{"id": "ascii"}]}"#.into(),
        });
        assert!(matches!(
            result,
            Err(ViewerError::Preset(PresetError::InvalidFormat { .. }))
        ));
        assert_eq!(viewer.effects().current_material(), "standard");
        assert_eq!(viewer.effects().active_ids(), vec!["crt"]);
    }

    #[test]
    fn test_file_store_from_settings() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ViewerSettings {
            presets_dir: Some(dir.path().to_string_lossy().to_string()),
            ..ViewerSettings::default()
        };
        let mut viewer = Viewer::with_file_store(
            settings,
            Box::new(HeadlessBackend::new()),
            Box::new(HeadlessScene::new()),
        )
        .unwrap();
        viewer.save_preset("Disk").unwrap();
        assert!(dir.path().join("charviewer_presets.json").exists());
        assert_eq!(viewer.list_presets()[0].name, "Disk");
    }
}
