//! Charviewer headless demo
//!
//! Runs a scripted session against the recording backends: load a model,
//! stack effects, run the cinematic camera, then save and export a preset.

use std::process::ExitCode;

use charviewer::camera::{CameraMode, ModelBounds};
use charviewer::telemetry::{init_logging, LogConfig};
use charviewer::{Viewer, ViewerCommand, ViewerError, ViewerEvent, ViewerSettings};
use glam::Vec3;

const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> ExitCode {
    let log_config = LogConfig::default();
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Demo session failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), ViewerError> {
    let settings = ViewerSettings::load_or_default();
    let (mut viewer, backend, scene) = Viewer::headless(settings);

    viewer.subscribe(|event| match event {
        ViewerEvent::BudgetBlocked { effect_id, reason, .. } => {
            tracing::warn!(effect = %effect_id, "{}", reason);
        }
        other => tracing::debug!(event = ?other, "Viewer event"),
    });

    viewer.on_model_loaded(ModelBounds::from_box(
        Vec3::new(-0.4, 0.0, -0.3),
        Vec3::new(0.4, 1.8, 0.3),
    ));

    viewer.dispatch(ViewerCommand::ApplyMaterial { id: "cinematic".into() })?;
    for id in ["bloom", "filmgrain", "crt", "dof"] {
        let outcome = viewer.toggle_effect(id);
        tracing::info!(effect = id, ?outcome, "Toggle");
    }
    viewer.dispatch(ViewerCommand::ApplyLightingPreset { id: "dramatic".into() })?;
    viewer.dispatch(ViewerCommand::SetCameraMode {
        mode: CameraMode::Cinematic,
    })?;

    let mut composed = 0;
    for _ in 0..600 {
        if viewer.frame(FRAME_DT) {
            composed += 1;
        }
    }
    let camera = viewer.camera().camera();
    tracing::info!(
        frames = composed,
        position = ?camera.position(),
        target = ?camera.target(),
        "Cinematic run finished"
    );

    let preset = viewer.save_preset("Demo")?;
    let json = viewer.export_preset(preset.timestamp)?;
    tracing::info!(bytes = json.len(), "Exported preset");
    println!("{}", json);

    tracing::info!(
        backend_calls = backend.calls().len(),
        scene_calls = scene.calls().len(),
        active = ?viewer.effects().active_ids(),
        "Session complete"
    );
    Ok(())
}
