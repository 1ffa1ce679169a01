//! Camera animation modes

use serde::{Deserialize, Serialize};

/// Procedural camera motion mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraMode {
    /// Manual, user-controlled camera
    #[default]
    None,
    Turntable,
    Cinematic,
    Drift,
    Bounce,
}

impl CameraMode {
    /// Get all modes
    pub fn all() -> &'static [CameraMode] {
        &[
            CameraMode::None,
            CameraMode::Turntable,
            CameraMode::Cinematic,
            CameraMode::Drift,
            CameraMode::Bounce,
        ]
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            CameraMode::None => "Manual",
            CameraMode::Turntable => "Turntable",
            CameraMode::Cinematic => "Cinematic",
            CameraMode::Drift => "Drift",
            CameraMode::Bounce => "Bounce",
        }
    }

    /// Whether the camera moves on its own in this mode
    pub fn is_animated(&self) -> bool {
        *self != CameraMode::None
    }

    /// Horizontal angular rate (rad per unit time) used to seed time from
    /// the current camera angle. `None` for modes that always start at zero.
    pub fn angular_rate(&self) -> Option<f32> {
        match self {
            CameraMode::Turntable => Some(0.4),
            CameraMode::Bounce => Some(0.6),
            CameraMode::Drift => Some(0.12),
            CameraMode::Cinematic | CameraMode::None => None,
        }
    }

    /// Seconds spent blending into this mode
    pub fn transition_duration(&self) -> f32 {
        match self {
            CameraMode::Cinematic => 2.0,
            _ => 1.2,
        }
    }
}
