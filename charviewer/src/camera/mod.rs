//! Camera system for the model viewport
//!
//! - **Orbit** (`orbit.rs`): `ViewerCamera`, pose, projection and manual controls
//! - **Animator** (`animator.rs`): procedural modes with blended transitions
//! - **Motion** (`motion.rs`, `cinematic.rs`): per-mode target poses
//! - **Bounds** (`bounds.rs`): model bounds reported on load

mod animator;
mod bounds;
pub mod cinematic;
mod ease;
mod mode;
pub mod motion;
mod orbit;

pub use animator::{CameraAnimationState, CameraAnimator};
pub use bounds::ModelBounds;
pub use ease::Ease;
pub use mode::CameraMode;
pub use motion::Pose;
pub use orbit::ViewerCamera;
