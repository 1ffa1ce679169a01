//! Effects system for charviewer
//!
//! This module manages the two kinds of render modes the viewer offers:
//! - Material modes, mutually exclusive, applied to the model surfaces
//! - Post-process effects, stackable, composed after the scene pass
//!
//! # Architecture
//!
//! - **Data types** (`types.rs`): descriptors, variants and the runtime `EffectStack`
//! - **Registry** (`registry.rs`): catalog of descriptors and the budget admission check
//! - **Traits** (`traits.rs`): `SceneBackend`, the contract for applying materials
//! - **Controller** (`controller.rs`): the single owner of the `EffectStack`
//! - **Builtin** (`builtin/`): the shipped material and post-process catalog
//!
//! # Usage
//!
//! ```ignore
//! let registry = Arc::new(EffectRegistry::with_builtins(BudgetPolicy::default()));
//! let mut controller = EffectStackController::new(registry, pipeline, scene, events);
//!
//! controller.apply_material("chrome");
//! match controller.toggle_effect("dof") {
//!     ToggleOutcome::Blocked(reason) => println!("{reason}"),
//!     _ => {}
//! }
//! ```

mod controller;
mod registry;
mod traits;
mod types;
pub mod builtin;

pub use controller::*;
pub use registry::*;
pub use traits::*;
pub use types::*;
