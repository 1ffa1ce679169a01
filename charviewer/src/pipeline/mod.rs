//! Post-process pass pipeline
//!
//! - **Traits** (`traits.rs`): `RenderBackend` contract and per-pass uniform requirements
//! - **Runtime** (`runtime.rs`): `PassPipeline`, the ordered chain of passes

mod runtime;
mod traits;

pub use runtime::*;
pub use traits::*;
