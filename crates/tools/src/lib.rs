//! Developer tooling: scene inspector and frame counter.
//!
//! # Invariants
//! - Tools only read the scene; they never step or mutate it.

mod fps;
mod inspector;

pub use fps::FpsCounter;
pub use inspector::{EntityInfo, SceneInspector, SceneSummary};
