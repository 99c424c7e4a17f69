//! Rendering adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read a `DrawList` and a view; they never touch the oracle or
//!   the entity registry.
//! - Every item in the draw list is drawn exactly as submitted.
//!
//! The text renderer serves headless runs and tests. The wgpu backend lives
//! in its own crate and batches the same draw list into GPU instances.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
