//! Input layer: raw key state mapped to demo actions.
//!
//! # Invariants
//! - The frame loop consumes `FrameInput` snapshots, never raw key events.
//! - Held state is level-triggered; edge detection lives in the kernel.

pub mod action;
pub mod state;

pub use action::Action;
pub use state::{ActionState, FrameInput};
