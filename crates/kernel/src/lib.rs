//! Frame loop kernel: drives an opaque physics oracle at a fixed cadence and
//! tracks the dynamic actors the demo renders.
//!
//! # Invariants
//! - At most one simulation step per frame, whatever the frame time.
//! - A tracked entity is evicted exactly once; its actor is released in the
//!   same frame and never queried again.
//! - One projectile per press of the spawn input.
//! - Actor poses change only inside `SimulationOracle::step`, or through an
//!   explicit teleport right after it.

pub mod latch;
pub mod oracle;
pub mod registry;
pub mod scene;
pub mod step;

#[cfg(test)]
pub(crate) mod mock;

pub use latch::EdgeLatch;
pub use oracle::{
    ActorDesc, ActorHandle, BodyKind, OracleError, Shape, SimulationEvent, SimulationOracle,
};
pub use registry::{Archetype, EntityRecord, EntityRegistry, MaterialKind, MeshKind};
pub use scene::{
    DrawItem, DrawList, EVENT_LOG_CAPACITY, Frame, KernelError, Scene, SceneEvent, Viewer,
};
pub use step::FixedStep;
