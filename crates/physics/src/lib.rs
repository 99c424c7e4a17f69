//! rapier3d backend for the frame loop.

pub mod collision;
pub mod oracle;

pub use collision::CollisionCallback;
pub use oracle::RapierOracle;

use cubefall_common::DemoConfig;
use cubefall_kernel::{KernelError, Scene};
use glam::Vec3;

/// Build the demo scene on a fresh rapier world.
pub fn rapier_scene(config: &DemoConfig, eye: Vec3) -> Result<Scene<RapierOracle>, KernelError> {
    Scene::build(RapierOracle::new(&config.physics), config, eye)
}
