//! Shared types and configuration for the cubefall workspace.

pub mod config;
pub mod types;

pub use config::{
    Activation, AssetConfig, ConfigError, DemoConfig, OverflowPolicy, PhysicsConfig,
    SceneConfig, TriggerConfig, WindowConfig,
};
pub use types::{EntityId, Pose, Transform};
