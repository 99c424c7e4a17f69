//! Demo configuration loaded from an optional JSON file.
//!
//! Every field has a default so a partial file (or none at all) is valid.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// When elapsed frame time is banked into the physics accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Accumulate every frame.
    #[default]
    Always,
    /// Accumulate only while the step input is held.
    WhileHeld,
    /// Every press of the step input performs exactly one step.
    OnPress,
}

/// What happens to banked time after a step is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Accumulator returns to zero; time above one step is dropped.
    #[default]
    Reset,
    /// One step is subtracted; the remainder (at most one step) carries over.
    Carry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub camera_speed: f32,
    pub camera_start: Vec3,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            title: "cubefall".into(),
            fov_degrees: 45.0,
            near: 0.1,
            far: 1000.0,
            camera_speed: 10.0,
            camera_start: Vec3::new(0.0, 6.0, 25.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
    /// Fixed simulation step in seconds.
    pub step_size: f64,
    pub activation: Activation,
    pub overflow: OverflowPolicy,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.8, 0.0),
            step_size: 1.0 / 165.0,
            activation: Activation::Always,
            overflow: OverflowPolicy::Reset,
            friction: 0.5,
            restitution: 0.5,
        }
    }
}

/// Axis-aligned trigger volume placed in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerConfig {
    pub center: Vec3,
    pub half_extents: Vec3,
    /// Where dynamic bodies entering the volume are moved. `None` only logs.
    #[serde(default)]
    pub teleport_to: Option<Vec3>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub stack_columns: u32,
    pub stack_layers: u32,
    pub stack_origin: Vec3,
    pub box_half_extent: f32,
    pub box_density: f32,
    pub projectile_radius: f32,
    pub projectile_density: f32,
    pub projectile_speed: f32,
    pub camera_collider_radius: f32,
    /// Actors farther than this from the viewer are released.
    pub cull_distance: f32,
    pub floor_extent: f32,
    pub marker_position: Option<Vec3>,
    pub trigger: Option<TriggerConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            stack_columns: 8,
            stack_layers: 8,
            stack_origin: Vec3::new(0.0, 0.0, 0.0),
            box_half_extent: 0.5,
            box_density: 1.0,
            projectile_radius: 0.5,
            projectile_density: 5.0,
            projectile_speed: 40.0,
            camera_collider_radius: 1.0,
            cull_distance: 100.0,
            floor_extent: 10.0,
            marker_position: Some(Vec3::new(10.0, 0.0, 0.0)),
            // A thin gate between the default camera and the stack that
            // projectiles fly through. It only logs.
            trigger: Some(TriggerConfig {
                center: Vec3::new(0.0, 4.0, 12.0),
                half_extents: Vec3::new(4.0, 4.0, 0.5),
                teleport_to: None,
            }),
        }
    }
}

/// Optional texture files. Missing entries use generated textures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub crate_texture: Option<PathBuf>,
    pub projectile_texture: Option<PathBuf>,
    pub floor_texture: Option<PathBuf>,
}

/// Top-level demo configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub physics: PhysicsConfig,
    pub scene: SceneConfig,
    pub assets: AssetConfig,
}

impl DemoConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_reader(std::io::BufReader::new(file)).map_err(|source| {
                ConfigError::Json {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
        config.validate()?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn to_json_pretty(&self) -> String {
        // Serializing plain data with string keys cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        if !p.step_size.is_finite() || p.step_size <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "physics.step_size must be positive, got {}",
                p.step_size
            )));
        }
        let s = &self.scene;
        if s.cull_distance.is_nan() || s.cull_distance <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "scene.cull_distance must be positive, got {}",
                s.cull_distance
            )));
        }
        for (name, value) in [
            ("scene.box_half_extent", s.box_half_extent),
            ("scene.box_density", s.box_density),
            ("scene.projectile_radius", s.projectile_radius),
            ("scene.projectile_density", s.projectile_density),
            ("scene.camera_collider_radius", s.camera_collider_radius),
            ("scene.floor_extent", s.floor_extent),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if let Some(trigger) = &s.trigger {
            // `min_element` skips NaN, so compare every lane.
            if !trigger.half_extents.cmpgt(Vec3::ZERO).all() {
                return Err(ConfigError::Invalid(format!(
                    "scene.trigger.half_extents must be positive, got {}",
                    trigger.half_extents
                )));
            }
            if !trigger.center.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "scene.trigger.center must be finite, got {}",
                    trigger.center
                )));
            }
        }
        if self.window.near <= 0.0 || self.window.far <= self.window.near {
            return Err(ConfigError::Invalid(format!(
                "window clip range {}..{} is empty",
                self.window.near, self.window.far
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = DemoConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.physics.activation, Activation::Always);
        assert_eq!(config.physics.overflow, OverflowPolicy::Reset);
        assert!((config.physics.step_size - 1.0 / 165.0).abs() < 1e-12);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "physics": {{ "activation": "while_held", "overflow": "carry" }},
                 "scene": {{ "cull_distance": 42.0 }} }}"#
        )
        .unwrap();

        let config = DemoConfig::load(file.path()).unwrap();
        assert_eq!(config.physics.activation, Activation::WhileHeld);
        assert_eq!(config.physics.overflow, OverflowPolicy::Carry);
        assert_eq!(config.scene.cull_distance, 42.0);
        assert_eq!(config.scene.stack_columns, SceneConfig::default().stack_columns);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DemoConfig::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_json_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = DemoConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn zero_step_size_rejected() {
        let mut config = DemoConfig::default();
        config.physics.step_size = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn negative_cull_distance_rejected() {
        let mut config = DemoConfig::default();
        config.scene.cull_distance = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_scene_has_log_only_trigger() {
        let config = DemoConfig::default();
        let trigger = config.scene.trigger.as_ref().unwrap();
        assert!(trigger.teleport_to.is_none());
        // Sits on the line from the default camera to the stack.
        let camera = config.window.camera_start;
        let stack = config.scene.stack_origin;
        assert!(trigger.center.z < camera.z && trigger.center.z > stack.z);
        assert!(trigger.half_extents.cmpgt(Vec3::ZERO).all());
    }

    #[test]
    fn zero_floor_extent_rejected() {
        let mut config = DemoConfig::default();
        config.scene.floor_extent = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scene.floor_extent"));
    }

    #[test]
    fn nan_trigger_extent_rejected() {
        let mut config = DemoConfig::default();
        config.scene.trigger = Some(TriggerConfig {
            center: Vec3::ZERO,
            half_extents: Vec3::new(f32::NAN, 1.0, 1.0),
            teleport_to: None,
        });
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scene.trigger.half_extents"));
    }

    #[test]
    fn trigger_teleport_defaults_to_log_only() {
        let trigger: TriggerConfig = serde_json::from_str(
            r#"{ "center": [0.0, 1.0, 0.0], "half_extents": [1.0, 1.0, 1.0] }"#,
        )
        .unwrap();
        assert!(trigger.teleport_to.is_none());
    }

    #[test]
    fn json_output_loads_back() {
        let config = DemoConfig::default();
        let text = config.to_json_pretty();
        let parsed: DemoConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn load_or_default_without_path() {
        let config = DemoConfig::load_or_default(None).unwrap();
        assert_eq!(config, DemoConfig::default());
    }
}
