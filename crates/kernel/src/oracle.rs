use cubefall_common::Pose;
use glam::{Quat, Vec3};

/// Opaque reference to an actor owned by a `SimulationOracle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorHandle(pub u64);

impl std::fmt::Display for ActorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor#{:x}", self.0)
    }
}

/// How the solver treats an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Never moves.
    Static,
    /// Integrated by the solver.
    Dynamic,
    /// Moved by the caller through kinematic targets; pushes dynamic bodies.
    Kinematic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
    /// Infinite plane through the actor origin with normal +Y.
    Plane,
}

/// Everything the oracle needs to create an actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorDesc {
    pub kind: BodyKind,
    pub shape: Shape,
    pub pose: Pose,
    pub density: f32,
    pub linear_velocity: Vec3,
    /// Overlap-only trigger volume.
    pub sensor: bool,
    /// Emit `SimulationEvent::Contact` when this actor touches another.
    pub report_contacts: bool,
    /// Continuous collision detection, for fast projectiles.
    pub ccd: bool,
}

impl ActorDesc {
    fn new(kind: BodyKind, shape: Shape, position: Vec3) -> Self {
        Self {
            kind,
            shape,
            pose: Pose::at(position),
            density: 1.0,
            linear_velocity: Vec3::ZERO,
            sensor: false,
            report_contacts: false,
            ccd: false,
        }
    }

    pub fn fixed(shape: Shape, position: Vec3) -> Self {
        Self::new(BodyKind::Static, shape, position)
    }

    pub fn dynamic(shape: Shape, position: Vec3) -> Self {
        Self::new(BodyKind::Dynamic, shape, position)
    }

    pub fn kinematic(shape: Shape, position: Vec3) -> Self {
        Self::new(BodyKind::Kinematic, shape, position)
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.pose.rotation = rotation;
        self
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.linear_velocity = velocity;
        self
    }

    pub fn as_sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    pub fn reporting_contacts(mut self) -> Self {
        self.report_contacts = true;
        self
    }

    pub fn with_ccd(mut self) -> Self {
        self.ccd = true;
        self
    }

    /// Reject descriptors no backend can build.
    pub fn validate(&self) -> Result<(), OracleError> {
        match self.shape {
            Shape::Box { half_extents } if !half_extents.cmpgt(Vec3::ZERO).all() => {
                return Err(OracleError::InvalidDescriptor(format!(
                    "box half extents must be positive, got {half_extents}"
                )));
            }
            Shape::Sphere { radius } if radius.is_nan() || radius <= 0.0 => {
                return Err(OracleError::InvalidDescriptor(format!(
                    "sphere radius must be positive, got {radius}"
                )));
            }
            Shape::Plane if self.kind != BodyKind::Static => {
                return Err(OracleError::InvalidDescriptor(
                    "planes must be static".into(),
                ));
            }
            _ => {}
        }
        if self.kind == BodyKind::Dynamic && (self.density.is_nan() || self.density <= 0.0) {
            return Err(OracleError::InvalidDescriptor(format!(
                "dynamic actor density must be positive, got {}",
                self.density
            )));
        }
        Ok(())
    }
}

/// Notifications produced during a step.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    TriggerEntered {
        trigger: ActorHandle,
        other: ActorHandle,
    },
    TriggerExited {
        trigger: ActorHandle,
        other: ActorHandle,
    },
    /// Two actors started touching. Points are in world space.
    Contact {
        first: ActorHandle,
        second: ActorHandle,
        points: Vec<Vec3>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("unknown actor {0}")]
    UnknownActor(ActorHandle),
    #[error("actor {0} is not kinematic")]
    NotKinematic(ActorHandle),
    #[error("invalid actor descriptor: {0}")]
    InvalidDescriptor(String),
}

/// The physics engine as seen by the frame loop.
///
/// Implementations own every actor; the loop only holds handles. Poses are
/// read-only from the outside and change during `step`.
pub trait SimulationOracle {
    fn create_actor(&mut self, desc: &ActorDesc) -> Result<ActorHandle, OracleError>;

    /// Advance the simulation by `dt` seconds. Blocks until results are ready.
    fn step(&mut self, dt: f32);

    /// Current world pose, or `None` for unknown or released handles.
    fn pose(&self, handle: ActorHandle) -> Option<Pose>;

    /// Position a kinematic actor will reach at the end of the next step.
    fn set_kinematic_target(&mut self, handle: ActorHandle, position: Vec3)
    -> Result<(), OracleError>;

    /// Move an actor immediately, bypassing the solver.
    fn teleport(&mut self, handle: ActorHandle, pose: Pose) -> Result<(), OracleError>;

    fn release(&mut self, handle: ActorHandle) -> Result<(), OracleError>;

    fn is_releasable(&self, handle: ActorHandle) -> bool;

    /// Events collected since the last call.
    fn drain_events(&mut self) -> Vec<SimulationEvent>;

    fn actor_count(&self) -> usize;
}
