use crate::collision::CollisionCallback;
use cubefall_common::{PhysicsConfig, Pose};
use cubefall_kernel::{
    ActorDesc, ActorHandle, BodyKind, OracleError, Shape, SimulationEvent, SimulationOracle,
};
use glam::{Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

/// Pack a rapier body handle into the kernel's opaque handle.
pub(crate) fn actor_of_body(handle: RigidBodyHandle) -> ActorHandle {
    let (index, generation) = handle.into_raw_parts();
    ActorHandle(((generation as u64) << 32) | index as u64)
}

fn body_of_actor(actor: ActorHandle) -> RigidBodyHandle {
    RigidBodyHandle::from_raw_parts(actor.0 as u32, (actor.0 >> 32) as u32)
}

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn to_rotation(q: Quat) -> Rotation<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

/// [`SimulationOracle`] backed by a rapier3d pipeline.
pub struct RapierOracle {
    gravity: Vector<Real>,
    friction: Real,
    restitution: Real,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    callback: CollisionCallback,
}

impl RapierOracle {
    pub fn new(config: &PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.step_size as Real;

        tracing::info!(
            gravity = %config.gravity,
            step = config.step_size,
            "rapier pipeline ready"
        );

        Self {
            gravity: to_vector(config.gravity),
            friction: config.friction,
            restitution: config.restitution,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            callback: CollisionCallback::new(),
        }
    }

    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Linear velocity of a dynamic or kinematic actor.
    pub fn linear_velocity(&self, actor: ActorHandle) -> Option<Vec3> {
        let v = self.rigid_body_set.get(body_of_actor(actor))?.linvel();
        Some(Vec3::new(v.x, v.y, v.z))
    }

    fn collider_for(&self, desc: &ActorDesc) -> Collider {
        let builder = match desc.shape {
            Shape::Box { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            Shape::Sphere { radius } => ColliderBuilder::ball(radius),
            Shape::Plane => ColliderBuilder::halfspace(Vector::y_axis()),
        };
        let mut events = ActiveEvents::empty();
        if desc.sensor || desc.report_contacts {
            events |= ActiveEvents::COLLISION_EVENTS;
        }
        builder
            .density(desc.density)
            .friction(self.friction)
            .restitution(self.restitution)
            .sensor(desc.sensor)
            .active_events(events)
            .build()
    }
}

impl SimulationOracle for RapierOracle {
    fn create_actor(&mut self, desc: &ActorDesc) -> Result<ActorHandle, OracleError> {
        desc.validate()?;

        let builder = match desc.kind {
            BodyKind::Static => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
        };
        let mut body = builder
            .translation(to_vector(desc.pose.position))
            .linvel(to_vector(desc.linear_velocity))
            .ccd_enabled(desc.ccd)
            .build();
        body.set_rotation(to_rotation(desc.pose.rotation), false);

        let handle = self.rigid_body_set.insert(body);
        let collider = self.collider_for(desc);
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        let actor = actor_of_body(handle);
        tracing::trace!(%actor, kind = ?desc.kind, "actor created");
        Ok(actor)
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.callback,
        );
    }

    fn pose(&self, actor: ActorHandle) -> Option<Pose> {
        let body = self.rigid_body_set.get(body_of_actor(actor))?;
        let t = body.translation();
        let r = body.rotation();
        Some(Pose {
            position: Vec3::new(t.x, t.y, t.z),
            rotation: Quat::from_xyzw(r.i, r.j, r.k, r.w),
        })
    }

    fn set_kinematic_target(
        &mut self,
        actor: ActorHandle,
        position: Vec3,
    ) -> Result<(), OracleError> {
        let body = self
            .rigid_body_set
            .get_mut(body_of_actor(actor))
            .ok_or(OracleError::UnknownActor(actor))?;
        if !body.is_kinematic() {
            return Err(OracleError::NotKinematic(actor));
        }
        body.set_next_kinematic_translation(to_vector(position));
        Ok(())
    }

    fn teleport(&mut self, actor: ActorHandle, pose: Pose) -> Result<(), OracleError> {
        let body = self
            .rigid_body_set
            .get_mut(body_of_actor(actor))
            .ok_or(OracleError::UnknownActor(actor))?;
        body.set_translation(to_vector(pose.position), true);
        body.set_rotation(to_rotation(pose.rotation), true);
        body.set_linvel(Vector::zeros(), true);
        body.set_angvel(Vector::zeros(), true);
        Ok(())
    }

    fn release(&mut self, actor: ActorHandle) -> Result<(), OracleError> {
        self.rigid_body_set
            .remove(
                body_of_actor(actor),
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .ok_or(OracleError::UnknownActor(actor))?;
        tracing::trace!(%actor, "actor released");
        Ok(())
    }

    fn is_releasable(&self, actor: ActorHandle) -> bool {
        self.rigid_body_set.contains(body_of_actor(actor))
    }

    fn drain_events(&mut self) -> Vec<SimulationEvent> {
        self.callback.drain()
    }

    fn actor_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oracle() -> RapierOracle {
        RapierOracle::new(&PhysicsConfig::default())
    }

    #[test]
    fn handle_packing_round_trips() {
        let handle = RigidBodyHandle::from_raw_parts(17, 3);
        let actor = actor_of_body(handle);
        assert_eq!(actor.0, (3u64 << 32) | 17);
        assert_eq!(body_of_actor(actor), handle);
    }

    #[test]
    fn create_reports_initial_pose() {
        let mut oracle = oracle();
        let rotation = Quat::from_rotation_y(0.5);
        let actor = oracle
            .create_actor(
                &ActorDesc::dynamic(Shape::Sphere { radius: 0.5 }, Vec3::new(1.0, 2.0, 3.0))
                    .with_rotation(rotation),
            )
            .unwrap();
        let pose = oracle.pose(actor).unwrap();
        assert_eq!(pose.position, Vec3::new(1.0, 2.0, 3.0));
        assert!(pose.rotation.abs_diff_eq(rotation, 1e-5));
        assert_eq!(oracle.collider_count(), 1);
    }

    #[test]
    fn invalid_descriptor_rejected() {
        let mut oracle = oracle();
        let err = oracle
            .create_actor(&ActorDesc::dynamic(Shape::Sphere { radius: 0.0 }, Vec3::ZERO))
            .unwrap_err();
        assert!(matches!(err, OracleError::InvalidDescriptor(_)));
        assert_eq!(oracle.actor_count(), 0);
    }

    #[test]
    fn release_is_one_shot() {
        let mut oracle = oracle();
        let actor = oracle
            .create_actor(&ActorDesc::dynamic(
                Shape::Box {
                    half_extents: Vec3::splat(0.5),
                },
                Vec3::Y,
            ))
            .unwrap();
        assert!(oracle.is_releasable(actor));
        oracle.release(actor).unwrap();
        assert!(!oracle.is_releasable(actor));
        assert!(oracle.pose(actor).is_none());
        assert_eq!(oracle.collider_count(), 0);
        assert!(matches!(
            oracle.release(actor),
            Err(OracleError::UnknownActor(a)) if a == actor
        ));
    }

    #[test]
    fn kinematic_target_only_for_kinematic() {
        let mut oracle = oracle();
        let dynamic = oracle
            .create_actor(&ActorDesc::dynamic(Shape::Sphere { radius: 1.0 }, Vec3::ZERO))
            .unwrap();
        assert!(matches!(
            oracle.set_kinematic_target(dynamic, Vec3::X),
            Err(OracleError::NotKinematic(_))
        ));
    }

    #[test]
    fn teleport_zeroes_velocity() {
        let mut oracle = oracle();
        let actor = oracle
            .create_actor(
                &ActorDesc::dynamic(Shape::Sphere { radius: 0.5 }, Vec3::ZERO)
                    .with_velocity(Vec3::new(0.0, 0.0, -40.0)),
            )
            .unwrap();
        oracle.teleport(actor, Pose::at(Vec3::new(0.0, 15.0, 15.0))).unwrap();
        assert_eq!(oracle.pose(actor).unwrap().position, Vec3::new(0.0, 15.0, 15.0));
        assert_eq!(oracle.linear_velocity(actor), Some(Vec3::ZERO));
    }
}
