//! Deterministic in-memory oracle for kernel tests.
//!
//! Dynamic actors move in a straight line at their initial velocity (no
//! gravity, no collisions). Kinematic actors jump to their target on step.
//! Queries against released handles are counted so tests can assert that
//! the frame loop never touches them.

use crate::oracle::{
    ActorDesc, ActorHandle, BodyKind, OracleError, SimulationEvent, SimulationOracle,
};
use cubefall_common::Pose;
use glam::Vec3;
use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub(crate) struct MockActor {
    pub desc: ActorDesc,
    pub pose: Pose,
    pub velocity: Vec3,
    pub kinematic_target: Option<Vec3>,
}

#[derive(Debug, Default)]
pub(crate) struct MockOracle {
    next: u64,
    pub actors: BTreeMap<ActorHandle, MockActor>,
    pub released: BTreeSet<ActorHandle>,
    pub release_calls: BTreeMap<ActorHandle, u32>,
    pub steps: u32,
    pub stale_queries: Cell<u32>,
    pending: Vec<SimulationEvent>,
    queued: Vec<SimulationEvent>,
}

impl MockOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event to be reported after the next step.
    pub fn inject_after_step(&mut self, event: SimulationEvent) {
        self.queued.push(event);
    }

    pub fn kind_of(&self, handle: ActorHandle) -> Option<BodyKind> {
        self.actors.get(&handle).map(|a| a.desc.kind)
    }
}

impl SimulationOracle for MockOracle {
    fn create_actor(&mut self, desc: &ActorDesc) -> Result<ActorHandle, OracleError> {
        desc.validate()?;
        self.next += 1;
        let handle = ActorHandle(self.next);
        self.actors.insert(
            handle,
            MockActor {
                desc: *desc,
                pose: desc.pose,
                velocity: desc.linear_velocity,
                kinematic_target: None,
            },
        );
        Ok(handle)
    }

    fn step(&mut self, dt: f32) {
        self.steps += 1;
        for actor in self.actors.values_mut() {
            match actor.desc.kind {
                BodyKind::Dynamic => actor.pose.position += actor.velocity * dt,
                BodyKind::Kinematic => {
                    if let Some(target) = actor.kinematic_target.take() {
                        actor.pose.position = target;
                    }
                }
                BodyKind::Static => {}
            }
        }
        self.pending.append(&mut self.queued);
    }

    fn pose(&self, handle: ActorHandle) -> Option<Pose> {
        if self.released.contains(&handle) {
            self.stale_queries.set(self.stale_queries.get() + 1);
        }
        self.actors.get(&handle).map(|a| a.pose)
    }

    fn set_kinematic_target(
        &mut self,
        handle: ActorHandle,
        position: Vec3,
    ) -> Result<(), OracleError> {
        let actor = self
            .actors
            .get_mut(&handle)
            .ok_or(OracleError::UnknownActor(handle))?;
        if actor.desc.kind != BodyKind::Kinematic {
            return Err(OracleError::NotKinematic(handle));
        }
        actor.kinematic_target = Some(position);
        Ok(())
    }

    fn teleport(&mut self, handle: ActorHandle, pose: Pose) -> Result<(), OracleError> {
        let actor = self
            .actors
            .get_mut(&handle)
            .ok_or(OracleError::UnknownActor(handle))?;
        actor.pose = pose;
        Ok(())
    }

    fn release(&mut self, handle: ActorHandle) -> Result<(), OracleError> {
        *self.release_calls.entry(handle).or_default() += 1;
        self.actors
            .remove(&handle)
            .ok_or(OracleError::UnknownActor(handle))?;
        self.released.insert(handle);
        Ok(())
    }

    fn is_releasable(&self, handle: ActorHandle) -> bool {
        self.actors.contains_key(&handle)
    }

    fn drain_events(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.pending)
    }

    fn actor_count(&self) -> usize {
        self.actors.len()
    }
}
