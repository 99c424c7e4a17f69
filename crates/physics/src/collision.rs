//! Collision callback invoked by rapier during a step.
//!
//! The callback only observes: it logs what happened and queues a
//! [`SimulationEvent`] for the frame loop. Any reaction (such as a trigger
//! teleport) happens after the step returns.

use crate::oracle::actor_of_body;
use cubefall_kernel::{ActorHandle, SimulationEvent};
use glam::Vec3;
use rapier3d::prelude::*;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct CollisionCallback {
    queue: Mutex<Vec<SimulationEvent>>,
}

impl CollisionCallback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<SimulationEvent> {
        match self.queue.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    fn push(&self, event: SimulationEvent) {
        match self.queue.lock() {
            Ok(mut queue) => queue.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}

fn owner(colliders: &ColliderSet, handle: ColliderHandle) -> Option<(ActorHandle, bool)> {
    let collider = colliders.get(handle)?;
    let body = collider.parent()?;
    Some((actor_of_body(body), collider.is_sensor()))
}

/// World-space contact points of every manifold in the pair.
fn contact_points(pair: &ContactPair) -> Vec<Vec3> {
    pair.manifolds
        .iter()
        .flat_map(|m| m.data.solver_contacts.iter())
        .map(|c| Vec3::new(c.point.x, c.point.y, c.point.z))
        .collect()
}

impl EventHandler for CollisionCallback {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        contact_pair: Option<&ContactPair>,
    ) {
        let (Some((a, a_sensor)), Some((b, _))) = (
            owner(colliders, event.collider1()),
            owner(colliders, event.collider2()),
        ) else {
            // One side was removed this step.
            return;
        };

        if event.sensor() {
            let (trigger, other) = if a_sensor { (a, b) } else { (b, a) };
            if event.started() {
                tracing::info!(%trigger, %other, "trigger entered");
                self.push(SimulationEvent::TriggerEntered { trigger, other });
            } else {
                tracing::debug!(%trigger, %other, "trigger exited");
                self.push(SimulationEvent::TriggerExited { trigger, other });
            }
            return;
        }

        if !event.started() {
            return;
        }
        let points = contact_pair.map(contact_points).unwrap_or_default();
        for point in &points {
            tracing::debug!(first = %a, second = %b, "contact at {point}");
        }
        self.push(SimulationEvent::Contact {
            first: a,
            second: b,
            points,
        });
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}
