use cubefall_common::EntityId;
use cubefall_kernel::{Scene, SimulationOracle};

/// Read-only queries against a running scene for debugging and the
/// desktop overlay.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary<O: SimulationOracle>(scene: &Scene<O>) -> SceneSummary {
        let registry = scene.registry();
        SceneSummary {
            tick: scene.tick(),
            frames: scene.frames(),
            crates: registry.count_of("crate"),
            projectiles: registry.count_of("projectile"),
            actors: scene.oracle().actor_count(),
            contacts: scene.contacts_seen(),
            pending_events: scene.events().len(),
        }
    }

    pub fn inspect_entity<O: SimulationOracle>(
        scene: &Scene<O>,
        id: EntityId,
    ) -> Option<EntityInfo> {
        let record = scene.registry().get(id)?;
        let pose = scene.oracle().pose(record.actor)?;
        let p = pose.position;
        let r = pose.rotation;
        Some(EntityInfo {
            id,
            kind: record.archetype.label(),
            position: [p.x, p.y, p.z],
            rotation: [r.x, r.y, r.z, r.w],
        })
    }

    pub fn list_entities<O: SimulationOracle>(scene: &Scene<O>) -> Vec<EntityId> {
        scene.registry().iter().map(|r| r.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub tick: u64,
    pub frames: u64,
    pub crates: usize,
    pub projectiles: usize,
    /// Every actor the oracle holds, including ground and camera collider.
    pub actors: usize,
    pub contacts: u64,
    pub pending_events: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: tick={} frames={} crates={} projectiles={} actors={} contacts={}",
            self.tick, self.frames, self.crates, self.projectiles, self.actors, self.contacts
        )
    }
}

#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub kind: &'static str,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] pos=({:.2}, {:.2}, {:.2})",
            self.kind,
            self.id.short(),
            self.position[0],
            self.position[1],
            self.position[2],
        )
    }
}
