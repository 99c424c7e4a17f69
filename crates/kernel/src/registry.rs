use crate::oracle::ActorHandle;
use cubefall_common::EntityId;
use glam::Vec3;

/// Which mesh a draw item uses. Meshes are unit sized (cube edge 1, sphere
/// diameter 1) and scaled per draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MeshKind {
    Cube,
    Sphere,
}

/// Which texture a draw item is bound with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaterialKind {
    Crate,
    Projectile,
    Floor,
    Marker,
}

/// Render archetype of a tracked entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Archetype {
    /// Box from the stack build-out.
    Crate { half_extent: f32 },
    /// Sphere launched from the camera.
    Projectile { radius: f32 },
}

impl Archetype {
    pub fn mesh(&self) -> MeshKind {
        match self {
            Archetype::Crate { .. } => MeshKind::Cube,
            Archetype::Projectile { .. } => MeshKind::Sphere,
        }
    }

    pub fn material(&self) -> MaterialKind {
        match self {
            Archetype::Crate { .. } => MaterialKind::Crate,
            Archetype::Projectile { .. } => MaterialKind::Projectile,
        }
    }

    /// Scale applied to the unit mesh so it matches the collider.
    pub fn scale(&self) -> Vec3 {
        match *self {
            Archetype::Crate { half_extent } => Vec3::splat(half_extent * 2.0),
            Archetype::Projectile { radius } => Vec3::splat(radius * 2.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Archetype::Crate { .. } => "crate",
            Archetype::Projectile { .. } => "projectile",
        }
    }
}

/// A dynamic actor the frame loop queries and draws every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityRecord {
    pub id: EntityId,
    pub actor: ActorHandle,
    pub archetype: Archetype,
}

/// Insertion-ordered collection of tracked entities.
///
/// Draw order follows insertion order, so the stack is drawn before any
/// projectile launched after it.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    records: Vec<EntityRecord>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn insert(&mut self, actor: ActorHandle, archetype: Archetype) -> EntityId {
        let id = EntityId::new();
        self.records.push(EntityRecord {
            id,
            actor,
            archetype,
        });
        id
    }

    /// Remove a record. Returns it only the first time.
    pub fn remove(&mut self, id: EntityId) -> Option<EntityRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        Some(self.records.remove(index))
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn find_by_actor(&self, actor: ActorHandle) -> Option<&EntityRecord> {
        self.records.iter().find(|r| r.actor == actor)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.iter()
    }

    /// Remove every record, newest first.
    pub fn drain_newest_first(&mut self) -> Vec<EntityRecord> {
        let mut drained: Vec<EntityRecord> = self.records.drain(..).collect();
        drained.reverse();
        drained
    }

    pub fn count_of(&self, label: &str) -> usize {
        self.records
            .iter()
            .filter(|r| r.archetype.label() == label)
            .count()
    }
}
