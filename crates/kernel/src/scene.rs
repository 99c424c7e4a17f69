use crate::latch::EdgeLatch;
use crate::oracle::{ActorDesc, ActorHandle, OracleError, Shape, SimulationEvent, SimulationOracle};
use crate::registry::{Archetype, EntityRegistry, MaterialKind, MeshKind};
use crate::step::FixedStep;
use cubefall_common::{DemoConfig, EntityId, Pose, SceneConfig, Transform};
use cubefall_input::FrameInput;
use glam::Vec3;

/// Gap left between the camera collider and a freshly spawned projectile.
const SPAWN_CLEARANCE: f32 = 0.1;

/// Undrained events kept before the oldest half is dropped.
pub const EVENT_LOG_CAPACITY: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),
}

/// Where the frame is seen from. The camera collider follows `position`;
/// projectiles launch along `forward`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewer {
    pub position: Vec3,
    pub forward: Vec3,
}

impl Viewer {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        Self {
            position,
            forward: forward.try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }
}

/// One render submission.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// `None` for static scenery.
    pub entity: Option<EntityId>,
    pub mesh: MeshKind,
    pub material: MaterialKind,
    pub transform: Transform,
}

/// Everything to draw this frame, tracked entities first, then scenery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub items: Vec<DrawItem>,
}

impl DrawList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawItem> {
        self.items.iter()
    }

    pub fn contains_entity(&self, id: EntityId) -> bool {
        self.items.iter().any(|item| item.entity == Some(id))
    }

    pub fn count_material(&self, material: MaterialKind) -> usize {
        self.items.iter().filter(|i| i.material == material).count()
    }
}

/// Record of everything the scene did, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    Spawned { id: EntityId, archetype: Archetype },
    Evicted { id: EntityId, distance: f32 },
    /// The oracle no longer knew the actor; the record was dropped.
    Lost { id: EntityId },
    Stepped { tick: u64 },
    TriggerEntered { other: ActorHandle },
    Teleported { id: EntityId, to: Vec3 },
    Contact { points: usize },
}

/// Result of one call to [`Scene::frame`].
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub stepped: bool,
    pub spawned: Option<EntityId>,
    pub evicted: Vec<EntityId>,
    pub draws: DrawList,
}

#[derive(Debug, Clone, Copy)]
struct TriggerState {
    actor: ActorHandle,
    teleport_to: Option<Vec3>,
}

/// The demo's explicit context: oracle, tracked entities, clock and input
/// latches, driven one frame at a time.
pub struct Scene<O: SimulationOracle> {
    oracle: O,
    registry: EntityRegistry,
    clock: FixedStep,
    spawn_latch: EdgeLatch,
    camera_actor: ActorHandle,
    static_actors: Vec<ActorHandle>,
    static_draws: Vec<DrawItem>,
    trigger: Option<TriggerState>,
    settings: SceneConfig,
    tick: u64,
    frames: u64,
    contacts_seen: u64,
    events: Vec<SceneEvent>,
}

/// Positions of the stack build-out: a wall of `columns x layers` boxes
/// centred on `stack_origin.x`, resting on y = 0.
pub fn stack_positions(config: &SceneConfig) -> Vec<Vec3> {
    let h = config.box_half_extent;
    let columns = config.stack_columns;
    let half_width = (columns.saturating_sub(1)) as f32 * h;
    let mut positions = Vec::with_capacity((columns * config.stack_layers) as usize);
    for layer in 0..config.stack_layers {
        for column in 0..columns {
            positions.push(
                config.stack_origin
                    + Vec3::new(
                        column as f32 * 2.0 * h - half_width,
                        h + layer as f32 * 2.0 * h,
                        0.0,
                    ),
            );
        }
    }
    positions
}

impl<O: SimulationOracle> Scene<O> {
    /// Create the ground, trigger volume, camera collider and box stack.
    pub fn build(mut oracle: O, config: &DemoConfig, eye: Vec3) -> Result<Self, KernelError> {
        let settings = config.scene.clone();
        let mut static_actors = Vec::new();

        static_actors.push(oracle.create_actor(&ActorDesc::fixed(Shape::Plane, Vec3::ZERO))?);

        let trigger = match &settings.trigger {
            Some(t) => {
                let actor = oracle.create_actor(
                    &ActorDesc::fixed(
                        Shape::Box {
                            half_extents: t.half_extents,
                        },
                        t.center,
                    )
                    .as_sensor(),
                )?;
                static_actors.push(actor);
                Some(TriggerState {
                    actor,
                    teleport_to: t.teleport_to,
                })
            }
            None => None,
        };

        let camera_actor = oracle.create_actor(&ActorDesc::kinematic(
            Shape::Sphere {
                radius: settings.camera_collider_radius,
            },
            eye,
        ))?;

        let mut registry = EntityRegistry::new();
        let half_extent = settings.box_half_extent;
        for position in stack_positions(&settings) {
            let actor = oracle.create_actor(
                &ActorDesc::dynamic(
                    Shape::Box {
                        half_extents: Vec3::splat(half_extent),
                    },
                    position,
                )
                .with_density(settings.box_density),
            )?;
            registry.insert(actor, Archetype::Crate { half_extent });
        }

        let mut static_draws = vec![DrawItem {
            entity: None,
            mesh: MeshKind::Cube,
            material: MaterialKind::Floor,
            transform: Transform {
                position: Vec3::new(0.0, -0.05, 0.0),
                scale: Vec3::new(settings.floor_extent * 2.0, 0.1, settings.floor_extent * 2.0),
                ..Transform::default()
            },
        }];
        if let Some(marker) = settings.marker_position {
            static_draws.push(DrawItem {
                entity: None,
                mesh: MeshKind::Cube,
                material: MaterialKind::Marker,
                transform: Transform {
                    position: marker,
                    ..Transform::default()
                },
            });
        }

        let physics = &config.physics;
        tracing::info!(
            crates = registry.len(),
            step = physics.step_size,
            activation = ?physics.activation,
            overflow = ?physics.overflow,
            "scene built"
        );

        Ok(Self {
            oracle,
            registry,
            clock: FixedStep::new(physics.step_size, physics.activation, physics.overflow),
            spawn_latch: EdgeLatch::new(),
            camera_actor,
            static_actors,
            static_draws,
            trigger,
            settings,
            tick: 0,
            frames: 0,
            contacts_seen: 0,
            events: Vec::new(),
        })
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn clock(&self) -> &FixedStep {
        &self.clock
    }

    pub fn camera_actor(&self) -> ActorHandle {
        self.camera_actor
    }

    pub fn trigger_actor(&self) -> Option<ActorHandle> {
        self.trigger.map(|t| t.actor)
    }

    /// Simulation steps taken so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn contacts_seen(&self) -> u64 {
        self.contacts_seen
    }

    /// Events since the last drain, oldest first. Holds at most
    /// [`EVENT_LOG_CAPACITY`] entries; callers that never drain lose the
    /// oldest ones.
    pub fn events(&self) -> &[SceneEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    fn record(&mut self, event: SceneEvent) {
        if self.events.len() >= EVENT_LOG_CAPACITY {
            let dropped = EVENT_LOG_CAPACITY / 2;
            self.events.drain(..dropped);
            tracing::debug!(dropped, "scene event log full; dropping oldest events");
        }
        self.events.push(event);
    }

    /// Launch a sphere from just outside the camera collider along the view
    /// direction.
    pub fn spawn_projectile(&mut self, viewer: &Viewer) -> Result<EntityId, KernelError> {
        let s = &self.settings;
        let offset = s.camera_collider_radius + s.projectile_radius + SPAWN_CLEARANCE;
        let position = viewer.position + viewer.forward * offset;
        let desc = ActorDesc::dynamic(
            Shape::Sphere {
                radius: s.projectile_radius,
            },
            position,
        )
        .with_density(s.projectile_density)
        .with_velocity(viewer.forward * s.projectile_speed)
        .with_ccd()
        .reporting_contacts();

        let actor = self.oracle.create_actor(&desc)?;
        let archetype = Archetype::Projectile {
            radius: s.projectile_radius,
        };
        let id = self.registry.insert(actor, archetype);
        self.record(SceneEvent::Spawned { id, archetype });
        tracing::debug!(%id, %actor, "projectile spawned at {position}");
        Ok(id)
    }

    /// Run one frame: sync the camera collider, handle the spawn edge, step
    /// at most once, then query, cull and collect draws for every entity.
    pub fn frame(
        &mut self,
        dt: f64,
        input: &FrameInput,
        viewer: &Viewer,
    ) -> Result<Frame, KernelError> {
        self.frames += 1;
        self.oracle
            .set_kinematic_target(self.camera_actor, viewer.position)?;

        let spawned = if self.spawn_latch.update(input.spawn_held) {
            Some(self.spawn_projectile(viewer)?)
        } else {
            None
        };

        let stepped = self.clock.advance(dt, input.step_held);
        if stepped {
            self.oracle.step(self.clock.step_size() as f32);
            self.tick += 1;
            self.record(SceneEvent::Stepped { tick: self.tick });
            self.handle_simulation_events()?;
        }

        let (draws, evicted) = self.collect_draws(viewer.position)?;
        Ok(Frame {
            stepped,
            spawned,
            evicted,
            draws,
        })
    }

    fn handle_simulation_events(&mut self) -> Result<(), KernelError> {
        for event in self.oracle.drain_events() {
            match event {
                SimulationEvent::TriggerEntered { trigger, other } => {
                    self.record(SceneEvent::TriggerEntered { other });
                    let Some(state) = self.trigger.filter(|t| t.actor == trigger) else {
                        continue;
                    };
                    let Some(target) = state.teleport_to else {
                        continue;
                    };
                    let Some(id) = self.registry.find_by_actor(other).map(|r| r.id) else {
                        continue;
                    };
                    tracing::info!(%id, "teleporting to {target}");
                    self.oracle.teleport(other, Pose::at(target))?;
                    self.record(SceneEvent::Teleported { id, to: target });
                }
                SimulationEvent::TriggerExited { other, .. } => {
                    tracing::trace!(%other, "left trigger volume");
                }
                SimulationEvent::Contact { points, .. } => {
                    self.contacts_seen += 1;
                    self.record(SceneEvent::Contact {
                        points: points.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Query every tracked actor once. Far actors are released and removed;
    /// the rest become draw items.
    fn collect_draws(&mut self, eye: Vec3) -> Result<(DrawList, Vec<EntityId>), KernelError> {
        let mut items = Vec::with_capacity(self.registry.len() + self.static_draws.len());
        let mut far = Vec::new();
        let mut lost = Vec::new();

        for record in self.registry.iter() {
            let Some(pose) = self.oracle.pose(record.actor) else {
                lost.push(record.id);
                continue;
            };
            let distance = pose.position.distance(eye);
            if distance > self.settings.cull_distance {
                far.push((record.id, distance));
                continue;
            }
            items.push(DrawItem {
                entity: Some(record.id),
                mesh: record.archetype.mesh(),
                material: record.archetype.material(),
                transform: Transform::from_pose(pose, record.archetype.scale()),
            });
        }
        items.extend(self.static_draws.iter().copied());

        let mut evicted = Vec::with_capacity(far.len());
        for (id, distance) in far {
            let Some(record) = self.registry.remove(id) else {
                continue;
            };
            if self.oracle.is_releasable(record.actor) {
                self.oracle.release(record.actor)?;
            }
            tracing::debug!(%id, distance, "evicted {}", record.archetype.label());
            self.record(SceneEvent::Evicted { id, distance });
            evicted.push(id);
        }

        for id in lost {
            if self.registry.remove(id).is_some() {
                tracing::warn!(%id, "actor vanished from the simulation; dropping record");
                self.record(SceneEvent::Lost { id });
            }
        }

        Ok((DrawList { items }, evicted))
    }

    /// Release every actor, newest first, ending with the ground.
    pub fn shutdown(&mut self) -> Result<usize, KernelError> {
        let mut released = 0;
        for record in self.registry.drain_newest_first() {
            if self.oracle.is_releasable(record.actor) {
                self.oracle.release(record.actor)?;
                released += 1;
            }
        }
        if self.oracle.is_releasable(self.camera_actor) {
            self.oracle.release(self.camera_actor)?;
            released += 1;
        }
        while let Some(actor) = self.static_actors.pop() {
            if self.oracle.is_releasable(actor) {
                self.oracle.release(actor)?;
                released += 1;
            }
        }
        self.trigger = None;
        tracing::info!(released, "scene shut down");
        Ok(released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockOracle;
    use crate::oracle::BodyKind;
    use cubefall_common::{Activation, TriggerConfig};

    const STEP: f64 = 1.0 / 165.0;

    fn small_config() -> DemoConfig {
        let mut config = DemoConfig::default();
        config.scene.stack_columns = 2;
        config.scene.stack_layers = 2;
        config.scene.cull_distance = 20.0;
        config.scene.projectile_speed = 40.0;
        config
    }

    fn eye() -> Vec3 {
        Vec3::new(0.0, 1.0, 10.0)
    }

    fn viewer() -> Viewer {
        Viewer::new(eye(), Vec3::NEG_Z)
    }

    fn build(config: &DemoConfig) -> Scene<MockOracle> {
        Scene::build(MockOracle::new(), config, eye()).unwrap()
    }

    #[test]
    fn build_creates_stack_ground_and_camera() {
        let scene = build(&small_config());
        assert_eq!(scene.registry().len(), 4);
        assert_eq!(scene.registry().count_of("crate"), 4);
        // 4 crates + ground + trigger + camera
        assert_eq!(scene.oracle().actor_count(), 7);
        assert_eq!(
            scene.oracle().kind_of(scene.camera_actor()),
            Some(BodyKind::Kinematic)
        );
        let trigger = scene.trigger_actor().unwrap();
        assert_eq!(scene.oracle().kind_of(trigger), Some(BodyKind::Static));
        assert!(scene.oracle().actors[&trigger].desc.sensor);
    }

    #[test]
    fn build_without_trigger() {
        let mut config = small_config();
        config.scene.trigger = None;
        let scene = build(&config);
        assert!(scene.trigger_actor().is_none());
        assert_eq!(scene.oracle().actor_count(), 6);
    }

    #[test]
    fn stack_rests_on_ground() {
        let config = small_config().scene;
        let positions = stack_positions(&config);
        assert_eq!(positions.len(), 4);
        let lowest = positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
        assert_eq!(lowest, config.box_half_extent);
        let xs: Vec<f32> = positions.iter().take(2).map(|p| p.x).collect();
        assert_eq!(xs, vec![-0.5, 0.5]);
    }

    #[test]
    fn huge_frames_step_once_each() {
        let mut scene = build(&small_config());
        for _ in 0..10 {
            let frame = scene.frame(5.0, &FrameInput::idle(), &viewer()).unwrap();
            assert!(frame.stepped);
        }
        assert_eq!(scene.oracle().steps, 10);
        assert_eq!(scene.tick(), 10);
    }

    #[test]
    fn short_frames_do_not_step() {
        let mut scene = build(&small_config());
        let frame = scene
            .frame(STEP * 0.5, &FrameInput::idle(), &viewer())
            .unwrap();
        assert!(!frame.stepped);
        assert_eq!(scene.oracle().steps, 0);
    }

    #[test]
    fn camera_collider_follows_viewer() {
        let mut scene = build(&small_config());
        let moved = Viewer::new(Vec3::new(3.0, 4.0, 5.0), Vec3::NEG_Z);
        scene.frame(STEP, &FrameInput::idle(), &moved).unwrap();
        let pose = scene.oracle().pose(scene.camera_actor()).unwrap();
        assert_eq!(pose.position, Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn one_spawn_per_press() {
        let mut scene = build(&small_config());
        for _ in 0..30 {
            scene.frame(STEP, &FrameInput::spawning(), &viewer()).unwrap();
        }
        assert_eq!(scene.registry().count_of("projectile"), 1);

        scene.frame(STEP, &FrameInput::idle(), &viewer()).unwrap();
        let frame = scene.frame(STEP, &FrameInput::spawning(), &viewer()).unwrap();
        assert!(frame.spawned.is_some());
        for _ in 0..5 {
            let frame = scene.frame(STEP, &FrameInput::spawning(), &viewer()).unwrap();
            assert!(frame.spawned.is_none());
        }
        assert_eq!(scene.registry().count_of("projectile"), 2);
    }

    #[test]
    fn projectile_starts_outside_camera_collider() {
        let config = small_config();
        let mut scene = build(&config);
        let id = scene.spawn_projectile(&viewer()).unwrap();
        let actor = scene.registry().get(id).unwrap().actor;
        let pose = scene.oracle().pose(actor).unwrap();
        let gap = pose.position.distance(eye());
        assert!(gap > config.scene.camera_collider_radius + config.scene.projectile_radius);
    }

    #[test]
    fn far_projectile_evicted_exactly_once() {
        let mut scene = build(&small_config());
        let first = scene.frame(STEP, &FrameInput::spawning(), &viewer()).unwrap();
        let id = first.spawned.unwrap();
        let actor = scene.registry().get(id).unwrap().actor;
        assert!(first.draws.contains_entity(id));

        let mut evicted_at = None;
        for n in 0..400 {
            let frame = scene.frame(STEP, &FrameInput::idle(), &viewer()).unwrap();
            if frame.evicted.contains(&id) {
                assert!(evicted_at.is_none(), "evicted twice");
                evicted_at = Some(n);
            }
            if evicted_at.is_some() {
                assert!(!frame.draws.contains_entity(id));
            }
        }
        assert!(evicted_at.is_some());
        assert!(!scene.registry().contains(id));
        assert_eq!(scene.oracle().release_calls.get(&actor), Some(&1));
        assert_eq!(scene.oracle().stale_queries.get(), 0);

        let evictions = scene
            .events()
            .iter()
            .filter(|e| matches!(e, SceneEvent::Evicted { id: e_id, .. } if *e_id == id))
            .count();
        assert_eq!(evictions, 1);
        // Crates near the viewer survive.
        assert_eq!(scene.registry().count_of("crate"), 4);
    }

    #[test]
    fn lost_actor_dropped_from_registry() {
        let mut scene = build(&small_config());
        let record = *scene.registry().iter().next().unwrap();
        scene.oracle_mut().release(record.actor).unwrap();

        let frame = scene.frame(STEP, &FrameInput::idle(), &viewer()).unwrap();
        assert!(!frame.draws.contains_entity(record.id));
        assert!(!scene.registry().contains(record.id));
        assert!(scene.events().contains(&SceneEvent::Lost { id: record.id }));
        assert_eq!(scene.oracle().release_calls.get(&record.actor), Some(&1));
    }

    #[test]
    fn draws_include_scenery() {
        let mut scene = build(&small_config());
        let frame = scene.frame(STEP, &FrameInput::idle(), &viewer()).unwrap();
        assert_eq!(frame.draws.count_material(MaterialKind::Crate), 4);
        assert_eq!(frame.draws.count_material(MaterialKind::Floor), 1);
        assert_eq!(frame.draws.count_material(MaterialKind::Marker), 1);
        assert_eq!(frame.draws.len(), 6);
    }

    #[test]
    fn no_marker_when_disabled() {
        let mut config = small_config();
        config.scene.marker_position = None;
        let mut scene = build(&config);
        let frame = scene.frame(STEP, &FrameInput::idle(), &viewer()).unwrap();
        assert_eq!(frame.draws.count_material(MaterialKind::Marker), 0);
    }

    fn config_with_trigger(teleport_to: Option<Vec3>) -> DemoConfig {
        let mut config = small_config();
        config.scene.trigger = Some(TriggerConfig {
            center: Vec3::new(0.0, 1.0, -5.0),
            half_extents: Vec3::ONE,
            teleport_to,
        });
        config
    }

    #[test]
    fn trigger_without_teleport_only_logs() {
        let mut scene = build(&config_with_trigger(None));
        let trigger = scene.trigger_actor().unwrap();
        let record = *scene.registry().iter().next().unwrap();
        let before = scene.oracle().pose(record.actor).unwrap();

        scene.oracle_mut().inject_after_step(SimulationEvent::TriggerEntered {
            trigger,
            other: record.actor,
        });
        scene.frame(STEP, &FrameInput::idle(), &viewer()).unwrap();

        assert_eq!(scene.oracle().pose(record.actor).unwrap(), before);
        assert!(scene.events().contains(&SceneEvent::TriggerEntered {
            other: record.actor
        }));
        assert!(
            !scene
                .events()
                .iter()
                .any(|e| matches!(e, SceneEvent::Teleported { .. }))
        );
    }

    #[test]
    fn trigger_with_teleport_moves_entity() {
        let target = Vec3::new(0.0, 15.0, 15.0);
        let mut scene = build(&config_with_trigger(Some(target)));
        let trigger = scene.trigger_actor().unwrap();
        let record = *scene.registry().iter().next().unwrap();

        scene.oracle_mut().inject_after_step(SimulationEvent::TriggerEntered {
            trigger,
            other: record.actor,
        });
        scene.frame(STEP, &FrameInput::idle(), &viewer()).unwrap();

        assert_eq!(scene.oracle().pose(record.actor).unwrap().position, target);
        assert!(scene.events().contains(&SceneEvent::Teleported {
            id: record.id,
            to: target
        }));
    }

    #[test]
    fn contacts_are_counted() {
        let mut scene = build(&small_config());
        let a = ActorHandle(1);
        let b = ActorHandle(2);
        scene.oracle_mut().inject_after_step(SimulationEvent::Contact {
            first: a,
            second: b,
            points: vec![Vec3::ZERO, Vec3::X],
        });
        scene.frame(STEP, &FrameInput::idle(), &viewer()).unwrap();
        assert_eq!(scene.contacts_seen(), 1);
        assert!(scene.events().contains(&SceneEvent::Contact { points: 2 }));
    }

    #[test]
    fn on_press_activation_single_steps() {
        let mut config = small_config();
        config.physics.activation = Activation::OnPress;
        let mut scene = build(&config);
        let held = FrameInput {
            step_held: true,
            ..FrameInput::idle()
        };
        for _ in 0..10 {
            scene.frame(1.0, &FrameInput::idle(), &viewer()).unwrap();
        }
        assert_eq!(scene.tick(), 0);
        for _ in 0..10 {
            scene.frame(1.0, &held, &viewer()).unwrap();
        }
        assert_eq!(scene.tick(), 1);
    }

    #[test]
    fn shutdown_releases_everything() {
        let mut scene = build(&config_with_trigger(None));
        scene.spawn_projectile(&viewer()).unwrap();
        // 4 crates + projectile + camera + ground + trigger
        assert_eq!(scene.shutdown().unwrap(), 8);
        assert_eq!(scene.oracle().actor_count(), 0);
        assert!(scene.registry().is_empty());
    }

    #[test]
    fn undrained_event_log_stays_bounded() {
        let mut scene = build(&small_config());
        let frames = EVENT_LOG_CAPACITY as u64 + 100;
        for _ in 0..frames {
            scene.frame(1.0, &FrameInput::idle(), &viewer()).unwrap();
        }
        assert!(scene.events().len() <= EVENT_LOG_CAPACITY);
        assert_eq!(
            scene.events().last(),
            Some(&SceneEvent::Stepped { tick: frames })
        );
    }

    #[test]
    fn drain_events_empties_log() {
        let mut scene = build(&small_config());
        scene.frame(STEP, &FrameInput::spawning(), &viewer()).unwrap();
        let events = scene.drain_events();
        assert!(events.iter().any(|e| matches!(e, SceneEvent::Spawned { .. })));
        assert!(events.contains(&SceneEvent::Stepped { tick: 1 }));
        assert!(scene.events().is_empty());
    }
}
