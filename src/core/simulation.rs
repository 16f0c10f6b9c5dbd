//! Headless simulation loop
//!
//! Owns a set of enemies backed by [`KinematicAgent`]s and
//! [`PresentationLog`]s, feeds them the target position, and publishes their
//! transitions on an [`EventQueue`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::debug::Gizmos;
use super::events::{EventQueue, GameEvent, ObjectiveSignal};
use crate::ai::{ActorId, AgentConfig, Enemy, EnemyConfig, EnemyError, KinematicAgent};
use crate::presentation::PresentationLog;

/// Enemy type driven by the simulation
pub type SimEnemy = Enemy<KinematicAgent, PresentationLog>;

/// One enemy to spawn
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySpawn {
    /// Behavior tunables
    pub enemy: EnemyConfig,
    /// Movement tunables and spawn position
    pub agent: AgentConfig,
}

/// Scenario description for a headless run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation rate
    pub tick_rate_hz: f32,
    /// Total simulated time
    pub duration_seconds: f32,
    /// Enemies to spawn
    pub enemies: Vec<EnemySpawn>,
    /// Loop the tracked target walks, in order
    pub target_path: Vec<Vec3>,
    /// Target walking speed
    pub target_speed: f32,
    /// Where the objective item sits
    pub objective_position: Vec3,
    /// When the target tries to use the objective item
    pub objective_at_seconds: Option<f32>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            duration_seconds: 30.0,
            enemies: vec![EnemySpawn::default()],
            target_path: vec![
                Vec3::new(-12.0, 0.0, -12.0),
                Vec3::new(12.0, 0.0, -12.0),
                Vec3::new(12.0, 0.0, 12.0),
                Vec3::new(-12.0, 0.0, 12.0),
            ],
            target_speed: 2.0,
            objective_position: Vec3::new(-12.0, 0.0, 10.0),
            objective_at_seconds: Some(20.0),
        }
    }
}

impl SimulationConfig {
    /// Seconds per tick
    #[must_use]
    pub fn tick_seconds(&self) -> f32 {
        if self.tick_rate_hz > 0.0 {
            1.0 / self.tick_rate_hz
        } else {
            1.0 / 60.0
        }
    }

    /// Number of ticks covering `duration_seconds`
    #[must_use]
    pub fn total_ticks(&self) -> u64 {
        (self.duration_seconds.max(0.0) / self.tick_seconds()).round() as u64
    }
}

/// Fixed-step driver for a group of enemies
#[derive(Debug, Default)]
pub struct Simulation {
    enemies: Vec<SimEnemy>,
    objective: ObjectiveSignal,
    objective_reported: bool,
    events: EventQueue,
    target: Vec3,
    next_id: u32,
    ticks: u64,
    elapsed: f32,
}

impl Simulation {
    /// Create an empty simulation
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a simulation and spawn every configured enemy
    ///
    /// # Errors
    ///
    /// Returns an error if an enemy cannot be built
    pub fn from_config(config: &SimulationConfig) -> Result<Self, EnemyError> {
        let mut simulation = Self::new();
        if let Some(start) = config.target_path.first() {
            simulation.target = *start;
        }
        for spawn in &config.enemies {
            simulation.spawn_enemy(spawn)?;
        }
        Ok(simulation)
    }

    /// Spawn an enemy subscribed to this simulation's objective
    ///
    /// # Errors
    ///
    /// Returns an error if the enemy cannot be built
    pub fn spawn_enemy(&mut self, spawn: &EnemySpawn) -> Result<ActorId, EnemyError> {
        self.next_id += 1;
        let id = ActorId(self.next_id);

        let enemy = Enemy::builder(id, spawn.enemy.clone())
            .agent(KinematicAgent::from_config(&spawn.agent))
            .presentation(PresentationLog::new())
            .objective(&self.objective)
            .target(self.target)
            .build()?;

        if let Some(state) = enemy.state() {
            self.events.push(GameEvent::StateChanged {
                actor: id,
                from: None,
                to: state,
            });
        }
        log::debug!("spawned {id} at {}", enemy.position());
        self.enemies.push(enemy);
        Ok(id)
    }

    /// Handle to the objective signal, e.g. for an [`ObjectiveItem`](crate::interaction::ObjectiveItem)
    pub fn objective(&self) -> &ObjectiveSignal {
        &self.objective
    }

    /// Move the tracked target
    pub fn set_target_position(&mut self, position: Vec3) {
        self.target = position;
    }

    /// Tracked target position
    pub fn target_position(&self) -> Vec3 {
        self.target
    }

    /// Advance every enemy by `dt` seconds.
    ///
    /// Events produced here become readable after the next call.
    pub fn step(&mut self, dt: f32) {
        self.events.swap();

        if self.objective.has_fired() && !self.objective_reported {
            self.objective_reported = true;
            self.events.push(GameEvent::ObjectiveActivated);
        }

        for enemy in &mut self.enemies {
            enemy.sense_target(self.target);
            if let Some(change) = enemy.tick(dt) {
                self.events.push(GameEvent::StateChanged {
                    actor: enemy.id(),
                    from: change.from,
                    to: change.to,
                });
            }
            enemy.agent_mut().advance(dt);
        }

        self.ticks += 1;
        self.elapsed += dt;
    }

    /// Events from the previous step
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    /// Events from the previous step, for draining
    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// All enemies
    pub fn enemies(&self) -> &[SimEnemy] {
        &self.enemies
    }

    /// Look up an enemy
    pub fn enemy(&self, id: ActorId) -> Option<&SimEnemy> {
        self.enemies.iter().find(|enemy| enemy.id() == id)
    }

    /// Steps taken
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Record gizmos for every enemy
    pub fn draw_gizmos(&self, gizmos: &mut Gizmos) {
        for enemy in &self.enemies {
            enemy.draw_gizmos(gizmos);
        }
    }
}
