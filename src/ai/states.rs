//! Enemy behavior states
//!
//! Transition table, evaluated top to bottom each tick:
//!
//! | State  | Condition                               | Next   |
//! |--------|-----------------------------------------|--------|
//! | Idle   | target within view radius               | Chase  |
//! | Idle   | idle timer elapsed                      | Wander |
//! | Wander | destination within stopping distance    | Idle   |
//! | Wander | target within view radius               | Chase  |
//! | Chase  | target outside view radius, forced      | Chase  |
//! | Chase  | target outside view radius              | Wander |
//!
//! The objective notification forces Chase from any state; see
//! [`Enemy`](super::Enemy).

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::NavAgent;
use super::config::{Bounds, ChaseConfig, IdleConfig, WanderConfig};
use super::enemy::EnemyContext;
use super::fsm::{State, Transition};
use crate::core::{GizmoColor, Gizmos};
use crate::presentation::{Presentation, flags};

/// Identifies an enemy behavior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum StateId {
    /// Standing still for a random duration
    Idle,
    /// Walking to a random point inside the bounds
    Wander,
    /// Pursuing the target
    Chase,
}

impl StateId {
    /// Human-readable name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            StateId::Idle => "Idle",
            StateId::Wander => "Wander",
            StateId::Chase => "Chase",
        }
    }
}

impl std::fmt::Display for StateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Uniform sample between two endpoints given in either order.
pub fn sample_between<R: Rng + ?Sized>(rng: &mut R, a: f32, b: f32) -> f32 {
    let t: f32 = rng.gen_range(0.0..=1.0);
    a + (b - a) * t
}

/// Uniform point inside `bounds` on the X/Z plane at height `y`.
pub fn sample_point_in_bounds<R: Rng + ?Sized>(rng: &mut R, bounds: &Bounds, y: f32) -> Vec3 {
    let x = sample_between(rng, -bounds.extents.x, bounds.extents.x);
    let z = sample_between(rng, -bounds.extents.z, bounds.extents.z);
    Vec3::new(x + bounds.center.x, y, z + bounds.center.z)
}

// ============================================================================
// Idle
// ============================================================================

/// Timer value while the state is not running.
const TIMER_INACTIVE: f64 = -1.0;

/// Stand still, then wander once a randomly sampled duration has passed.
#[derive(Debug, Clone)]
pub struct IdleState {
    config: IdleConfig,
    idle_time: f32,
    timer: f64,
}

impl IdleState {
    /// Build from config
    #[must_use]
    pub fn new(config: IdleConfig) -> Self {
        Self {
            config,
            idle_time: 0.0,
            timer: TIMER_INACTIVE,
        }
    }

    /// Duration sampled on the last entry
    #[must_use]
    pub fn idle_time(&self) -> f32 {
        self.idle_time
    }

    /// Seconds spent idle, negative when not running
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.timer as f32
    }

    /// Whether the accumulated time covers the sampled duration.
    ///
    /// Per-tick deltas such as `1.0 / 50.0` are not exact in `f32`, so the
    /// sum of a whole number of them may land a hair below `idle_time`.
    fn is_elapsed(&self) -> bool {
        let slack = f32::EPSILON * self.idle_time.abs().max(1.0);
        self.timer + f64::from(slack) >= f64::from(self.idle_time)
    }
}

impl<A, P> State<EnemyContext<A, P>> for IdleState
where
    A: NavAgent + 'static,
    P: Presentation + 'static,
{
    fn id(&self) -> StateId {
        StateId::Idle
    }

    fn enter(&mut self, ctx: &mut EnemyContext<A, P>) {
        ctx.agent.set_stopped(true);
        self.idle_time = sample_between(
            &mut ctx.rng,
            self.config.min_idle_seconds,
            self.config.max_idle_seconds,
        );
        self.timer = 0.0;
        ctx.presentation.set_animation_flag(flags::MOVING, false);
        ctx.presentation.play_cue_once(&self.config.cue);
        log::debug!(
            "{}: idle, waiting for {:.2} seconds",
            ctx.id,
            self.idle_time
        );
    }

    fn update(&mut self, ctx: &mut EnemyContext<A, P>) -> Transition<EnemyContext<A, P>> {
        if ctx.target_in_view() {
            return Transition::To(ctx.state(StateId::Chase));
        }

        if self.timer >= 0.0 {
            self.timer += f64::from(ctx.delta_time);
            if self.is_elapsed() {
                return Transition::To(ctx.state(StateId::Wander));
            }
        }

        Transition::None
    }

    fn exit(&mut self, ctx: &mut EnemyContext<A, P>) {
        log::debug!("{}: leaving idle after {:.2} seconds", ctx.id, self.timer);
        self.timer = TIMER_INACTIVE;
        self.idle_time = 0.0;
    }
}

// ============================================================================
// Wander
// ============================================================================

/// Walk to a random point inside the enemy's bounds.
#[derive(Debug, Clone)]
pub struct WanderState {
    config: WanderConfig,
    destination: Vec3,
}

impl WanderState {
    /// Build from config
    #[must_use]
    pub fn new(config: WanderConfig) -> Self {
        Self {
            config,
            destination: Vec3::ZERO,
        }
    }

    /// Destination chosen on the last entry
    #[must_use]
    pub fn destination(&self) -> Vec3 {
        self.destination
    }
}

impl<A, P> State<EnemyContext<A, P>> for WanderState
where
    A: NavAgent + 'static,
    P: Presentation + 'static,
{
    fn id(&self) -> StateId {
        StateId::Wander
    }

    fn enter(&mut self, ctx: &mut EnemyContext<A, P>) {
        ctx.agent.set_speed(self.config.speed);
        ctx.agent.set_stopped(false);

        let height = ctx.agent.position().y;
        self.destination = sample_point_in_bounds(&mut ctx.rng, &ctx.bounds, height);
        ctx.agent.set_destination(self.destination);

        ctx.presentation.set_animation_flag(flags::MOVING, true);
        ctx.presentation.set_animation_flag(flags::CHASING, false);
        ctx.presentation.play_cue_once(&self.config.cue);
        log::debug!("{}: wandering to {}", ctx.id, self.destination);
    }

    fn update(&mut self, ctx: &mut EnemyContext<A, P>) -> Transition<EnemyContext<A, P>> {
        if ctx.position().distance(self.destination) <= ctx.agent.stopping_distance() {
            return Transition::To(ctx.state(StateId::Idle));
        }

        if ctx.target_in_view() {
            return Transition::To(ctx.state(StateId::Chase));
        }

        Transition::None
    }

    fn draw_gizmos(&self, gizmos: &mut Gizmos) {
        gizmos.wire_sphere(self.destination, 0.5, GizmoColor::Magenta);
    }
}

// ============================================================================
// Chase
// ============================================================================

/// Follow the target while it stays in view.
#[derive(Debug, Clone)]
pub struct ChaseState {
    config: ChaseConfig,
    destination: Vec3,
}

impl ChaseState {
    /// Build from config
    #[must_use]
    pub fn new(config: ChaseConfig) -> Self {
        Self {
            config,
            destination: Vec3::ZERO,
        }
    }

    /// Last destination handed to the agent
    #[must_use]
    pub fn destination(&self) -> Vec3 {
        self.destination
    }
}

impl<A, P> State<EnemyContext<A, P>> for ChaseState
where
    A: NavAgent + 'static,
    P: Presentation + 'static,
{
    fn id(&self) -> StateId {
        StateId::Chase
    }

    fn enter(&mut self, ctx: &mut EnemyContext<A, P>) {
        ctx.agent.set_stopped(false);
        ctx.agent.set_speed(self.config.speed);

        ctx.presentation.set_animation_flag(flags::MOVING, false);
        ctx.presentation.set_animation_flag(flags::CHASING, true);
        ctx.presentation.play_cue_once(&self.config.cue);

        // Seeded from the live target so the first command is never stale
        self.destination = ctx.target;
        ctx.agent.set_destination(self.destination);
        log::debug!("{}: chasing", ctx.id);
    }

    fn update(&mut self, ctx: &mut EnemyContext<A, P>) -> Transition<EnemyContext<A, P>> {
        if !ctx.target_in_view() {
            return if ctx.force_chase {
                Transition::To(ctx.state(StateId::Chase))
            } else {
                Transition::To(ctx.state(StateId::Wander))
            };
        }

        self.destination = ctx.target;
        ctx.agent.set_destination(self.destination);
        Transition::None
    }

    fn exit(&mut self, ctx: &mut EnemyContext<A, P>) {
        log::debug!("{}: leaving chase", ctx.id);
    }
}
