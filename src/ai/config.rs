//! Enemy tunables
//!
//! Plain data, copied into each state when the state is built. Values are
//! not validated: a negative speed or an inverted idle range is passed
//! through as-is.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::states::StateId;
use crate::presentation::Cue;

/// Axis-aligned box the enemy wanders inside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Box center
    pub center: Vec3,
    /// Half-size along each axis
    pub extents: Vec3,
}

impl Bounds {
    /// Create bounds from center and half-size
    #[must_use]
    pub fn new(center: Vec3, extents: Vec3) -> Self {
        Self { center, extents }
    }

    /// Full edge lengths
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.extents * 2.0
    }

    /// Whether `point` lies inside on the X/Z plane
    #[must_use]
    pub fn contains_xz(&self, point: Vec3) -> bool {
        let local = (point - self.center).abs();
        local.x <= self.extents.x.abs() && local.z <= self.extents.z.abs()
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            extents: Vec3::new(10.0, 0.0, 10.0),
        }
    }
}

/// Idle state tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Shortest idle duration in seconds
    pub min_idle_seconds: f32,
    /// Longest idle duration in seconds
    pub max_idle_seconds: f32,
    /// Played on entry
    pub cue: Cue,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            min_idle_seconds: 3.0,
            max_idle_seconds: 10.0,
            cue: Cue::from("enemy/idle"),
        }
    }
}

/// Wander state tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderConfig {
    /// Agent speed while wandering
    pub speed: f32,
    /// Played on entry
    pub cue: Cue,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            speed: 3.5,
            cue: Cue::from("enemy/wander"),
        }
    }
}

/// Chase state tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseConfig {
    /// Agent speed while chasing
    pub speed: f32,
    /// Played on entry
    pub cue: Cue,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            speed: 5.0,
            cue: Cue::from("enemy/chase"),
        }
    }
}

/// Everything needed to build one enemy besides its facades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Detection distance
    pub view_radius: f32,
    /// Wander area
    pub bounds: Bounds,
    /// State entered at construction; `None` leaves the enemy inert
    pub entry_state: Option<StateId>,
    /// RNG seed, random when absent
    pub seed: Option<u64>,
    /// Idle tunables
    pub idle: IdleConfig,
    /// Wander tunables
    pub wander: WanderConfig,
    /// Chase tunables
    pub chase: ChaseConfig,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            view_radius: 5.0,
            bounds: Bounds::default(),
            entry_state: Some(StateId::Idle),
            seed: None,
            idle: IdleConfig::default(),
            wander: WanderConfig::default(),
            chase: ChaseConfig::default(),
        }
    }
}

impl EnemyConfig {
    /// Override the view radius
    #[must_use]
    pub fn with_view_radius(mut self, view_radius: f32) -> Self {
        self.view_radius = view_radius;
        self
    }

    /// Override the wander bounds
    #[must_use]
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Override the idle duration range
    #[must_use]
    pub fn with_idle_range(mut self, min_seconds: f32, max_seconds: f32) -> Self {
        self.idle.min_idle_seconds = min_seconds;
        self.idle.max_idle_seconds = max_seconds;
        self
    }

    /// Override the entry state
    #[must_use]
    pub fn with_entry_state(mut self, entry_state: Option<StateId>) -> Self {
        self.entry_state = entry_state;
        self
    }

    /// Fix the RNG seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Log values that are accepted but probably unintended.
    pub fn warn_suspicious(&self) {
        if self.idle.min_idle_seconds > self.idle.max_idle_seconds {
            log::warn!(
                "idle range is inverted ({} > {}), sampling between the two anyway",
                self.idle.min_idle_seconds,
                self.idle.max_idle_seconds
            );
        }
        if self.view_radius <= 0.0 {
            log::warn!("view radius {} never detects anything", self.view_radius);
        }
        if self.wander.speed <= 0.0 || self.chase.speed <= 0.0 {
            log::warn!(
                "non-positive movement speed (wander {}, chase {})",
                self.wander.speed,
                self.chase.speed
            );
        }
    }
}
