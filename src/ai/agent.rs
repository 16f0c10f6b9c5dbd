//! Navigation agent facade
//!
//! Behavior states never move the actor themselves. They hand destinations,
//! speeds and the stop flag to a [`NavAgent`] and read back its position.
//! A navmesh-backed agent from the host game is the intended implementation;
//! [`KinematicAgent`] is a straight-line stand-in for headless runs.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Movement capability consumed by behavior states.
pub trait NavAgent {
    /// Current world position.
    fn position(&self) -> Vec3;

    /// Distance from the destination at which the agent counts as arrived.
    fn stopping_distance(&self) -> f32;

    /// Request movement toward `point`.
    fn set_destination(&mut self, point: Vec3);

    /// Set the travel speed in units per second.
    fn set_speed(&mut self, speed: f32);

    /// Pause or resume movement without clearing the destination.
    fn set_stopped(&mut self, stopped: bool);
}

/// Tunables for [`KinematicAgent`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Spawn position
    pub position: Vec3,
    /// Speed before any state sets one
    pub speed: f32,
    /// Arrival radius
    pub stopping_distance: f32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            speed: 3.5,
            stopping_distance: 0.5,
        }
    }
}

/// Agent that seeks its destination in a straight line.
///
/// There is no obstacle avoidance; the agent halts once it is within its
/// stopping distance.
#[derive(Debug, Clone)]
pub struct KinematicAgent {
    position: Vec3,
    destination: Option<Vec3>,
    speed: f32,
    stopping_distance: f32,
    stopped: bool,
}

impl KinematicAgent {
    /// Create an agent at `position`.
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self::from_config(&AgentConfig {
            position,
            ..Default::default()
        })
    }

    /// Create an agent from config.
    #[must_use]
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            position: config.position,
            destination: None,
            speed: config.speed,
            stopping_distance: config.stopping_distance,
            stopped: false,
        }
    }

    /// Builder-style stopping distance override.
    #[must_use]
    pub fn with_stopping_distance(mut self, stopping_distance: f32) -> Self {
        self.stopping_distance = stopping_distance;
        self
    }

    /// Move toward the destination for `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if self.stopped {
            return;
        }
        let Some(destination) = self.destination else {
            return;
        };

        let to_target = destination - self.position;
        let distance = to_target.length();
        if distance <= self.stopping_distance {
            return;
        }

        let step = (self.speed * dt).min(distance);
        self.position += to_target.normalize_or_zero() * step;
    }

    /// Teleport the agent.
    pub fn warp(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Last requested destination.
    #[must_use]
    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    /// Current speed.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Whether movement is paused.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

impl NavAgent for KinematicAgent {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn set_destination(&mut self, point: Vec3) {
        self.destination = Some(point);
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn set_stopped(&mut self, stopped: bool) {
        self.stopped = stopped;
    }
}
