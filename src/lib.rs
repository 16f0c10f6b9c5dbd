//! Enemy behavior core for a first-person prototype
//!
//! This crate provides:
//! - A generic finite state machine with enter/update/exit hooks
//! - Idle, wander and chase enemy states driving navigation and presentation facades
//! - A fire-once objective signal and a "use" ray-cast interaction dispatcher
//! - A headless fixed-step simulation loop with RON/JSON configuration

pub mod ai;
pub mod core;
pub mod interaction;
pub mod presentation;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{
        ActorId, AgentConfig, Bounds, Enemy, EnemyConfig, EnemyError, KinematicAgent, NavAgent,
        StateId,
    };
    pub use crate::core::{
        EventQueue, GameEvent, Gizmos, ObjectiveSignal, Simulation, SimulationConfig,
    };
    pub use crate::interaction::{Interactable, InteractionScene, Interactor, ObjectiveItem};
    pub use crate::presentation::{Cue, Presentation, PresentationLog};
    pub use glam::Vec3;
}
