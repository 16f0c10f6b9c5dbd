//! Core module
//!
//! Simulation loop, events, configuration loading and debug gizmos

mod config;
mod debug;
mod events;
mod simulation;

pub use config::{ConfigError, ConfigFormat, load_config, parse_config, render_config};
pub use debug::{Gizmo, GizmoColor, Gizmos};
pub use events::{EventQueue, GameEvent, ObjectiveListener, ObjectiveSignal};
pub use simulation::{EnemySpawn, SimEnemy, Simulation, SimulationConfig};
