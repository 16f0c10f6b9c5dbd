//! Enemy AI
//!
//! Provides the generic finite state machine, the idle/wander/chase enemy
//! states, the enemy actor that wires them to its facades, and the
//! navigation agent facade.

mod agent;
mod config;
mod enemy;
mod fsm;
mod states;

pub use agent::{AgentConfig, KinematicAgent, NavAgent};
pub use config::{Bounds, ChaseConfig, EnemyConfig, IdleConfig, WanderConfig};
pub use enemy::{ActorId, Enemy, EnemyBuilder, EnemyContext, EnemyError};
pub use fsm::{State, StateChange, StateContext, StateMachine, Transition};
pub use states::{
    ChaseState, IdleState, StateId, WanderState, sample_between, sample_point_in_bounds,
};
