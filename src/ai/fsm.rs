//! Finite State Machine for AI Behavior
//!
//! Provides a generic state machine for driving a single actor's behavior.
//! States encapsulate behavior logic with an enter/update/exit lifecycle and
//! decide their own transitions by returning a [`Transition`] from `update`.
//!
//! # Design Principles
//!
//! - **Ownership**: The machine owns exactly one boxed state; transitions
//!   replace it, nothing is pooled or shared between actors
//! - **Ordering**: `exit()` of the old state always completes before
//!   `enter()` of the new one, and a state entered during `tick()` is not
//!   updated again in that same tick
//! - **Debuggability**: States report a typed id and can draw gizmos
//!
//! # Example
//!
//! ```ignore
//! impl State<Guard> for Patrol {
//!     fn id(&self) -> GuardState { GuardState::Patrol }
//!
//!     fn update(&mut self, ctx: &mut Guard) -> Transition<Guard> {
//!         if ctx.alarm {
//!             Transition::to(Alert::default())
//!         } else {
//!             Transition::None
//!         }
//!     }
//! }
//!
//! let mut fsm = StateMachine::new();
//! fsm.set_state(&mut guard, Box::new(Patrol::default()));
//! fsm.tick(&mut guard); // May transition to Alert
//! ```

use std::fmt;

use crate::core::Gizmos;

// ============================================================================
// State Context
// ============================================================================

/// Data shared by every state of one machine.
///
/// The context names the id type its states report, so the machine can
/// expose which state is active without knowing the concrete state types.
pub trait StateContext {
    /// Identifier reported by [`State::id`].
    type StateId: Copy + Eq + fmt::Debug;
}

// ============================================================================
// State Trait
// ============================================================================

/// A state in the finite state machine.
///
/// The lifecycle is:
///
/// 1. `enter()` - Called once when this state becomes current
/// 2. `update()` - Called once per tick while current
/// 3. `exit()` - Called once when replaced, even mid-way through its work
pub trait State<Ctx: StateContext>: fmt::Debug {
    /// Identifier of this state, used for queries and logging.
    fn id(&self) -> Ctx::StateId;

    /// Called when this state becomes current.
    ///
    /// Runtime fields must be re-initialized here; the same state may be
    /// entered many times over an actor's lifetime.
    fn enter(&mut self, _ctx: &mut Ctx) {}

    /// Called each tick while in this state.
    fn update(&mut self, ctx: &mut Ctx) -> Transition<Ctx>;

    /// Called when leaving this state.
    fn exit(&mut self, _ctx: &mut Ctx) {}

    /// Record debug shapes for this state.
    fn draw_gizmos(&self, _gizmos: &mut Gizmos) {}
}

// ============================================================================
// Transition
// ============================================================================

/// A state transition decision returned from `State::update()`.
pub enum Transition<Ctx: StateContext> {
    /// Stay in the current state.
    None,
    /// Exit the current state and enter the given one.
    To(Box<dyn State<Ctx>>),
}

impl<Ctx: StateContext> Transition<Ctx> {
    /// Create a transition to a new state.
    pub fn to<S: State<Ctx> + 'static>(state: S) -> Self {
        Transition::To(Box::new(state))
    }
}

impl<Ctx: StateContext> fmt::Debug for Transition<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::None => write!(f, "Transition::None"),
            Transition::To(state) => write!(f, "Transition::To({:?})", state.id()),
        }
    }
}

/// Record of a completed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange<Id> {
    /// State that was exited, `None` when the machine was stateless
    pub from: Option<Id>,
    /// State that was entered
    pub to: Id,
}

// ============================================================================
// State Machine
// ============================================================================

/// A finite state machine holding at most one active state.
///
/// A machine with no state is valid: ticks are no-ops until
/// [`StateMachine::set_state`] is called.
pub struct StateMachine<Ctx: StateContext> {
    /// Current active state
    current: Option<Box<dyn State<Ctx>>>,
    /// Number of transitions performed
    transitions: u64,
}

impl<Ctx: StateContext> StateMachine<Ctx> {
    /// Create a stateless machine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: None,
            transitions: 0,
        }
    }

    /// Replace the current state.
    ///
    /// Exits the current state (if any), then enters `next`. Passing a state
    /// equivalent to the current one re-runs exit and enter.
    pub fn set_state(
        &mut self,
        ctx: &mut Ctx,
        mut next: Box<dyn State<Ctx>>,
    ) -> StateChange<Ctx::StateId> {
        let from = match self.current.as_mut() {
            Some(current) => {
                current.exit(ctx);
                Some(current.id())
            }
            None => None,
        };

        let to = next.id();
        next.enter(ctx);
        self.current = Some(next);
        self.transitions += 1;

        StateChange { from, to }
    }

    /// Update the current state once.
    ///
    /// A transition requested by `update()` is applied immediately; the new
    /// state's `update()` runs on the next tick, not this one.
    pub fn tick(&mut self, ctx: &mut Ctx) -> Option<StateChange<Ctx::StateId>> {
        let transition = self.current.as_mut()?.update(ctx);

        match transition {
            Transition::None => None,
            Transition::To(next) => Some(self.set_state(ctx, next)),
        }
    }

    /// Id of the current state, if any.
    #[must_use]
    pub fn current(&self) -> Option<Ctx::StateId> {
        self.current.as_ref().map(|state| state.id())
    }

    /// Check if the machine is in the given state.
    #[must_use]
    pub fn is_in_state(&self, id: Ctx::StateId) -> bool {
        self.current() == Some(id)
    }

    /// Total transitions performed so far.
    #[must_use]
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Forward gizmo drawing to the current state.
    pub fn draw_gizmos(&self, gizmos: &mut Gizmos) {
        if let Some(state) = &self.current {
            state.draw_gizmos(gizmos);
        }
    }
}

impl<Ctx: StateContext> Default for StateMachine<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx: StateContext> fmt::Debug for StateMachine<Ctx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current())
            .field("transitions", &self.transitions)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal context recording lifecycle calls in order
    #[derive(Debug, Default)]
    struct Trace {
        calls: Vec<String>,
        go: bool,
    }

    impl StateContext for Trace {
        type StateId = &'static str;
    }

    #[derive(Debug)]
    struct Named(&'static str, Option<&'static str>);

    impl State<Trace> for Named {
        fn id(&self) -> &'static str {
            self.0
        }

        fn enter(&mut self, ctx: &mut Trace) {
            ctx.calls.push(format!("enter {}", self.0));
        }

        fn update(&mut self, ctx: &mut Trace) -> Transition<Trace> {
            ctx.calls.push(format!("update {}", self.0));
            match self.1 {
                Some(next) if ctx.go => Transition::to(Named(next, None)),
                _ => Transition::None,
            }
        }

        fn exit(&mut self, ctx: &mut Trace) {
            ctx.calls.push(format!("exit {}", self.0));
        }
    }

    #[test]
    fn test_stateless_machine_ticks_are_noops() {
        let mut fsm: StateMachine<Trace> = StateMachine::new();
        let mut ctx = Trace::default();

        assert!(fsm.tick(&mut ctx).is_none());
        assert_eq!(fsm.current(), None);
        assert!(ctx.calls.is_empty());
    }

    #[test]
    fn test_set_state_enters_immediately() {
        let mut fsm: StateMachine<Trace> = StateMachine::new();
        let mut ctx = Trace::default();

        let change = fsm.set_state(&mut ctx, Box::new(Named("a", None)));

        assert_eq!(change, StateChange { from: None, to: "a" });
        assert_eq!(ctx.calls, vec!["enter a"]);
        assert!(fsm.is_in_state("a"));
    }

    #[test]
    fn test_exit_completes_before_enter() {
        let mut fsm: StateMachine<Trace> = StateMachine::new();
        let mut ctx = Trace::default();

        fsm.set_state(&mut ctx, Box::new(Named("a", None)));
        fsm.set_state(&mut ctx, Box::new(Named("b", None)));

        assert_eq!(ctx.calls, vec!["enter a", "exit a", "enter b"]);
    }

    #[test]
    fn test_same_state_is_reentered() {
        let mut fsm: StateMachine<Trace> = StateMachine::new();
        let mut ctx = Trace::default();

        fsm.set_state(&mut ctx, Box::new(Named("a", None)));
        let change = fsm.set_state(&mut ctx, Box::new(Named("a", None)));

        assert_eq!(change.from, Some("a"));
        assert_eq!(ctx.calls, vec!["enter a", "exit a", "enter a"]);
        assert_eq!(fsm.transition_count(), 2);
    }

    #[test]
    fn test_transition_does_not_update_new_state_same_tick() {
        let mut fsm: StateMachine<Trace> = StateMachine::new();
        let mut ctx = Trace {
            go: true,
            ..Default::default()
        };

        fsm.set_state(&mut ctx, Box::new(Named("a", Some("b"))));
        let change = fsm.tick(&mut ctx);

        assert_eq!(change, Some(StateChange { from: Some("a"), to: "b" }));
        assert_eq!(ctx.calls, vec!["enter a", "update a", "exit a", "enter b"]);

        // Next tick updates the new state
        fsm.tick(&mut ctx);
        assert_eq!(ctx.calls.last().map(String::as_str), Some("update b"));
    }

    #[test]
    fn test_no_transition_keeps_state() {
        let mut fsm: StateMachine<Trace> = StateMachine::new();
        let mut ctx = Trace::default();

        fsm.set_state(&mut ctx, Box::new(Named("a", Some("b"))));
        assert!(fsm.tick(&mut ctx).is_none());
        assert!(fsm.is_in_state("a"));
    }
}
