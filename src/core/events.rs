//! Event plumbing for decoupled communication
//!
//! Two pieces live here:
//!
//! - [`EventQueue`]: a double-buffered queue of [`GameEvent`]s. Events
//!   pushed during tick N are readable during tick N+1, so the order in
//!   which actors are stepped never changes what a reader sees.
//! - [`ObjectiveSignal`]: a fire-once broadcast. Listeners subscribe when
//!   they are built and are notified at most once per game.
//!
//! # Example
//!
//! ```ignore
//! let objective = ObjectiveSignal::new();
//! let listener = objective.subscribe();
//!
//! objective.fire();
//! assert!(listener.take());
//! assert!(!listener.take()); // delivered once
//! ```

use std::cell::Cell;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::ai::{ActorId, StateId};

// ============================================================================
// Event Types
// ============================================================================

/// Things that happened during a simulation tick.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameEvent {
    /// An actor's behavior state changed.
    StateChanged {
        /// Actor whose machine transitioned
        actor: ActorId,
        /// Previous state, `None` for the entry state
        from: Option<StateId>,
        /// New state
        to: StateId,
    },

    /// The objective was activated for the first time.
    ObjectiveActivated,
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered event queue for tick-consistent event processing.
///
/// - Push: O(1) amortized
/// - Iteration: O(n)
/// - Swap: O(1)
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this tick
    pending: VecDeque<GameEvent>,
    /// Events from the previous tick, ready for processing
    processing: VecDeque<GameEvent>,
}

impl EventQueue {
    /// Default initial capacity for event queues.
    const DEFAULT_CAPACITY: usize = 32;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event to be processed next tick.
    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing queues.
    ///
    /// Call once per tick. Afterwards `iter()` returns what was pushed
    /// during the previous tick.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the previous tick.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.processing.iter()
    }

    /// Drain all events from the previous tick.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.processing.drain(..)
    }

    /// Check if there are any events to process.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Get the number of events ready for processing.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Get the number of events pending for next tick.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clear all events (both pending and processing).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Objective Signal
// ============================================================================

#[derive(Debug, Default)]
struct SignalInner {
    fired: Cell<bool>,
    listeners: RefCell<SmallVec<[Weak<Cell<bool>>; 4]>>,
}

/// Fire-once broadcast for "the objective was activated".
///
/// Cloning yields another handle to the same signal. Only the first
/// [`ObjectiveSignal::fire`] notifies anyone; listeners subscribed after
/// that are never notified.
#[derive(Debug, Clone, Default)]
pub struct ObjectiveSignal {
    inner: Rc<SignalInner>,
}

impl ObjectiveSignal {
    /// Create an unfired signal with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    ///
    /// The signal only holds a weak reference, so dropping the listener
    /// unsubscribes it. Dropped entries are pruned here.
    pub fn subscribe(&self) -> ObjectiveListener {
        let flag = Rc::new(Cell::new(false));
        if !self.inner.fired.get() {
            let mut listeners = self.inner.listeners.borrow_mut();
            listeners.retain(|listener| listener.strong_count() > 0);
            listeners.push(Rc::downgrade(&flag));
        }
        ObjectiveListener { flag }
    }

    /// Notify every listener. Returns `true` only for the first call.
    pub fn fire(&self) -> bool {
        if self.inner.fired.replace(true) {
            return false;
        }

        let listeners = std::mem::take(&mut *self.inner.listeners.borrow_mut());
        let mut notified = 0;
        for flag in listeners.iter().filter_map(Weak::upgrade) {
            flag.set(true);
            notified += 1;
        }
        log::info!("Objective activated, notified {notified} listener(s)");
        true
    }

    /// Whether the signal has fired.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.inner.fired.get()
    }

    /// Number of live listeners still waiting for the first fire.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .borrow()
            .iter()
            .filter(|listener| listener.strong_count() > 0)
            .count()
    }
}

/// Receiving end of an [`ObjectiveSignal`] subscription.
#[derive(Debug)]
pub struct ObjectiveListener {
    flag: Rc<Cell<bool>>,
}

impl ObjectiveListener {
    /// Consume a pending notification, if any.
    pub fn take(&self) -> bool {
        self.flag.replace(false)
    }
}

// ============================================================================
// Tests
// ============================================================================
