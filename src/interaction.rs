//! Interaction ray casting
//!
//! When the player presses "use", an [`Interactor`] casts a ray forward
//! through whatever physics the host provides and activates the first
//! [`Interactable`] it hits within reach.

use glam::Vec3;

use crate::core::{GizmoColor, Gizmos, ObjectiveSignal};

/// Something that reacts to direct interaction.
pub trait Interactable {
    /// React to being used.
    fn activate(&mut self);
}

/// Identifier of a collider returned by the host's ray cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(pub u32);

/// Result of a ray cast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Collider that was hit
    pub collider: ColliderId,
    /// World-space hit point
    pub point: Vec3,
    /// Distance from the ray origin
    pub distance: f32,
}

/// Ray casting and collider lookup supplied by the host game.
pub trait InteractionScene {
    /// First hit along the ray, if any within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<RaycastHit>;

    /// The interactable attached to a hit collider, if there is one.
    fn interactable_mut(&mut self, collider: ColliderId) -> Option<&mut dyn Interactable>;
}

/// What a single "use" press achieved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionOutcome {
    /// An interactable was activated
    Activated(ColliderId),
    /// Something was hit, but it cannot be interacted with
    NotInteractable(ColliderId),
    /// Nothing within reach
    Missed,
}

/// Casts "use" rays from the player's view.
#[derive(Debug, Clone, Copy)]
pub struct Interactor {
    /// Reach in world units
    pub distance: f32,
}

impl Default for Interactor {
    fn default() -> Self {
        Self { distance: 2.5 }
    }
}

impl Interactor {
    /// Seconds a debug ray stays visible.
    const RAY_LINGER: f32 = 0.2;

    /// Create an interactor with the given reach
    pub fn new(distance: f32) -> Self {
        Self { distance }
    }

    /// Cast from `origin` along `forward` and activate what is hit.
    ///
    /// Records a green debug ray on activation and a red one when the hit
    /// collider has no interactable.
    pub fn interact<S: InteractionScene + ?Sized>(
        &self,
        origin: Vec3,
        forward: Vec3,
        scene: &mut S,
        gizmos: &mut Gizmos,
    ) -> InteractionOutcome {
        let direction = forward.normalize_or_zero();
        let Some(hit) = scene.raycast(origin, direction, self.distance) else {
            return InteractionOutcome::Missed;
        };

        let ray = direction * self.distance;
        match scene.interactable_mut(hit.collider) {
            Some(target) => {
                gizmos.ray(origin, ray, GizmoColor::Green, Self::RAY_LINGER);
                target.activate();
                log::debug!("activated {:?} at {:.2}m", hit.collider, hit.distance);
                InteractionOutcome::Activated(hit.collider)
            }
            None => {
                gizmos.ray(origin, ray, GizmoColor::Red, Self::RAY_LINGER);
                InteractionOutcome::NotInteractable(hit.collider)
            }
        }
    }
}

/// Item whose first activation completes the objective.
#[derive(Debug)]
pub struct ObjectiveItem {
    signal: ObjectiveSignal,
    active: bool,
}

impl ObjectiveItem {
    /// Create an item that fires `signal` when first used
    pub fn new(signal: ObjectiveSignal) -> Self {
        Self {
            signal,
            active: false,
        }
    }

    /// Whether the item has been used
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Interactable for ObjectiveItem {
    fn activate(&mut self) {
        if self.active {
            return;
        }
        self.active = true;
        self.signal.fire();
    }
}
