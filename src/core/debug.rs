//! Debug gizmo collection
//!
//! Behavior code records wire shapes here; drawing them is left to whatever
//! renderer the host game uses.

use glam::Vec3;

/// Gizmo color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoColor {
    /// Spatial bounds
    Red,
    /// Detection radius
    Blue,
    /// Navigation targets
    Magenta,
    /// Successful interaction
    Green,
}

/// A single debug shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gizmo {
    /// Wire sphere
    WireSphere {
        /// Sphere center
        center: Vec3,
        /// Sphere radius
        radius: f32,
        /// Line color
        color: GizmoColor,
    },
    /// Axis-aligned wire box
    WireCube {
        /// Box center
        center: Vec3,
        /// Full edge lengths
        size: Vec3,
        /// Line color
        color: GizmoColor,
    },
    /// Ray segment
    Ray {
        /// Ray start
        origin: Vec3,
        /// Direction scaled by length
        direction: Vec3,
        /// Line color
        color: GizmoColor,
        /// How long the ray should stay visible, in seconds
        duration: f32,
    },
}

/// Per-frame gizmo buffer
#[derive(Debug, Default)]
pub struct Gizmos {
    shapes: Vec<Gizmo>,
}

impl Gizmos {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a wire sphere
    pub fn wire_sphere(&mut self, center: Vec3, radius: f32, color: GizmoColor) {
        self.shapes.push(Gizmo::WireSphere {
            center,
            radius,
            color,
        });
    }

    /// Record an axis-aligned wire box
    pub fn wire_cube(&mut self, center: Vec3, size: Vec3, color: GizmoColor) {
        self.shapes.push(Gizmo::WireCube {
            center,
            size,
            color,
        });
    }

    /// Record a ray that lingers for `duration` seconds
    pub fn ray(&mut self, origin: Vec3, direction: Vec3, color: GizmoColor, duration: f32) {
        self.shapes.push(Gizmo::Ray {
            origin,
            direction,
            color,
            duration,
        });
    }

    /// Recorded shapes, in recording order
    pub fn shapes(&self) -> &[Gizmo] {
        &self.shapes
    }

    /// Number of recorded shapes
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Drop all shapes, typically at the start of a frame
    pub fn clear(&mut self) {
        self.shapes.clear();
    }
}
