use glam::{IVec2, Vec2};

use crate::direction::classify_vector;

/// A finite 2D ray: an origin and the displacement to its end point
///
/// Either component of `vector` may be zero, and a zero vector is a valid
/// degenerate ray that crosses nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec2,
    pub vector: Vec2,
}

impl Ray {
    pub fn new(origin: Vec2, vector: Vec2) -> Self {
        Ray { origin, vector }
    }

    /// Create a ray running from `origin` to `destination`
    pub fn between(origin: Vec2, destination: Vec2) -> Self {
        Ray {
            origin,
            vector: destination - origin,
        }
    }

    /// Terminal point of the ray (time 1)
    pub fn destination(&self) -> Vec2 {
        self.origin + self.vector
    }

    pub fn length(&self) -> f32 {
        self.vector.length()
    }

    /// Sign-only direction per axis
    pub fn direction(&self) -> IVec2 {
        classify_vector(self.vector)
    }

    /// Point at normalized time `t` along the ray
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.vector * t
    }
}
