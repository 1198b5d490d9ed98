//! Moving spheres: bullets and the aim marker

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::obstacle::Tint;

/// A point mass with a collision radius, advanced by explicit Euler steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sphere {
    pub center: DVec3,
    pub velocity: DVec3,
    radius: f64,
    pub tint: Tint,
}

impl Sphere {
    pub fn new(radius: f64, tint: Tint) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive");
        Self {
            center: DVec3::ZERO,
            velocity: DVec3::ZERO,
            radius,
            tint,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Advance by one step of free flight (no gravity, no drag)
    #[inline]
    pub fn integrate(&mut self, dt: f64) {
        self.center += self.velocity * dt;
    }

    /// Launch from `origin + offset` with the given velocity
    pub fn fire(&mut self, origin: DVec3, offset: DVec3, velocity: DVec3) {
        self.center = origin + offset;
        self.velocity = velocity;
    }

    /// Rest at `origin` with zero velocity (idle bullet tracking its owner)
    pub fn park(&mut self, origin: DVec3) {
        self.fire(origin, DVec3::ZERO, DVec3::ZERO);
    }
}
