//! Static axis-aligned boxes: walls, flag, floor, ceiling, enemy hit zones

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::collision::sphere_box_overlap;
use super::sphere::Sphere;

/// Material colour handed to the renderer. Has no effect on collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tint {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Tint {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Tint = Tint::rgb(255, 255, 255);
    pub const BLACK: Tint = Tint::rgb(0, 0, 0);
    pub const RED: Tint = Tint::rgb(255, 0, 0);
    pub const GREEN: Tint = Tint::rgb(0, 255, 0);
    pub const BLUE: Tint = Tint::rgb(0, 0, 255);
    pub const CYAN: Tint = Tint::rgb(0, 255, 255);
    pub const YELLOW: Tint = Tint::rgb(255, 255, 0);
}

/// An axis-aligned box with fixed extents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxObstacle {
    /// Box center
    pub position: DVec3,
    /// Width (x), height (y), depth (z)
    extents: DVec3,
    pub tint: Tint,
}

impl BoxObstacle {
    pub fn new(position: DVec3, extents: DVec3, tint: Tint) -> Self {
        debug_assert!(extents.min_element() >= 0.0, "negative box extents");
        Self {
            position,
            extents,
            tint,
        }
    }

    #[inline]
    pub fn extents(&self) -> DVec3 {
        self.extents
    }

    /// Lowest corner of the box
    pub fn min(&self) -> DVec3 {
        self.position - self.extents / 2.0
    }

    /// Highest corner of the box
    pub fn max(&self) -> DVec3 {
        self.position + self.extents / 2.0
    }

    /// Whether `sphere` overlaps this box on all three axes
    #[inline]
    pub fn overlaps(&self, sphere: &Sphere) -> bool {
        sphere_box_overlap(sphere.center, sphere.radius(), self.position, self.extents)
    }

    pub fn set_tint(&mut self, tint: Tint) {
        self.tint = tint;
    }
}
