//! Collision detection between spheres and axis-aligned boxes
//!
//! Every collision in the game (bullet vs. wall, bullet vs. enemy, bullet vs.
//! player) goes through one test: the sphere's bounding interval on each axis
//! against the box's interval on that axis. It is not an exact closest-point
//! test; near box corners it reports hits a true sphere would miss.

use glam::DVec3;

/// Check whether a sphere overlaps an axis-aligned box
///
/// True iff on x, y and z the open interval `center ± radius` overlaps the
/// open interval `box_center ± extents / 2`. Touching faces do not count.
#[inline]
pub fn sphere_box_overlap(center: DVec3, radius: f64, box_center: DVec3, extents: DVec3) -> bool {
    let half = extents / 2.0;
    axis_overlap(center.x, radius, box_center.x, half.x)
        && axis_overlap(center.y, radius, box_center.y, half.y)
        && axis_overlap(center.z, radius, box_center.z, half.z)
}

#[inline]
fn axis_overlap(c: f64, r: f64, box_c: f64, half: f64) -> bool {
    c + r > box_c - half && c - r < box_c + half
}
