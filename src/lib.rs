//! Maze Shooter - A first-person grid maze shooter
//!
//! Core modules:
//! - `sim`: Frame simulation (collisions, enemy turrets, player, win/lose)
//! - `renderer`: Draw-call seam towards the host's graphics backend
//! - `settings`: Tunable gameplay values loaded from JSON
//! - `error`: Load-time error types

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, MapError};
pub use settings::Settings;

use glam::DVec3;

/// Game configuration constants
pub mod consts {
    /// Default grid side (tiles)
    pub const MAP_SIZE: usize = 30;
    /// Edge length of one tile in world units
    pub const WORLD_SIZE: f64 = 2.0;
    /// Wall and flag height; the ceiling sits at this height
    pub const WALL_HEIGHT: f64 = 6.0;
    /// Floor/ceiling slab thickness
    pub const SLAB_THICKNESS: f64 = 0.5;

    /// Player eye height
    pub const PLAYER_HEIGHT: f64 = 2.0;
    /// Height bullets rest at while parked, and enemies fire from
    pub const CHEST_HEIGHT: f64 = PLAYER_HEIGHT * 0.75;
    /// Corner probe offset of the player's movement footprint
    pub const FOOTPRINT_HALF: f64 = 0.2;
    /// Walk distance per frame (not scaled by dt)
    pub const WALK_SPEED: f64 = 0.015;
    /// Look sensitivity multiplier
    pub const LOOK_AROUND_SPEED: f64 = 0.3;
    /// Radians per pixel of mouse motion, before sensitivity
    pub const LOOK_PIXEL_SCALE: f64 = 0.001;
    /// Steepest look angle up or down (radians)
    pub const MAX_PITCH: f64 = 1.5;

    /// Enemy box width/depth (also the player hit volume width/depth)
    pub const ENEMY_SIZE: f64 = 0.6;
    /// Enemy body box height
    pub const ENEMY_BODY_HEIGHT: f64 = PLAYER_HEIGHT * 0.85;
    /// Enemy head box height
    pub const ENEMY_HEAD_HEIGHT: f64 = PLAYER_HEIGHT * 0.3;

    /// Bullet defaults
    pub const BULLET_RADIUS: f64 = 0.05;
    pub const BULLET_SPEED: f64 = 400.0;
    /// Player bullets spawn this far along the aim from the eye
    pub const MUZZLE_DISTANCE: f64 = 0.5;

    /// Aim marker (render-only crosshair sphere)
    pub const AIM_MARKER_RADIUS: f64 = 0.001;
    pub const AIM_MARKER_DISTANCE: f64 = 0.125;

    pub const PLAYER_START_HEALTH: u8 = 3;
    pub const ENEMY_START_HEALTH: u8 = 3;
}

use consts::WORLD_SIZE;

/// World-space center of tile `(row, col)` on a `size`-wide grid (y = 0).
///
/// Row 0 is the far (+z) edge, column 0 the left (-x) edge.
#[inline]
pub fn tile_center(size: usize, row: usize, col: usize) -> DVec3 {
    let half = size as f64 / 2.0;
    DVec3::new(
        (col as f64 + 0.5 - half) * WORLD_SIZE,
        0.0,
        (half - row as f64 - 0.5) * WORLD_SIZE,
    )
}

/// Tile `(row, col)` containing world position `(x, z)`, if it is on the grid
#[inline]
pub fn world_to_tile(size: usize, x: f64, z: f64) -> Option<(usize, usize)> {
    let half = size as f64 / 2.0;
    let col = (half + x / WORLD_SIZE).floor();
    let row = (half - z / WORLD_SIZE).floor();
    let in_range = |v: f64| v >= 0.0 && v < size as f64;
    if in_range(row) && in_range(col) {
        Some((row as usize, col as usize))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_center_matches_level_layout() {
        // Wall at (0, 0) on the 30x30 level sits at x = -29, z = 29
        let c = tile_center(30, 0, 0);
        assert!((c.x + 29.0).abs() < 1e-9);
        assert!((c.z - 29.0).abs() < 1e-9);

        let c = tile_center(30, 26, 3);
        assert!((c.x + 23.0).abs() < 1e-9);
        assert!((c.z + 23.0).abs() < 1e-9);
    }

    #[test]
    fn test_world_to_tile_inverts_tile_center() {
        for size in [5, 30] {
            for row in 0..size {
                for col in 0..size {
                    let c = tile_center(size, row, col);
                    assert_eq!(world_to_tile(size, c.x, c.z), Some((row, col)));
                }
            }
        }
    }

    #[test]
    fn test_world_to_tile_off_grid() {
        assert_eq!(world_to_tile(30, 30.5, 0.0), None);
        assert_eq!(world_to_tile(30, 0.0, -30.5), None);
        assert_eq!(world_to_tile(30, -30.0, 0.0), Some((15, 0)));
    }
}
