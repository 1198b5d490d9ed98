//! Grid map: tile classification and spatial queries
//!
//! Levels are square ASCII grids, one character per tile:
//! `1` wall, `0` floor, `F` flag, `P` player spawn, `e` enemy spawn.
//! The grid is centered on the world origin with `WORLD_SIZE` tiles.

use std::path::Path;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::obstacle::{BoxObstacle, Tint};
use crate::consts::*;
use crate::error::MapError;
use crate::{tile_center, world_to_tile};

/// The level shipped with the game
pub const DEFAULT_LEVEL: [&str; MAP_SIZE] = [
    "111111111111111111111111111111",
    "100000000000000000000000000001",
    "100000000000000000000000000001",
    "100F000000000000000e0000000001",
    "10000000000000000000e000000001",
    "100000000000000000000000000001",
    "111111111111111111111111000001",
    "100000000000000000000000000001",
    "100000000000000000000000000001",
    "100000000000000000000000000001",
    "10000000000000000000e000000001",
    "100000000e00000000000000000001",
    "100000111111111110000000000001",
    "100000100000000000000000000001",
    "10000010000000000e000000000001",
    "1000e010000e000000000000000001",
    "100000100000000000000000000001",
    "100000111111111111111111111111",
    "100000000000000000000000000001",
    "100000000000000000000000000001",
    "100000000000000e00000000000001",
    "1000000000000000000000000e0001",
    "100000000000000000000000000001",
    "111111111111111111111111000001",
    "100000000000000000000000000001",
    "100000000000000000000000000001",
    "100P00000000000000000000000001",
    "100000000000000000000000000001",
    "100000000000000000000000000001",
    "111111111111111111111111111111",
];

/// Classification of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Floor,
    Flag,
    PlayerSpawn,
    EnemySpawn,
}

impl Tile {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '1' => Some(Tile::Wall),
            '0' => Some(Tile::Floor),
            'F' => Some(Tile::Flag),
            'P' => Some(Tile::PlayerSpawn),
            'e' => Some(Tile::EnemySpawn),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Tile::Wall => '1',
            Tile::Floor => '0',
            Tile::Flag => 'F',
            Tile::PlayerSpawn => 'P',
            Tile::EnemySpawn => 'e',
        }
    }

    /// Whether the player may stand on this tile
    #[inline]
    pub fn is_passable(self) -> bool {
        self != Tile::Wall
    }
}

/// Immutable square tile grid
///
/// Serializes as its rows of tile characters and is validated again on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct GridMap {
    size: usize,
    /// Row-major tiles, `size * size` long
    tiles: Vec<Tile>,
}

impl GridMap {
    /// The built-in level
    pub fn default_level() -> Result<Self, MapError> {
        Self::from_rows(&DEFAULT_LEVEL)
    }

    /// Parse a level from text, one row per line
    ///
    /// Trailing `\r` and blank lines at either end are ignored.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .collect();
        let start = rows.iter().position(|r| !r.trim().is_empty());
        let end = rows.iter().rposition(|r| !r.trim().is_empty());
        match (start, end) {
            (Some(s), Some(e)) => Self::from_rows(&rows[s..=e]),
            _ => Err(MapError::Empty),
        }
    }

    /// Load a level file
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let text = std::fs::read_to_string(path)?;
        let map = Self::parse(&text)?;
        log::info!("Loaded {}x{} map from {}", map.size, map.size, path.display());
        Ok(map)
    }

    /// Build from rows of tile characters, validating the layout
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let size = rows.len();
        if size == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(size * size);
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != size {
                return Err(MapError::NotSquare {
                    row,
                    expected: size,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let tile = Tile::from_char(ch).ok_or(MapError::UnknownTile { row, col, ch })?;
                tiles.push(tile);
            }
        }

        let spawns = tiles.iter().filter(|t| **t == Tile::PlayerSpawn).count();
        match spawns {
            0 => return Err(MapError::MissingPlayerSpawn),
            1 => {}
            count => return Err(MapError::MultiplePlayerSpawns { count }),
        }
        if !tiles.contains(&Tile::Flag) {
            return Err(MapError::MissingFlag);
        }

        Ok(Self { size, tiles })
    }

    /// Rows of tile characters, the inverse of [`GridMap::from_rows`]
    pub fn rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.size)
            .map(|row| row.iter().map(|t| t.to_char()).collect())
            .collect()
    }

    /// Grid side in tiles
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Tile at `(row, col)`, `None` off the grid
    pub fn tile(&self, row: usize, col: usize) -> Option<Tile> {
        if row < self.size && col < self.size {
            self.tiles.get(row * self.size + col).copied()
        } else {
            None
        }
    }

    /// Tile under world position `(x, z)`, `None` off the grid
    pub fn tile_at(&self, x: f64, z: f64) -> Option<Tile> {
        world_to_tile(self.size, x, z).and_then(|(row, col)| self.tile(row, col))
    }

    /// Whether `(x, z)` lies on a non-wall tile. Off-grid is never passable.
    pub fn is_passable(&self, x: f64, z: f64) -> bool {
        self.tile_at(x, z).is_some_and(Tile::is_passable)
    }

    /// Whether all four corners of a square footprint centered on `(x, z)`
    /// are passable
    pub fn is_footprint_passable(&self, x: f64, z: f64, half: f64) -> bool {
        footprint_corners(x, z, half)
            .iter()
            .all(|&(cx, cz)| self.is_passable(cx, cz))
    }

    /// Whether any corner of the footprint centered on `(x, z)` touches a flag
    pub fn is_win_position(&self, x: f64, z: f64, half: f64) -> bool {
        footprint_corners(x, z, half)
            .iter()
            .any(|&(cx, cz)| self.tile_at(cx, cz) == Some(Tile::Flag))
    }

    /// `(row, col, tile)` for every cell, row-major
    fn cells(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, &t)| (i / self.size, i % self.size, t))
    }

    fn centers_of(&self, kind: Tile) -> impl Iterator<Item = DVec3> + '_ {
        self.cells()
            .filter(move |&(_, _, t)| t == kind)
            .map(|(row, col, _)| tile_center(self.size, row, col))
    }

    /// World position of the player spawn (y = 0)
    pub fn player_spawn(&self) -> DVec3 {
        // Validated at construction: exactly one spawn exists
        self.centers_of(Tile::PlayerSpawn).next().unwrap_or(DVec3::ZERO)
    }

    /// World positions of enemy spawns (y = 0), row-major
    pub fn enemy_spawns(&self) -> Vec<DVec3> {
        self.centers_of(Tile::EnemySpawn).collect()
    }

    /// One full-height box per wall tile
    pub fn wall_obstacles(&self) -> Vec<BoxObstacle> {
        self.centers_of(Tile::Wall)
            .map(|c| column_box(c, Tint::WHITE))
            .collect()
    }

    /// One full-height box per flag tile
    pub fn flag_obstacles(&self) -> Vec<BoxObstacle> {
        self.centers_of(Tile::Flag)
            .map(|c| column_box(c, Tint::YELLOW))
            .collect()
    }

    /// Floor slab covering the whole grid
    pub fn floor(&self) -> BoxObstacle {
        self.slab(0.0)
    }

    /// Ceiling slab covering the whole grid at wall height
    pub fn ceiling(&self) -> BoxObstacle {
        self.slab(WALL_HEIGHT)
    }

    fn slab(&self, y: f64) -> BoxObstacle {
        let span = self.size as f64 * WORLD_SIZE;
        BoxObstacle::new(
            DVec3::new(0.0, y, 0.0),
            DVec3::new(span, SLAB_THICKNESS, span),
            Tint::WHITE,
        )
    }
}

impl TryFrom<Vec<String>> for GridMap {
    type Error = MapError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_rows(&rows)
    }
}

impl From<GridMap> for Vec<String> {
    fn from(map: GridMap) -> Self {
        map.rows()
    }
}

fn footprint_corners(x: f64, z: f64, half: f64) -> [(f64, f64); 4] {
    [
        (x + half, z + half),
        (x - half, z + half),
        (x + half, z - half),
        (x - half, z - half),
    ]
}

fn column_box(center: DVec3, tint: Tint) -> BoxObstacle {
    BoxObstacle::new(
        DVec3::new(center.x, WALL_HEIGHT / 2.0, center.z),
        DVec3::new(WORLD_SIZE, WALL_HEIGHT, WORLD_SIZE),
        tint,
    )
}
