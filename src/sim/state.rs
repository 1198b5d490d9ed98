//! World state and player types
//!
//! Everything the frame loop mutates lives in [`WorldState`]; the host owns
//! it and hands it to [`super::tick`] once per frame.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::enemy::Enemy;
use super::grid::GridMap;
use super::obstacle::{BoxObstacle, Tint};
use super::sphere::Sphere;
use crate::consts::*;
use crate::error::MapError;
use crate::settings::Settings;

/// Session progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Playing,
    /// Player reached the flag
    Won,
    /// Player health reached zero
    Lost,
}

/// Something that happened during a frame, for audio/HUD consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerFired,
    EnemyFired { enemy_id: u32 },
    /// Enemy bullet struck the player
    PlayerHit { enemy_id: u32, health: u8 },
    /// Non-lethal body hit on an enemy
    EnemyDamaged { enemy_id: u32, health: u8 },
    EnemyKilled { enemy_id: u32, headshot: bool },
    PlayerKilled,
    Won,
}

/// The player: position, aim and combat state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Floor position (y = 0)
    pub position: DVec3,
    /// Unit aim direction
    pub aim: DVec3,
    pub bullet: Sphere,
    pub bullet_in_flight: bool,
    pub health: u8,
}

impl Player {
    pub fn new(position: DVec3, health: u8) -> Self {
        let position = DVec3::new(position.x, 0.0, position.z);
        let mut bullet = Sphere::new(BULLET_RADIUS, Tint::BLACK);
        bullet.park(position + DVec3::Y * CHEST_HEIGHT);
        Self {
            position,
            aim: DVec3::X,
            bullet,
            bullet_in_flight: false,
            health,
        }
    }

    /// Camera position
    pub fn eye(&self) -> DVec3 {
        self.position + DVec3::Y * PLAYER_HEIGHT
    }

    /// Where the idle bullet rests
    pub fn chest_point(&self) -> DVec3 {
        self.position + DVec3::Y * CHEST_HEIGHT
    }

    /// Box enemy bullets are tested against
    pub fn hit_volume(&self) -> BoxObstacle {
        BoxObstacle::new(
            DVec3::new(self.position.x, PLAYER_HEIGHT / 2.0, self.position.z),
            DVec3::new(ENEMY_SIZE, PLAYER_HEIGHT, ENEMY_SIZE),
            Tint::WHITE,
        )
    }

    /// Turn by `yaw` radians around the vertical axis (positive turns
    /// left) and tilt by `pitch` radians (positive looks up)
    pub fn look(&mut self, yaw: f64, pitch: f64) {
        let Some((forward, _)) = self.basis() else {
            return;
        };
        let (sin_yaw, cos_yaw) = yaw.sin_cos();
        let heading = DVec3::new(
            forward.x * cos_yaw - forward.z * sin_yaw,
            0.0,
            forward.z * cos_yaw + forward.x * sin_yaw,
        );

        let elevation =
            (self.aim.y.clamp(-1.0, 1.0).asin() + pitch).clamp(-MAX_PITCH, MAX_PITCH);
        let (sin_el, cos_el) = elevation.sin_cos();
        self.aim = heading * cos_el + DVec3::Y * sin_el;
    }

    /// Launch the bullet along the aim if it is not already in flight
    ///
    /// Returns whether a shot was fired.
    pub fn fire(&mut self, bullet_speed: f64) -> bool {
        if self.bullet_in_flight {
            return false;
        }
        self.bullet
            .fire(self.eye(), self.aim * MUZZLE_DISTANCE, self.aim * bullet_speed);
        self.bullet_in_flight = true;
        true
    }

    /// Horizontal forward and right unit vectors derived from the aim,
    /// `None` when looking straight up or down
    pub fn basis(&self) -> Option<(DVec3, DVec3)> {
        let flat = DVec3::new(self.aim.x, 0.0, self.aim.z);
        let forward = flat.try_normalize()?;
        let right = DVec3::new(forward.z, 0.0, -forward.x);
        Some((forward, right))
    }
}

/// Render-only view parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub eye: DVec3,
    pub target: DVec3,
    pub up: DVec3,
}

impl Camera {
    pub fn looking_from(player: &Player) -> Self {
        let eye = player.eye();
        Self {
            eye,
            target: eye + player.aim,
            up: DVec3::Y,
        }
    }
}

/// Complete simulation state for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldState {
    pub settings: Settings,
    pub map: GridMap,
    pub floor: BoxObstacle,
    pub ceiling: BoxObstacle,
    pub walls: Vec<BoxObstacle>,
    pub flags: Vec<BoxObstacle>,
    pub enemies: Vec<Enemy>,
    pub player: Player,
    /// Crosshair sphere just ahead of the eye
    pub aim_marker: Sphere,
    pub camera: Camera,
    pub phase: SessionPhase,
    /// Frames simulated so far
    pub frame: u64,
    /// Events raised during the last frame
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl WorldState {
    /// Build a session from a validated map
    pub fn new(map: GridMap, settings: Settings) -> Self {
        let player = Player::new(map.player_spawn(), settings.player_health);
        let enemies: Vec<Enemy> = map
            .enemy_spawns()
            .into_iter()
            .zip(1u32..)
            .map(|(pos, id)| Enemy::new(id, pos, settings.enemy_health))
            .collect();

        let mut aim_marker = Sphere::new(AIM_MARKER_RADIUS, Tint::BLUE);
        aim_marker.park(player.chest_point());

        let walls = map.wall_obstacles();
        log::info!(
            "Level ready: {}x{} tiles, {} walls, {} enemies, player at ({:.1}, {:.1})",
            map.size(),
            map.size(),
            walls.len(),
            enemies.len(),
            player.position.x,
            player.position.z
        );

        Self {
            floor: map.floor(),
            ceiling: map.ceiling(),
            flags: map.flag_obstacles(),
            walls,
            enemies,
            camera: Camera::looking_from(&player),
            player,
            aim_marker,
            phase: SessionPhase::Playing,
            frame: 0,
            events: Vec::new(),
            settings,
            map,
        }
    }

    /// Session on the built-in level
    pub fn with_default_level(settings: Settings) -> Result<Self, MapError> {
        Ok(Self::new(GridMap::default_level()?, settings))
    }

    /// Session on a level given as rows of tile characters
    pub fn from_rows<S: AsRef<str>>(rows: &[S], settings: Settings) -> Result<Self, MapError> {
        Ok(Self::new(GridMap::from_rows(rows)?, settings))
    }

    pub fn is_over(&self) -> bool {
        self.phase != SessionPhase::Playing
    }

    pub fn enemies_alive(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }
}
