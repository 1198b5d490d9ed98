//! Stationary enemy turrets
//!
//! An enemy is two hit boxes (body, head) and one bullet. While alive it
//! keeps exactly one bullet in the air, always re-aimed at the player's
//! position at the moment it reloads. Head hits kill outright; body hits
//! cost one point of health.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use super::obstacle::{BoxObstacle, Tint};
use super::sphere::Sphere;
use super::state::{GameEvent, Player};
use crate::consts::*;

/// Head/body tints after a non-lethal body hit, indexed by `health - 1`
const HEAD_HIT_TINTS: [Tint; 2] = [Tint::rgb(192, 32, 0), Tint::rgb(128, 128, 0)];
const BODY_HIT_TINTS: [Tint; 2] = [Tint::rgb(192, 16, 16), Tint::rgb(128, 64, 64)];

/// Enemy lifecycle. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Alive { health: u8 },
    Dead,
}

/// A turret enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Floor position (y = 0); enemies never move
    position: DVec3,
    pub body: BoxObstacle,
    pub head: BoxObstacle,
    pub bullet: Sphere,
    pub bullet_in_flight: bool,
    state: EnemyState,
}

impl Enemy {
    /// Spawn at a floor position with the given starting health
    pub fn new(id: u32, position: DVec3, health: u8) -> Self {
        let position = DVec3::new(position.x, 0.0, position.z);
        // Hit boxes sit half a box off the spawn point on x and z
        let corner = DVec3::new(position.x - ENEMY_SIZE / 2.0, 0.0, position.z - ENEMY_SIZE / 2.0);

        let body = BoxObstacle::new(
            corner + DVec3::Y * (ENEMY_BODY_HEIGHT / 2.0),
            DVec3::new(ENEMY_SIZE, ENEMY_BODY_HEIGHT, ENEMY_SIZE),
            Tint::CYAN,
        );
        let head = BoxObstacle::new(
            corner + DVec3::Y * PLAYER_HEIGHT,
            DVec3::new(ENEMY_SIZE, ENEMY_HEAD_HEIGHT, ENEMY_SIZE),
            Tint::GREEN,
        );

        let mut bullet = Sphere::new(BULLET_RADIUS, Tint::RED);
        bullet.park(position + DVec3::Y * CHEST_HEIGHT);

        let state = if health > 0 {
            EnemyState::Alive { health }
        } else {
            EnemyState::Dead
        };

        Self {
            id,
            position,
            body,
            head,
            bullet,
            bullet_in_flight: false,
            state,
        }
    }

    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    #[inline]
    pub fn state(&self) -> EnemyState {
        self.state
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self.state, EnemyState::Alive { .. })
    }

    /// Remaining health, 0 once dead
    pub fn health(&self) -> u8 {
        match self.state {
            EnemyState::Alive { health } => health,
            EnemyState::Dead => 0,
        }
    }

    /// Point the bullet launches from
    pub fn chest_point(&self) -> DVec3 {
        self.position + DVec3::Y * CHEST_HEIGHT
    }

    /// Advance this enemy by one frame
    ///
    /// Despawns the bullet on wall impact, damages the player on contact,
    /// reloads and re-aims when idle, then moves the bullet. Does nothing
    /// once dead.
    pub fn update(
        &mut self,
        dt: f64,
        walls: &[BoxObstacle],
        player: &mut Player,
        bullet_speed: f64,
        events: &mut Vec<GameEvent>,
    ) {
        if !self.is_alive() {
            return;
        }

        if walls.iter().any(|w| w.overlaps(&self.bullet)) {
            self.bullet_in_flight = false;
        }

        if player.hit_volume().overlaps(&self.bullet) {
            player.health = player.health.saturating_sub(1);
            self.bullet_in_flight = false;
            log::debug!("Enemy {} hit the player ({} health left)", self.id, player.health);
            events.push(GameEvent::PlayerHit {
                enemy_id: self.id,
                health: player.health,
            });
        }

        if !self.bullet_in_flight {
            let to_player = DVec3::new(
                player.position.x - self.position.x,
                0.0,
                player.position.z - self.position.z,
            );
            let dir = to_player.normalize_or_zero();
            self.bullet
                .fire(self.chest_point(), DVec3::ZERO, dir * bullet_speed);
            self.bullet_in_flight = true;
            log::trace!("Enemy {} fired toward {:?}", self.id, dir);
            events.push(GameEvent::EnemyFired { enemy_id: self.id });
        }

        self.bullet.integrate(dt);
    }

    /// Resolve the player's bullet against this enemy
    ///
    /// Returns true when the bullet hit (and is consumed). A head hit kills
    /// regardless of health; a body hit costs one point. Dead enemies are
    /// never hit.
    pub fn take_hit(&mut self, bullet: &Sphere, events: &mut Vec<GameEvent>) -> bool {
        let EnemyState::Alive { health } = self.state else {
            return false;
        };

        if self.head.overlaps(bullet) {
            self.kill(true, events);
            return true;
        }

        if self.body.overlaps(bullet) {
            // Loaded state may carry `Alive { health: 0 }`; treat it as a last hit
            let health = health.saturating_sub(1);
            if health == 0 {
                self.kill(false, events);
            } else {
                self.state = EnemyState::Alive { health };
                let idx = usize::from(health - 1).min(HEAD_HIT_TINTS.len() - 1);
                self.head.set_tint(HEAD_HIT_TINTS[idx]);
                self.body.set_tint(BODY_HIT_TINTS[idx]);
                log::debug!("Enemy {} hit ({} health left)", self.id, health);
                events.push(GameEvent::EnemyDamaged {
                    enemy_id: self.id,
                    health,
                });
            }
            return true;
        }

        false
    }

    fn kill(&mut self, headshot: bool, events: &mut Vec<GameEvent>) {
        self.state = EnemyState::Dead;
        self.bullet_in_flight = false;
        log::info!(
            "Enemy {} killed{}",
            self.id,
            if headshot { " (headshot)" } else { "" }
        );
        events.push(GameEvent::EnemyKilled {
            enemy_id: self.id,
            headshot,
        });
    }
}
