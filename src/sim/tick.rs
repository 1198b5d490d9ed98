//! Per-frame simulation step
//!
//! Core game loop that advances the world by one rendered frame.

use glam::{DVec2, DVec3};

use super::state::{Camera, GameEvent, SessionPhase, WorldState};
use crate::consts::*;

/// Input sampled for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Movement intents (each already OR'd across its key bindings)
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    /// Mouse motion since the last frame in pixels (x right, y down)
    pub look: DVec2,
    /// Fire button held
    pub fire: bool,
}

/// What the host should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Continue,
    /// Player reached the flag
    Win,
    /// Player was killed
    Lose,
}

/// Advance the world by one frame of `dt` seconds
///
/// Returns `Win`/`Lose` on the frame the session ends. Ticking an ended
/// session changes nothing and repeats its outcome.
pub fn tick(state: &mut WorldState, input: &FrameInput, dt: f64) -> FrameOutcome {
    match state.phase {
        SessionPhase::Won => {
            log::warn!("tick() called after the session was won");
            return FrameOutcome::Win;
        }
        SessionPhase::Lost => {
            log::warn!("tick() called after the session was lost");
            return FrameOutcome::Lose;
        }
        SessionPhase::Playing => {}
    }

    state.events.clear();
    state.frame += 1;

    // Look and fire
    let look_scale = LOOK_PIXEL_SCALE * state.settings.look_speed;
    if input.look != DVec2::ZERO {
        state
            .player
            .look(-input.look.x * look_scale, -input.look.y * look_scale);
    }
    if input.fire && state.player.fire(state.settings.bullet_speed) {
        log::debug!("Player fired along {:?}", state.player.aim);
        state.events.push(GameEvent::PlayerFired);
    }

    // Level geometry consumes the player's bullet
    let bullet = &state.player.bullet;
    if state.floor.overlaps(bullet)
        || state.ceiling.overlaps(bullet)
        || state.walls.iter().any(|w| w.overlaps(bullet))
    {
        state.player.bullet_in_flight = false;
    }

    // Enemies: return fire, then take the player's bullet
    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        enemy.update(
            dt,
            &state.walls,
            &mut state.player,
            state.settings.bullet_speed,
            &mut state.events,
        );
        if state.player.health == 0 {
            state.phase = SessionPhase::Lost;
            state.events.push(GameEvent::PlayerKilled);
            log::info!("Player killed on frame {}", state.frame);
            return FrameOutcome::Lose;
        }

        if state.player.bullet_in_flight && enemy.take_hit(&state.player.bullet, &mut state.events)
        {
            state.player.bullet_in_flight = false;
        }
    }

    // Crosshair
    state.aim_marker.center = state.player.eye() + state.player.aim * AIM_MARKER_DISTANCE;

    // Idle bullet follows the player
    if !state.player.bullet_in_flight {
        let chest = state.player.chest_point();
        state.player.bullet.park(chest);
    }
    state.player.bullet.integrate(dt);

    let pos = state.player.position;
    if state.map.is_win_position(pos.x, pos.z, FOOTPRINT_HALF) {
        state.phase = SessionPhase::Won;
        state.events.push(GameEvent::Won);
        log::info!(
            "Flag reached on frame {} ({} of {} enemies left)",
            state.frame,
            state.enemies_alive(),
            state.enemies.len()
        );
        return FrameOutcome::Win;
    }

    if let Some(step) = movement_step(state, input) {
        let dest = pos + step;
        if state.map.is_footprint_passable(dest.x, dest.z, FOOTPRINT_HALF) {
            state.player.position = dest;
        } else {
            log::trace!("Move to ({:.3}, {:.3}) blocked", dest.x, dest.z);
        }
    }

    state.camera = Camera::looking_from(&state.player);

    FrameOutcome::Continue
}

/// Horizontal displacement requested by the movement keys, scaled to the
/// walk speed. `None` when nothing is pressed or the keys cancel out.
fn movement_step(state: &WorldState, input: &FrameInput) -> Option<DVec3> {
    let (forward, right) = state.player.basis()?;
    let mut dir = DVec3::ZERO;
    if input.forward {
        dir += forward;
    }
    if input.back {
        dir -= forward;
    }
    if input.left {
        dir -= right;
    }
    if input.right {
        dir += right;
    }
    dir.try_normalize().map(|d| d * state.settings.walk_speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::enemy::EnemyState;
    use crate::{tile_center, world_to_tile};

    const DT: f64 = 1.0 / 60.0;

    /// Open room, no enemies. Player at (3, 2), flag far away at (1, 6).
    const ROOM: [&str; 8] = [
        "11111111",
        "100000F1",
        "10000001",
        "10P00001",
        "10000001",
        "10000001",
        "10000001",
        "11111111",
    ];

    fn world(rows: &[&str]) -> WorldState {
        WorldState::from_rows(rows, Settings::default()).unwrap()
    }

    fn slow_bullets() -> Settings {
        Settings {
            bullet_speed: 10.0,
            ..Default::default()
        }
    }

    fn idle() -> FrameInput {
        FrameInput::default()
    }

    fn walk_forward() -> FrameInput {
        FrameInput {
            forward: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_frame_parks_bullet() {
        let mut w = world(&ROOM);
        assert!(!w.is_over());
        let start = w.player.position;
        assert_eq!(tick(&mut w, &idle(), DT), FrameOutcome::Continue);
        assert_eq!(w.frame, 1);
        assert_eq!(w.player.position, start);
        assert!(!w.player.bullet_in_flight);
        assert_eq!(w.player.bullet.center, w.player.chest_point());
        assert_eq!(w.player.bullet.velocity, DVec3::ZERO);

        // Parking again with no shot in between changes nothing
        let before = w.player.bullet.center;
        tick(&mut w, &idle(), DT);
        assert_eq!(w.player.bullet.center, before);
    }

    #[test]
    fn test_walk_forward() {
        let mut w = world(&ROOM);
        let start = w.player.position;
        tick(&mut w, &walk_forward(), DT);
        let moved = w.player.position - start;
        assert!((moved.x - WALK_SPEED).abs() < 1e-12);
        assert!(moved.z.abs() < 1e-12);
        assert_eq!(w.camera.eye, w.player.eye());
        assert_eq!(w.camera.target, w.player.eye() + w.player.aim);
    }

    #[test]
    fn test_diagonal_walk_keeps_speed() {
        let mut w = world(&ROOM);
        let start = w.player.position;
        let input = FrameInput {
            forward: true,
            left: true,
            ..Default::default()
        };
        tick(&mut w, &input, DT);
        let moved = w.player.position - start;
        assert!((moved.length() - WALK_SPEED).abs() < 1e-12);
        // Facing +x, left is +z
        assert!(moved.x > 0.0 && moved.z > 0.0);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut w = world(&ROOM);
        let start = w.player.position;
        let input = FrameInput {
            forward: true,
            back: true,
            ..Default::default()
        };
        tick(&mut w, &input, DT);
        assert_eq!(w.player.position, start);
    }

    #[test]
    fn test_move_into_wall_rejected() {
        let mut w = world(&ROOM);
        // Stand close to the west wall and walk into it
        let spawn = tile_center(8, 3, 1);
        w.player.position = DVec3::new(spawn.x - 0.79, 0.0, spawn.z);
        w.player.aim = DVec3::NEG_X;
        let before = w.player.position;
        for _ in 0..5 {
            tick(&mut w, &walk_forward(), DT);
        }
        assert_eq!(w.player.position, before);

        // Backing away is allowed
        let back = FrameInput {
            back: true,
            ..Default::default()
        };
        tick(&mut w, &back, DT);
        assert!(w.player.position.x > before.x);
    }

    #[test]
    fn test_no_sliding_along_walls() {
        let mut w = world(&ROOM);
        let spawn = tile_center(8, 3, 1);
        w.player.position = DVec3::new(spawn.x - 0.79, 0.0, spawn.z);
        // Mostly into the wall, a little along it
        w.player.aim = DVec3::new(-1.0, 0.0, 0.2).normalize();
        let before = w.player.position;
        tick(&mut w, &walk_forward(), DT);
        assert_eq!(w.player.position, before);
    }

    #[test]
    fn test_look_turns_aim_and_marker() {
        let mut w = world(&ROOM);
        let input = FrameInput {
            look: DVec2::new(-100.0, 0.0),
            ..Default::default()
        };
        tick(&mut w, &input, DT);
        // Mouse left turns left (toward +z when facing +x)
        assert!(w.player.aim.z > 0.0);
        assert!((w.player.aim.length() - 1.0).abs() < 1e-9);
        let expected = w.player.eye() + w.player.aim * AIM_MARKER_DISTANCE;
        assert!(w.aim_marker.center.abs_diff_eq(expected, 1e-12));
    }

    #[test]
    fn test_fire_launches_then_wall_consumes() {
        let mut w = WorldState::from_rows(&ROOM, slow_bullets()).unwrap();
        let fire = FrameInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut w, &fire, DT);
        assert!(w.player.bullet_in_flight);
        assert_eq!(w.events, vec![GameEvent::PlayerFired]);
        assert!((w.player.bullet.velocity.x - 10.0).abs() < 1e-12);

        // Held fire does not relaunch while in flight
        tick(&mut w, &fire, DT);
        assert!(w.events.is_empty());

        // Fly east until the wall at column 7 consumes it
        let mut frames = 0;
        while w.player.bullet_in_flight && frames < 200 {
            tick(&mut w, &idle(), 0.05);
            frames += 1;
        }
        assert!(!w.player.bullet_in_flight);
        assert_eq!(w.player.bullet.center, w.player.chest_point());
    }

    #[test]
    fn test_shooting_the_floor_consumes_bullet() {
        let mut w = WorldState::from_rows(&ROOM, slow_bullets()).unwrap();
        w.player.aim = DVec3::new(1.0, -1.0, 0.0).normalize();
        let fire = FrameInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut w, &fire, DT);
        let mut frames = 0;
        while w.player.bullet_in_flight && frames < 100 {
            tick(&mut w, &idle(), 0.05);
            frames += 1;
        }
        assert!(!w.player.bullet_in_flight);
        assert!(frames < 10);
    }

    #[test]
    fn test_shooting_the_ceiling_consumes_bullet() {
        let mut w = WorldState::from_rows(&ROOM, slow_bullets()).unwrap();
        w.player.aim = DVec3::new(0.05, 1.0, 0.0).normalize();
        let fire = FrameInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut w, &fire, DT);
        assert!(w.player.bullet_in_flight);

        let mut frames = 0;
        while w.player.bullet_in_flight && frames < 100 {
            tick(&mut w, &idle(), 0.05);
            frames += 1;
        }
        assert!(!w.player.bullet_in_flight);
        // Stopped by the slab at wall height, not by a wall
        assert!(frames < 12);
        assert_eq!(w.player.bullet.center, w.player.chest_point());
    }

    #[test]
    fn test_win_raised_once_before_movement() {
        let mut w = world(&ROOM);
        let flag = tile_center(8, 1, 6);
        // Just inside the floor tile next to the flag, a corner across the edge
        w.player.position = DVec3::new(flag.x - 1.1, 0.0, flag.z);
        let before = w.player.position;

        assert_eq!(tick(&mut w, &walk_forward(), DT), FrameOutcome::Win);
        assert_eq!(w.phase, SessionPhase::Won);
        assert!(w.is_over());
        assert_eq!(w.player.position, before);
        let wins = w.events.iter().filter(|e| **e == GameEvent::Won).count();
        assert_eq!(wins, 1);

        // The session is over: nothing else happens
        let events = w.events.clone();
        assert_eq!(tick(&mut w, &walk_forward(), DT), FrameOutcome::Win);
        assert_eq!(w.events, events);
        assert_eq!(w.player.position, before);
        assert_eq!(w.frame, 1);
    }

    #[test]
    fn test_walk_onto_flag() {
        // Corridor leading east to the flag
        let rows = ["11111", "1P0F1", "10001", "10001", "11111"];
        let mut w = world(&rows);
        let mut outcome = FrameOutcome::Continue;
        for _ in 0..400 {
            outcome = tick(&mut w, &walk_forward(), DT);
            if outcome != FrameOutcome::Continue {
                break;
            }
        }
        assert_eq!(outcome, FrameOutcome::Win);
        let (_, col) = world_to_tile(5, w.player.position.x + FOOTPRINT_HALF, w.player.position.z)
            .unwrap();
        assert_eq!(col, 3);
    }

    /// Player two tiles east of an enemy, in a closed room
    const DUEL: [&str; 7] = [
        "1111111",
        "1e0P001",
        "1000001",
        "1000001",
        "1000001",
        "10000F1",
        "1111111",
    ];

    #[test]
    fn test_lose_on_transition_frame() {
        let mut w = WorldState::from_rows(&DUEL, slow_bullets()).unwrap();
        let mut hits = Vec::new();
        let mut outcome = FrameOutcome::Continue;
        let mut frames = 0;
        while outcome == FrameOutcome::Continue && frames < 1000 {
            outcome = tick(&mut w, &idle(), DT);
            frames += 1;
            for e in &w.events {
                if let GameEvent::PlayerHit { health, .. } = e {
                    hits.push((*health, outcome));
                }
            }
        }
        assert_eq!(outcome, FrameOutcome::Lose);
        assert_eq!(w.phase, SessionPhase::Lost);
        assert!(w.is_over());
        assert_eq!(w.player.health, 0);
        // Only the final hit ends the session
        assert_eq!(
            hits,
            vec![
                (2, FrameOutcome::Continue),
                (1, FrameOutcome::Continue),
                (0, FrameOutcome::Lose),
            ]
        );
        assert!(w.events.contains(&GameEvent::PlayerKilled));
        assert_eq!(tick(&mut w, &idle(), DT), FrameOutcome::Lose);
    }

    #[test]
    fn test_three_body_hits_kill_with_return_fire() {
        let mut w = WorldState::from_rows(
            &DUEL,
            Settings {
                bullet_speed: 10.0,
                player_health: 100,
                ..Default::default()
            },
        )
        .unwrap();
        let enemy_body = w.enemies[0].body.position;
        // Aim straight at the body box center from the muzzle
        let eye = w.player.eye();
        w.player.aim = (enemy_body - eye).normalize();

        let fire = FrameInput {
            fire: true,
            ..Default::default()
        };
        let mut healths = vec![w.enemies[0].health()];
        let mut enemy_shots_between_hits = 0;
        let mut frames = 0;
        while w.enemies[0].is_alive() && frames < 2000 {
            assert_eq!(tick(&mut w, &fire, DT), FrameOutcome::Continue);
            frames += 1;
            for e in &w.events {
                match e {
                    GameEvent::EnemyDamaged { health, .. } => healths.push(*health),
                    GameEvent::EnemyKilled { headshot, .. } => {
                        assert!(!headshot);
                        healths.push(0);
                    }
                    GameEvent::EnemyFired { .. } if healths.len() > 1 => {
                        enemy_shots_between_hits += 1
                    }
                    _ => {}
                }
            }
        }
        assert_eq!(healths, vec![3, 2, 1, 0]);
        assert_eq!(w.enemies[0].state(), EnemyState::Dead);
        assert!(enemy_shots_between_hits > 0);
        assert!(w.player.health < 100);
    }

    #[test]
    fn test_headshot_kills_in_same_frame() {
        for health in [3u8, 1] {
            let mut w = WorldState::from_rows(
                &DUEL,
                Settings {
                    enemy_health: health,
                    ..Default::default()
                },
            )
            .unwrap();
            // Bullet already in flight and sitting in the head box
            w.player.bullet_in_flight = true;
            w.player.bullet.center = w.enemies[0].head.position;
            w.player.bullet.velocity = DVec3::ZERO;

            assert_eq!(tick(&mut w, &idle(), DT), FrameOutcome::Continue);
            assert_eq!(w.enemies[0].state(), EnemyState::Dead);
            assert!(!w.player.bullet_in_flight);
            assert!(w.events.contains(&GameEvent::EnemyKilled {
                enemy_id: 1,
                headshot: true
            }));
        }
    }

    #[test]
    fn test_dead_enemy_stops_firing() {
        let mut w = WorldState::from_rows(&DUEL, slow_bullets()).unwrap();
        w.player.bullet_in_flight = true;
        w.player.bullet.center = w.enemies[0].head.position;
        tick(&mut w, &idle(), DT);
        assert!(!w.enemies[0].is_alive());

        let health = w.player.health;
        for _ in 0..600 {
            tick(&mut w, &idle(), DT);
            assert!(!w
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::EnemyFired { .. } | GameEvent::PlayerHit { .. })));
        }
        assert_eq!(w.player.health, health);
    }
}
