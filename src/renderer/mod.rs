//! Rendering seam
//!
//! The simulation never talks to a graphics API. Hosts implement
//! [`Renderer`] over their backend and call [`draw_world`] once per frame
//! after [`crate::sim::tick`].

use crate::sim::{BoxObstacle, Camera, Sphere, WorldState};

/// Draw-call sink implemented by the host's graphics backend
pub trait Renderer {
    fn set_camera(&mut self, camera: &Camera);
    fn draw_box(&mut self, obstacle: &BoxObstacle);
    fn draw_sphere(&mut self, sphere: &Sphere);
}

/// Issue every draw call for one frame
///
/// Order: floor, flags, walls, live enemies (body, head, bullet), aim
/// marker, player bullet. The ceiling only collides and is not drawn.
pub fn draw_world<R: Renderer + ?Sized>(world: &WorldState, renderer: &mut R) {
    renderer.set_camera(&world.camera);

    renderer.draw_box(&world.floor);
    for flag in &world.flags {
        renderer.draw_box(flag);
    }
    for wall in &world.walls {
        renderer.draw_box(wall);
    }

    for enemy in world.enemies.iter().filter(|e| e.is_alive()) {
        renderer.draw_box(&enemy.body);
        renderer.draw_box(&enemy.head);
        renderer.draw_sphere(&enemy.bullet);
    }

    renderer.draw_sphere(&world.aim_marker);
    renderer.draw_sphere(&world.player.bullet);
}
