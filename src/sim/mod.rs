//! Frame simulation module
//!
//! All gameplay logic lives here. The host samples input, calls [`tick`]
//! once per rendered frame and draws the resulting [`WorldState`]:
//! - Variable timestep supplied by the caller
//! - Stable iteration order (enemies by spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod grid;
pub mod obstacle;
pub mod sphere;
pub mod state;
pub mod tick;

pub use collision::sphere_box_overlap;
pub use enemy::{Enemy, EnemyState};
pub use grid::{DEFAULT_LEVEL, GridMap, Tile};
pub use obstacle::{BoxObstacle, Tint};
pub use sphere::Sphere;
pub use state::{Camera, GameEvent, Player, SessionPhase, WorldState};
pub use tick::{FrameInput, FrameOutcome, tick};
