//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod actor;
pub mod collision;
pub mod input;
pub mod ship;
pub mod spawn;
pub mod state;
pub mod tick;

pub use actor::{Actor, DrawShape, Hazard, Rgba, ShapeStyle, palette};
pub use collision::{Bounds, circles_collide, clamp_to_bounds, is_out_of_bounds};
pub use input::{InputLatch, InputRouter, TickInput};
pub use ship::Ship;
pub use spawn::{split_hazard, try_shoot, try_spawn_hazard};
pub use state::{EntityRef, GamePhase, GameState, HudSnapshot, Stopwatch};
pub use tick::{check_collisions, tick};
