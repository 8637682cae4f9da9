//! Simulation module
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - Seeded RNG only, so a seed and an input sequence replay exactly
//! - Obstacles and particles live in plain `Vec`s, removed without skipping

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use state::{GameEvent, GamePhase, GameState, Hsl, Obstacle, Particle, Player};
pub use tick::{TickInput, tick, update_particles};
