//! Drop Dodge - slide along the floor and dodge what falls from the sky
//!
//! Core modules:
//! - `sim`: Simulation (player, obstacles, particles, tick)
//! - `renderer`: Frame geometry and the WebGPU pipeline that draws it
//! - `driver`: Per-frame loop glue (dt, update, render, run summary)
//! - `input`: Keyboard/button intent resolved to a steering sign
//! - `settings`: Data-driven game balance

pub mod driver;
pub mod error;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use driver::{Driver, FrameStatus, Hud, RunSummary};
pub use error::{ConfigError, RenderError};
pub use input::{Controls, Steer, SteerIntent};
pub use settings::Settings;

/// Game configuration constants (defaults for [`Settings`])
pub mod consts {
    /// Largest frame delta the updater will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Player movement speed (units/s)
    pub const PLAYER_SPEED: f32 = 420.0;
    /// Gap kept between the player and the left/right surface edges
    pub const PLAYER_SIDE_MARGIN: f32 = 8.0;
    /// Gap between the player's bottom edge and the surface bottom
    pub const PLAYER_BOTTOM_GAP: f32 = 70.0;
    /// Player width as a fraction of surface width, clamped to [MIN, MAX]
    pub const PLAYER_WIDTH_RATIO: f32 = 0.08;
    pub const PLAYER_MIN_WIDTH: f32 = 40.0;
    pub const PLAYER_MAX_WIDTH: f32 = 80.0;
    /// Player height as a fraction of its width, floored at MIN
    pub const PLAYER_HEIGHT_RATIO: f32 = 0.28;
    pub const PLAYER_MIN_HEIGHT: f32 = 14.0;

    /// Spawn interval at the start of a run (ms)
    pub const INITIAL_SPAWN_INTERVAL_MS: f32 = 900.0;
    /// Spawn interval never decays below this (ms)
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 260.0;
    /// Per-tick multiplicative decay once the ramp has started
    pub const SPAWN_INTERVAL_DECAY: f32 = 0.985;
    /// Difficulty timer value after which the spawn interval starts shrinking (ms)
    pub const DIFFICULTY_RAMP_DELAY_MS: f32 = 4000.0;
    /// Difficulty timer value at which the speed bonus saturates (ms)
    pub const DIFFICULTY_FULL_MS: f32 = 15_000.0;

    /// Obstacle width range [MIN, MIN + SPAN)
    pub const OBSTACLE_MIN_WIDTH: f32 = 20.0;
    pub const OBSTACLE_WIDTH_SPAN: f32 = 60.0;
    /// Obstacle height as a fraction of its width
    pub const OBSTACLE_ASPECT: f32 = 0.6;
    /// Obstacle base speed range [MIN, MIN + SPAN) (units/s)
    pub const OBSTACLE_MIN_SPEED: f32 = 120.0;
    pub const OBSTACLE_SPEED_SPAN: f32 = 220.0;
    /// Extra speed once difficulty saturates (units/s)
    pub const OBSTACLE_MAX_SPEED_BONUS: f32 = 200.0;
    /// Warm hue band [MIN, MIN + SPAN) in degrees
    pub const OBSTACLE_HUE_MIN: u16 = 10;
    pub const OBSTACLE_HUE_SPAN: u16 = 50;
    pub const OBSTACLE_SATURATION: f32 = 0.7;
    pub const OBSTACLE_LIGHTNESS: f32 = 0.6;
    /// Distance past the bottom edge before an obstacle counts as dodged
    pub const DESPAWN_MARGIN: f32 = 200.0;
    /// Obstacles dropped onto the menu screen
    pub const INTRO_OBSTACLES: usize = 6;
    /// Upper bound accepted for configured menu obstacles
    pub const MAX_INTRO_OBSTACLES: usize = 64;

    /// Score awarded per dodged obstacle
    pub const DODGE_REWARD: f32 = 12.0;
    /// Score accrued per second survived
    pub const SCORE_PER_SECOND: f32 = 8.0;

    /// Burst size for effects without a tuned count of their own
    pub const DEFAULT_BURST: usize = 20;
    /// Burst size on player death
    pub const DEATH_BURST: usize = 40;
    /// Upper bound accepted for configured burst sizes
    pub const MAX_BURST: usize = 1000;
    /// Downward acceleration applied to particles (units/tick²)
    pub const PARTICLE_GRAVITY: f32 = 0.18;
    /// Particle lifetime range [MIN, MIN + SPAN) in ticks
    pub const PARTICLE_MIN_LIFE: u32 = 60;
    pub const PARTICLE_LIFE_SPAN: u32 = 40;
    /// Lifetime at which a particle is drawn fully opaque
    pub const PARTICLE_FADE_TICKS: f32 = 80.0;
    /// Edge length of a drawn particle
    pub const PARTICLE_SIZE: f32 = 3.0;
}

/// Format seconds the way the HUD shows them ("12.34")
#[inline]
pub fn format_seconds(secs: f64) -> String {
    format!("{:.2}", secs.max(0.0))
}
