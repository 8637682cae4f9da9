//! Game settings and balance values
//!
//! Every tuning knob lives here with defaults from [`crate::consts`]. Settings
//! are read-only at runtime: they are loaded once at startup and never saved.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Player ===
    /// Player movement speed (units/s)
    pub player_speed: f32,
    /// Gap between the player and the side edges
    pub player_side_margin: f32,
    /// Gap between the player and the bottom edge
    pub player_bottom_gap: f32,

    // === Spawning & difficulty ===
    /// Spawn obstacles automatically (off = only scripted spawns)
    pub auto_spawn: bool,
    /// Spawn interval at run start (ms)
    pub initial_spawn_interval_ms: f32,
    /// Spawn interval floor (ms)
    pub min_spawn_interval_ms: f32,
    /// Per-tick multiplicative spawn interval decay
    pub spawn_interval_decay: f32,
    /// Difficulty timer value before the spawn interval starts shrinking (ms)
    pub difficulty_ramp_delay_ms: f32,
    /// Distance below the surface at which an obstacle counts as dodged
    pub despawn_margin: f32,
    /// Obstacles dropped onto the menu screen
    pub intro_obstacles: usize,

    // === Scoring ===
    pub dodge_reward: f32,
    pub score_per_second: f32,

    // === Effects ===
    /// Particles per death burst
    pub death_burst: usize,
    /// Extra white flash burst on death
    pub death_flash: bool,
    /// Particle gravity (units/tick²)
    pub particle_gravity: f32,

    // === Timing ===
    /// Largest accepted frame delta (s)
    pub max_frame_dt: f32,

    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            player_side_margin: PLAYER_SIDE_MARGIN,
            player_bottom_gap: PLAYER_BOTTOM_GAP,

            auto_spawn: true,
            initial_spawn_interval_ms: INITIAL_SPAWN_INTERVAL_MS,
            min_spawn_interval_ms: MIN_SPAWN_INTERVAL_MS,
            spawn_interval_decay: SPAWN_INTERVAL_DECAY,
            difficulty_ramp_delay_ms: DIFFICULTY_RAMP_DELAY_MS,
            despawn_margin: DESPAWN_MARGIN,
            intro_obstacles: INTRO_OBSTACLES,

            dodge_reward: DODGE_REWARD,
            score_per_second: SCORE_PER_SECOND,

            death_burst: DEATH_BURST,
            death_flash: true,
            particle_gravity: PARTICLE_GRAVITY,

            max_frame_dt: MAX_FRAME_DT,

            seed: None,
        }
    }
}

impl Settings {
    /// Element id of the optional inline JSON settings block (web)
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "dodge-settings";

    /// Environment variable naming a settings file (native)
    #[cfg(not(target_arch = "wasm32"))]
    const ENV_VAR: &'static str = "DODGE_SETTINGS";

    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would make the game unplayable or break invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if !(self.player_speed > 0.0) {
            return invalid("player_speed", "must be positive");
        }
        if self.player_side_margin < 0.0 {
            return invalid("player_side_margin", "must not be negative");
        }
        if !(self.min_spawn_interval_ms > 0.0) {
            return invalid("min_spawn_interval_ms", "must be positive");
        }
        if self.initial_spawn_interval_ms < self.min_spawn_interval_ms {
            return invalid("initial_spawn_interval_ms", "must not be below the floor");
        }
        if !(self.spawn_interval_decay > 0.0 && self.spawn_interval_decay <= 1.0) {
            return invalid("spawn_interval_decay", "must be in (0, 1]");
        }
        if !(self.max_frame_dt > 0.0) {
            return invalid("max_frame_dt", "must be positive");
        }
        if self.intro_obstacles > MAX_INTRO_OBSTACLES {
            return invalid("intro_obstacles", "too many obstacles");
        }
        if self.death_burst > MAX_BURST {
            return invalid("death_burst", "too many particles");
        }
        Ok(())
    }

    /// Load settings from the page's inline JSON block (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json {
            Some(json) => Self::from_json_or_default(&json),
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Load settings from the file named by `DODGE_SETTINGS` (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(std::env::var(Self::ENV_VAR).ok().as_deref())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn load_from(path: Option<&str>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loading settings from {}", path);
                Self::from_json_or_default(&json)
            }
            Err(e) => {
                log::warn!("Could not read settings {}: {}", path, ConfigError::from(e));
                Self::default()
            }
        }
    }

    fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings ({}), using defaults", e);
                Self::default()
            }
        }
    }
}
