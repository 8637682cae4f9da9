//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    /// Menu / not started, nothing updates
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Player was hit; terminal until restart
    GameOver,
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// An obstacle was spawned by the timer
    Spawned,
    /// An obstacle fell off the bottom
    Dodged,
    /// The player was hit; the run is over
    Collision { at: Vec2 },
}

/// HSL colour (hue in degrees, saturation/lightness in [0, 1])
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const WHITE: Hsl = Hsl {
        h: 0.0,
        s: 0.0,
        l: 1.0,
    };

    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Convert to linear-ish RGBA for the vertex pipeline
    pub fn to_rgba(&self, alpha: f32) -> [f32; 4] {
        let c = (1.0 - (2.0 * self.l - 1.0).abs()) * self.s;
        let hp = self.h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = self.l - c / 2.0;
        [r + m, g + m, b + m, alpha]
    }
}

/// The player's paddle
#[derive(Debug, Clone)]
pub struct Player {
    pub rect: Rect,
    /// Horizontal velocity (units/s)
    pub vx: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, 64.0, 18.0),
            vx: 0.0,
        }
    }
}

impl Player {
    /// Size derived from the surface width, clamped to sane minimums
    pub fn size_for_surface(surface_width: f32) -> Vec2 {
        let w = (surface_width * PLAYER_WIDTH_RATIO)
            .floor()
            .min(PLAYER_MAX_WIDTH)
            .max(PLAYER_MIN_WIDTH);
        let h = (w * PLAYER_HEIGHT_RATIO).floor().max(PLAYER_MIN_HEIGHT);
        Vec2::new(w, h)
    }

    /// Keep the player inside the side margins. The left bound is applied
    /// first so a surface narrower than the player resolves to the right bound.
    pub fn clamp_to_surface(&mut self, surface_width: f32, margin: f32) {
        if self.rect.x < margin {
            self.rect.x = margin;
        }
        if self.rect.right() > surface_width - margin {
            self.rect.x = surface_width - self.rect.w - margin;
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }
}

/// A falling obstacle
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub rect: Rect,
    /// Downward speed (units/s)
    pub speed: f32,
    pub color: Hsl,
}

/// A particle for visual effects
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    /// Velocity in units per tick
    pub vel: Vec2,
    /// Remaining lifetime in ticks
    pub life: i32,
    pub color: Hsl,
}

impl Particle {
    /// Draw opacity, fading linearly with remaining life
    pub fn alpha(&self) -> f32 {
        (self.life as f32 / PARTICLE_FADE_TICKS).clamp(0.0, 1.0)
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    pub phase: GamePhase,
    /// Drawing surface size
    pub surface: Vec2,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub particles: Vec<Particle>,
    pub score: f32,
    /// Time since the last automatic spawn (ms)
    pub spawn_timer: f32,
    /// Current automatic spawn interval (ms)
    pub spawn_interval: f32,
    /// Running time used to scale difficulty (ms)
    pub difficulty_timer: f32,
    /// Ticks processed in the current run
    pub time_ticks: u64,
}

impl GameState {
    /// Create an idle game state on a surface of the given size
    pub fn new(seed: u64, settings: Settings, width: f32, height: f32) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            spawn_interval: settings.initial_spawn_interval_ms,
            settings,
            phase: GamePhase::Idle,
            surface: Vec2::new(width, height),
            player: Player::default(),
            obstacles: Vec::new(),
            particles: Vec::new(),
            score: 0.0,
            spawn_timer: 0.0,
            difficulty_timer: 0.0,
            time_ticks: 0,
        };
        state.reset(width, height);
        state
    }

    /// Clear the field and size/centre the player for a fresh run.
    /// Leaves the phase untouched.
    pub fn reset(&mut self, width: f32, height: f32) {
        self.surface = Vec2::new(width, height);
        self.obstacles.clear();
        self.particles.clear();
        self.score = 0.0;
        self.spawn_timer = 0.0;
        self.spawn_interval = self.settings.initial_spawn_interval_ms;
        self.difficulty_timer = 0.0;
        self.time_ticks = 0;

        let size = Player::size_for_surface(width);
        self.player.rect = Rect::new(
            width / 2.0 - size.x / 2.0,
            height - size.y - self.settings.player_bottom_gap,
            size.x,
            size.y,
        );
        self.player.vx = 0.0;
    }

    /// Record new surface geometry and keep the player on the floor line.
    /// Horizontal clamping happens on the next tick.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface = Vec2::new(width, height);
        self.player.rect.y = height - self.player.rect.h - self.settings.player_bottom_gap;
    }

    /// Start a run: reset and enter Running
    pub fn start(&mut self) {
        self.reset(self.surface.x, self.surface.y);
        self.phase = GamePhase::Running;
    }

    /// Final score as shown to the player
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }
}
