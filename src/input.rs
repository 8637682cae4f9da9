//! Player input: held directions resolved to a steering sign
//!
//! Event handlers only ever touch [`Controls`] and [`SteerIntent`]; the
//! simulation reads the intent once per tick.

use std::sync::atomic::{AtomicI8, Ordering};

use crate::sim::GameState;

/// Resolved horizontal steering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Steer {
    Left,
    #[default]
    None,
    Right,
}

impl Steer {
    /// -1, 0 or +1
    pub fn sign(self) -> f32 {
        match self {
            Steer::Left => -1.0,
            Steer::None => 0.0,
            Steer::Right => 1.0,
        }
    }

    fn to_i8(self) -> i8 {
        match self {
            Steer::Left => -1,
            Steer::None => 0,
            Steer::Right => 1,
        }
    }

    fn from_i8(v: i8) -> Self {
        match v.signum() {
            -1 => Steer::Left,
            1 => Steer::Right,
            _ => Steer::None,
        }
    }
}

/// Which way a key or on-screen button pushes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Map a `KeyboardEvent.key` value to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Direction::Left),
            "ArrowRight" | "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Held state of the two directional inputs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Controls {
    pub left: bool,
    pub right: bool,
}

impl Controls {
    /// Press or release a direction. Returns the new resolved steering.
    pub fn set(&mut self, direction: Direction, held: bool) -> Steer {
        match direction {
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
        self.steer()
    }

    /// Both held (or neither) cancels out
    pub fn steer(&self) -> Steer {
        match (self.left, self.right) {
            (true, false) => Steer::Left,
            (false, true) => Steer::Right,
            _ => Steer::None,
        }
    }

    pub fn release_all(&mut self) {
        *self = Controls::default();
    }
}

/// Steering shared between input delivery and the tick driver.
///
/// A single atomic so input may arrive on another thread than the one
/// running the loop; wrap in `Arc` to share.
#[derive(Debug, Default)]
pub struct SteerIntent(AtomicI8);

impl SteerIntent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, steer: Steer) {
        self.0.store(steer.to_i8(), Ordering::Relaxed);
    }

    pub fn load(&self) -> Steer {
        Steer::from_i8(self.0.load(Ordering::Relaxed))
    }
}

/// Demo AI: steer away from the most threatening obstacle above the player.
///
/// Threat is the obstacle whose horizontal span (padded by the player's
/// width) covers the player and which will arrive soonest.
pub fn autopilot(state: &GameState) -> Steer {
    let player = state.player.rect;
    let pad = player.w * 0.75;

    let threat = state
        .obstacles
        .iter()
        .filter(|o| o.rect.bottom() < player.bottom())
        .filter(|o| o.rect.x - pad < player.right() && o.rect.right() + pad > player.x)
        .min_by(|a, b| {
            let eta_a = (player.y - a.rect.bottom()) / a.speed.max(1.0);
            let eta_b = (player.y - b.rect.bottom()) / b.speed.max(1.0);
            eta_a
                .partial_cmp(&eta_b)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(threat) = threat else {
        return Steer::None;
    };

    let margin = state.settings.player_side_margin;
    let room_left = threat.rect.x - margin;
    let room_right = state.surface.x - margin - threat.rect.right();
    let center = player.center().x;
    let threat_center = threat.rect.center().x;

    // Prefer the side we're already on, unless it is too cramped
    if center < threat_center && room_left >= player.w {
        Steer::Left
    } else if room_right >= player.w {
        Steer::Right
    } else {
        Steer::Left
    }
}
