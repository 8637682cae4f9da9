//! Obstacle spawning and particle bursts

use glam::Vec2;
use rand::Rng;

use super::collision::Rect;
use super::state::{GameState, Hsl, Obstacle, Particle};
use crate::consts::*;

impl GameState {
    /// Drop one obstacle just above the top edge
    pub fn spawn_obstacle(&mut self) {
        let w = OBSTACLE_MIN_WIDTH + self.rng.random::<f32>() * OBSTACLE_WIDTH_SPAN;
        let x = self.rng.random::<f32>() * (self.surface.x - w);
        let bonus = self.difficulty_fraction() * OBSTACLE_MAX_SPEED_BONUS;
        let speed = OBSTACLE_MIN_SPEED + self.rng.random::<f32>() * OBSTACLE_SPEED_SPAN + bonus;
        let hue = OBSTACLE_HUE_MIN + self.rng.random_range(0..OBSTACLE_HUE_SPAN);

        self.obstacles.push(Obstacle {
            rect: Rect::new(x, -w, w, w * OBSTACLE_ASPECT),
            speed,
            color: Hsl::new(hue as f32, OBSTACLE_SATURATION, OBSTACLE_LIGHTNESS),
        });
    }

    /// Fraction of full difficulty reached so far, in [0, 1]
    pub fn difficulty_fraction(&self) -> f32 {
        (self.difficulty_timer / DIFFICULTY_FULL_MS).clamp(0.0, 1.0)
    }

    /// Emit `count` particles at `pos`, flung mostly upward
    pub fn add_particles(&mut self, pos: Vec2, color: Hsl, count: usize) {
        self.particles.reserve(count);
        for _ in 0..count {
            let vx = (self.rng.random::<f32>() - 0.5) * 6.0;
            let vy = (self.rng.random::<f32>() - 1.5) * 6.0;
            let life = PARTICLE_MIN_LIFE + self.rng.random_range(0..PARTICLE_LIFE_SPAN);
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(vx, vy),
                life: life as i32,
                color,
            });
        }
    }

    /// Backdrop obstacles for the menu screen
    pub fn seed_intro(&mut self) {
        for _ in 0..self.settings.intro_obstacles {
            self.spawn_obstacle();
        }
    }
}
