//! Frame assembly
//!
//! Reads game state, never mutates it. Draw order is background wash,
//! player, obstacles, particles.

use super::shapes::{self, ELLIPSE_SEGMENTS};
use super::vertex::{Vertex, colors};
use crate::consts::PARTICLE_SIZE;
use crate::sim::GameState;
use crate::sim::collision::Rect;

/// Build the triangle list for one frame, in surface pixel coordinates
pub fn build_frame(state: &GameState) -> Vec<Vertex> {
    let obstacle_verts = state.obstacles.len() * (ELLIPSE_SEGMENTS as usize) * 3;
    let mut out = Vec::with_capacity(12 + obstacle_verts + state.particles.len() * 6);

    // Background wash
    let surface = Rect::new(0.0, 0.0, state.surface.x, state.surface.y);
    shapes::gradient_rect(&surface, colors::WASH_TOP, colors::WASH_BOTTOM, &mut out);

    shapes::rect(&state.player.rect, colors::PLAYER, &mut out);

    for obstacle in &state.obstacles {
        shapes::ellipse(
            &obstacle.rect,
            obstacle.color.to_rgba(1.0),
            ELLIPSE_SEGMENTS,
            &mut out,
        );
    }

    for particle in &state.particles {
        let square = Rect::new(particle.pos.x, particle.pos.y, PARTICLE_SIZE, PARTICLE_SIZE);
        shapes::rect(&square, particle.color.to_rgba(particle.alpha()), &mut out);
    }

    out
}
