//! Variable timestep simulation tick
//!
//! Movement, timers and score use `dt` in seconds. Particles are the
//! exception: they integrate per tick, so their feel depends on frame rate.

use super::state::{GameEvent, GamePhase, GameState, Hsl};
use crate::input::Steer;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Resolved horizontal steering
    pub steer: Steer,
}

/// Advance the game state by `dt` seconds (clamped to the max frame delta).
///
/// Returns the events that happened. Does nothing unless the game is running.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if state.phase != GamePhase::Running {
        return events;
    }

    let dt = dt.clamp(0.0, state.settings.max_frame_dt);
    let surface = state.surface;
    state.time_ticks += 1;

    // Move player
    state.player.vx = input.steer.sign() * state.settings.player_speed;
    state.player.rect.x += state.player.vx * dt;
    state
        .player
        .clamp_to_surface(surface.x, state.settings.player_side_margin);

    // Spawn timers
    let dt_ms = dt * 1000.0;
    state.spawn_timer += dt_ms;
    state.difficulty_timer += dt_ms;
    if state.spawn_timer > state.spawn_interval {
        state.spawn_timer = 0.0;
        if state.settings.auto_spawn {
            state.spawn_obstacle();
            events.push(GameEvent::Spawned);
        }
    }

    // Ramp difficulty
    let floor = state.settings.min_spawn_interval_ms;
    if state.difficulty_timer > state.settings.difficulty_ramp_delay_ms
        && state.spawn_interval > floor
    {
        state.spawn_interval = (state.spawn_interval * state.settings.spawn_interval_decay).max(floor);
        if state.spawn_interval == floor {
            log::debug!("Spawn interval reached floor ({} ms)", floor);
        }
    }

    // Obstacles, back to front so removal never skips one
    let player_box = state.player.rect;
    let despawn_y = surface.y + state.settings.despawn_margin;
    for i in (0..state.obstacles.len()).rev() {
        let obstacle = &mut state.obstacles[i];
        obstacle.rect.y += obstacle.speed * dt;

        if obstacle.rect.y > despawn_y {
            state.obstacles.remove(i);
            state.score += state.settings.dodge_reward;
            events.push(GameEvent::Dodged);
            log::trace!("Dodged (score {:.0})", state.score);
            continue;
        }

        if player_box.intersects(&obstacle.rect) {
            let color = obstacle.color;
            let at = state.player.center();
            let burst = state.settings.death_burst;
            state.add_particles(at, color, burst);
            if state.settings.death_flash {
                state.add_particles(at, Hsl::WHITE, burst);
            }
            state.phase = GamePhase::GameOver;
            events.push(GameEvent::Collision { at });
            log::info!(
                "Player hit after {} ticks, score {}",
                state.time_ticks,
                state.display_score()
            );
            return events;
        }
    }

    update_particles(state);

    state.score += dt * state.settings.score_per_second;

    events
}

/// Integrate particles one tick and drop the dead ones
pub fn update_particles(state: &mut GameState) {
    let gravity = state.settings.particle_gravity;
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel.y += gravity;
        particle.life -= 1;
    }
    state.particles.retain(|p| p.life > 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::sim::collision::Rect;
    use crate::sim::state::Obstacle;
    use glam::Vec2;
    use proptest::prelude::*;

    fn quiet_settings() -> Settings {
        Settings {
            auto_spawn: false,
            ..Settings::default()
        }
    }

    fn running(settings: Settings, w: f32, h: f32) -> GameState {
        let mut state = GameState::new(12345, settings, w, h);
        state.start();
        state
    }

    fn obstacle(x: f32, y: f32, w: f32, h: f32, speed: f32) -> Obstacle {
        Obstacle {
            rect: Rect::new(x, y, w, h),
            speed,
            color: Hsl::new(30.0, 0.7, 0.6),
        }
    }

    const LEFT: TickInput = TickInput { steer: Steer::Left };
    const RIGHT: TickInput = TickInput { steer: Steer::Right };
    const IDLE: TickInput = TickInput { steer: Steer::None };

    #[test]
    fn test_idle_does_not_tick() {
        let mut state = GameState::new(1, Settings::default(), 800.0, 600.0);
        let events = tick(&mut state, &RIGHT, 0.016);
        assert!(events.is_empty());
        assert_eq!(state.score, 0.0);
        assert_eq!(state.player.rect.x, 368.0);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_player_moves_and_clamps() {
        let mut state = running(quiet_settings(), 800.0, 600.0);
        tick(&mut state, &RIGHT, 0.05);
        assert!((state.player.rect.x - (368.0 + 21.0)).abs() < 1e-3);
        assert_eq!(state.player.vx, PLAYER_SPEED);

        for _ in 0..100 {
            tick(&mut state, &RIGHT, 0.05);
        }
        assert_eq!(state.player.rect.x, 800.0 - 64.0 - 8.0);

        for _ in 0..100 {
            tick(&mut state, &LEFT, 0.05);
        }
        assert_eq!(state.player.rect.x, 8.0);

        tick(&mut state, &IDLE, 0.05);
        assert_eq!(state.player.vx, 0.0);
        assert_eq!(state.player.rect.x, 8.0);
    }

    #[test]
    fn test_resize_reclamps_on_next_tick() {
        let mut state = running(quiet_settings(), 800.0, 600.0);
        for _ in 0..100 {
            tick(&mut state, &RIGHT, 0.05);
        }
        assert_eq!(state.player.rect.x, 728.0);

        state.resize(400.0, 600.0);
        // Not clamped until the next tick
        assert_eq!(state.player.rect.x, 728.0);

        tick(&mut state, &IDLE, 1.0 / 60.0);
        let w = state.player.rect.w;
        assert_eq!(state.player.rect.x, 400.0 - w - 8.0);
        assert_eq!(state.player.rect.x, 328.0);
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut state = running(quiet_settings(), 800.0, 600.0);
        tick(&mut state, &IDLE, 2.0);
        assert!((state.score - 0.05 * 8.0).abs() < 1e-6);
        assert!((state.difficulty_timer - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_spawn_timer_spawns() {
        let mut state = running(Settings::default(), 800.0, 600.0);
        // 18 ticks of 50 ms = 900 ms: not yet strictly over the interval
        for _ in 0..18 {
            tick(&mut state, &LEFT, 0.05);
        }
        assert!(state.obstacles.is_empty());
        let events = tick(&mut state, &LEFT, 0.05);
        assert!(events.contains(&GameEvent::Spawned));
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.spawn_timer, 0.0);
    }

    #[test]
    fn test_spawn_suppressed_when_disabled() {
        let mut state = running(quiet_settings(), 800.0, 600.0);
        for _ in 0..200 {
            tick(&mut state, &IDLE, 0.05);
        }
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_spawn_interval_decays_to_floor() {
        let mut state = running(quiet_settings(), 800.0, 600.0);
        // Before the ramp delay nothing changes
        for _ in 0..80 {
            tick(&mut state, &IDLE, 0.05);
        }
        assert_eq!(state.spawn_interval, INITIAL_SPAWN_INTERVAL_MS);

        let mut previous = state.spawn_interval;
        for _ in 0..500 {
            tick(&mut state, &IDLE, 0.05);
            assert!(state.spawn_interval <= previous);
            assert!(state.spawn_interval >= MIN_SPAWN_INTERVAL_MS);
            previous = state.spawn_interval;
        }
        assert_eq!(state.spawn_interval, MIN_SPAWN_INTERVAL_MS);
    }

    #[test]
    fn test_dodge_scenario() {
        let mut state = running(quiet_settings(), 800.0, 600.0);
        state.obstacles.push(obstacle(390.0, -50.0, 60.0, 36.0, 200.0));

        let mut dodged = 0;
        let mut ticks = 0;
        while !state.obstacles.is_empty() {
            // Step aside so the obstacle passes the player's lane
            let events = tick(&mut state, &LEFT, 0.1);
            dodged += events.iter().filter(|e| **e == GameEvent::Dodged).count();
            ticks += 1;
            assert!(ticks < 100, "obstacle never left the surface");
        }

        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(dodged, 1);
        // 0.1 s ticks are clamped to 0.05 s: 10 units per tick from -50,
        // removed on the first tick it is strictly past 800
        assert_eq!(ticks, 86);
        let time_score = ticks as f32 * 0.05 * SCORE_PER_SECOND;
        assert!((state.score - (DODGE_REWARD + time_score)).abs() < 1e-3);
    }

    #[test]
    fn test_each_dodge_adds_reward() {
        let mut state = running(quiet_settings(), 800.0, 600.0);
        // Three obstacles already past the despawn line after one tick
        for x in [100.0, 300.0, 500.0] {
            state.obstacles.push(obstacle(x, 799.0, 30.0, 18.0, 100.0));
        }
        let events = tick(&mut state, &IDLE, 0.05);
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Dodged).count(), 3);
        assert!(state.obstacles.is_empty());
        assert!((state.score - (3.0 * DODGE_REWARD + 0.4)).abs() < 1e-4);
    }

    #[test]
    fn test_collision_ends_run() {
        let mut state = running(quiet_settings(), 800.0, 600.0);
        state.add_particles(Vec2::new(10.0, 10.0), Hsl::WHITE, 5);
        // One obstacle right on top of the player, one further up to check
        // processing stops at the hit
        state.obstacles.push(obstacle(600.0, 100.0, 30.0, 18.0, 100.0));
        state.obstacles.push(obstacle(380.0, 500.0, 40.0, 24.0, 100.0));

        let events = tick(&mut state, &IDLE, 0.05);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(matches!(events.last(), Some(GameEvent::Collision { .. })));

        // Collided obstacle stays; the one not yet processed did not move
        assert_eq!(state.obstacles.len(), 2);
        assert_eq!(state.obstacles[0].rect.y, 100.0);
        // Pre-existing particles untouched, two 40-particle bursts added
        assert_eq!(state.particles.len(), 5 + 80);
        assert_eq!(state.particles[0].pos, Vec2::new(10.0, 10.0));
        assert_eq!(state.particles[5].color, Hsl::new(30.0, 0.7, 0.6));
        assert_eq!(state.particles[45].color, Hsl::WHITE);
        assert_eq!(state.particles[5].pos, state.player.center());
        // No time score for the fatal tick
        assert_eq!(state.score, 0.0);

        // Game over is terminal
        let score = state.score;
        let events = tick(&mut state, &IDLE, 0.05);
        assert!(events.is_empty());
        assert_eq!(state.score, score);
    }

    #[test]
    fn test_death_burst_without_flash() {
        let settings = Settings {
            death_flash: false,
            ..quiet_settings()
        };
        let mut state = running(settings, 800.0, 600.0);
        state.obstacles.push(obstacle(380.0, 500.0, 40.0, 24.0, 0.0));
        tick(&mut state, &IDLE, 0.016);
        assert_eq!(state.particles.len(), DEATH_BURST);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = running(quiet_settings(), 800.0, 600.0);
        state.obstacles.push(obstacle(380.0, 500.0, 40.0, 24.0, 0.0));
        tick(&mut state, &IDLE, 0.016);
        assert_eq!(state.phase, GamePhase::GameOver);

        state.start();
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.obstacles.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.score, 0.0);
    }

    #[test]
    fn test_score_is_eight_per_second() {
        let mut state = running(quiet_settings(), 800.0, 600.0);
        // 5 s in 60 Hz frames
        for _ in 0..300 {
            tick(&mut state, &IDLE, 1.0 / 60.0);
        }
        assert!((state.score - 40.0).abs() < 0.01, "score {}", state.score);
    }

    #[test]
    fn test_burst_drains() {
        let mut state = running(quiet_settings(), 800.0, 600.0);
        state.add_particles(Vec2::new(400.0, 300.0), Hsl::WHITE, 40);
        for _ in 0..100 {
            tick(&mut state, &IDLE, 0.016);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particle_integration() {
        let mut state = running(quiet_settings(), 800.0, 600.0);
        state.particles.push(crate::sim::state::Particle {
            pos: Vec2::new(10.0, 10.0),
            vel: Vec2::new(1.0, -2.0),
            life: 2,
            color: Hsl::WHITE,
        });
        update_particles(&mut state);
        let p = &state.particles[0];
        assert_eq!(p.pos, Vec2::new(11.0, 8.0));
        assert!((p.vel.y - (-2.0 + PARTICLE_GRAVITY)).abs() < 1e-6);
        assert_eq!(p.life, 1);
        update_particles(&mut state);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = running(Settings::default(), 800.0, 600.0);
        let mut b = running(Settings::default(), 800.0, 600.0);
        let inputs = [LEFT, LEFT, IDLE, RIGHT, RIGHT, RIGHT, IDLE];
        for i in 0..600 {
            let input = inputs[i % inputs.len()];
            tick(&mut a, &input, 0.016);
            tick(&mut b, &input, 0.016);
        }
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.rect.x, b.player.rect.x);
    }

    fn steer() -> impl Strategy<Value = TickInput> {
        prop_oneof![Just(LEFT), Just(RIGHT), Just(IDLE)]
    }

    proptest! {
        #[test]
        fn prop_player_stays_in_bounds(
            width in 200.0f32..2000.0,
            inputs in prop::collection::vec((steer(), 0.0f32..0.2), 1..300),
        ) {
            let mut state = running(quiet_settings(), width, 600.0);
            for (input, dt) in inputs {
                tick(&mut state, &input, dt);
                let x = state.player.rect.x;
                prop_assert!(x >= 8.0);
                prop_assert!(x <= width - state.player.rect.w - 8.0 + 1e-3);
            }
        }

        #[test]
        fn prop_clear_lane_never_ends_run(
            lane_x in 500.0f32..700.0,
            w in 20.0f32..80.0,
            speed in 120.0f32..540.0,
        ) {
            // Player parked against the left edge; obstacle lane well to the right
            let mut state = running(quiet_settings(), 800.0, 600.0);
            state.obstacles.push(obstacle(lane_x, -w, w, w * 0.6, speed));
            for _ in 0..2000 {
                tick(&mut state, &LEFT, 0.05);
                prop_assert_eq!(state.phase, GamePhase::Running);
                if state.obstacles.is_empty() {
                    break;
                }
            }
            prop_assert!(state.obstacles.is_empty());
        }
    }
}
