//! Frame driver
//!
//! Owns the game state and the run clock. The platform calls [`Driver::frame`]
//! once per display refresh with a monotonic timestamp in milliseconds, and
//! schedules another callback only while it returns [`FrameStatus::Continue`].

use std::sync::Arc;

use crate::format_seconds;
use crate::input::SteerIntent;
use crate::renderer::{FrameSink, build_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// What the caller should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Still running: request another frame
    Continue,
    /// Not running (idle or game over): stop scheduling
    Stopped,
}

/// On-screen readout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    /// Seconds since the run started, 2 decimals
    pub elapsed: String,
}

/// Result of a finished run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub score: u64,
    /// Seconds from start to the fatal hit
    pub elapsed: f64,
}

impl RunSummary {
    pub fn elapsed_display(&self) -> String {
        format_seconds(self.elapsed)
    }
}

pub struct Driver {
    pub state: GameState,
    /// Written by input handlers, read once per tick
    pub intent: Arc<SteerIntent>,
    /// Timestamp the current run started (ms)
    start_time: f64,
    /// Timestamp of the previous frame in this run (ms)
    last_time: Option<f64>,
    /// Set when a run ends, cleared on start
    summary: Option<RunSummary>,
}

impl Driver {
    /// Idle driver on the menu screen
    pub fn new(seed: u64, settings: Settings, width: f32, height: f32) -> Self {
        let mut driver = Self {
            state: GameState::new(seed, settings, width, height),
            intent: Arc::new(SteerIntent::new()),
            start_time: 0.0,
            last_time: None,
            summary: None,
        };
        driver.show_menu();
        driver
    }

    /// Back to the idle menu with a few backdrop obstacles
    pub fn show_menu(&mut self) {
        self.state.phase = GamePhase::Idle;
        self.state.reset(self.state.surface.x, self.state.surface.y);
        self.state.seed_intro();
        self.last_time = None;
        self.summary = None;
    }

    /// Begin (or restart) a run at `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.state.start();
        self.start_time = now_ms;
        self.last_time = None;
        self.summary = None;
        log::info!(
            "Run started on {}x{} surface",
            self.state.surface.x,
            self.state.surface.y
        );
    }

    /// Surface geometry changed
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    /// One scheduling callback: update, then render.
    ///
    /// The frame in which the player is hit is still rendered, so the death
    /// burst shows on the frozen last frame.
    pub fn frame(&mut self, now_ms: f64, sink: &mut impl FrameSink) -> FrameStatus {
        if !self.state.is_running() {
            return FrameStatus::Stopped;
        }

        let dt = match self.last_time {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        }
        .clamp(0.0, self.state.settings.max_frame_dt);
        self.last_time = Some(now_ms);

        let input = TickInput {
            steer: self.intent.load(),
        };
        let events = tick(&mut self.state, &input, dt);

        self.render(sink);

        let hit = events
            .iter()
            .any(|e| matches!(e, GameEvent::Collision { .. }));
        if hit {
            let summary = RunSummary {
                score: self.state.display_score(),
                elapsed: self.elapsed_secs(now_ms),
            };
            log::info!(
                "Game over: score {} in {}s",
                summary.score,
                summary.elapsed_display()
            );
            self.summary = Some(summary);
            return FrameStatus::Stopped;
        }

        FrameStatus::Continue
    }

    /// Draw the current state without advancing it (menu backdrop, resize)
    pub fn render(&self, sink: &mut impl FrameSink) {
        let vertices = build_frame(&self.state);
        sink.present(&vertices, (self.state.surface.x, self.state.surface.y));
    }

    pub fn hud(&self, now_ms: f64) -> Hud {
        let elapsed = match self.summary {
            Some(summary) => summary.elapsed,
            None => self.elapsed_secs(now_ms),
        };
        Hud {
            score: self.state.display_score(),
            elapsed: format_seconds(elapsed),
        }
    }

    /// Summary of the last finished run, if the game is over
    pub fn summary(&self) -> Option<RunSummary> {
        match self.state.phase {
            GamePhase::GameOver => self.summary,
            _ => None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    fn elapsed_secs(&self, now_ms: f64) -> f64 {
        if self.state.phase == GamePhase::Idle {
            return 0.0;
        }
        ((now_ms - self.start_time) / 1000.0).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Steer;
    use crate::renderer::Vertex;
    use crate::sim::collision::Rect;
    use crate::sim::state::{Hsl, Obstacle};

    /// Records what it was asked to draw
    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<usize>,
    }

    impl FrameSink for RecordingSink {
        fn present(&mut self, vertices: &[Vertex], _surface_size: (f32, f32)) {
            self.frames.push(vertices.len());
        }
    }

    fn quiet() -> Settings {
        Settings {
            auto_spawn: false,
            ..Settings::default()
        }
    }

    #[test]
    fn test_menu_is_idle_with_backdrop() {
        let driver = Driver::new(1, Settings::default(), 800.0, 600.0);
        assert_eq!(driver.phase(), GamePhase::Idle);
        assert_eq!(driver.state.obstacles.len(), crate::consts::INTRO_OBSTACLES);
        assert_eq!(driver.hud(5000.0).elapsed, "0.00");
    }

    #[test]
    fn test_idle_frame_does_nothing() {
        let mut driver = Driver::new(1, Settings::default(), 800.0, 600.0);
        let mut sink = RecordingSink::default();
        assert_eq!(driver.frame(16.0, &mut sink), FrameStatus::Stopped);
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn test_start_clears_backdrop() {
        let mut driver = Driver::new(1, Settings::default(), 800.0, 600.0);
        driver.start(0.0);
        assert_eq!(driver.phase(), GamePhase::Running);
        assert!(driver.state.obstacles.is_empty());
    }

    #[test]
    fn test_first_frame_has_zero_dt() {
        let mut driver = Driver::new(1, quiet(), 800.0, 600.0);
        let mut sink = RecordingSink::default();
        driver.start(1000.0);
        assert_eq!(driver.frame(1500.0, &mut sink), FrameStatus::Continue);
        assert_eq!(driver.state.score, 0.0);
        assert_eq!(sink.frames.len(), 1);
    }

    #[test]
    fn test_five_seconds_scores_forty() {
        let mut driver = Driver::new(1, quiet(), 800.0, 600.0);
        let mut sink = RecordingSink::default();
        driver.start(0.0);

        let frame_ms = 1000.0 / 60.0;
        for i in 0..=300 {
            let status = driver.frame(i as f64 * frame_ms, &mut sink);
            assert_eq!(status, FrameStatus::Continue);
        }

        let hud = driver.hud(5000.0);
        assert!((driver.state.score - 40.0).abs() < 0.01);
        assert!((39..=40).contains(&hud.score));
        assert_eq!(hud.elapsed, "5.00");
        assert_eq!(sink.frames.len(), 301);
    }

    #[test]
    fn test_long_pause_is_capped() {
        let mut driver = Driver::new(1, quiet(), 800.0, 600.0);
        let mut sink = RecordingSink::default();
        driver.start(0.0);
        driver.frame(0.0, &mut sink);
        // Tab was in the background for ten seconds
        driver.frame(10_000.0, &mut sink);
        assert!((driver.state.score - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_steering_comes_from_intent() {
        let mut driver = Driver::new(1, quiet(), 800.0, 600.0);
        let mut sink = RecordingSink::default();
        driver.start(0.0);
        driver.frame(0.0, &mut sink);

        driver.intent.store(Steer::Right);
        driver.frame(50.0, &mut sink);
        assert!((driver.state.player.rect.x - 389.0).abs() < 1e-3);

        driver.intent.store(Steer::None);
        driver.frame(100.0, &mut sink);
        assert!((driver.state.player.rect.x - 389.0).abs() < 1e-3);
    }

    #[test]
    fn test_collision_stops_after_rendering() {
        let mut driver = Driver::new(1, quiet(), 800.0, 600.0);
        let mut sink = RecordingSink::default();
        driver.start(2000.0);
        driver.state.obstacles.push(Obstacle {
            rect: Rect::new(380.0, 500.0, 40.0, 24.0),
            speed: 100.0,
            color: Hsl::new(40.0, 0.7, 0.6),
        });

        assert_eq!(driver.frame(3250.0, &mut sink), FrameStatus::Stopped);
        assert_eq!(driver.phase(), GamePhase::GameOver);
        // The fatal frame was drawn and includes the burst
        assert_eq!(sink.frames.len(), 1);
        assert!(sink.frames[0] > 12 + 80 * 6 - 1);

        let summary = driver.summary().unwrap();
        assert_eq!(summary.score, 0);
        assert_eq!(summary.elapsed_display(), "1.25");

        // Frozen: further frames do nothing, HUD keeps the final time
        assert_eq!(driver.frame(4000.0, &mut sink), FrameStatus::Stopped);
        assert_eq!(sink.frames.len(), 1);
        assert_eq!(driver.hud(9000.0).elapsed, "1.25");
        // Particles are left in place for the frozen frame
        assert_eq!(driver.state.particles.len(), 80);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut driver = Driver::new(1, quiet(), 800.0, 600.0);
        let mut sink = RecordingSink::default();
        driver.start(0.0);
        driver.state.obstacles.push(Obstacle {
            rect: Rect::new(380.0, 500.0, 40.0, 24.0),
            speed: 0.0,
            color: Hsl::new(40.0, 0.7, 0.6),
        });
        driver.frame(0.0, &mut sink);
        assert_eq!(driver.phase(), GamePhase::GameOver);

        driver.start(10_000.0);
        assert_eq!(driver.phase(), GamePhase::Running);
        assert!(driver.summary().is_none());
        assert_eq!(driver.frame(10_000.0, &mut sink), FrameStatus::Continue);
        assert_eq!(driver.hud(10_500.0).elapsed, "0.50");
    }

    #[test]
    fn test_menu_after_game_over() {
        let mut driver = Driver::new(1, quiet(), 800.0, 600.0);
        driver.start(0.0);
        driver.state.phase = GamePhase::GameOver;
        driver.show_menu();
        assert_eq!(driver.phase(), GamePhase::Idle);
        assert!(driver.summary().is_none());
        assert!(driver.state.particles.is_empty());
    }
}
