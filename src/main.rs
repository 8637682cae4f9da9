//! Drop Dodge entry point
//!
//! On the web: wires the driver to a canvas, DOM screens and input events.
//! Natively: runs a headless autopilot game and logs how it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use drop_dodge::input::{Controls, Direction};
    use drop_dodge::renderer::RenderState;
    use drop_dodge::sim::GamePhase;
    use drop_dodge::{Driver, FrameStatus, RenderError, Settings};

    /// Game instance holding all state
    struct Game {
        driver: Driver,
        render_state: RenderState,
        controls: Controls,
        canvas: HtmlCanvasElement,
        /// A requestAnimationFrame callback is pending
        loop_scheduled: bool,
    }

    impl Game {
        fn set_direction(&mut self, direction: Direction, held: bool) {
            let steer = self.controls.set(direction, held);
            self.driver.intent.store(steer);
        }

        fn release_controls(&mut self) {
            self.controls.release_all();
            self.driver.intent.store(self.controls.steer());
        }

        /// Draw without advancing (menu backdrop, after resize)
        fn render_still(&mut self) {
            self.driver.render(&mut self.render_state);
        }

        /// Match the canvas to the window and tell everyone about it
        fn fit_to_window(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let css_w = window
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            let css_h = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            let dpr = window.device_pixel_ratio();
            let (w, h) = ((css_w * dpr) as u32, (css_h * dpr) as u32);

            self.canvas.set_width(w);
            self.canvas.set_height(h);
            self.render_state.resize(w, h);
            // Simulation works in CSS pixels
            self.driver.resize(css_w as f32, css_h as f32);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, now: f64) {
            let hud = self.driver.hud(now);
            set_text("score", &hud.score.to_string());
            set_text("time", &hud.elapsed);
        }

        fn show_game_over(&self) {
            if let Some(summary) = self.driver.summary() {
                set_text("finalScore", &summary.score.to_string());
                set_text("finalTime", &summary.elapsed_display());
            }
            set_visible("gameOver", true);
        }
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn element(id: &str) -> Option<web_sys::Element> {
        web_sys::window()?.document()?.get_element_by_id(id)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = element(id) {
            let classes = el.class_list();
            let _ = if visible {
                classes.remove_1("hidden")
            } else {
                classes.add_1("hidden")
            };
        }
    }

    /// Run `handler` whenever element `id` fires `event`
    fn on<E, F>(id: &str, event: &str, handler: F)
    where
        E: wasm_bindgen::convert::FromWasmAbi + 'static,
        F: FnMut(E) + 'static,
    {
        let Some(el) = element(id) else {
            log::warn!("Missing element #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = el.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    pub async fn run() -> Result<(), RenderError> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Drop Dodge starting...");

        let window = web_sys::window().ok_or(RenderError::NoCanvas("no window"))?;
        let document = window
            .document()
            .ok_or(RenderError::NoCanvas("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into().ok())
            .ok_or(RenderError::NoCanvas("no #gameCanvas element"))?;

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or(js_sys::Date::now() as u64);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, 1, 1).await?;

        let game = Rc::new(RefCell::new(Game {
            driver: Driver::new(seed, settings, 0.0, 0.0),
            render_state,
            controls: Controls::default(),
            canvas,
            loop_scheduled: false,
        }));
        {
            let mut g = game.borrow_mut();
            g.fit_to_window();
            // Fresh layout: rebuild the backdrop for the real surface size
            g.driver.show_menu();
            g.render_still();
        }
        log::info!("Game initialized with seed: {}", seed);

        setup_resize(game.clone());
        setup_keyboard(game.clone());
        setup_buttons(game.clone());
        setup_screens(game);

        log::info!("Drop Dodge ready!");
        Ok(())
    }

    fn start_game(game: &Rc<RefCell<Game>>) {
        let schedule = {
            let mut g = game.borrow_mut();
            g.driver.start(now());
            set_text("score", "0");
            set_text("time", "0.00");
            let schedule = !g.loop_scheduled;
            g.loop_scheduled = true;
            schedule
        };
        if schedule {
            request_animation_frame(game.clone());
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let status = {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            let status = g.driver.frame(time, &mut g.render_state);
            g.update_hud(time);
            if status == FrameStatus::Stopped {
                g.loop_scheduled = false;
                if g.driver.phase() == GamePhase::GameOver {
                    g.show_game_over();
                }
            }
            status
        };

        if status == FrameStatus::Continue {
            request_animation_frame(game);
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.fit_to_window();
            if g.driver.phase() != GamePhase::Running {
                g.render_still();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        for (event, held) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(direction) = Direction::from_key(&event.key()) {
                    game.borrow_mut().set_direction(direction, held);
                }
            });
            let _ = window.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keys released while unfocused never send keyup
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().release_controls();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        for (id, direction) in [("leftBtn", Direction::Left), ("rightBtn", Direction::Right)] {
            for (event, held) in [("pointerdown", true), ("pointerup", false), ("pointerleave", false)] {
                let game = game.clone();
                on(id, event, move |_event: PointerEvent| {
                    game.borrow_mut().set_direction(direction, held);
                });
            }
        }
    }

    fn setup_screens(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on("startBtn", "click", move |_event: web_sys::Event| {
                set_visible("startScreen", false);
                start_game(&game);
            });
        }
        on("howBtn", "click", |_event: web_sys::Event| {
            set_visible("startScreen", false);
            set_visible("howScreen", true);
        });
        on("backBtn", "click", |_event: web_sys::Event| {
            set_visible("howScreen", false);
            set_visible("startScreen", true);
        });
        {
            let game = game.clone();
            on("playBtn", "click", move |_event: web_sys::Event| {
                set_visible("howScreen", false);
                start_game(&game);
            });
        }
        {
            let game = game.clone();
            on("retryBtn", "click", move |_event: web_sys::Event| {
                set_visible("gameOver", false);
                start_game(&game);
            });
        }
        on("menuBtn", "click", move |_event: web_sys::Event| {
            set_visible("gameOver", false);
            set_visible("startScreen", true);
            let mut g = game.borrow_mut();
            g.driver.show_menu();
            g.render_still();
        });
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Drop Dodge failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Drop Dodge (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use drop_dodge::input::autopilot;
    use drop_dodge::renderer::{FrameSink, Vertex};
    use drop_dodge::{Driver, FrameStatus, Settings};

    const WIDTH: f32 = 800.0;
    const HEIGHT: f32 = 600.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after two simulated minutes
    const MAX_FRAMES: u32 = 120 * 60;

    /// Counts frames instead of drawing them
    #[derive(Default)]
    struct CountingSink {
        frames: u32,
        vertices: usize,
    }

    impl FrameSink for CountingSink {
        fn present(&mut self, vertices: &[Vertex], _surface_size: (f32, f32)) {
            self.frames += 1;
            self.vertices = self.vertices.max(vertices.len());
        }
    }

    pub fn run() {
        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(clock_seed);
        log::info!("Autopilot run, seed {}", seed);

        let mut driver = Driver::new(seed, settings, WIDTH, HEIGHT);
        let mut sink = CountingSink::default();
        driver.start(0.0);

        let mut now = 0.0;
        for _ in 0..MAX_FRAMES {
            driver.intent.store(autopilot(&driver.state));
            if driver.frame(now, &mut sink) == FrameStatus::Stopped {
                break;
            }
            now += FRAME_MS;
        }

        log::debug!(
            "{} frames rendered, peak {} vertices",
            sink.frames,
            sink.vertices
        );
        match driver.summary() {
            Some(summary) => log::info!(
                "Autopilot was hit: score {} after {}s",
                summary.score,
                summary.elapsed_display()
            ),
            None => {
                let hud = driver.hud(now);
                log::info!(
                    "Autopilot survived: score {} after {}s",
                    hud.score,
                    hud.elapsed
                );
            }
        }
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}
