//! Asteroid Blaster entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlCanvasElement, KeyboardEvent, Window};

    use asteroid_blaster::consts::*;
    use asteroid_blaster::platform::{FrameClock, KeyState, PlatformError};
    use asteroid_blaster::renderer::{RenderState, build_scene};
    use asteroid_blaster::sim::{GamePhase, GameState, tick};
    use asteroid_blaster::{Settings, Tuning};

    const CANVAS_ID: &str = "gameCanvas";
    const TUNING_ID: &str = "tuning";

    /// DOM elements the game writes to; all optional except the canvas
    struct Hud {
        score: Option<Element>,
        game_over: Option<Element>,
        final_score: Option<Element>,
        paused: Option<Element>,
        fps: Option<Element>,
        shown_score: Option<u64>,
        shown_phase: Option<GamePhase>,
    }

    impl Hud {
        fn new(document: &Document) -> Self {
            Self {
                score: document.get_element_by_id("score"),
                game_over: document.get_element_by_id("gameOver"),
                final_score: document.get_element_by_id("finalScore"),
                paused: document.get_element_by_id("paused"),
                fps: document.get_element_by_id("fps"),
                shown_score: None,
                shown_phase: None,
            }
        }

        fn set_hidden(el: &Option<Element>, hidden: bool) {
            if let Some(el) = el {
                let classes = el.class_list();
                let _ = if hidden {
                    classes.add_1("hidden")
                } else {
                    classes.remove_1("hidden")
                };
            }
        }

        fn update(&mut self, state: &GameState, fps: Option<u32>) {
            if self.shown_score != Some(state.score) {
                if let Some(el) = &self.score {
                    el.set_text_content(Some(&format!("Score: {}", state.score)));
                }
                self.shown_score = Some(state.score);
            }

            if self.shown_phase != Some(state.phase) {
                let over = state.phase == GamePhase::GameOver;
                if over {
                    if let Some(el) = &self.final_score {
                        el.set_text_content(Some(&state.score.to_string()));
                    }
                }
                Self::set_hidden(&self.game_over, !over);
                Self::set_hidden(&self.paused, state.phase != GamePhase::Paused);
                self.shown_phase = Some(state.phase);
            }

            if let (Some(el), Some(fps)) = (&self.fps, fps) {
                el.set_text_content(Some(&format!("{fps} FPS")));
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<RenderState>,
        clock: FrameClock,
        keys: KeyState,
        hud: Hud,
        /// Whether an animation frame is scheduled
        running: bool,
    }

    impl Game {
        /// Run as many fixed steps as the elapsed time calls for, then draw
        fn frame(&mut self, time: f64) {
            let steps = self.clock.advance(time);
            for _ in 0..steps {
                let input = self.keys.take_input();
                tick(&mut self.state, &input);
                if self.state.phase == GamePhase::GameOver {
                    break;
                }
            }

            self.render();
            let fps = self.settings.show_fps.then(|| self.clock.fps());
            self.hud.update(&self.state, fps);
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(&self.state, &self.settings);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.reconfigure();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn restart(&mut self) {
            self.state.restart();
            self.clock.reset();
            self.keys.release_all();
        }

        /// Queue a pause if the game is running (focus or visibility lost)
        fn auto_pause(&mut self, reason: &str) {
            self.keys.release_all();
            if self.state.phase == GamePhase::Playing {
                self.keys.request_pause();
                log::info!("Auto-paused ({reason})");
            }
        }
    }

    /// Size the canvas to a fraction of the viewport.
    /// Returns the logical field size and the backing-store size in device pixels.
    fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> (Vec2, (u32, u32)) {
        let viewport = |v: Result<JsValue, JsValue>, fallback: f32| {
            v.ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(fallback as f64 / CANVAS_VIEWPORT_FRACTION)
        };
        let width = (viewport(window.inner_width(), DEFAULT_FIELD_WIDTH)
            * CANVAS_VIEWPORT_FRACTION)
            .floor()
            .max(1.0);
        let height = (viewport(window.inner_height(), DEFAULT_FIELD_HEIGHT)
            * CANVAS_VIEWPORT_FRACTION)
            .floor()
            .max(1.0);

        let style = canvas.style();
        let _ = style.set_property("width", &format!("{width}px"));
        let _ = style.set_property("height", &format!("{height}px"));

        let dpr = window.device_pixel_ratio();
        let physical = ((width * dpr) as u32, (height * dpr) as u32);
        canvas.set_width(physical.0);
        canvas.set_height(physical.1);

        (Vec2::new(width as f32, height as f32), physical)
    }

    /// Read the optional inline tuning block, falling back to defaults
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id(TUNING_ID)
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };

        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning block: {e}");
                Tuning::default()
            }
        }
    }

    pub async fn run() -> Result<(), PlatformError> {
        log::info!("Asteroid Blaster starting...");

        let window = web_sys::window().ok_or(PlatformError::NoWindow)?;
        let document = window.document().ok_or(PlatformError::NoDocument)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or(PlatformError::MissingElement(CANVAS_ID))?
            .dyn_into()
            .map_err(|_| PlatformError::WrongElementType {
                id: CANVAS_ID,
                expected: "canvas",
            })?;

        let (field, (width, height)) = fit_canvas(&window, &canvas);

        let settings = window
            .location()
            .search()
            .map(|q| Settings::from_query(&q))
            .unwrap_or_default();
        let mut tuning = load_tuning(&document);
        settings.apply_to(&mut tuning);
        log::info!("Quality: {}", settings.quality.as_str());

        let seed = js_sys::Date::now() as u64;
        let state = GameState::with_tuning(seed, field.x, field.y, tuning, settings.star_count());
        log::info!("Game initialized with seed: {}", seed);

        // WebGPU where available, WebGL2 otherwise
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

        let render_state = RenderState::new(surface, &adapter, width, height, field).await?;

        let game = Rc::new(RefCell::new(Game {
            state,
            settings,
            render_state: Some(render_state),
            clock: FrameClock::new(),
            keys: KeyState::new(),
            hud: Hud::new(&document),
            running: true,
        }));

        setup_input_handlers(&window, game.clone());
        setup_resize_handler(&window, canvas, game.clone());
        setup_restart_button(&document, game.clone());
        setup_auto_pause(&window, &document, game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Asteroid Blaster running!");
        Ok(())
    }

    fn setup_input_handlers(window: &Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().keys.key_down(&event.key()) {
                    // Keep space from scrolling the page
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize_handler(window: &Window, canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (field, (width, height)) = fit_canvas(&window, &canvas);

            let mut g = game.borrow_mut();
            g.state.resize(field.x, field.y);
            if let Some(ref mut render_state) = g.render_state {
                render_state.resize(width, height, field);
            }
            log::debug!("Resized to {}x{}", field.x, field.y);

            // A stopped loop still needs the new layout drawn
            if !g.running {
                g.render();
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
        let keep_running = {
            let mut g = game.borrow_mut();
            g.frame(time);
            g.running = g.state.phase != GamePhase::GameOver;
            g.running
        };

        if keep_running {
            request_animation_frame(game);
        }
    }

    fn setup_restart_button(document: &Document, game: Rc<RefCell<Game>>) {
        let Some(btn) = document.get_element_by_id("restartButton") else {
            log::warn!("No #restartButton; restart unavailable");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let resume = {
                let mut g = game.borrow_mut();
                g.restart();
                !std::mem::replace(&mut g.running, true)
            };
            if resume {
                request_animation_frame(game.clone());
            }
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(window: &Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    game.borrow_mut().auto_pause("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().auto_pause("window blur");
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {e}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: plays a scripted session and reports what happened
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use asteroid_blaster::consts::{DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH, STEPS_PER_SECOND};
    use asteroid_blaster::platform::now_ms;
    use asteroid_blaster::sim::{Actions, GameEvent, GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Asteroid Blaster (native) starting...");
    log::info!("Native mode runs a headless demo - use `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let mut state = GameState::new(seed, DEFAULT_FIELD_WIDTH, DEFAULT_FIELD_HEIGHT);
    let started = now_ms();

    // Spin and shoot, firing the special whenever it is ready
    let max_steps = (STEPS_PER_SECOND * 120.0) as u64;
    let (mut shots, mut kills, mut specials) = (0u32, 0u32, 0u32);
    while state.phase == GamePhase::Playing && state.time_ticks < max_steps {
        let mut held = Actions::ROTATE_RIGHT | Actions::FIRE;
        if state.special_ready() && state.asteroids.len() > 12 {
            held |= Actions::SPECIAL;
        }
        tick(&mut state, &TickInput { held, pause: false });

        for event in &state.events {
            match event {
                GameEvent::ShotFired => shots += 1,
                GameEvent::AsteroidDestroyed { .. } => kills += 1,
                GameEvent::SpecialUsed => specials += 1,
                _ => {}
            }
        }
    }

    println!("\nSeed {seed}: {:?} after {:.1}s", state.phase, state.clock_ms / 1000.0);
    println!("  shots fired:         {shots}");
    println!("  asteroids destroyed: {kills}");
    println!("  specials used:       {specials}");
    println!("  waves:               {}", state.spawn.wave);
    println!("  final score:         {}", state.score);
    println!(
        "  simulated {} ticks in {:.1} ms",
        state.time_ticks,
        now_ms() - started
    );
}
