//! Gravity Flap entry point
//!
//! Browser: WebGPU canvas, DOM input and HUD, requestAnimationFrame loop.
//! Native: headless run with the autopilot flying.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement, KeyboardEvent, MouseEvent, TouchEvent};

    use gravity_flap::consts::*;
    use gravity_flap::platform::{FpsCounter, Frame, Game, HostInfo, Key, KeyboardState, Store};
    use gravity_flap::renderer::{DrawList, RenderState};
    use gravity_flap::{FlappyGame, HighScores, Settings};

    /// Browser host state
    struct App {
        game: FlappyGame,
        render_state: Option<RenderState>,
        draw: DrawList,
        keyboard: KeyboardState,
        fps: FpsCounter,
        store: Store,
        last_time: f64,
        size: (f32, f32),
    }

    impl App {
        fn new(game: FlappyGame, store: Store) -> Self {
            Self {
                game,
                render_state: None,
                draw: DrawList::new(),
                keyboard: KeyboardState::new(),
                fps: FpsCounter::new(),
                store,
                last_time: 0.0,
                size: (WINDOW_WIDTH, WINDOW_HEIGHT),
            }
        }

        /// One host frame: feed the game, then persist what changed
        fn update(&mut self, dt: f32, time: f64) {
            let frame = Frame {
                dt,
                width: self.size.0,
                height: self.size.1,
                keys: self.keyboard.take_pressed(),
                time_ms: js_sys::Date::now(),
            };
            self.game.update(&frame, &mut self.draw);
            self.fps.record(time);

            if self.game.take_settings_changed() {
                if let Err(e) = self.game.settings().save(&self.store) {
                    log::warn!("Failed to save settings: {}", e);
                }
            }
            if self.game.take_high_scores_changed() {
                if let Err(e) = self.game.high_scores().save(&self.store) {
                    log::warn!("Failed to save high scores: {}", e);
                }
            }
        }

        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.draw) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.game.score().to_string()));
            }

            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.game.best().to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.game.settings().show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                        val.set_text_content(Some(&self.fps.fps().to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("hud-autopilot") {
                if self.game.autopilot() {
                    let _ = el.set_attribute("class", "hud-item");
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Gravity Flap starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        document.set_title(WINDOW_TITLE);

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let store = Store::open_default();
        let settings = Settings::load(&store);
        let high_scores = HighScores::load(&store);

        let seed = js_sys::Date::now() as u64;
        let mut game = FlappyGame::new()
            .with_settings(settings)
            .with_high_scores(high_scores);
        game.setup(&HostInfo {
            title: WINDOW_TITLE.to_string(),
            width: client_w as f32,
            height: client_h as f32,
            seed,
        });
        let view = (
            game.state().tuning.window_width,
            game.state().tuning.window_height,
        );

        let app = Rc::new(RefCell::new(App::new(game, store)));
        app.borrow_mut().size = (client_w as f32, client_h as f32);

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, view).await;
        app.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, app.clone());
        setup_settings_panel(app.clone());
        setup_focus_handlers(app.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(app);

        log::info!("Gravity Flap running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Mouse click flaps
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().keyboard.tap(Key::Jump);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch flaps
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().keyboard.tap(Key::Jump);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom_key(event.key().as_str()) {
                    // Keep Space and arrows from scrolling the page
                    event.prevent_default();
                    app.borrow_mut().keyboard.key_down(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom_key(event.key().as_str()) {
                    app.borrow_mut().keyboard.key_up(key);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Checkboxes bound to settings fields
    fn setup_settings_panel(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let bindings: [(&str, fn(&mut Settings) -> &mut bool); 3] = [
            ("opt-clouds", |s| &mut s.clouds),
            ("opt-fps", |s| &mut s.show_fps),
            ("opt-contrast", |s| &mut s.high_contrast),
        ];

        for (id, field) in bindings {
            let Some(input) = document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            else {
                continue;
            };

            {
                let mut settings = app.borrow().game.settings().clone();
                input.set_checked(*field(&mut settings));
            }

            let app = app.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                *field(a.game.settings_mut()) = input_clone.checked();
            });
            let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Drop held keys when the page loses focus so nothing sticks
    fn setup_focus_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    a.keyboard.release_all();
                    // Resume without a catch-up burst
                    a.last_time = 0.0;
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                app.borrow_mut().keyboard.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.update(dt, time);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gravity_flap::platform::{HeadlessConfig, HeadlessHost, Store};
    use gravity_flap::tuning::TUNING_ENV;
    use gravity_flap::{FlappyGame, HighScores, Settings, Tuning};

    env_logger::init();
    log::info!("Gravity Flap (native) starting...");
    log::info!("Native mode runs headless with the autopilot - use `trunk serve` to play");

    let tuning = match std::env::var(TUNING_ENV) {
        Ok(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::error!("Invalid tuning in {}: {}", path, e);
                    Tuning::default()
                }
            },
            Err(e) => {
                log::error!("Failed to read {}: {}", path, e);
                Tuning::default()
            }
        },
        Err(_) => Tuning::default(),
    };

    let mut config = HeadlessConfig::from_env();
    config.width = tuning.window_width;
    config.height = tuning.window_height;
    config.start_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0);

    let store = Store::open_default();
    let game = FlappyGame::with_tuning(tuning).unwrap_or_else(|e| {
        log::error!("Rejected tuning: {}", e);
        FlappyGame::new()
    });
    let mut game = game
        .with_settings(Settings::load(&store))
        .with_high_scores(HighScores::load(&store));
    game.set_autopilot(true);

    let host = HeadlessHost::new(config);
    let summary = host.run(&mut game);

    let end_ms = host.config().start_ms + summary.elapsed * 1000.0;
    let final_score = game.score();
    game.end_run(final_score, end_ms);

    log::info!(
        "Ran {} frames ({:.1}s simulated, {} draw commands)",
        summary.frames,
        summary.elapsed,
        summary.draw_commands
    );
    log::info!(
        "Final score {}, best {}, runs {}",
        final_score,
        game.best(),
        game.runs_finished()
    );

    if game.take_high_scores_changed() {
        if let Err(e) = game.high_scores().save(&store) {
            log::error!("Failed to save high scores: {}", e);
        }
    }
    if game.take_settings_changed() {
        if let Err(e) = game.settings().save(&store) {
            log::error!("Failed to save settings: {}", e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
