//! Astro Dodge entry point
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
    use web_sys::{HtmlCanvasElement, TouchEvent};

    use astro_dodge::audio::{AudioManager, SoundEffect};
    use astro_dodge::consts::{MAX_SUBSTEPS, SIM_DT};
    use astro_dodge::highscores::{HighScores, format_survival};
    use astro_dodge::render::Renderer;
    use astro_dodge::settings::Settings;
    use astro_dodge::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use astro_dodge::tuning::Difficulty;

    /// Held-key state, recomputed into the movement axis every tick
    #[derive(Default)]
    struct KeyState {
        up: bool,
        down: bool,
        left: bool,
        right: bool,
    }

    impl KeyState {
        fn axis(&self) -> Vec2 {
            let x = (self.right as i8 - self.left as i8) as f32;
            let y = (self.down as i8 - self.up as i8) as f32;
            let axis = Vec2::new(x, y);
            if axis.length_squared() > 1.0 {
                axis.normalize()
            } else {
                axis
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Option<Renderer>,
        audio: AudioManager,
        settings: Settings,
        highscores: HighScores,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        keys: KeyState,
        /// Touch drag axis; overrides the keyboard while a touch is active
        touch_axis: Option<Vec2>,
        touch_origin: Option<Vec2>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            let settings = Settings::load();
            let highscores = HighScores::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);

            let mut state = GameState::new(seed);
            state.difficulty = settings.difficulty;

            Self {
                state,
                renderer: None,
                audio,
                settings,
                highscores,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                keys: KeyState::default(),
                touch_axis: None,
                touch_origin: None,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.input.move_axis = self.touch_axis.unwrap_or_else(|| self.keys.axis());
                let input = self.input.clone();
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.start = false;
                self.input.pause = false;
                self.input.exit = false;
                self.input.difficulty = None;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Turn drained sim events into sound, and record finished runs
        fn process_events(&mut self) {
            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(event) {
                    self.audio.play(effect);
                }
                if event == GameEvent::GameOver {
                    self.record_run();
                }
            }
        }

        fn record_run(&mut self) {
            let survival_ms = self.state.elapsed_ms() as u64;
            let rank = self.highscores.add_score(
                survival_ms,
                self.state.heals_consumed,
                self.state.difficulty,
                js_sys::Date::now(),
            );
            if rank.is_some() {
                self.highscores.save();
            }
            if rank == Some(1) {
                self.audio.play(SoundEffect::HighScore);
            }
        }

        /// Render the current frame
        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.draw(&self.state);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            let set_text = |id: &str, text: &str| {
                if let Some(el) = document.get_element_by_id(id) {
                    el.set_text_content(Some(text));
                }
            };

            let ship = &self.state.ship;
            if let Some(bar) = document.get_element_by_id("hud-health-bar") {
                let pct = (ship.health / ship.max_health * 100.0).clamp(0.0, 100.0);
                let _ = bar.set_attribute("style", &format!("width: {pct:.0}%"));
            }
            set_text("hud-hits", &ship.hit_count.to_string());
            set_text("hud-heals", &self.state.heals_consumed.to_string());
            set_text(
                "hud-time",
                &format_survival(self.state.elapsed_ms() as u64),
            );
            set_text("hud-drones", &self.state.drones.len().to_string());

            // Active buff countdowns, blank when inactive
            let countdown = |ms: f32| {
                if ms > 0.0 {
                    format!("{:.1}s", ms / 1000.0)
                } else {
                    String::new()
                }
            };
            set_text("hud-boost", &countdown(ship.speed_boost_ms));
            set_text("hud-magnet", &countdown(ship.magnet_ms));
            set_text(
                "hud-shield",
                &if ship.invincible_hits > 0 {
                    ship.invincible_hits.to_string()
                } else {
                    String::new()
                },
            );

            if self.settings.show_fps {
                set_text("hud-fps", &self.fps.to_string());
            }

            let show = |id: &str, visible: bool| {
                if let Some(el) = document.get_element_by_id(id) {
                    let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
                }
            };
            show("menu-overlay", self.state.phase == GamePhase::Menu);
            show("pause-overlay", self.state.phase == GamePhase::Paused);
            show("game-over-overlay", self.state.phase == GamePhase::GameOver);

            if self.state.phase == GamePhase::GameOver {
                set_text(
                    "final-time",
                    &format_survival(self.state.elapsed_ms() as u64),
                );
                set_text("final-heals", &self.state.heals_consumed.to_string());
                self.render_highscore_list(&document);
            }
        }

        fn render_highscore_list(&self, document: &web_sys::Document) {
            let Some(list) = document.get_element_by_id("highscore-list") else {
                return;
            };
            let mut html = String::new();
            for (i, entry) in self.highscores.entries.iter().enumerate() {
                html.push_str(&format!(
                    "<li><span>#{}</span> {} ({}) - {} heals</li>",
                    i + 1,
                    format_survival(entry.survival_ms),
                    entry.difficulty.as_str(),
                    entry.heals,
                ));
            }
            list.set_inner_html(&html);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Astro Dodge starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size from its CSS size
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        canvas.set_width((client_w as f64 * dpr) as u32);
        canvas.set_height((client_h as f64 * dpr) as u32);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        {
            let mut g = game.borrow_mut();
            let renderer = Renderer::new(canvas.clone()).expect("renderer init failed");
            g.state.view = renderer.view_size();
            g.renderer = Some(renderer);
        }

        setup_keyboard(game.clone());
        setup_touch(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Astro Dodge running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                let mut handled = true;
                match event.key().as_str() {
                    "w" | "W" | "ArrowUp" => g.keys.up = true,
                    "s" | "S" | "ArrowDown" => g.keys.down = true,
                    "a" | "A" | "ArrowLeft" => g.keys.left = true,
                    "d" | "D" | "ArrowRight" => g.keys.right = true,
                    " " => {
                        // Space starts from the menus, pauses mid-run
                        match g.state.phase {
                            GamePhase::Menu | GamePhase::GameOver => g.input.start = true,
                            _ => g.input.pause = true,
                        }
                        g.audio.resume();
                    }
                    "Escape" => {
                        // Escape pauses, a second press abandons the run
                        match g.state.phase {
                            GamePhase::Paused => g.input.exit = true,
                            _ => g.input.pause = true,
                        }
                    }
                    _ => handled = false,
                }
                if handled {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "w" | "W" | "ArrowUp" => g.keys.up = false,
                    "s" | "S" | "ArrowDown" => g.keys.down = false,
                    "a" | "A" | "ArrowLeft" => g.keys.left = false,
                    "d" | "D" | "ArrowRight" => g.keys.right = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Drag direction becomes the movement axis; radius 60px maps to
        // full deflection
        const DRAG_RADIUS: f32 = 60.0;

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let origin = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                    g.touch_origin = Some(origin);
                    g.touch_axis = Some(Vec2::ZERO);
                    g.audio.resume();
                    // Tap starts from the menus
                    match g.state.phase {
                        GamePhase::Menu | GamePhase::GameOver => g.input.start = true,
                        _ => {}
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    if let Some(origin) = g.touch_origin {
                        let pos = Vec2::new(touch.client_x() as f32, touch.client_y() as f32);
                        let delta = (pos - origin) / DRAG_RADIUS;
                        g.touch_axis = Some(delta.clamp_length_max(1.0));
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.touch_origin = None;
                g.touch_axis = None;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Start / restart buttons share behavior
        for id in ["start-btn", "restart-btn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.input.start = true;
                    g.audio.resume();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.pause = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("quit-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.exit = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Difficulty buttons persist the choice
        for (id, difficulty) in [
            ("diff-easy", Difficulty::Easy),
            ("diff-normal", Difficulty::Normal),
            ("diff-hard", Difficulty::Hard),
        ] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    let mut g = game.borrow_mut();
                    g.input.difficulty = Some(difficulty);
                    g.settings.difficulty = difficulty;
                    g.settings.save();
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Running {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
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
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Running {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.process_events();
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;

    use astro_dodge::consts::SIM_DT;
    use astro_dodge::sim::{GamePhase, GameState, TickInput, tick};
    use astro_dodge::tuning::Difficulty;

    env_logger::init();
    log::info!("Astro Dodge (native) starting headless smoke run...");

    let seed = std::env::var("ASTRO_DODGE_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    let mut state = GameState::new(seed);
    state.reset_run(Difficulty::Normal);

    // 30 simulated seconds of circling to keep idle decay quiet
    let ticks = 30 * 60;
    for i in 0..ticks {
        let angle = i as f32 * 0.02;
        let input = TickInput {
            move_axis: Vec2::new(angle.cos(), angle.sin()),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        state.drain_events();
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "seed={} survived {:.1}s, health {:.2}, {} enemies on screen, {} heals",
        seed,
        state.elapsed_ms() / 1000.0,
        state.ship.health,
        state.enemies.len(),
        state.heals_consumed,
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
