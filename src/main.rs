//! Slice Rush entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

    use slice_rush::consts::SIM_DT;
    use slice_rush::platform::{LocalStorageStore, PointerSource, canvas_local};
    use slice_rush::renderer::{RenderError, RenderState, background, build_scene};
    use slice_rush::sim::{GameEvent, GamePhase, PlayField};
    use slice_rush::{Session, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStorageStore>,
        render_state: Option<RenderState>,
        last_time: f64,
        /// A requestAnimationFrame callback is pending
        loop_active: bool,
    }

    impl Game {
        fn new(seed: u64, field: PlayField) -> Self {
            let tuning = Tuning::load();
            Self {
                session: Session::new(seed, tuning, field, LocalStorageStore::default()),
                render_state: None,
                last_time: 0.0,
                loop_active: false,
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let state = self.session.state();
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            match render_state.render(&build_scene(state), background(state)) {
                Ok(()) => {}
                Err(RenderError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                    render_state.reconfigure();
                }
                Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let state = self.session.state();
            set_text(document, "score", &state.score().to_string());
            set_text(document, "high-score", &state.high_score().to_string());
            set_text(document, "level", &state.level().to_string());
        }

        /// Reflect game events in the page
        fn apply_events(&self, document: &Document, events: &[GameEvent]) {
            for event in events {
                match *event {
                    GameEvent::Started => {
                        set_hidden(document, "game-over", true);
                        set_hidden(document, "win-message", true);
                        set_text(document, "pause-button", "Pause");
                    }
                    GameEvent::Paused => set_text(document, "pause-button", "Resume"),
                    GameEvent::Resumed => set_text(document, "pause-button", "Pause"),
                    GameEvent::LevelUp { level } => {
                        set_text(document, "level-banner", &format!("Level {}", level));
                        set_hidden(document, "level-banner", false);
                        unlock_section(document, level);
                    }
                    GameEvent::LevelBannerHidden => set_hidden(document, "level-banner", true),
                    GameEvent::MaxLevelReached => {
                        set_text(
                            document,
                            "win-message",
                            "Congratulations! You've completed all levels!",
                        );
                        set_hidden(document, "win-message", false);
                    }
                    GameEvent::PowerupStart { .. } => set_body_class(document, "slow-motion", true),
                    GameEvent::PowerupEnd => set_body_class(document, "slow-motion", false),
                    GameEvent::GameOver { score, new_record, .. } => {
                        set_body_class(document, "slow-motion", false);
                        set_text(document, "final-score", &score.to_string());
                        set_hidden(document, "new-record", !new_record);
                        set_hidden(document, "game-over", false);
                    }
                    GameEvent::Sliced { .. }
                    | GameEvent::HighScore { .. }
                    | GameEvent::Escaped { .. } => {}
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_body_class(document: &Document, class: &str, on: bool) {
        if let Some(body) = document.body() {
            let _ = body.class_list().toggle_with_force(class, on);
        }
    }

    /// Level N unlocks portfolio section N-1
    fn unlock_section(document: &Document, level: u32) {
        if level < 2 {
            return;
        }
        set_hidden(document, "portfolio-header", false);
        set_hidden(document, &format!("portfolio-section-{}", level - 1), false);
        if let Some(el) = document.get_element_by_id(&format!("portfolio-button-{}", level - 1)) {
            let _ = el.remove_attribute("disabled");
        }
    }

    fn canvas_field(canvas: &HtmlCanvasElement) -> PlayField {
        PlayField::new(canvas.width() as f32, canvas.height() as f32)
    }

    /// Size the backing store to the CSS size times the pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn pointer_pos(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> glam::Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let scale = if rect.width() > 0.0 {
            canvas.width() as f32 / rect.width() as f32
        } else {
            1.0
        };
        canvas_local(
            client_x as f32,
            client_y as f32,
            rect.left() as f32,
            rect.top() as f32,
            scale,
        )
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialised".into());
        }

        log::info!("Slice Rush starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "not a canvas")?;

        let (width, height) = fit_canvas(&window, &canvas);

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, canvas_field(&canvas))));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        {
            let mut g = game.borrow_mut();
            g.render_state = Some(render_state);
            g.update_hud(&document);
            g.render();
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(&canvas, game.clone());
        setup_auto_pause(&document, game);

        log::info!("Slice Rush ready");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down slices
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = pointer_pos(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().session.pointer_down(pos, PointerSource::Mouse);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start slices at the first touch point
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let pos = pointer_pos(&canvas_clone, touch.client_x(), touch.client_y());
                    game.borrow_mut().session.pointer_down(pos, PointerSource::Touch);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                match event.key().as_str() {
                    "Enter" => start(&game),
                    "Escape" | "p" | "P" => toggle_pause(&game),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn start(game: &Rc<RefCell<Game>>) {
        let started = game.borrow_mut().session.start();
        if started {
            ensure_loop(game.clone());
        }
    }

    fn toggle_pause(game: &Rc<RefCell<Game>>) {
        let toggled = game.borrow_mut().session.toggle_pause();
        // One more frame delivers Paused/Resumed even when the loop then halts
        if toggled {
            ensure_loop(game.clone());
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-button", "retry-button"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    start(&game);
                });
                let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("pause-button") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                toggle_pause(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas_clone = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = fit_canvas(&window, &canvas_clone);
            let mut g = game.borrow_mut();
            g.session.resize(width as f32, height as f32);
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(width, height);
            }
            g.render();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn ensure_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_active {
                return;
            }
            g.loop_active = true;
            g.last_time = 0.0;
        }
        request_animation_frame(game);
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
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let keep_going = {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            let report = g.session.frame(dt);
            g.apply_events(&document, &report.events);
            g.render();
            g.update_hud(&document);

            if !report.wants_next_frame {
                g.loop_active = false;
            }
            report.wants_next_frame
        };

        if keep_going {
            request_animation_frame(game);
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden
                    && game.borrow().session.phase() == GamePhase::Running
                {
                    toggle_pause(&game);
                    log::info!("Auto-paused (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                if game.borrow().session.phase() == GamePhase::Running {
                    toggle_pause(&game);
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Slice Rush failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Slice Rush (native) starting...");
    log::info!("Native mode runs a headless autoplay demo - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    autoplay(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one run with a bot that slices whatever is closest to the top
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(seed: u64) {
    use slice_rush::consts::SIM_DT;
    use slice_rush::persistence::MemoryStore;
    use slice_rush::sim::{GameEvent, PlayField, PointerSource};
    use slice_rush::{Session, Tuning};

    const MAX_FRAMES: u32 = 60 * 180;
    // Bot reacts every few frames
    const REACTION_FRAMES: u32 = 9;

    let mut session = Session::new(
        seed,
        Tuning::default(),
        PlayField::new(480.0, 720.0),
        MemoryStore::new(),
    );
    session.start();

    let mut frames = 0;
    while frames < MAX_FRAMES {
        frames += 1;
        if frames % REACTION_FRAMES == 0 {
            let target = session
                .state()
                .objects()
                .iter()
                .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|o| o.pos);
            if let Some(pos) = target {
                session.pointer_down(pos, PointerSource::Mouse);
            }
        }

        let report = session.frame(SIM_DT);
        for event in &report.events {
            match event {
                GameEvent::LevelUp { level } => println!("frame {:>5}: level {}", frames, level),
                GameEvent::PowerupStart { .. } => println!("frame {:>5}: slow motion", frames),
                GameEvent::MaxLevelReached => println!("frame {:>5}: all levels completed", frames),
                _ => {}
            }
        }
        if !report.wants_next_frame {
            break;
        }
    }

    let state = session.state();
    println!(
        "\nseed {}: score {} | level {} | sliced {} | best {} | {:?} after {} frames",
        seed,
        state.score(),
        state.level(),
        state.sliced(),
        state.high_score(),
        state.phase(),
        frames
    );
}
