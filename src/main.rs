//! Cinema Hand entry point
//!
//! Handles platform-specific initialization and runs the scene loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, Response, TouchEvent};

    use cinema_hand::audio::AudioManager;
    use cinema_hand::consts::*;
    use cinema_hand::present::AssetManifest;
    use cinema_hand::renderer::CanvasRenderer;
    use cinema_hand::{CinemaHand, Key, SceneCommand, Tuning};

    /// Scene plus its browser backends
    struct Host {
        scene: CinemaHand,
        renderer: CanvasRenderer,
        audio: AudioManager,
        last_time: f64,
    }

    impl Host {
        /// Run one frame: simulate, play requested sounds, paint
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            self.last_time = time;

            self.scene.on_frame(dt.min(MAX_FRAME_DT));
            self.flush_sounds();
            self.renderer.render(self.scene.stage());
        }

        fn flush_sounds(&mut self) {
            for sound in self.scene.drain_sounds() {
                self.audio.play(&sound);
            }
        }

        fn pointer_down(&mut self, pos: Vec2) {
            self.audio.resume();
            if let Some(SceneCommand::Restart) = self.scene.on_pointer_down(pos) {
                self.audio.stop_bgm();
                self.scene.restart();
            }
            self.flush_sounds();
        }

        /// Client coordinates to scene coordinates
        fn to_scene(&self, client_x: f64, client_y: f64) -> Vec2 {
            let canvas = self.renderer.canvas();
            let rect = canvas.get_bounding_client_rect();
            let sx = canvas.width() as f64 / rect.width().max(1.0);
            let sy = canvas.height() as f64 / rect.height().max(1.0);
            Vec2::new(
                ((client_x - rect.left()) * sx) as f32,
                ((client_y - rect.top()) * sy) as f32,
            )
        }
    }

    /// Fetch a text file next to the page; `None` if missing or unreachable
    async fn fetch_text(url: &str) -> Option<String> {
        let window = web_sys::window()?;
        let resp = JsFuture::from(window.fetch_with_str(url)).await.ok()?;
        let resp: Response = resp.dyn_into().ok()?;
        if !resp.ok() {
            return None;
        }
        let text = JsFuture::from(resp.text().ok()?).await.ok()?;
        text.as_string()
    }

    async fn load_tuning() -> Tuning {
        let Some(json) = fetch_text("tuning.json").await else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning.json");
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning.json: {}", e);
                Tuning::default()
            }
        }
    }

    async fn load_manifest(audio: &AudioManager) -> AssetManifest {
        let mut manifest = match fetch_text("assets/manifest.json").await {
            Some(json) => AssetManifest::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Bad asset manifest ({}), assuming every asset exists", e);
                AssetManifest::complete()
            }),
            None => AssetManifest::complete(),
        };
        // Sounds are synthesised, so availability is the audio backend's call
        manifest.audio.retain(|name| audio.has(name));
        manifest
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Cinema Hand starting...");

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

        let tuning = load_tuning().await;
        let audio = AudioManager::new();
        let manifest = load_manifest(&audio).await;

        let mut renderer = match CanvasRenderer::new(canvas.clone(), GAME_W as u32, GAME_H as u32) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Canvas 2D unavailable: {:?}", e);
                return;
            }
        };
        renderer.preload(&manifest);

        let seed = js_sys::Date::now() as u64;
        let scene = CinemaHand::new(tuning, manifest, seed);
        log::info!("Scene initialized with seed: {}", seed);

        let host = Rc::new(RefCell::new(Host {
            scene,
            renderer,
            audio,
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, host.clone());
        setup_visibility(host.clone());

        request_animation_frame(host);

        log::info!("Cinema Hand running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Mouse move
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut h = host.borrow_mut();
                let pos = h.to_scene(event.client_x() as f64, event.client_y() as f64);
                h.scene.on_pointer_move(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down - hold still, tap, scene controls
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut h = host.borrow_mut();
                let pos = h.to_scene(event.client_x() as f64, event.client_y() as f64);
                h.pointer_down(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up (on the window, so releasing outside the canvas still counts)
        {
            let host = host.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut h = host.borrow_mut();
                let pos = h.to_scene(event.client_x() as f64, event.client_y() as f64);
                h.scene.on_pointer_up(pos);
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut h = host.borrow_mut();
                    let pos = h.to_scene(touch.client_x() as f64, touch.client_y() as f64);
                    h.scene.on_pointer_move(pos);
                    h.pointer_down(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut h = host.borrow_mut();
                    let pos = h.to_scene(touch.client_x() as f64, touch.client_y() as f64);
                    h.scene.on_pointer_move(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.changed_touches().get(0) {
                    let mut h = host.borrow_mut();
                    let pos = h.to_scene(touch.client_x() as f64, touch.client_y() as f64);
                    h.scene.on_pointer_up(pos);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let host = host.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                let key = match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        Key::Freeze
                    }
                    _ => Key::Other,
                };
                host.borrow_mut().scene.on_key_down(key);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = if event.key() == " " { Key::Freeze } else { Key::Other };
                host.borrow_mut().scene.on_key_up(key);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// A hidden tab stops animation frames; restart the frame clock on return
    fn setup_visibility(host: Rc<RefCell<Host>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Visible {
                host.borrow_mut().last_time = 0.0;
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            scene_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn scene_loop(host: Rc<RefCell<Host>>, time: f64) {
        host.borrow_mut().frame(time);
        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Cinema Hand (native) starting...");
    log::info!("Native mode runs a headless scripted scene - serve the wasm build to play");

    let tuning = match std::env::args().nth(1) {
        Some(path) => load_tuning(&path),
        None => cinema_hand::Tuning::default(),
    };
    let seed = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC1_4E3A);

    headless::run(tuning, seed);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> cinema_hand::Tuning {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| cinema_hand::Tuning::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            cinema_hand::Tuning::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted player for the native build: drifts the pointer around and holds
/// still whenever the hand is parked close by
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use cinema_hand::consts::MAX_FRAME_DT;
    use cinema_hand::present::AssetManifest;
    use cinema_hand::sim::{GameEvent, MotionPhase};
    use cinema_hand::{CinemaHand, Key, Tuning};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    pub fn run(tuning: Tuning, seed: u64) {
        let limit = tuning.movie_time + 2.0;
        let mut scene = CinemaHand::new(tuning, AssetManifest::complete(), seed);
        let mut t = 0.0f32;
        let mut holding = false;

        while t < limit && !scene.is_terminal() {
            let tuning = scene.tuning();
            let base = tuning.avatar_base - tuning.pointer_offset;
            let sway = Vec2::new((t * 0.7).sin() * 120.0, (t * 1.3).cos() * 60.0);
            let near_hand = scene.state().target.as_ref().is_some_and(|target| {
                target.kind.is_hand()
                    && target.phase == MotionPhase::Exposed
            }) && scene
                .state()
                .target_distance()
                .is_some_and(|d| d <= tuning.near_dist);

            if near_hand != holding {
                holding = near_hand;
                if holding {
                    scene.on_key_down(Key::Freeze);
                } else {
                    scene.on_key_up(Key::Freeze);
                }
            }
            scene.on_pointer_move(base + sway);
            scene.on_frame(DT.min(MAX_FRAME_DT));
            t += DT;

            for event in scene.last_events() {
                match event {
                    GameEvent::Spawned { kind } => log::info!("[{t:6.2}s] {kind:?} appears"),
                    GameEvent::RetractStarted => log::info!("[{t:6.2}s] too fast, hand pulls back"),
                    GameEvent::Success { via, .. } => log::info!("[{t:6.2}s] caught via {via:?}"),
                    GameEvent::Horror => log::info!("[{t:6.2}s] the film ran out"),
                    _ => {}
                }
            }
        }

        let outcome = scene.state().interaction;
        log::info!(
            "Outcome after {:.2}s: {:?} ({} frames)",
            t,
            outcome,
            scene.state().time_ticks
        );
    }
}
