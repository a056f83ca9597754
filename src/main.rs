//! Mini Arcade - entry point
//!
//! Web: draws both games on 2D canvases. Native: runs seeded headless demos.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

    use mini_arcade::input::{ClimbSampler, ColorMatchSampler, InputEvent, InputSampler};
    use mini_arcade::platform;
    use mini_arcade::sim::GamePhase;
    use mini_arcade::sim::climb::{self, ClimbEvent, ClimbState, ObstacleKind, PlatformKind};
    use mini_arcade::sim::color_match::{
        self, BallColor, ColorMatchEvent, ColorMatchState, ZONE_COUNT,
    };
    use mini_arcade::{FrameClock, Presenter, Settings};

    fn css(rgb: u32) -> String {
        format!("#{rgb:06x}")
    }

    fn platform_color(kind: PlatformKind) -> &'static str {
        match kind {
            PlatformKind::Normal => "#8b5a2b",
            PlatformKind::Small => "#a0522d",
            PlatformKind::Moving => "#4682b4",
            PlatformKind::Breakable => "#d2b48c",
            PlatformKind::Bouncy => "#ff69b4",
        }
    }

    /// Draws a game onto a 2D canvas
    struct CanvasPresenter {
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        animations: bool,
        clouds: bool,
    }

    impl CanvasPresenter {
        /// Restart the canvas's CSS hit animation
        fn flash(&self) {
            let classes = self.canvas.class_list();
            let _ = classes.remove_1("hit");
            // Force reflow so re-adding the class restarts the animation
            let _ = self.canvas.offset_width();
            let _ = classes.add_1("hit");
        }

        fn banner(&self, w: f64, h: f64, title: &str, subtitle: &str) {
            let ctx = &self.ctx;
            ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
            ctx.fill_rect(0.0, 0.0, w, h);
            ctx.set_fill_style_str("#ffffff");
            ctx.set_text_align("center");
            ctx.set_font("bold 32px sans-serif");
            let _ = ctx.fill_text(title, w / 2.0, h / 2.0 - 10.0);
            ctx.set_font("16px sans-serif");
            let _ = ctx.fill_text(subtitle, w / 2.0, h / 2.0 + 20.0);
        }
    }

    impl Presenter<ClimbState> for CanvasPresenter {
        fn present(&mut self, state: &ClimbState) {
            let ctx = &self.ctx;
            let vp = state.tuning.viewport;
            let (w, h) = (vp.width as f64, vp.height as f64);
            let cam = state.camera_y as f64;

            ctx.set_fill_style_str("#87ceeb");
            ctx.fill_rect(0.0, 0.0, w, h);

            if self.clouds {
                ctx.set_fill_style_str("rgba(255, 255, 255, 0.8)");
                for cloud in &state.clouds {
                    // Half-speed parallax over a three-screen band
                    let y = (cloud.pos.y as f64 - cam * 0.5).rem_euclid(h * 3.0) - h;
                    ctx.begin_path();
                    let _ = ctx.arc(cloud.pos.x as f64, y, cloud.size as f64, 0.0, TAU);
                    ctx.fill();
                }
            }

            for p in &state.platforms {
                ctx.set_fill_style_str(platform_color(p.kind));
                if p.kind == PlatformKind::Breakable && p.health == 1 {
                    ctx.set_global_alpha(0.6);
                }
                ctx.fill_rect(
                    p.rect.pos.x as f64,
                    p.rect.pos.y as f64 - cam,
                    p.rect.size.x as f64,
                    p.rect.size.y as f64,
                );
                ctx.set_global_alpha(1.0);
            }

            for o in &state.obstacles {
                ctx.set_fill_style_str(match o.kind {
                    ObstacleKind::Rock => "#696969",
                    ObstacleKind::Bird => "#333333",
                });
                ctx.fill_rect(
                    o.rect.pos.x as f64,
                    o.rect.pos.y as f64 - cam,
                    o.rect.size.x as f64,
                    o.rect.size.y as f64,
                );
            }

            for pu in state.power_ups.iter().filter(|p| !p.collected) {
                let (bob, pulse) = if self.animations {
                    (pu.bob_phase.sin() as f64 * 3.0, 1.0 + pu.pulse_phase.sin() as f64 * 0.1)
                } else {
                    (0.0, 1.0)
                };
                let c = pu.rect.center();
                let r = pu.rect.size.x as f64 / 2.0 * pulse;
                ctx.set_fill_style_str(&css(pu.kind.color()));
                ctx.begin_path();
                let _ = ctx.arc(c.x as f64, c.y as f64 - cam + bob, r, 0.0, TAU);
                ctx.fill();
            }

            for particle in state.particles.iter() {
                ctx.set_global_alpha((particle.life as f64 / 30.0).min(1.0));
                ctx.set_fill_style_str(&css(particle.color));
                let s = particle.size as f64;
                ctx.fill_rect(
                    particle.pos.x as f64 - s / 2.0,
                    particle.pos.y as f64 - cam - s / 2.0,
                    s,
                    s,
                );
            }
            ctx.set_global_alpha(1.0);

            let player = &state.player;
            let blink = player.invulnerable && self.animations && (state.time_ticks / 5) % 2 == 0;
            if !blink {
                ctx.set_fill_style_str(if state.speed_boost_active() {
                    "#2196f3"
                } else {
                    "#ff6b35"
                });
                ctx.fill_rect(
                    player.rect.pos.x as f64,
                    player.rect.pos.y as f64 - cam,
                    player.rect.size.x as f64,
                    player.rect.size.y as f64,
                );
            }

            match state.phase {
                GamePhase::Ready => self.banner(w, h, "Climb", "Press Enter to start"),
                GamePhase::GameOver => self.banner(w, h, "Game Over", "Press R to climb again"),
                GamePhase::Playing => {}
            }
        }
    }

    impl Presenter<ColorMatchState> for CanvasPresenter {
        fn present(&mut self, state: &ColorMatchState) {
            let ctx = &self.ctx;
            let vp = state.tuning.viewport;
            let (w, h) = (vp.width as f64, vp.height as f64);
            let lane = state.zone_width() as f64;
            let band = state.tuning.catch_band_height as f64;

            ctx.set_fill_style_str("#1e1e2e");
            ctx.fill_rect(0.0, 0.0, w, h);

            for zone in 0..ZONE_COUNT {
                ctx.set_fill_style_str(&css(BallColor::for_zone(zone).rgb()));
                ctx.set_global_alpha(if zone == state.player_zone { 0.9 } else { 0.3 });
                ctx.fill_rect(zone as f64 * lane, h - band, lane, band);
            }
            ctx.set_global_alpha(1.0);

            for ball in &state.balls {
                ctx.set_fill_style_str(&css(ball.color.rgb()));
                ctx.begin_path();
                let _ = ctx.arc(
                    ball.pos.x as f64,
                    ball.pos.y as f64,
                    state.tuning.ball_radius as f64,
                    0.0,
                    TAU,
                );
                ctx.fill();
            }

            ctx.set_fill_style_str("#ffffff");
            ctx.fill_rect(state.player_zone as f64 * lane + 10.0, h - 16.0, lane - 20.0, 10.0);

            match state.phase {
                GamePhase::Ready => self.banner(w, h, "Color Match", "Press Enter to start"),
                GamePhase::GameOver => self.banner(w, h, "Game Over", "Press R to play again"),
                GamePhase::Playing => {}
            }
        }
    }

    /// Writes HUD scalars into `#<prefix>-<field>` elements
    struct DomHud {
        document: Document,
        prefix: &'static str,
    }

    impl DomHud {
        fn set(&self, field: &str, value: &str) {
            if let Some(el) = self
                .document
                .get_element_by_id(&format!("{}-{field}", self.prefix))
            {
                el.set_text_content(Some(value));
            }
        }

        fn show_game_over(&self, visible: bool) {
            if let Some(el) = self
                .document
                .get_element_by_id(&format!("{}-game-over", self.prefix))
            {
                let _ = el.class_list().toggle_with_force("hidden", !visible);
            }
        }
    }

    impl Presenter<ClimbState> for DomHud {
        fn present(&mut self, state: &ClimbState) {
            let hud = state.hud();
            self.set("score", &hud.score.to_string());
            self.set("height", &hud.height.to_string());
            self.set("lives", &hud.lives.to_string());
            self.set("combo", &hud.combo.to_string());
            self.set("max-combo", &hud.max_combo.to_string());
            self.show_game_over(hud.phase == GamePhase::GameOver);
        }
    }

    impl Presenter<ColorMatchState> for DomHud {
        fn present(&mut self, state: &ColorMatchState) {
            let hud = state.hud();
            self.set("score", &hud.score.to_string());
            self.set("level", &hud.level.to_string());
            self.set("lives", &hud.lives.to_string());
            self.show_game_over(hud.phase == GamePhase::GameOver);
        }
    }

    struct ClimbGame {
        state: ClimbState,
        sampler: ClimbSampler,
        clock: FrameClock,
        canvas: CanvasPresenter,
        hud: DomHud,
    }

    impl ClimbGame {
        fn frame(&mut self, time: f64) {
            for _ in 0..self.clock.advance_to(time) {
                let input = self.sampler.sample();
                climb::tick(&mut self.state, &input);
                for event in &self.state.events {
                    match event {
                        ClimbEvent::Damaged { .. } => self.canvas.flash(),
                        ClimbEvent::PowerUpCollected { kind, points } => {
                            log::debug!("Collected {kind:?} for {points:.0}");
                        }
                        _ => {}
                    }
                }
            }
            self.canvas.present(&self.state);
            self.hud.present(&self.state);
        }
    }

    struct ColorMatchGame {
        state: ColorMatchState,
        sampler: ColorMatchSampler,
        clock: FrameClock,
        canvas: CanvasPresenter,
        hud: DomHud,
    }

    impl ColorMatchGame {
        fn frame(&mut self, time: f64) {
            for _ in 0..self.clock.advance_to(time) {
                let input = self.sampler.sample();
                color_match::tick(&mut self.state, &input);
                if self.state.events.iter().any(|e| {
                    matches!(
                        e,
                        ColorMatchEvent::Mismatched { .. } | ColorMatchEvent::Missed { .. }
                    )
                }) {
                    self.canvas.flash();
                }
            }
            self.canvas.present(&self.state);
            self.hud.present(&self.state);
        }
    }

    /// Whichever games the page hosts
    struct Arcade {
        climb: Option<ClimbGame>,
        color_match: Option<ColorMatchGame>,
    }

    impl Arcade {
        fn handle(&mut self, event: InputEvent) {
            if let Some(game) = &mut self.climb {
                game.sampler.handle(event);
            }
            if let Some(game) = &mut self.color_match {
                game.sampler.handle(event);
            }
        }

        fn frame(&mut self, time: f64) {
            if let Some(game) = &mut self.climb {
                game.frame(time);
            }
            if let Some(game) = &mut self.color_match {
                game.frame(time);
            }
        }

        /// Drop held keys and the frame backlog (focus lost / tab hidden)
        fn suspend(&mut self) {
            if let Some(game) = &mut self.climb {
                game.sampler.reset();
                game.clock.reset();
            }
            if let Some(game) = &mut self.color_match {
                game.clock.reset();
            }
        }
    }

    fn canvas_presenter(
        document: &Document,
        id: &str,
        width: f32,
        height: f32,
        settings: &Settings,
    ) -> Option<CanvasPresenter> {
        let Some(canvas) = document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::warn!("No canvas #{id}; skipping");
            return None;
        };
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
        let Some(ctx) = ctx else {
            log::warn!("Canvas #{id} has no 2D context");
            return None;
        };
        Some(CanvasPresenter {
            canvas,
            ctx,
            animations: settings.effective_animations(),
            clouds: settings.quality.clouds_enabled(),
        })
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Mini Arcade starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;

        let climb = {
            let vp = settings.climb.viewport;
            canvas_presenter(&document, "climb-canvas", vp.width, vp.height, &settings).and_then(
                |canvas| match ClimbState::new(seed, settings.climb.clone(), settings.max_particles())
                {
                    Ok(state) => Some(ClimbGame {
                        state,
                        sampler: ClimbSampler::new(),
                        clock: FrameClock::new(),
                        canvas,
                        hud: DomHud {
                            document: document.clone(),
                            prefix: "climb",
                        },
                    }),
                    Err(e) => {
                        log::error!("Climb disabled: {e}");
                        None
                    }
                },
            )
        };

        let color_match = {
            let vp = settings.color_match.viewport;
            canvas_presenter(&document, "color-match-canvas", vp.width, vp.height, &settings)
                .and_then(
                    |canvas| match ColorMatchState::new(seed, settings.color_match.clone()) {
                        Ok(state) => Some(ColorMatchGame {
                            state,
                            sampler: ColorMatchSampler::new(),
                            clock: FrameClock::new(),
                            canvas,
                            hud: DomHud {
                                document: document.clone(),
                                prefix: "color-match",
                            },
                        }),
                        Err(e) => {
                            log::error!("Color match disabled: {e}");
                            None
                        }
                    },
                )
        };

        if climb.is_none() && color_match.is_none() {
            log::warn!("No playable game on this page");
            return;
        }
        log::info!("Games initialized with seed: {}", seed);

        let arcade = Rc::new(RefCell::new(Arcade { climb, color_match }));

        setup_input_handlers(arcade.clone());
        setup_buttons(arcade.clone());
        setup_auto_suspend(arcade.clone());

        request_animation_frame(arcade);

        log::info!("Mini Arcade running!");
    }

    fn setup_input_handlers(arcade: Rc<RefCell<Arcade>>) {
        let window = web_sys::window().unwrap();

        {
            let arcade = arcade.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let code = event.code();
                if platform::is_game_key(&code) {
                    event.prevent_default();
                }
                if let Some(input) = platform::event_for_keydown(&code) {
                    arcade.borrow_mut().handle(input);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(input) = platform::event_for_keyup(&event.code()) {
                    arcade.borrow_mut().handle(input);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(arcade: Rc<RefCell<Arcade>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        for (id, input) in [
            ("start-btn", InputEvent::Start),
            ("restart-btn", InputEvent::Restart),
        ] {
            if let Some(btn) = document.get_element_by_id(id) {
                let arcade = arcade.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    arcade.borrow_mut().handle(input);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_auto_suspend(arcade: Rc<RefCell<Arcade>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        {
            let arcade = arcade.clone();
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                    arcade.borrow_mut().suspend();
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
                arcade.borrow_mut().suspend();
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(arcade: Rc<RefCell<Arcade>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(arcade, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(arcade: Rc<RefCell<Arcade>>, time: f64) {
        arcade.borrow_mut().frame(time);
        request_animation_frame(arcade);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use mini_arcade::input::{ClimbSampler, ColorMatchSampler, Control, InputEvent, InputSampler};
    use mini_arcade::sim::GamePhase;
    use mini_arcade::sim::climb::{self, ClimbState};
    use mini_arcade::sim::color_match::{self, BallColor, ColorMatchState};
    use mini_arcade::{ConfigError, FrameClock, Presenter, Settings};

    /// Simulated wall-clock time per demo
    const DEMO_SECONDS: u32 = 120;
    /// Log a HUD line every this many frames
    const REPORT_EVERY: u32 = 600;

    /// Logs HUD snapshots at a fixed frame interval
    #[derive(Default)]
    struct LogPresenter {
        frames: u32,
    }

    impl LogPresenter {
        fn due(&mut self) -> bool {
            self.frames += 1;
            self.frames % REPORT_EVERY == 0
        }
    }

    impl Presenter<ClimbState> for LogPresenter {
        fn present(&mut self, state: &ClimbState) {
            if self.due() {
                let hud = state.hud();
                log::info!(
                    "climb: score {} height {} lives {} combo {}",
                    hud.score,
                    hud.height,
                    hud.lives,
                    hud.combo
                );
                log::debug!("climb: {} particles live", state.particles.len());
            }
        }
    }

    impl Presenter<ColorMatchState> for LogPresenter {
        fn present(&mut self, state: &ColorMatchState) {
            if self.due() {
                let hud = state.hud();
                log::info!(
                    "color match: score {} level {} lives {}",
                    hud.score,
                    hud.level,
                    hud.lives
                );
            }
        }
    }

    /// Steer toward the nearest platform above and jump whenever possible
    fn drive_climber(state: &ClimbState, sampler: &mut ClimbSampler) {
        let player = &state.player;
        let feet = player.rect.bottom();
        let x = player.rect.center().x;
        let target = state
            .platforms
            .iter()
            .filter(|p| p.rect.top() < feet - 1.0)
            .min_by(|a, b| {
                let da = (feet - a.rect.top()) + (a.rect.center().x - x).abs();
                let db = (feet - b.rect.top()) + (b.rect.center().x - x).abs();
                da.total_cmp(&db)
            });

        sampler.handle(InputEvent::Release(Control::Left));
        sampler.handle(InputEvent::Release(Control::Right));
        if let Some(p) = target {
            let dx = p.rect.center().x - x;
            if dx < -10.0 {
                sampler.handle(InputEvent::Press(Control::Left));
            } else if dx > 10.0 {
                sampler.handle(InputEvent::Press(Control::Right));
            }
        }

        sampler.handle(InputEvent::Release(Control::Jump));
        if player.on_ground || (player.vel.y > 0.0 && player.double_jump_available) {
            sampler.handle(InputEvent::Press(Control::Jump));
        }
    }

    /// Stand under catchable balls and step out of the way of the rest
    fn drive_catcher(state: &ColorMatchState, sampler: &mut ColorMatchSampler) {
        let Some(lowest) = state.balls.iter().max_by(|a, b| a.pos.y.total_cmp(&b.pos.y)) else {
            return;
        };
        let catchable = lowest.color == BallColor::for_zone(lowest.zone);
        let goal = if catchable {
            lowest.zone
        } else if state.player_zone == lowest.zone {
            if lowest.zone == 0 { 1 } else { lowest.zone - 1 }
        } else {
            state.player_zone
        };
        if goal < state.player_zone {
            sampler.handle(InputEvent::Press(Control::Left));
        } else if goal > state.player_zone {
            sampler.handle(InputEvent::Press(Control::Right));
        }
    }

    pub fn run(settings: &Settings, seed: u64) -> Result<(), ConfigError> {
        let frame_dt = 1.0 / 60.0;
        let frames = DEMO_SECONDS * 60;

        let mut climb = ClimbState::new(seed, settings.climb.clone(), settings.max_particles())?;
        let mut sampler = ClimbSampler::new();
        let mut clock = FrameClock::new();
        let mut presenter = LogPresenter::default();
        sampler.handle(InputEvent::Start);
        for _ in 0..frames {
            for _ in 0..clock.advance(frame_dt) {
                let input = sampler.sample();
                climb::tick(&mut climb, &input);
                drive_climber(&climb, &mut sampler);
            }
            presenter.present(&climb);
            if climb.phase == GamePhase::GameOver {
                break;
            }
        }
        log::info!(
            "Climb demo: score {}, height {}, best combo {}",
            climb.hud().score,
            climb.height,
            climb.hud().max_combo
        );

        let mut color_match = ColorMatchState::new(seed, settings.color_match.clone())?;
        let mut sampler = ColorMatchSampler::new();
        let mut clock = FrameClock::new();
        let mut presenter = LogPresenter::default();
        sampler.handle(InputEvent::Start);
        for _ in 0..frames {
            for _ in 0..clock.advance(frame_dt) {
                let input = sampler.sample();
                color_match::tick(&mut color_match, &input);
                drive_catcher(&color_match, &mut sampler);
            }
            presenter.present(&color_match);
            if color_match.phase == GamePhase::GameOver {
                break;
            }
        }
        log::info!(
            "Color match demo: score {}, level {}, lives {}",
            color_match.score,
            color_match.level,
            color_match.lives
        );

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mini Arcade (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let settings = mini_arcade::Settings::load();
    log::info!("Running headless demos with seed {seed}");

    if let Err(e) = headless::run(&settings, seed) {
        log::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
