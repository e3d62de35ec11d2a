//! Engine context: owns the level template, the live simulation, the
//! renderer and the audio sink, and decides what each frame does.

mod audio;
mod menu;

pub use audio::{AudioSink, LogAudio, RecordingAudio};
pub use menu::{Menu, MenuAction, MenuKind};

use crate::{
    config::EngineConfig,
    defs::Buttons,
    renderer::{FrameReport, Renderer, Rgba, Scene, rgb},
    sim::{InputFrame, SimEvent, SimRunner},
    world::{Level, WorldTextures},
};

const CROSSHAIR: Rgba = rgb(255, 255, 255);
const PICKUP_VOLUME: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Menu(MenuKind),
    Gameplay,
    /// Rebuild the simulation from the level template, then play.
    Reset,
    Quit,
}

pub struct Game<R: Renderer, A: AudioSink> {
    pub renderer: R,
    pub audio: A,
    level: Level,
    textures: WorldTextures,
    cfg: EngineConfig,
    sim: SimRunner,
    menu: Menu,
    state: GameState,
    last_report: FrameReport,
}

impl<R: Renderer, A: AudioSink> Game<R, A> {
    /// Start on the main menu with a fresh simulation ready.
    pub fn new(renderer: R, mut audio: A, level: Level, textures: WorldTextures, cfg: EngineConfig) -> Self {
        let sim = SimRunner::new(&level, textures.skins.clone(), &cfg, SimRunner::rng_for(&cfg));
        audio.play_music("Menu", None);
        log::info!("level `{}` ready", level.name);
        Self {
            renderer,
            audio,
            level,
            textures,
            cfg,
            sim,
            menu: Menu::new(MenuKind::Main),
            state: GameState::Menu(MenuKind::Main),
            last_report: FrameReport::default(),
        }
    }

    #[inline]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[inline]
    pub fn sim(&self) -> &SimRunner {
        &self.sim
    }

    #[inline]
    pub fn sim_mut(&mut self) -> &mut SimRunner {
        &mut self.sim
    }

    #[inline]
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    #[inline]
    pub fn textures(&self) -> &WorldTextures {
        &self.textures
    }

    /// Report from the last drawn 3-D frame.
    #[inline]
    pub fn last_report(&self) -> FrameReport {
        self.last_report
    }

    pub fn is_running(&self) -> bool {
        self.state != GameState::Quit
    }

    /// Relative mouse look only makes sense while playing.
    pub fn wants_mouse(&self) -> bool {
        self.state == GameState::Gameplay
    }

    /// One loop iteration: dispatch on state, simulate, draw into the
    /// renderer. Call [`present`](Self::present) afterwards.
    pub fn frame(&mut self, input: &InputFrame, dt: f32, w: usize, h: usize) {
        self.renderer.begin_frame(w, h);
        match self.state {
            GameState::Gameplay => self.gameplay_frame(input, dt, w, h),
            GameState::Reset => {
                self.reset();
                self.draw_world(w, h);
            }
            GameState::Menu(_) => {
                if let Some(action) = self.menu.handle_events(input) {
                    self.apply(action);
                }
                match self.state {
                    GameState::Menu(_) => self.menu.render(&mut self.renderer, w, h),
                    _ => self.draw_world(w, h),
                }
            }
            GameState::Quit => {}
        }
    }

    /// Hand the finished frame to `submit`.
    pub fn present<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.renderer.end_frame(submit);
    }

    /*───────────────────────────── gameplay ─────────────────────────────*/

    fn gameplay_frame(&mut self, input: &InputFrame, dt: f32, w: usize, h: usize) {
        if input.pressed(Buttons::MENU) {
            self.open_menu(MenuKind::Pause);
            self.menu.render(&mut self.renderer, w, h);
            return;
        }

        self.sim.handle_input(input);
        self.sim.update(dt);

        self.draw_world(w, h);
        self.sim.resolve_shot(self.last_report.aim_target);
        self.play_events();

        if !self.sim.player().is_alive() {
            log::info!("player died");
            self.open_menu(MenuKind::GameLose);
        } else if self.sim.all_enemies_dead() {
            log::info!("level cleared");
            self.open_menu(MenuKind::GameWon);
        }
    }

    fn draw_world(&mut self, w: usize, h: usize) {
        let scene = Scene {
            camera: self.sim.camera(),
            map: self.sim.map(),
            textures: &self.textures,
            sprites: self.sim.sprites(),
            player_height: self.cfg.player_height,
            max_light_dist: self.cfg.max_light_dist,
            aim_range: self.sim.pending_shot_range(),
        };
        self.last_report = self.renderer.draw_scene(&scene);

        let (cx, cy) = (w as i32 / 2, h as i32 / 2);
        self.renderer.draw_line(cx - 4, cy, cx + 4, cy, CROSSHAIR);
        self.renderer.draw_line(cx, cy - 4, cx, cy + 4, CROSSHAIR);
    }

    fn play_events(&mut self) {
        for event in self.sim.drain_events() {
            match event {
                SimEvent::Fired { sound, .. } => self.audio.play_sfx(sound, 1.0),
                SimEvent::DoorOpened { .. } => self.audio.play_sfx("door_open", 1.0),
                SimEvent::PickedUp(_) => self.audio.play_sfx("pickup", PICKUP_VOLUME),
                other => log::trace!("{other:?}"),
            }
        }
    }

    /*────────────────────────────── states ──────────────────────────────*/

    fn open_menu(&mut self, kind: MenuKind) {
        log::info!("menu {kind:?}");
        self.menu.set(kind);
        self.state = GameState::Menu(kind);
        self.audio.play_music("Menu", None);
    }

    fn apply(&mut self, action: MenuAction) {
        log::info!("menu action {action:?}");
        self.state = match action {
            MenuAction::StartGame | MenuAction::Resume => GameState::Gameplay,
            MenuAction::Restart => GameState::Reset,
            MenuAction::Quit => GameState::Quit,
        };
    }

    /// Throw the live simulation away and rebuild it from the template.
    pub fn reset(&mut self) {
        self.sim = SimRunner::new(
            &self.level,
            self.textures.skins.clone(),
            &self.cfg,
            SimRunner::rng_for(&self.cfg),
        );
        self.last_report = FrameReport::default();
        self.state = GameState::Gameplay;
        log::info!("level `{}` reset", self.level.name);
    }
}
