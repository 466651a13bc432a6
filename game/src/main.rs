use std::error::Error;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use engine::FixedTimestep;
use engine::app::{AppConfig, AppContext, GameApp, InputFrame, run_app};
use engine::graphics::Renderer2d;
use winit::dpi::PhysicalSize;
use winit::event::VirtualKeyCode;

use game::game_core::{GameCore, TICK};
use game::input::{InputState, boost_held};
use game::render::draw_game;
use game::settings::{GameSettings, SettingsStore};

const WINDOW_WIDTH: u32 = 360;
const WINDOW_HEIGHT: u32 = 720;

struct GridfallApp {
    core: GameCore,
    input: InputState,
    timestep: FixedTimestep,
    settings: GameSettings,
    store: SettingsStore,
}

impl GridfallApp {
    fn new(core: GameCore, settings: GameSettings, store: SettingsStore) -> Self {
        Self {
            core,
            input: InputState::default(),
            timestep: FixedTimestep::new(TICK),
            settings,
            store,
        }
    }

    fn toggle_grid(&mut self) {
        self.settings.show_grid = !self.settings.show_grid;
        if let Err(err) = self.store.save(&self.settings) {
            eprintln!("warning: failed to save settings: {err}");
        }
    }
}

impl GameApp for GridfallApp {
    fn update(&mut self, frame: &InputFrame, dt: Duration, _ctx: &mut AppContext) {
        if frame.pressed(VirtualKeyCode::P) {
            self.core.toggle_pause();
        }
        if frame.pressed(VirtualKeyCode::G) {
            self.toggle_grid();
        }

        self.input.stage_frame(frame, self.core.is_paused());
        let boost = boost_held(frame);

        let ticks = self.timestep.advance(dt);
        for _ in 0..ticks {
            self.core.tick(self.input.tick_input(self.timestep.step(), boost));
        }
    }

    fn render(&mut self, gfx: &mut dyn Renderer2d) {
        draw_game(gfx, &self.core, self.settings.show_grid);
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

fn main() -> Result<(), Box<dyn Error>> {
    let store = SettingsStore::from_env();
    let settings = store.load();

    let mut core = GameCore::new(clock_seed());
    core.start();

    let config = AppConfig {
        title: "Gridfall".to_string(),
        desired_size: PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT),
        clamp_to_monitor: true,
        vsync: Some(settings.vsync),
        frame_interval: TICK,
    };

    run_app(config, GridfallApp::new(core, settings, store))
}
