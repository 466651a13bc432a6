use std::collections::HashSet;
use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::graphics::Renderer2d;
use crate::pixels_renderer::PixelsPresenter;
use crate::surface::SurfaceSize;

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub clamp_to_monitor: bool,
    pub vsync: Option<bool>,
    /// Redraw cadence; updates and renders are driven at this rate.
    pub frame_interval: Duration,
}

pub struct AppContext {
    pub window: Window,
    pub presenter: PixelsPresenter,
    pub surface_size: SurfaceSize,
}

/// Keyboard state staged between redraws.
///
/// `keys_pressed` / `keys_released` are edge sets for the current frame;
/// `keys_down` is level state. OS key auto-repeat is deduplicated: a key
/// already down does not re-enter `keys_pressed`.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<VirtualKeyCode>,
    pub keys_down: HashSet<VirtualKeyCode>,
    pub keys_released: HashSet<VirtualKeyCode>,
}

impl InputFrame {
    pub fn pressed(&self, key: VirtualKeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn down(&self, key: VirtualKeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn released(&self, key: VirtualKeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn on_key(&mut self, key: VirtualKeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_down.insert(key) {
                    self.keys_pressed.insert(key);
                }
            }
            ElementState::Released => {
                if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
        }
    }

    /// Clears the edge sets once a frame has consumed them.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }
}

pub trait GameApp {
    fn update(&mut self, input: &InputFrame, dt: Duration, ctx: &mut AppContext);
    fn render(&mut self, gfx: &mut dyn Renderer2d);

    fn wants_exit(&self) -> bool {
        false
    }
}

pub fn run_app<G: GameApp + 'static>(config: AppConfig, mut game: G) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = if let Some(monitor) = monitor_size {
        PhysicalSize::new(
            config.desired_size.width.min(monitor.width),
            config.desired_size.height.min(monitor.height),
        )
    } else {
        config.desired_size
    };
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size)
        .with_resizable(false)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width, window_size.height);

    let surface_texture = SurfaceTexture::new(surface_size.width, surface_size.height, &window);
    let mut builder = PixelsBuilder::new(surface_size.width, surface_size.height, surface_texture);
    if let Some(vsync) = config.vsync {
        builder = builder.enable_vsync(vsync);
    }
    let pixels: Pixels = builder.build()?;
    let presenter = PixelsPresenter::new(pixels, surface_size)?;

    let mut ctx = AppContext {
        window,
        presenter,
        surface_size,
    };

    let frame_interval = config.frame_interval.max(Duration::from_millis(1));
    let mut input = InputFrame::default();
    let mut last_frame = Instant::now();
    let mut next_redraw = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    ctx.surface_size = SurfaceSize::new(size.width, size.height);
                    if let Err(err) = ctx.presenter.resize(ctx.surface_size) {
                        eprintln!("resize failed: {err}");
                    }
                    ctx.window.request_redraw();
                }
                WindowEvent::KeyboardInput { input: key_event, .. } => {
                    if let Some(key) = key_event.virtual_keycode {
                        input.on_key(key, key_event.state);
                    }
                }
                WindowEvent::Focused(false) => {
                    // Key-up events are lost on focus loss; drop held state so
                    // nothing auto-repeats forever.
                    for key in input.keys_down.drain() {
                        input.keys_released.insert(key);
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                game.update(&input, dt, &mut ctx);
                input.end_frame();

                ctx.presenter.draw_frame(|gfx| game.render(gfx));
                if let Err(err) = ctx.presenter.present() {
                    eprintln!("present failed: {err}");
                }

                if game.wants_exit() {
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::MainEventsCleared => {
                let now = Instant::now();
                if now >= next_redraw {
                    // Re-anchor rather than banking missed frames after a stall.
                    next_redraw = (next_redraw + frame_interval).max(now);
                    ctx.window.request_redraw();
                } else {
                    *control_flow = ControlFlow::WaitUntil(next_redraw);
                }
            }
            _ => {}
        }
    });

    #[allow(unreachable_code)]
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_key_repeat_does_not_duplicate_pressed_edges() {
        let mut input = InputFrame::default();
        input.on_key(VirtualKeyCode::Left, ElementState::Pressed);
        input.end_frame();
        input.on_key(VirtualKeyCode::Left, ElementState::Pressed);

        assert!(input.down(VirtualKeyCode::Left));
        assert!(!input.pressed(VirtualKeyCode::Left));
    }

    #[test]
    fn release_produces_a_single_released_edge() {
        let mut input = InputFrame::default();
        input.on_key(VirtualKeyCode::Space, ElementState::Pressed);
        input.on_key(VirtualKeyCode::Space, ElementState::Released);
        input.on_key(VirtualKeyCode::Space, ElementState::Released);

        assert!(!input.down(VirtualKeyCode::Space));
        assert!(input.released(VirtualKeyCode::Space));
        assert!(input.pressed(VirtualKeyCode::Space));
    }

    #[test]
    fn end_frame_clears_edges_but_keeps_level_state() {
        let mut input = InputFrame::default();
        input.on_key(VirtualKeyCode::Down, ElementState::Pressed);
        input.end_frame();

        assert!(input.down(VirtualKeyCode::Down));
        assert!(!input.pressed(VirtualKeyCode::Down));
        assert!(!input.released(VirtualKeyCode::Down));
    }
}
