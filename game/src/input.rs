use std::mem;
use std::time::Duration;

use engine::app::InputFrame;
use winit::event::VirtualKeyCode;

use crate::game_core::{HorizontalDir, TickInput};

/// Delay before a held direction starts auto-repeating.
pub const MOVE_DELAY_FIRST: Duration = Duration::from_millis(250);
/// Interval between auto-repeats once the first delay has elapsed.
pub const MOVE_DELAY_SUBSEQUENT: Duration = Duration::from_millis(25);

/// Two-phase horizontal auto-repeat.
///
/// Repeat timing is explicit per-direction state advanced by tick deltas, not
/// registered one-shot timers, so it is deterministic and testable without
/// wall-clock waits. Only one direction is ever active; pressing the opposite
/// direction takes over, and releasing the active key while the other is
/// still held falls back to it with a fresh initial delay.
#[derive(Debug, Default)]
pub struct HorizontalRepeat {
    left_down: bool,
    right_down: bool,
    active: Option<HorizontalDir>,
    until_repeat: Duration,
}

impl HorizontalRepeat {
    /// Records a key press. Returns true when the press should move the piece
    /// immediately (it always does for a fresh press; OS auto-repeat of an
    /// already-held key is ignored).
    pub fn on_press(&mut self, dir: HorizontalDir) -> bool {
        let was_down = match dir {
            HorizontalDir::Left => mem::replace(&mut self.left_down, true),
            HorizontalDir::Right => mem::replace(&mut self.right_down, true),
        };
        if was_down {
            return false;
        }

        self.active = Some(dir);
        self.until_repeat = MOVE_DELAY_FIRST;
        true
    }

    pub fn on_release(&mut self, dir: HorizontalDir) {
        match dir {
            HorizontalDir::Left => self.left_down = false,
            HorizontalDir::Right => self.right_down = false,
        }

        if self.active != Some(dir) {
            return;
        }

        self.active = match dir {
            HorizontalDir::Left if self.right_down => Some(HorizontalDir::Right),
            HorizontalDir::Right if self.left_down => Some(HorizontalDir::Left),
            _ => None,
        };
        self.until_repeat = MOVE_DELAY_FIRST;
    }

    /// Advances the repeat timer by one tick and returns the move it emits,
    /// if its cooldown just expired.
    pub fn tick(&mut self, dt: Duration) -> Option<HorizontalDir> {
        let dir = self.active?;
        self.until_repeat = self.until_repeat.saturating_sub(dt);
        if !self.until_repeat.is_zero() {
            return None;
        }
        self.until_repeat = MOVE_DELAY_SUBSEQUENT;
        Some(dir)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Staged intents between the app's input frames and the core's fixed ticks.
///
/// Edge intents (rotate, hard drop) queue at most one occurrence and are
/// consumed by the next tick; horizontal movement flows through
/// [`HorizontalRepeat`].
#[derive(Debug, Default)]
pub struct InputState {
    repeat: HorizontalRepeat,
    pending_horizontal: Option<HorizontalDir>,
    rotate_queued: bool,
    hard_drop_queued: bool,
}

impl InputState {
    /// Folds one frame's key edges into the staged state. While paused only
    /// releases are honored, so nothing queues up behind the pause.
    pub fn stage_frame(&mut self, frame: &InputFrame, paused: bool) {
        let left_now = frame.down(VirtualKeyCode::Left) || frame.down(VirtualKeyCode::A);
        let right_now = frame.down(VirtualKeyCode::Right) || frame.down(VirtualKeyCode::D);

        if !left_now {
            self.repeat.on_release(HorizontalDir::Left);
        }
        if !right_now {
            self.repeat.on_release(HorizontalDir::Right);
        }

        if !paused {
            if left_now && self.repeat.on_press(HorizontalDir::Left) {
                self.pending_horizontal = Some(HorizontalDir::Left);
            }
            if right_now && self.repeat.on_press(HorizontalDir::Right) {
                self.pending_horizontal = Some(HorizontalDir::Right);
            }

            self.rotate_queued |=
                frame.pressed(VirtualKeyCode::Up) || frame.pressed(VirtualKeyCode::W);
            self.hard_drop_queued |= frame.pressed(VirtualKeyCode::Space);
        }
    }

    /// Drains the intents for one fixed tick.
    pub fn tick_input(&mut self, dt: Duration, boost: bool) -> TickInput {
        let horizontal = self
            .pending_horizontal
            .take()
            .or_else(|| self.repeat.tick(dt));
        TickInput {
            horizontal,
            rotate: mem::take(&mut self.rotate_queued),
            hard_drop: mem::take(&mut self.hard_drop_queued),
            boost,
        }
    }

    pub fn clear(&mut self) {
        self.repeat.clear();
        self.pending_horizontal = None;
        self.rotate_queued = false;
        self.hard_drop_queued = false;
    }
}

/// Soft-drop boost is level state: held, not pressed.
pub fn boost_held(frame: &InputFrame) -> bool {
    frame.down(VirtualKeyCode::Down) || frame.down(VirtualKeyCode::S)
}
