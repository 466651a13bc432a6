pub mod app;
pub mod graphics;
pub mod pixels_renderer;
pub mod regression;
pub mod surface;

use std::time::Duration;

/// Converts irregular wall-clock deltas into a whole number of fixed-duration
/// ticks.
///
/// Game logic advances only in `step` increments, so an update is a plain
/// function of (state, tick) and can be driven from tests without touching
/// real time. Leftover time below one tick is carried into the next call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTimestep {
    step: Duration,
    accumulated: Duration,
    max_ticks_per_advance: u32,
}

impl FixedTimestep {
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            accumulated: Duration::ZERO,
            max_ticks_per_advance: 8,
        }
    }

    /// Caps how many ticks a single `advance` may return, so a long stall
    /// (window drag, debugger pause) does not produce a catch-up burst.
    pub fn with_max_ticks_per_advance(mut self, max: u32) -> Self {
        self.max_ticks_per_advance = max.max(1);
        self
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Folds `dt` into the accumulator and returns how many whole ticks are
    /// now due. Excess beyond the catch-up cap is dropped, not banked.
    pub fn advance(&mut self, dt: Duration) -> u32 {
        self.accumulated = self.accumulated.saturating_add(dt);

        let mut ticks = 0u32;
        while self.accumulated >= self.step {
            self.accumulated -= self.step;
            ticks += 1;
        }

        if ticks > self.max_ticks_per_advance {
            ticks = self.max_ticks_per_advance;
            self.accumulated = Duration::ZERO;
        }
        ticks
    }

    pub fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}
