//! Task bodies
//!
//! Each body performs one tick of work and returns. Timing is handled by
//! the executor.

use super::shared::SharedState;
use crate::reading::Brightness;
use crate::session::{ReadingSource, SessionError};
use crate::traits::{ButtonInput, ButtonLine, DisplayError, ReadingDisplay};

/// Rising-edge brightness control
#[derive(Debug, Clone, Default)]
pub struct ButtonTask {
    /// Level seen on the previous tick, indexed like `ButtonLine::ALL`
    previous: [bool; 2],
}

impl ButtonTask {
    pub const fn new() -> Self {
        Self {
            previous: [false; 2],
        }
    }

    /// Sample both lines and apply any rising edges
    ///
    /// Returns the new brightness if it changed.
    pub fn run<B: ButtonInput>(
        &mut self,
        buttons: &mut B,
        state: &mut SharedState,
    ) -> Option<Brightness> {
        let mut brightness = state.brightness();

        for (index, line) in ButtonLine::ALL.into_iter().enumerate() {
            let pressed = buttons.is_pressed(line);
            let rising = pressed && !self.previous[index];
            self.previous[index] = pressed;

            if rising {
                brightness = match line {
                    ButtonLine::BrightnessUp => brightness.step_up(),
                    ButtonLine::BrightnessDown => brightness.step_down(),
                };
            }
        }

        if state.set_brightness(brightness) {
            info!("Brightness: {}/10", brightness.tenths());
            Some(brightness)
        } else {
            None
        }
    }
}

/// Result of one fetch tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FetchOutcome {
    /// Link down, no request made
    Skipped,
    /// New value or trend stored
    Updated,
    /// Same value and trend as before, state untouched
    Unchanged,
    /// Fetch failed, state untouched
    Failed(SessionError),
}

/// Periodic fetch
#[derive(Debug, Clone, Default)]
pub struct FetchTask {
    consecutive_failures: u32,
}

impl FetchTask {
    pub const fn new() -> Self {
        Self {
            consecutive_failures: 0,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Fetch once and store the reading if it changed
    ///
    /// Failures are logged and left for the next period.
    pub async fn run<S: ReadingSource>(
        &mut self,
        source: &mut S,
        state: &mut SharedState,
    ) -> FetchOutcome {
        if !source.is_link_up() {
            warn!("Network link down, skipping fetch");
            return FetchOutcome::Skipped;
        }

        match source.fetch_latest().await {
            Ok(reading) => {
                self.consecutive_failures = 0;
                if state.offer_reading(reading) {
                    FetchOutcome::Updated
                } else {
                    debug!("Reading unchanged");
                    FetchOutcome::Unchanged
                }
            }
            Err(e) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!(
                    "Fetch failed ({} in a row): {:?}, will retry next cycle",
                    self.consecutive_failures,
                    e
                );
                FetchOutcome::Failed(e)
            }
        }
    }
}

/// Result of one display tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayOutcome {
    /// Nothing changed and the animation tick has not elapsed
    Idle,
    Drawn,
    /// Backend failed; dirty is kept so the next tick retries
    Failed(DisplayError),
}

/// Display refresh with the dirty/animation gate
#[derive(Debug, Clone)]
pub struct DisplayTask {
    animation_tick_ms: u64,
    last_drawn_ms: Option<u64>,
}

impl DisplayTask {
    pub const fn new(animation_tick_ms: u64) -> Self {
        Self {
            animation_tick_ms,
            last_drawn_ms: None,
        }
    }

    /// Whether a redraw is needed at `now_ms`
    pub fn should_draw(&self, state: &SharedState, now_ms: u64) -> bool {
        match self.last_drawn_ms {
            None => true,
            Some(last) => {
                state.is_dirty() || now_ms.saturating_sub(last) >= self.animation_tick_ms
            }
        }
    }

    pub fn run<D: ReadingDisplay>(
        &mut self,
        display: &mut D,
        state: &mut SharedState,
        now_ms: u64,
    ) -> DisplayOutcome {
        if !self.should_draw(state, now_ms) {
            return DisplayOutcome::Idle;
        }

        match display.show(&state.view(now_ms)) {
            Ok(()) => {
                state.clear_dirty();
                self.last_drawn_ms = Some(now_ms);
                DisplayOutcome::Drawn
            }
            Err(e) => {
                error!("Display update failed: {:?}", e);
                DisplayOutcome::Failed(e)
            }
        }
    }
}
