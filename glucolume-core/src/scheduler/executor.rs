//! Scheduler driver
//!
//! Runs due tasks in a fixed round-robin order (button, fetch, display)
//! and sleeps until the earliest next deadline. The fetch call is the only
//! place the loop waits on the network; it always runs to completion or
//! transport timeout before the display task gets its turn.

use embedded_hal_async::delay::DelayNs;

use super::periodic::Periodic;
use super::shared::SharedState;
use super::tasks::{ButtonTask, DisplayOutcome, DisplayTask, FetchOutcome, FetchTask};
use crate::config::ScheduleConfig;
use crate::reading::{Brightness, Reading};
use crate::session::ReadingSource;
use crate::traits::{ButtonInput, Clock, ReadingDisplay};

/// What ran during one [`Scheduler::run_due`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RunReport {
    /// Button task ran
    pub buttons_polled: bool,
    /// Brightness after a button edge changed it
    pub brightness: Option<Brightness>,
    pub fetch: Option<FetchOutcome>,
    pub display: Option<DisplayOutcome>,
}

impl RunReport {
    /// True when a frame was presented
    pub fn redrawn(&self) -> bool {
        self.display == Some(DisplayOutcome::Drawn)
    }
}

/// Cooperative scheduler
///
/// Owns the reading source, the button lines, the display and the shared
/// state. Each resource is touched by exactly one task.
pub struct Scheduler<S, C, B, D> {
    source: S,
    clock: C,
    buttons: B,
    display: D,
    state: SharedState,
    button_timer: Periodic,
    fetch_timer: Periodic,
    display_timer: Periodic,
    button_task: ButtonTask,
    fetch_task: FetchTask,
    display_task: DisplayTask,
}

impl<S, C, B, D> Scheduler<S, C, B, D>
where
    S: ReadingSource,
    C: Clock,
    B: ButtonInput,
    D: ReadingDisplay,
{
    /// Create a scheduler; every task is due immediately
    pub fn new(
        source: S,
        clock: C,
        buttons: B,
        display: D,
        schedule: &ScheduleConfig,
        brightness: Brightness,
    ) -> Self {
        let now = clock.now_ms();
        Self {
            source,
            clock,
            buttons,
            display,
            state: SharedState::new(Reading::empty(now), brightness),
            button_timer: Periodic::new(schedule.button_poll_ms as u64, now),
            fetch_timer: Periodic::new(schedule.fetch_interval_ms(), now),
            display_timer: Periodic::new(schedule.display_refresh_ms as u64, now),
            button_task: ButtonTask::new(),
            fetch_task: FetchTask::new(),
            display_task: DisplayTask::new(schedule.animation_tick_ms as u64),
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn buttons_mut(&mut self) -> &mut B {
        &mut self.buttons
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn fetch_failures(&self) -> u32 {
        self.fetch_task.consecutive_failures()
    }

    /// Earliest time any task is due
    pub fn next_deadline(&self) -> u64 {
        self.button_timer
            .next_due_ms()
            .min(self.fetch_timer.next_due_ms())
            .min(self.display_timer.next_due_ms())
    }

    /// Run every due task once
    pub async fn run_due(&mut self) -> RunReport {
        let mut report = RunReport::default();

        if self.button_timer.poll(self.clock.now_ms()) {
            report.buttons_polled = true;
            report.brightness = self.button_task.run(&mut self.buttons, &mut self.state);
        }

        if self.fetch_timer.poll(self.clock.now_ms()) {
            report.fetch = Some(self.fetch_task.run(&mut self.source, &mut self.state).await);
        }

        // Sample after the fetch so the staleness bar is current
        let now = self.clock.now_ms();
        if self.display_timer.poll(now) {
            report.display = Some(self.display_task.run(&mut self.display, &mut self.state, now));
        }

        report
    }

    /// Driver loop: run due tasks, then sleep until the next deadline
    pub async fn run<T: DelayNs>(&mut self, mut delay: T) -> ! {
        info!(
            "Scheduler started (buttons {} ms, fetch {} ms, display {} ms)",
            self.button_timer.period_ms(),
            self.fetch_timer.period_ms(),
            self.display_timer.period_ms()
        );

        loop {
            self.run_due().await;

            let wait = self.next_deadline().saturating_sub(self.clock.now_ms());
            if wait > 0 {
                delay.delay_ms(u32::try_from(wait).unwrap_or(u32::MAX)).await;
            }
        }
    }
}
