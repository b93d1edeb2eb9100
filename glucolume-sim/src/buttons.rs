//! Scripted brightness buttons

use glucolume_core::traits::{ButtonInput, ButtonLine, Clock};

use crate::config::Press;

/// Replays a press script against a clock
pub struct ScriptedButtons<C> {
    clock: C,
    start_ms: u64,
    presses: Vec<Press>,
}

impl<C: Clock> ScriptedButtons<C> {
    /// Press times count from now
    pub fn new(clock: C, presses: Vec<Press>) -> Self {
        let start_ms = clock.now_ms();
        Self {
            clock,
            start_ms,
            presses,
        }
    }
}

impl<C: Clock> ButtonInput for ScriptedButtons<C> {
    fn is_pressed(&mut self, line: ButtonLine) -> bool {
        let t = self.clock.now_ms().saturating_sub(self.start_ms);
        self.presses.iter().any(|p| {
            ButtonLine::from(p.line) == line && t >= p.at_ms && t < p.at_ms + p.hold_ms
        })
    }
}
