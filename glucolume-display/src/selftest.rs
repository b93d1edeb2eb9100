//! Start-up digit sweep
//!
//! Steps through 50..=400 mg/dL, switching the arrow every 50 values from
//! double-down to double-up, so every digit and arrow glyph is shown once.

use embedded_hal_async::delay::DelayNs;
use glucolume_core::traits::{DisplayError, DisplayView, ReadingDisplay};
use glucolume_core::{Brightness, Trend};

pub const SWEEP_START: u16 = 50;
pub const SWEEP_END: u16 = 400;

/// Values per arrow
pub const SWEEP_TREND_SPAN: u16 = 50;

/// Total sweep time
pub const SWEEP_DURATION_MS: u32 = 10_000;

const SWEEP_TRENDS: [Trend; 7] = [
    Trend::DoubleDown,
    Trend::SingleDown,
    Trend::FortyFiveDown,
    Trend::Flat,
    Trend::FortyFiveUp,
    Trend::SingleUp,
    Trend::DoubleUp,
];

/// Sweep values with their arrows
#[derive(Debug, Clone)]
pub struct DigitSweep {
    next: u16,
}

impl Default for DigitSweep {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitSweep {
    pub const fn new() -> Self {
        Self { next: SWEEP_START }
    }

    /// Number of steps in a full sweep
    pub const fn len() -> usize {
        (SWEEP_END - SWEEP_START + 1) as usize
    }

    /// Arrow shown for a sweep value
    pub fn trend_for(value: u16) -> Trend {
        let index = (value.saturating_sub(SWEEP_START) / SWEEP_TREND_SPAN) as usize;
        SWEEP_TRENDS[index.min(SWEEP_TRENDS.len() - 1)]
    }
}

impl Iterator for DigitSweep {
    type Item = (u16, Trend);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > SWEEP_END {
            return None;
        }
        let value = self.next;
        self.next += 1;
        Some((value, Self::trend_for(value)))
    }
}

/// Run the sweep over `duration_ms`
pub async fn run_self_test<D, T>(
    display: &mut D,
    delay: &mut T,
    brightness: Brightness,
    duration_ms: u32,
) -> Result<(), DisplayError>
where
    D: ReadingDisplay,
    T: DelayNs,
{
    let step_ms = duration_ms / DigitSweep::len() as u32;
    for (value, trend) in DigitSweep::new() {
        display.show(&DisplayView {
            value: Some(value),
            trend: Some(trend),
            seconds_since_update: 0,
            brightness,
        })?;
        delay.delay_ms(step_ms).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    #[test]
    fn test_sweep_range() {
        let steps: Vec<_> = DigitSweep::new().collect();
        assert_eq!(steps.len(), 351);
        assert_eq!(steps.len(), DigitSweep::len());
        assert_eq!(steps[0], (50, Trend::DoubleDown));
        assert_eq!(steps[350], (400, Trend::DoubleUp));
    }

    #[test]
    fn test_trend_changes_every_fifty() {
        assert_eq!(DigitSweep::trend_for(99), Trend::DoubleDown);
        assert_eq!(DigitSweep::trend_for(100), Trend::SingleDown);
        assert_eq!(DigitSweep::trend_for(200), Trend::Flat);
        assert_eq!(DigitSweep::trend_for(349), Trend::SingleUp);
        assert_eq!(DigitSweep::trend_for(350), Trend::DoubleUp);
        assert_eq!(DigitSweep::trend_for(400), Trend::DoubleUp);
    }

    #[derive(Default)]
    struct Log(Vec<DisplayView>);

    impl ReadingDisplay for Log {
        fn show(&mut self, view: &DisplayView) -> Result<(), DisplayError> {
            self.0.push(*view);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        total_ns: u64,
    }

    impl DelayNs for CountingDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.total_ns += ns as u64;
        }
    }

    #[test]
    fn test_run_self_test_shows_every_step() {
        let mut log = Log::default();
        let mut delay = CountingDelay::default();
        block_on(run_self_test(
            &mut log,
            &mut delay,
            Brightness::MAX,
            SWEEP_DURATION_MS,
        ))
        .unwrap();

        assert_eq!(log.0.len(), 351);
        assert_eq!(log.0[175].value, Some(225));
        assert_eq!(log.0[175].trend, Some(Trend::Flat));
        // 28 ms per step
        assert_eq!(delay.total_ns, 351 * 28 * 1_000_000);
    }
}
