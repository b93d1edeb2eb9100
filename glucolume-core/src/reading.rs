//! Glucose reading model

use crate::config::{BRIGHTNESS_DEFAULT_TENTHS, BRIGHTNESS_MAX_TENTHS, BRIGHTNESS_MIN_TENTHS};

/// Qualitative rate of change reported alongside a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trend {
    DoubleUp,
    SingleUp,
    FortyFiveUp,
    Flat,
    FortyFiveDown,
    SingleDown,
    DoubleDown,
    NotComputable,
    RateOutOfRange,
}

impl Trend {
    pub const ALL: [Trend; 9] = [
        Trend::DoubleUp,
        Trend::SingleUp,
        Trend::FortyFiveUp,
        Trend::Flat,
        Trend::FortyFiveDown,
        Trend::SingleDown,
        Trend::DoubleDown,
        Trend::NotComputable,
        Trend::RateOutOfRange,
    ];

    /// Service name of the trend
    pub const fn name(self) -> &'static str {
        match self {
            Trend::DoubleUp => "DoubleUp",
            Trend::SingleUp => "SingleUp",
            Trend::FortyFiveUp => "FortyFiveUp",
            Trend::Flat => "Flat",
            Trend::FortyFiveDown => "FortyFiveDown",
            Trend::SingleDown => "SingleDown",
            Trend::DoubleDown => "DoubleDown",
            Trend::NotComputable => "NotComputable",
            Trend::RateOutOfRange => "RateOutOfRange",
        }
    }

    /// Parse a service trend name
    ///
    /// `"None"` and unrecognised names map to no trend.
    pub fn from_name(name: &str) -> Option<Trend> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Parse the legacy numeric trend code (0 = none, 1..=9)
    pub const fn from_code(code: u64) -> Option<Trend> {
        match code {
            1 => Some(Trend::DoubleUp),
            2 => Some(Trend::SingleUp),
            3 => Some(Trend::FortyFiveUp),
            4 => Some(Trend::Flat),
            5 => Some(Trend::FortyFiveDown),
            6 => Some(Trend::SingleDown),
            7 => Some(Trend::DoubleDown),
            8 => Some(Trend::NotComputable),
            9 => Some(Trend::RateOutOfRange),
            _ => None,
        }
    }

    /// True for the seven arrow trends
    pub const fn is_directional(self) -> bool {
        !matches!(self, Trend::NotComputable | Trend::RateOutOfRange)
    }
}

/// One observation from the remote service
///
/// Replaced wholesale, never mutated field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Glucose in mg/dL, absent when the service had no data
    pub value: Option<u16>,
    pub trend: Option<Trend>,
    /// Monotonic time the reading was accepted (ms)
    pub observed_at_ms: u64,
}

impl Reading {
    pub const fn new(value: Option<u16>, trend: Option<Trend>, observed_at_ms: u64) -> Self {
        Self {
            value,
            trend,
            observed_at_ms,
        }
    }

    /// A "no data" reading
    pub const fn empty(observed_at_ms: u64) -> Self {
        Self::new(None, None, observed_at_ms)
    }

    /// Compare by value and trend, ignoring the timestamp
    pub fn same_as(&self, other: &Reading) -> bool {
        self.value == other.value && self.trend == other.trend
    }

    /// Milliseconds since the reading was observed
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.observed_at_ms)
    }
}

/// Panel brightness in tenths, clamped to `[0.2, 1.0]`
///
/// Stored as an integer so repeated steps never drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Brightness(u8);

impl Brightness {
    pub const MIN: Brightness = Brightness(BRIGHTNESS_MIN_TENTHS);
    pub const MAX: Brightness = Brightness(BRIGHTNESS_MAX_TENTHS);

    /// Create from tenths, `None` if outside the allowed range
    pub const fn from_tenths(tenths: u8) -> Option<Self> {
        if tenths >= BRIGHTNESS_MIN_TENTHS && tenths <= BRIGHTNESS_MAX_TENTHS {
            Some(Self(tenths))
        } else {
            None
        }
    }

    /// Create from tenths, clamping into range
    pub const fn clamped(tenths: u8) -> Self {
        if tenths < BRIGHTNESS_MIN_TENTHS {
            Self::MIN
        } else if tenths > BRIGHTNESS_MAX_TENTHS {
            Self::MAX
        } else {
            Self(tenths)
        }
    }

    pub const fn tenths(self) -> u8 {
        self.0
    }

    pub fn as_f32(self) -> f32 {
        self.0 as f32 / 10.0
    }

    /// One step brighter, saturating at the maximum
    pub const fn step_up(self) -> Self {
        Self::clamped(self.0 + 1)
    }

    /// One step dimmer, saturating at the minimum
    pub const fn step_down(self) -> Self {
        Self::clamped(self.0.saturating_sub(1))
    }

    /// Scale an 8-bit channel value
    pub const fn scale(self, channel: u8) -> u8 {
        ((channel as u16 * self.0 as u16) / 10) as u8
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::clamped(BRIGHTNESS_DEFAULT_TENTHS)
    }
}
