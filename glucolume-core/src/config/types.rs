//! Configuration type definitions

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::reading::Brightness;

/// Maximum username/password length
pub const MAX_CREDENTIAL_LEN: usize = 64;

/// Button poll period
pub const BUTTON_POLL_MS: u32 = 50;

/// Fetch period, also the lowest the service tolerates
pub const FETCH_INTERVAL_S: u32 = 30;
pub const MIN_FETCH_INTERVAL_S: u32 = 30;

/// Display refresh period
pub const DISPLAY_REFRESH_MS: u32 = 100;

/// Period of the time-since-update animation
pub const ANIMATION_TICK_MS: u32 = 1000;

/// Brightness bounds, in tenths
pub const BRIGHTNESS_MIN_TENTHS: u8 = 2;
pub const BRIGHTNESS_MAX_TENTHS: u8 = 10;
pub const BRIGHTNESS_DEFAULT_TENTHS: u8 = 5;

/// Pixel gap between digits
pub const DIGIT_SPACING: u8 = 1;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Share username is empty
    MissingUsername,
    /// Share password is empty
    MissingPassword,
    /// Fetch interval below the service minimum
    FetchIntervalTooShort,
    /// A task period is zero
    ZeroPeriod,
    /// Animation tick shorter than the display refresh period
    AnimationTooFast,
    /// Initial brightness outside `[0.2, 1.0]`
    BrightnessOutOfRange,
}

/// Share service region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum Region {
    #[default]
    Us,
    OutsideUs,
}

/// Share account settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareConfig {
    pub username: String<MAX_CREDENTIAL_LEN>,
    pub password: String<MAX_CREDENTIAL_LEN>,
    pub region: Region,
}

/// Task periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct ScheduleConfig {
    pub button_poll_ms: u32,
    pub fetch_interval_s: u32,
    pub display_refresh_ms: u32,
    pub animation_tick_ms: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            button_poll_ms: BUTTON_POLL_MS,
            fetch_interval_s: FETCH_INTERVAL_S,
            display_refresh_ms: DISPLAY_REFRESH_MS,
            animation_tick_ms: ANIMATION_TICK_MS,
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.button_poll_ms == 0 || self.display_refresh_ms == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        if self.fetch_interval_s < MIN_FETCH_INTERVAL_S {
            return Err(ConfigError::FetchIntervalTooShort);
        }
        if self.animation_tick_ms < self.display_refresh_ms {
            return Err(ConfigError::AnimationTooFast);
        }
        Ok(())
    }

    pub fn fetch_interval_ms(&self) -> u64 {
        self.fetch_interval_s as u64 * 1000
    }
}

/// Display settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct DisplayConfig {
    /// Brightness at boot, in tenths (2..=10)
    pub initial_brightness_tenths: u8,
    /// Run the digit sweep before the scheduler starts
    pub self_test: bool,
    pub digit_spacing: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            initial_brightness_tenths: BRIGHTNESS_DEFAULT_TENTHS,
            self_test: true,
            digit_spacing: DIGIT_SPACING,
        }
    }
}

impl DisplayConfig {
    pub fn initial_brightness(&self) -> Result<Brightness, ConfigError> {
        Brightness::from_tenths(self.initial_brightness_tenths)
            .ok_or(ConfigError::BrightnessOutOfRange)
    }
}

/// Complete device configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub share: ShareConfig,
    pub schedule: ScheduleConfig,
    pub display: DisplayConfig,
}

impl DeviceConfig {
    /// Check the whole tree
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.share.username.is_empty() {
            return Err(ConfigError::MissingUsername);
        }
        if self.share.password.is_empty() {
            return Err(ConfigError::MissingPassword);
        }
        self.schedule.validate()?;
        self.display.initial_brightness()?;
        Ok(())
    }
}
