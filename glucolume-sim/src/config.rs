//! Simulator configuration
//!
//! `device.toml` carries the device tree plus a `[sim]` table driving the
//! local Share service and the button script.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use glucolume_core::config::{DeviceConfig, DisplayConfig, ScheduleConfig, ShareConfig};
use glucolume_core::traits::ButtonLine;
use log::{info, warn};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimFile {
    #[serde(default = "demo_share")]
    pub share: ShareConfig,
    pub schedule: ScheduleConfig,
    pub display: DisplayConfig,
    pub sim: SimSettings,
}

impl Default for SimFile {
    fn default() -> Self {
        Self {
            share: demo_share(),
            schedule: ScheduleConfig::default(),
            display: DisplayConfig::default(),
            sim: SimSettings::default(),
        }
    }
}

impl SimFile {
    pub fn device(&self) -> DeviceConfig {
        DeviceConfig {
            share: self.share.clone(),
            schedule: self.schedule,
            display: self.display,
        }
    }
}

/// Local Share service behaviour
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// First reported value, mg/dL
    pub start_value: u16,
    /// Largest change between readings
    pub step: u16,
    /// Every Nth glucose query answers 401; 0 never expires
    pub expire_every: u32,
    /// Random walk seed
    pub seed: u64,
    pub presses: Vec<Press>,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            start_value: 120,
            step: 7,
            expire_every: 5,
            seed: 0x5eed,
            presses: Vec::new(),
        }
    }
}

/// One scripted button press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Press {
    pub line: Line,
    pub at_ms: u64,
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Line {
    Up,
    Down,
}

impl From<Line> for ButtonLine {
    fn from(line: Line) -> Self {
        match line {
            Line::Up => ButtonLine::BrightnessUp,
            Line::Down => ButtonLine::BrightnessDown,
        }
    }
}

fn default_hold_ms() -> u64 {
    200
}

fn demo_share() -> ShareConfig {
    let mut share = ShareConfig::default();
    fill_demo_credentials(&mut share);
    share
}

/// The local service accepts any login; blank credentials become `demo`
fn fill_demo_credentials(share: &mut ShareConfig) {
    if share.username.is_empty() {
        let _ = share.username.push_str("demo");
    }
    if share.password.is_empty() {
        let _ = share.password.push_str("demo");
    }
}

/// Parse and validate a configuration file body
pub fn parse(source: &str) -> Result<SimFile> {
    let mut file: SimFile = toml::from_str(source).context("parsing TOML")?;
    fill_demo_credentials(&mut file.share);
    file.device()
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {:?}", e))?;
    Ok(file)
}

/// Load `path`, falling back to the compiled-in defaults when it is absent
pub fn load(path: &Path) -> Result<SimFile> {
    if !path.exists() {
        warn!("{} not found, using defaults", path.display());
        return Ok(SimFile::default());
    }
    let source =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file = parse(&source).with_context(|| format!("loading {}", path.display()))?;
    info!("Loaded {}", path.display());
    Ok(file)
}
