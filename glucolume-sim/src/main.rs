//! Glucolume host simulator
//!
//! Runs the device scheduler on the embassy std executor: readings come
//! from an in-process Share service, buttons follow the script in
//! `device.toml` and the panel is drawn in the terminal.
//!
//! ```text
//! glucolume-sim [config.toml] 2>sim.log
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use embassy_executor::Spawner;
use embassy_time::{Delay, Instant};
use glucolume_core::scheduler::Scheduler;
use glucolume_core::session::SessionClient;
use glucolume_core::traits::Clock;
use glucolume_display::selftest::SWEEP_DURATION_MS;
use glucolume_display::{run_self_test, FrameDisplay, Renderer};
use log::{error, info};

mod buttons;
mod config;
mod share;
mod terminal;

use buttons::ScriptedButtons;
use share::LocalShare;
use terminal::TerminalSurface;

const DEFAULT_CONFIG: &str = "device.toml";

/// Round-trip time of the local Share service
const SHARE_LATENCY_MS: u64 = 120;

#[derive(Clone, Copy)]
struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let file = config::load(&path)?;
    let device = file.device();
    device
        .validate()
        .map_err(|e| anyhow!("invalid configuration: {:?}", e))?;
    let brightness = device
        .display
        .initial_brightness()
        .map_err(|e| anyhow!("invalid configuration: {:?}", e))?;

    let mut display = FrameDisplay::new(
        TerminalSurface::stdout(),
        Renderer::new(device.display.digit_spacing),
    );
    let mut delay = Delay;

    if device.display.self_test {
        info!("Running display self-test");
        run_self_test(&mut display, &mut delay, brightness, SWEEP_DURATION_MS)
            .await
            .map_err(|e| anyhow!("self-test failed: {:?}", e))?;
    }

    let client = SessionClient::new(
        LocalShare::new(file.sim.clone(), SHARE_LATENCY_MS),
        EmbassyClock,
        device.share.clone(),
    );
    let buttons = ScriptedButtons::new(EmbassyClock, file.sim.presses.clone());
    let mut scheduler = Scheduler::new(
        client,
        EmbassyClock,
        buttons,
        display,
        &device.schedule,
        brightness,
    );
    scheduler.run(delay).await
}
