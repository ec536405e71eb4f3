//! Presence Monitor - Demo Entry Point
//!
//! Runs the monitor against a playing `ManualSource` and a scripted
//! detector backend. Settings are read from the file named by
//! `PRESENCE_CONFIG` (optional) and `PRESENCE__*` environment variables,
//! with monitor keys under `MONITOR` and simulation keys under `SIMULATION`
//! (e.g. `PRESENCE__MONITOR__PAUSE_TIMEOUT_MS=5000`).

use monitor::{
    init_logging, load_settings, ManualSource, MonitorConfig, PresenceMonitor, SimulatedBackend,
    SimulationConfig, Status,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoSettings {
    monitor: MonitorConfig,
    simulation: SimulationConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::var_os("PRESENCE_CONFIG").map(PathBuf::from);
    let settings: DemoSettings = load_settings(path.as_deref())?;
    settings.monitor.validate()?;
    init_logging(settings.monitor.level()?);

    info!("=== Presence Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let run_for = Duration::from_millis(settings.simulation.run_for_ms);
    let source = ManualSource::playing(640, 480);
    let backend = SimulatedBackend::new(settings.simulation);

    let monitor = PresenceMonitor::new(settings.monitor, source, backend, |status: Status| {
        match status.notice() {
            Some(notice) => warn!("Status {}: {}", status, notice),
            None => info!("Status {}: subject back in view", status),
        }
    })?;

    monitor.start()?;
    let mut updates = monitor.subscribe();

    let finished = tokio::time::timeout(run_for, async {
        while updates.changed().await.is_ok() {
            if updates.borrow().is_terminal() {
                break;
            }
        }
    })
    .await;

    if finished.is_err() {
        info!("Run time elapsed, stopping");
    }
    monitor.stop();
    info!("Final status: {}", monitor.status());

    Ok(())
}
