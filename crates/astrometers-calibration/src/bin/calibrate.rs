//! Offline calibration runner.
//!
//! Sweeps the synthetic fleet over a historical span, derives the
//! per-meter percentile tables and ballast, and writes the calibrated
//! meter files. If the acceptance gate fails, nothing is emitted and the
//! failures are reported.
//!
//! Usage: calibrate [OUT_DIR] [DAYS] [FLEET_SIZE]

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;
use tracing_subscriber::EnvFilter;

use astrometers_calibration::{calibrate, synthetic_fleet, CalibrationSpec};
use astrometers_core::SyntheticEphemeris;
use engine_meters::{EngineConstants, MeterConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let out_dir: PathBuf = args
        .next()
        .unwrap_or_else(|| "calibration_out".into())
        .into();
    let days: u32 = args
        .next()
        .unwrap_or_else(|| "3650".into())
        .parse()
        .context("DAYS must be a positive integer")?;
    let fleet_size: usize = args
        .next()
        .unwrap_or_else(|| "24".into())
        .parse()
        .context("FLEET_SIZE must be a positive integer")?;

    let spec = CalibrationSpec {
        start: NaiveDate::from_ymd_opt(2015, 1, 1).expect("valid start date"),
        days,
        step_days: 1,
        charts: synthetic_fleet(fleet_size),
    };
    info!(days, fleet_size, out = %out_dir.display(), "starting calibration");

    let outcome = calibrate(
        &EngineConstants::default(),
        &MeterConfig::builtin(),
        &SyntheticEphemeris::new(),
        &spec,
    )
    .await
    .context("calibration sweep failed")?;

    println!(
        "{}",
        serde_json::to_string_pretty(&outcome.report).context("serialize report")?
    );

    outcome
        .write_to_dir(&out_dir)
        .context("emit calibrated meter files")?;
    info!(out = %out_dir.display(), "calibration complete");
    Ok(())
}
