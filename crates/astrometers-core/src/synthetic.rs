//! Deterministic mean-motion ephemeris.
//!
//! Longitudes are modeled as a mean daily motion plus one bounded sinusoidal
//! perturbation per body, which is enough to give the fleet realistic speed
//! variation (including retrograde intervals for the slow bodies) without
//! any external ephemeris dependency. Used by the calibration fleet, the
//! scenario fixtures and the benchmarks; not intended for astronomical
//! accuracy.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::f64::consts::TAU;

use crate::chart::NatalChart;
use crate::ephemeris::EphemerisSource;
use crate::error::AstroError;
use crate::types::{AspectKind, Body, TransitAspect};

/// Mean motion model for one body: longitude at epoch, mean rate in
/// degrees/day, and a single perturbation term (amplitude in degrees,
/// period in days).
struct MotionModel {
    epoch_longitude: f64,
    rate: f64,
    wobble_amplitude: f64,
    wobble_period: f64,
}

/// Indexed by `Body::ALL`. Rates are rough geocentric means; the node
/// regresses.
const MODELS: [MotionModel; Body::COUNT] = [
    // Sun
    MotionModel { epoch_longitude: 280.46, rate: 0.9856, wobble_amplitude: 1.9, wobble_period: 365.25 },
    // Moon
    MotionModel { epoch_longitude: 218.32, rate: 13.1764, wobble_amplitude: 6.29, wobble_period: 27.55 },
    // Mercury
    MotionModel { epoch_longitude: 252.25, rate: 0.9856, wobble_amplitude: 22.0, wobble_period: 115.88 },
    // Venus
    MotionModel { epoch_longitude: 181.98, rate: 0.9856, wobble_amplitude: 46.0, wobble_period: 583.92 },
    // Mars
    MotionModel { epoch_longitude: 355.43, rate: 0.5240, wobble_amplitude: 18.0, wobble_period: 779.94 },
    // Jupiter
    MotionModel { epoch_longitude: 34.35, rate: 0.0831, wobble_amplitude: 11.0, wobble_period: 398.88 },
    // Saturn
    MotionModel { epoch_longitude: 50.08, rate: 0.0334, wobble_amplitude: 6.5, wobble_period: 378.09 },
    // Uranus
    MotionModel { epoch_longitude: 314.05, rate: 0.0117, wobble_amplitude: 4.0, wobble_period: 369.66 },
    // Neptune
    MotionModel { epoch_longitude: 304.35, rate: 0.0060, wobble_amplitude: 2.5, wobble_period: 367.49 },
    // Pluto
    MotionModel { epoch_longitude: 238.93, rate: 0.0040, wobble_amplitude: 3.5, wobble_period: 366.73 },
    // North Node
    MotionModel { epoch_longitude: 125.04, rate: -0.0529, wobble_amplitude: 1.5, wobble_period: 173.31 },
];

/// Days elapsed since the J2000.0 epoch (2000-01-01 12:00 UTC).
fn days_since_j2000(instant: DateTime<Utc>) -> f64 {
    let epoch = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
    (instant - epoch).num_seconds() as f64 / 86_400.0
}

/// Geocentric ecliptic longitude of a body, degrees in [0, 360).
pub fn longitude_at(body: Body, instant: DateTime<Utc>) -> f64 {
    let t = days_since_j2000(instant);
    let m = &MODELS[body.index()];
    let phase = TAU * t / m.wobble_period;
    (m.epoch_longitude + m.rate * t + m.wobble_amplitude * phase.sin()).rem_euclid(360.0)
}

/// Signed angular speed in degrees/day; negative while retrograde.
pub fn speed_at(body: Body, instant: DateTime<Utc>) -> f64 {
    let t = days_since_j2000(instant);
    let m = &MODELS[body.index()];
    let phase = TAU * t / m.wobble_period;
    m.rate + m.wobble_amplitude * (TAU / m.wobble_period) * phase.cos()
}

/// Shortest angular separation between two longitudes, degrees in [0, 180].
fn separation(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(360.0);
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

/// Pure-math [`EphemerisSource`] over the mean-motion model.
pub struct SyntheticEphemeris;

impl SyntheticEphemeris {
    pub fn new() -> Self {
        SyntheticEphemeris
    }
}

impl Default for SyntheticEphemeris {
    fn default() -> Self {
        SyntheticEphemeris::new()
    }
}

#[async_trait]
impl EphemerisSource for SyntheticEphemeris {
    async fn aspects_for(
        &self,
        chart: &NatalChart,
        instant: DateTime<Utc>,
    ) -> Result<Vec<TransitAspect>, AstroError> {
        let mut aspects = Vec::new();
        for transit in Body::ALL {
            let t_lon = longitude_at(transit, instant);
            let raw_speed = speed_at(transit, instant);
            for placement in chart.placements() {
                let sep = separation(t_lon, placement.longitude);
                for kind in AspectKind::ALL {
                    let deviation = (sep - kind.angle()).abs();
                    if deviation <= kind.orb_tolerance() {
                        aspects.push(TransitAspect {
                            transit,
                            natal: placement.point,
                            kind,
                            orb: deviation,
                            speed: raw_speed.abs(),
                            retrograde: raw_speed < 0.0,
                        });
                    }
                }
            }
        }
        Ok(aspects)
    }
}
