//! Astrometers Calibration — the offline harness that turns a historical
//! span into per-meter percentile tables and ballast, gated by the
//! acceptance targets.
//!
//! Calibration runs whenever filter configuration or constants change:
//! the raw pipeline sweeps a span of daily samples across a fleet of natal
//! charts, the per-meter raw DTI/HQS distributions become the percentile
//! tables, ballast derives from the median raw DTI, and the calibrated
//! pipeline is then re-scored over the same span to verify the
//! distribution-shape targets. Tables that fail the gate are never
//! emitted. None of this runs at serving time.

pub mod stats;

use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use astrometers_core::{
    AstroError, EphemerisSource, GroupId, MeterId, NatalChart, PointPlacement, TransitAspect,
};
use engine_meters::{
    filtered_aggregate, Astrometers, EngineConstants, MeterConfig, MeterRegistry, PercentileTable,
    SplitMix64,
};

use stats::{lag1_autocorrelation, mean_abs_delta, pearson};

// Acceptance targets, checked over the calibration span.
pub const MAX_MEAN_ABS_CROSS_CORRELATION: f64 = 0.30;
pub const DAY_TO_DAY_CORRELATION_RANGE: (f64, f64) = (0.20, 0.85);
pub const DAILY_DELTA_RANGE: (f64, f64) = (5.0, 15.0);

// Ballast derives from the median raw DTI, clamped to this band.
pub const BALLAST_FLOOR: f64 = 2.0;
pub const BALLAST_CEILING: f64 = 20.0;

/// The historical span and chart fleet to calibrate over.
#[derive(Debug, Clone)]
pub struct CalibrationSpec {
    pub start: NaiveDate,
    /// Number of samples.
    pub days: u32,
    /// Stride between samples in days.
    pub step_days: u32,
    pub charts: Vec<NatalChart>,
}

impl CalibrationSpec {
    fn validate(&self) -> Result<(), AstroError> {
        if self.days < 2 {
            return Err(AstroError::ConfigError(
                "calibration span needs at least 2 samples".into(),
            ));
        }
        if self.step_days == 0 {
            return Err(AstroError::ConfigError("step_days must be positive".into()));
        }
        if self.charts.is_empty() {
            return Err(AstroError::ConfigError(
                "calibration fleet needs at least one chart".into(),
            ));
        }
        Ok(())
    }

    /// Sample instants: midday UTC, one per stride.
    pub fn instants(&self) -> Vec<DateTime<Utc>> {
        (0..self.days)
            .map(|i| {
                let date = self.start + chrono::Duration::days((i * self.step_days) as i64);
                Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0).expect("midday is valid"))
            })
            .collect()
    }
}

/// One per-meter statistic in the acceptance report.
#[derive(Debug, Clone, Serialize)]
pub struct MeterStat {
    pub meter: MeterId,
    pub value: f64,
}

/// Which labels a group actually reached over the span.
#[derive(Debug, Clone, Serialize)]
pub struct GroupLabelCoverage {
    pub group: GroupId,
    pub labels: Vec<String>,
}

/// Distribution-shape verification over the calibration span.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptanceReport {
    pub mean_abs_cross_correlation: f64,
    pub within_group_mean_abs_correlation: f64,
    pub between_group_mean_abs_correlation: f64,
    pub day_to_day_correlation: Vec<MeterStat>,
    pub mean_abs_daily_delta: Vec<MeterStat>,
    pub labels_reached: Vec<GroupLabelCoverage>,
    pub failures: Vec<String>,
    pub passed: bool,
}

/// Calibrated meter configs plus their acceptance report.
#[derive(Debug, Clone)]
pub struct CalibrationOutcome {
    pub configs: Vec<MeterConfig>,
    pub report: AcceptanceReport,
}

impl CalibrationOutcome {
    /// Write the seventeen calibrated meter files. Refuses when the
    /// acceptance gate failed: bad tables are never emitted.
    pub fn write_to_dir(&self, dir: &Path) -> Result<(), AstroError> {
        if !self.report.passed {
            return Err(AstroError::ConfigError(format!(
                "acceptance gate failed, refusing to emit tables: {}",
                self.report.failures.join("; ")
            )));
        }
        fs::create_dir_all(dir)
            .map_err(|e| AstroError::ConfigError(format!("output dir '{}': {}", dir.display(), e)))?;
        for config in &self.configs {
            let path = dir.join(format!("{}.json", config.id.id()));
            let json = serde_json::to_string_pretty(config)
                .map_err(|e| AstroError::ConfigError(format!("serialize meter: {}", e)))?;
            fs::write(&path, json).map_err(|e| {
                AstroError::ConfigError(format!("write '{}': {}", path.display(), e))
            })?;
        }
        Ok(())
    }
}

/// Run the full calibration procedure.
pub async fn calibrate(
    constants: &EngineConstants,
    configs: &[MeterConfig],
    source: &dyn EphemerisSource,
    spec: &CalibrationSpec,
) -> Result<CalibrationOutcome, AstroError> {
    spec.validate()?;
    for id in MeterId::ALL {
        let count = configs.iter().filter(|c| c.id == id).count();
        if count != 1 {
            return Err(AstroError::ConfigError(format!(
                "meter '{}' configured {} times, expected exactly 1",
                id.id(),
                count
            )));
        }
    }

    let instants = spec.instants();

    // Gather the aspect list of every (chart, day) sample. This is the
    // only suspension point; everything after is pure.
    let mut samples: Vec<Vec<Vec<TransitAspect>>> = Vec::with_capacity(spec.charts.len());
    for chart in &spec.charts {
        chart.validate()?;
        let mut per_day = Vec::with_capacity(instants.len());
        for &instant in &instants {
            let mut aspects = source.aspects_for(chart, instant).await?;
            aspects.sort_by_key(|a| a.sort_key());
            per_day.push(aspects);
        }
        samples.push(per_day);
    }
    info!(
        charts = spec.charts.len(),
        days = instants.len(),
        "collected calibration samples"
    );

    // Ordered configs so every downstream vector follows MeterId::ALL.
    let ordered: Vec<MeterConfig> = MeterId::ALL
        .iter()
        .map(|id| {
            configs
                .iter()
                .find(|c| c.id == *id)
                .expect("presence checked above")
                .clone()
        })
        .collect();

    // Raw DTI/HQS sweep, meters in parallel.
    let raw: Vec<(Vec<f64>, Vec<f64>)> = ordered
        .par_iter()
        .map(|config| {
            let mut dti = Vec::with_capacity(spec.charts.len() * instants.len());
            let mut hqs = Vec::with_capacity(dti.capacity());
            for (chart, per_day) in spec.charts.iter().zip(&samples) {
                for aspects in per_day {
                    let agg = filtered_aggregate(constants, &config.filter, chart, aspects);
                    dti.push(agg.dti);
                    hqs.push(agg.hqs);
                }
            }
            (dti, hqs)
        })
        .collect();

    let mut calibrated = Vec::with_capacity(ordered.len());
    for (config, (dti, hqs)) in ordered.into_iter().zip(raw) {
        let meter = config.id;
        let table_err = |e: AstroError| AstroError::CalibrationMissing {
            meter: meter.id().to_string(),
            reason: e.to_string(),
        };
        let dti_table = PercentileTable::from_unsorted(dti).map_err(table_err)?;
        let hqs_table = PercentileTable::from_unsorted(hqs).map_err(table_err)?;
        let ballast = (dti_table.median() / 2.0).clamp(BALLAST_FLOOR, BALLAST_CEILING);
        info!(meter = meter.id(), ballast, samples = dti_table.len(), "calibrated meter");

        calibrated.push(MeterConfig {
            ballast,
            dti_samples: dti_table.samples().to_vec(),
            hqs_samples: hqs_table.samples().to_vec(),
            ..config
        });
    }

    let report = acceptance_report(constants, &calibrated, &spec.charts, &samples, &instants)?;
    Ok(CalibrationOutcome {
        configs: calibrated,
        report,
    })
}

/// Score the span through the calibrated pipeline (dither off) and check
/// every target.
fn acceptance_report(
    constants: &EngineConstants,
    calibrated: &[MeterConfig],
    charts: &[NatalChart],
    samples: &[Vec<Vec<TransitAspect>>],
    instants: &[DateTime<Utc>],
) -> Result<AcceptanceReport, AstroError> {
    let registry = MeterRegistry::from_configs(calibrated.to_vec())?;
    let engine = Astrometers::new(constants.clone(), registry);
    let n_days = instants.len();

    // Fleet-mean unified score per (day, meter).
    let by_day: Vec<Vec<f64>> = (0..n_days)
        .into_par_iter()
        .map(|day| {
            let date = instants[day].date_naive();
            MeterId::ALL
                .iter()
                .map(|&id| {
                    let def = engine.registry().get(id);
                    let total: f64 = charts
                        .iter()
                        .zip(samples)
                        .map(|(chart, per_day)| {
                            engine
                                .score_meter(def, chart, &per_day[day], date, false)
                                .unified
                        })
                        .sum();
                    total / charts.len() as f64
                })
                .collect()
        })
        .collect();

    // Transpose to per-meter daily series.
    let meter_series: Vec<Vec<f64>> = (0..MeterId::COUNT)
        .map(|m| by_day.iter().map(|day| day[m]).collect())
        .collect();

    let group_of: Vec<GroupId> = calibrated.iter().map(|c| c.group).collect();
    let mut failures = Vec::new();

    // Cross-meter decorrelation.
    let mut all_pairs = Vec::new();
    let mut within = Vec::new();
    let mut between = Vec::new();
    for i in 0..MeterId::COUNT {
        for j in (i + 1)..MeterId::COUNT {
            let r = pearson(&meter_series[i], &meter_series[j]).abs();
            all_pairs.push(r);
            if group_of[i] == group_of[j] {
                within.push(r);
            } else {
                between.push(r);
            }
        }
    }
    let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len().max(1) as f64;
    let mean_abs_cross_correlation = mean(&all_pairs);
    let within_group_mean_abs_correlation = mean(&within);
    let between_group_mean_abs_correlation = mean(&between);

    if mean_abs_cross_correlation >= MAX_MEAN_ABS_CROSS_CORRELATION {
        failures.push(format!(
            "mean absolute cross-meter correlation {:.3} exceeds {:.2}",
            mean_abs_cross_correlation, MAX_MEAN_ABS_CROSS_CORRELATION
        ));
    }
    if within_group_mean_abs_correlation <= between_group_mean_abs_correlation {
        failures.push(format!(
            "within-group |r| {:.3} not above between-group |r| {:.3}",
            within_group_mean_abs_correlation, between_group_mean_abs_correlation
        ));
    }

    // Per-meter temporal shape.
    let mut day_to_day = Vec::with_capacity(MeterId::COUNT);
    let mut daily_delta = Vec::with_capacity(MeterId::COUNT);
    for (m, id) in MeterId::ALL.iter().enumerate() {
        let autocorr = lag1_autocorrelation(&meter_series[m]);
        if !(DAY_TO_DAY_CORRELATION_RANGE.0..=DAY_TO_DAY_CORRELATION_RANGE.1).contains(&autocorr) {
            failures.push(format!(
                "meter '{}' day-to-day correlation {:.3} outside [{}, {}]",
                id.id(),
                autocorr,
                DAY_TO_DAY_CORRELATION_RANGE.0,
                DAY_TO_DAY_CORRELATION_RANGE.1
            ));
        }
        day_to_day.push(MeterStat {
            meter: *id,
            value: autocorr,
        });

        let delta = mean_abs_delta(&meter_series[m]);
        if !(DAILY_DELTA_RANGE.0..=DAILY_DELTA_RANGE.1).contains(&delta) {
            failures.push(format!(
                "meter '{}' mean absolute daily delta {:.2} outside [{}, {}]",
                id.id(),
                delta,
                DAILY_DELTA_RANGE.0,
                DAILY_DELTA_RANGE.1
            ));
        }
        daily_delta.push(MeterStat {
            meter: *id,
            value: delta,
        });
    }

    // Label coverage: every group label must be reachable over the span.
    let labels_reached: Vec<GroupLabelCoverage> = GroupId::ALL
        .iter()
        .map(|&group| {
            let members: Vec<usize> = (0..MeterId::COUNT)
                .filter(|&m| group_of[m] == group)
                .collect();
            let mut labels: Vec<String> = Vec::new();
            for day in &by_day {
                let unified = engine_meters::round1(
                    members.iter().map(|&m| day[m]).sum::<f64>() / members.len() as f64,
                );
                let label = engine_meters::group_label(group, unified).to_string();
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
            if labels.len() < 4 {
                failures.push(format!(
                    "group '{}' reached only {} of 4 labels over the span",
                    group.id(),
                    labels.len()
                ));
            }
            GroupLabelCoverage { group, labels }
        })
        .collect();

    let passed = failures.is_empty();
    Ok(AcceptanceReport {
        mean_abs_cross_correlation,
        within_group_mean_abs_correlation,
        between_group_mean_abs_correlation,
        day_to_day_correlation: day_to_day,
        mean_abs_daily_delta: daily_delta,
        labels_reached,
        failures,
        passed,
    })
}

/// A deterministic fleet of synthetic natal charts for calibration runs
/// and tests. Houses follow whole signs from the ascendant; the angles sit
/// on the angular cusps.
pub fn synthetic_fleet(count: usize) -> Vec<NatalChart> {
    (0..count)
        .map(|i| {
            let mut rng = SplitMix64::new(0x5EED_CAB1_E5 ^ (i as u64).wrapping_mul(0x9E37));
            let asc_longitude = 360.0 * rng.next_unit();
            let asc_sign = (asc_longitude / 30.0) as usize;

            let mut placements: Vec<PointPlacement> = astrometers_core::Body::ALL
                .iter()
                .map(|&body| {
                    let longitude = 360.0 * rng.next_unit();
                    let sign = (longitude / 30.0) as usize;
                    let house = (((sign + 12 - asc_sign) % 12) + 1) as u8;
                    PointPlacement::new(
                        astrometers_core::NatalPoint::from_body(body),
                        longitude,
                        house,
                    )
                })
                .collect();

            placements.push(PointPlacement::angle(
                astrometers_core::NatalPoint::Asc,
                asc_longitude,
            ));
            placements.push(PointPlacement::angle(
                astrometers_core::NatalPoint::Ic,
                (asc_longitude + 90.0) % 360.0,
            ));
            placements.push(PointPlacement::angle(
                astrometers_core::NatalPoint::Dsc,
                (asc_longitude + 180.0) % 360.0,
            ));
            placements.push(PointPlacement::angle(
                astrometers_core::NatalPoint::Mc,
                (asc_longitude + 270.0) % 360.0,
            ));

            NatalChart::from_placements(placements).expect("synthetic chart is well-formed")
        })
        .collect()
}
