//! Percentile normalization against the historical distribution, plus the
//! per-meter ballast that keeps harmony honest on quiet days.

use serde::{Deserialize, Serialize};

use astrometers_core::AstroError;

/// A sorted array of historical raw samples with interpolated rank lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PercentileTable {
    samples: Vec<f64>,
}

impl PercentileTable {
    /// Build from samples that are already sorted ascending.
    pub fn new(samples: Vec<f64>) -> Result<PercentileTable, AstroError> {
        if samples.len() < 2 {
            return Err(AstroError::ConfigError(format!(
                "percentile table needs at least 2 samples, got {}",
                samples.len()
            )));
        }
        if samples.iter().any(|s| !s.is_finite()) {
            return Err(AstroError::ConfigError(
                "percentile table contains a non-finite sample".into(),
            ));
        }
        if samples.windows(2).any(|w| w[0] > w[1]) {
            return Err(AstroError::ConfigError(
                "percentile table samples are not sorted ascending".into(),
            ));
        }
        Ok(PercentileTable { samples })
    }

    /// Build from unsorted samples (the calibration path).
    pub fn from_unsorted(mut samples: Vec<f64>) -> Result<PercentileTable, AstroError> {
        if samples.iter().any(|s| !s.is_finite()) {
            return Err(AstroError::ConfigError(
                "percentile table contains a non-finite sample".into(),
            ));
        }
        samples.sort_by(|a, b| a.partial_cmp(b).expect("finite samples compare"));
        PercentileTable::new(samples)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn median(&self) -> f64 {
        let n = self.samples.len();
        if n % 2 == 1 {
            self.samples[n / 2]
        } else {
            (self.samples[n / 2 - 1] + self.samples[n / 2]) / 2.0
        }
    }

    /// Percentile rank of `x` in [0, 100], linearly interpolated between
    /// neighboring samples; values outside the historical range clamp.
    pub fn rank(&self, x: f64) -> f64 {
        let n = self.samples.len();
        if x <= self.samples[0] {
            return 0.0;
        }
        if x >= self.samples[n - 1] {
            return 100.0;
        }
        // Number of samples strictly below x; 1..n-1 here.
        let idx = self.samples.partition_point(|s| *s < x);
        let lo = self.samples[idx - 1];
        let hi = self.samples[idx];
        let frac = if hi > lo { (x - lo) / (hi - lo) } else { 0.0 };
        let position = (idx - 1) as f64 + frac;
        100.0 * position / (n - 1) as f64
    }
}

/// Intensity and harmony after normalization, held as reals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedScores {
    pub intensity: f64,
    pub harmony: f64,
}

/// Map raw DTI/HQS through the meter's percentile tables and apply ballast.
///
/// Ballast shrinks harmony's distance from neutral when intensity is
/// trivial: with no activity at all the effective weight is zero and
/// harmony is exactly 50.
pub fn normalize(
    dti_raw: f64,
    hqs_raw: f64,
    dti_table: &PercentileTable,
    hqs_table: &PercentileTable,
    ballast: f64,
) -> NormalizedScores {
    let intensity = dti_table.rank(dti_raw);
    let harmony_pct = hqs_table.rank(hqs_raw);
    let effective_weight = intensity / (intensity + ballast);
    NormalizedScores {
        intensity,
        harmony: 50.0 + (harmony_pct - 50.0) * effective_weight,
    }
}
