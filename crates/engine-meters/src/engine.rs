//! The request-scoped scoring engine.
//!
//! Stateless after construction: constants and the calibrated registry are
//! read-only, every request allocates only its own aspect list, and each
//! meter's reading is a pure function of its filtered subset and tables.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use astrometers_core::{
    AstroError, AstrometersReading, EphemerisSource, MeterReading, NatalChart, TransitAspect,
};

use crate::aggregate::filtered_aggregate;
use crate::constants::EngineConstants;
use crate::dither::dither_for;
use crate::hierarchy::compose;
use crate::labels::group_label;
use crate::meter::{MeterDef, MeterRegistry};
use crate::normalize::normalize;
use crate::unified::unified_score;

/// Per-request options.
#[derive(Debug, Clone, Copy)]
pub struct EvaluateOptions {
    /// Abandon the request with `Cancelled` once this instant passes.
    pub deadline: Option<DateTime<Utc>>,
    /// Disable to make exactly-neutral fixtures land exactly on 50.
    pub dither_enabled: bool,
}

impl Default for EvaluateOptions {
    fn default() -> Self {
        EvaluateOptions {
            deadline: None,
            dither_enabled: true,
        }
    }
}

/// The Astrometers scoring engine.
pub struct Astrometers {
    constants: EngineConstants,
    registry: MeterRegistry,
}

impl Astrometers {
    pub fn new(constants: EngineConstants, registry: MeterRegistry) -> Self {
        Astrometers {
            constants,
            registry,
        }
    }

    pub fn constants(&self) -> &EngineConstants {
        &self.constants
    }

    pub fn registry(&self) -> &MeterRegistry {
        &self.registry
    }

    /// Score every meter for a chart at an instant, with default options.
    pub async fn evaluate(
        &self,
        source: &dyn EphemerisSource,
        chart: &NatalChart,
        instant: DateTime<Utc>,
    ) -> Result<AstrometersReading, AstroError> {
        self.evaluate_with(source, chart, instant, &EvaluateOptions::default())
            .await
    }

    pub async fn evaluate_with(
        &self,
        source: &dyn EphemerisSource,
        chart: &NatalChart,
        instant: DateTime<Utc>,
        options: &EvaluateOptions,
    ) -> Result<AstrometersReading, AstroError> {
        chart.validate()?;

        let mut aspects = sanitize(source.aspects_for(chart, instant).await?);
        aspects.sort_by_key(|a| a.sort_key());

        let date = instant.date_naive();
        let mut meters = Vec::with_capacity(self.registry.meters().len());
        for def in self.registry.meters() {
            if let Some(deadline) = options.deadline {
                if Utc::now() > deadline {
                    return Err(AstroError::Cancelled {
                        meter: def.id.id().to_string(),
                    });
                }
            }
            meters.push(self.score_meter(def, chart, &aspects, date, options.dither_enabled));
        }

        Ok(compose(meters))
    }

    /// Score one meter against an already-sanitized, canonically sorted
    /// aspect list.
    pub fn score_meter(
        &self,
        def: &MeterDef,
        chart: &NatalChart,
        aspects: &[TransitAspect],
        date: NaiveDate,
        dither_enabled: bool,
    ) -> MeterReading {
        let agg = filtered_aggregate(&self.constants, &def.filter, chart, aspects);
        let scores = normalize(agg.dti, agg.hqs, &def.dti_table, &def.hqs_table, def.ballast);

        let dither = if dither_enabled {
            dither_for(chart.chart_hash(), date, def.id, self.constants.dither_span())
        } else {
            0.0
        };
        let unified = unified_score(scores.intensity, scores.harmony, dither);

        MeterReading {
            id: def.id,
            group: def.group,
            intensity: scores.intensity.round().clamp(0.0, 100.0) as u8,
            harmony: scores.harmony.round().clamp(0.0, 100.0) as u8,
            unified,
            label: group_label(def.group, unified).to_string(),
            driver: agg.driver,
        }
    }
}

/// Drop aspects that violate the input contract, warning per drop. This is
/// the only local recovery in the pipeline; everything else fails the
/// request.
fn sanitize(aspects: Vec<TransitAspect>) -> Vec<TransitAspect> {
    aspects
        .into_iter()
        .filter(|a| match a.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    transit = a.transit.id(),
                    natal = a.natal.id(),
                    kind = a.kind.id(),
                    error = %err,
                    "dropping malformed aspect"
                );
                false
            }
        })
        .collect()
}
