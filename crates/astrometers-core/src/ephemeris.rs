//! The ephemeris boundary.
//!
//! Astronomical position computation is an opaque collaborator. The engine
//! only consumes the aspect list contract below and makes no assumption
//! about how the aspects were computed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::chart::NatalChart;
use crate::error::AstroError;
use crate::types::TransitAspect;

/// Source of transit-to-natal aspects for a given instant.
///
/// Implementations must enumerate, for each (transit body, natal point)
/// pair, at most one aspect per kind, keeping only aspects within the
/// kind's orb tolerance. `speed` is the absolute instantaneous angular
/// speed in ecliptic longitude, in degrees per solar day, as of the
/// instant. Failures surface as [`AstroError::EphemerisUnavailable`];
/// the engine never emits a partial reading on adapter failure.
#[async_trait]
pub trait EphemerisSource: Send + Sync {
    async fn aspects_for(
        &self,
        chart: &NatalChart,
        instant: DateTime<Utc>,
    ) -> Result<Vec<TransitAspect>, AstroError>;
}

/// An ephemeris with no sky at all. Used by fixtures that need the
/// empty-day behavior of the pipeline.
pub struct NullEphemeris;

#[async_trait]
impl EphemerisSource for NullEphemeris {
    async fn aspects_for(
        &self,
        _chart: &NatalChart,
        _instant: DateTime<Utc>,
    ) -> Result<Vec<TransitAspect>, AstroError> {
        Ok(Vec::new())
    }
}

/// A fixed, caller-supplied aspect list. Used by scenario fixtures.
pub struct FixedEphemeris {
    aspects: Vec<TransitAspect>,
}

impl FixedEphemeris {
    pub fn new(aspects: Vec<TransitAspect>) -> Self {
        FixedEphemeris { aspects }
    }
}

#[async_trait]
impl EphemerisSource for FixedEphemeris {
    async fn aspects_for(
        &self,
        _chart: &NatalChart,
        _instant: DateTime<Utc>,
    ) -> Result<Vec<TransitAspect>, AstroError> {
        Ok(self.aspects.clone())
    }
}
