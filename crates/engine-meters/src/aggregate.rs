//! DTI / HQS aggregation over a meter's filtered aspect subset.

use astrometers_core::{DriverAspect, NatalChart, TransitAspect};

use crate::constants::EngineConstants;
use crate::filter::MeterFilter;
use crate::power::transit_power;
use crate::quality::quality_factor;
use crate::weightage::weightage;

/// One aspect with its three pipeline scalars attached.
#[derive(Debug, Clone, Copy)]
pub struct AspectScore {
    pub aspect: TransitAspect,
    pub weight: f64,
    pub power: f64,
    pub quality: f64,
}

impl AspectScore {
    /// Unsigned influence: W·P.
    pub fn influence(&self) -> f64 {
        self.weight * self.power
    }

    /// Signed contribution: W·P·Q.
    pub fn contribution(&self) -> f64 {
        self.weight * self.power * self.quality
    }
}

/// Aggregated raw scores of a filtered subset.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// Dual Transit Influence: Σ W·P.
    pub dti: f64,
    /// Harmonic Quality Score: Σ W·P·Q.
    pub hqs: f64,
    /// The single aspect with the largest |W·P·Q|, if any aspect passed.
    pub driver: Option<DriverAspect>,
}

impl Aggregate {
    pub fn empty() -> Self {
        Aggregate {
            dti: 0.0,
            hqs: 0.0,
            driver: None,
        }
    }
}

/// Score every aspect a filter admits.
pub fn score_aspects(
    k: &EngineConstants,
    filter: &MeterFilter,
    chart: &NatalChart,
    aspects: &[TransitAspect],
) -> Vec<AspectScore> {
    aspects
        .iter()
        .filter(|a| filter.admits(a))
        .map(|a| AspectScore {
            aspect: *a,
            weight: weightage(chart, a.natal, k),
            power: transit_power(a, k),
            quality: quality_factor(a, k),
        })
        .collect()
}

/// Sum a scored subset into DTI/HQS and pick the driver.
///
/// Driver ties resolve to the earliest aspect in the (already canonical)
/// input order, so the result is independent of adapter enumeration order.
pub fn aggregate(scores: &[AspectScore]) -> Aggregate {
    let mut dti = 0.0;
    let mut hqs = 0.0;
    let mut driver: Option<&AspectScore> = None;

    for score in scores {
        dti += score.influence();
        hqs += score.contribution();
        let stronger = match driver {
            None => true,
            Some(best) => score.contribution().abs() > best.contribution().abs(),
        };
        if stronger {
            driver = Some(score);
        }
    }

    Aggregate {
        dti,
        hqs,
        driver: driver.map(|s| DriverAspect {
            transit: s.aspect.transit,
            natal: s.aspect.natal,
            kind: s.aspect.kind,
            orb: s.aspect.orb,
            retrograde: s.aspect.retrograde,
            score: s.contribution(),
        }),
    }
}

/// The raw pipeline for one meter: filter, score, sum.
pub fn filtered_aggregate(
    k: &EngineConstants,
    filter: &MeterFilter,
    chart: &NatalChart,
    aspects: &[TransitAspect],
) -> Aggregate {
    aggregate(&score_aspects(k, filter, chart, aspects))
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrometers_core::{AspectKind, Body, NatalPoint, PointPlacement};

    fn chart() -> NatalChart {
        let placements = vec![
            PointPlacement::new(NatalPoint::Sun, 125.0, 5),
            PointPlacement::new(NatalPoint::Moon, 98.0, 4),
            PointPlacement::new(NatalPoint::Mercury, 155.0, 6),
            PointPlacement::new(NatalPoint::Venus, 190.0, 7),
            PointPlacement::new(NatalPoint::Mars, 17.0, 1),
            PointPlacement::new(NatalPoint::Jupiter, 250.0, 9),
            PointPlacement::new(NatalPoint::Saturn, 280.0, 10),
            PointPlacement::new(NatalPoint::Uranus, 310.0, 11),
            PointPlacement::new(NatalPoint::Neptune, 340.0, 12),
            PointPlacement::new(NatalPoint::Pluto, 220.0, 8),
            PointPlacement::new(NatalPoint::NorthNode, 75.0, 3),
            PointPlacement::angle(NatalPoint::Asc, 15.0),
            PointPlacement::angle(NatalPoint::Ic, 105.0),
            PointPlacement::angle(NatalPoint::Dsc, 195.0),
            PointPlacement::angle(NatalPoint::Mc, 285.0),
        ];
        NatalChart::from_placements(placements).unwrap()
    }

    #[test]
    fn test_empty_subset_aggregates_to_zero() {
        let agg = aggregate(&[]);
        assert_eq!(agg, Aggregate::empty());
    }

    #[test]
    fn test_single_exact_moon_venus_trine() {
        let k = EngineConstants::default();
        let chart = chart();
        let aspects = [TransitAspect::new(
            Body::Moon,
            NatalPoint::Venus,
            AspectKind::Trine,
            0.0,
            13.2,
        )];
        let agg = filtered_aggregate(&k, &MeterFilter::any(), &chart, &aspects);
        // W = (7 + 2) * 3 = 27, P = 0.35 * 0.8 = 0.28, Q = 1.
        assert!((agg.dti - 27.0 * 0.28).abs() < 1e-12);
        assert!((agg.hqs - agg.dti).abs() < 1e-12);
        let driver = agg.driver.unwrap();
        assert_eq!(driver.transit, Body::Moon);
        assert_eq!(driver.natal, NatalPoint::Venus);
        assert_eq!(driver.kind, AspectKind::Trine);
    }

    #[test]
    fn test_driver_is_largest_absolute_contribution() {
        let k = EngineConstants::default();
        let chart = chart();
        let aspects = [
            // Weak positive: sextile from the moon.
            TransitAspect::new(Body::Moon, NatalPoint::Mercury, AspectKind::Sextile, 0.1, 13.0),
            // Strong negative: saturn square the sun.
            TransitAspect::new(Body::Saturn, NatalPoint::Sun, AspectKind::Square, 0.0, 0.1),
        ];
        let agg = filtered_aggregate(&k, &MeterFilter::any(), &chart, &aspects);
        let driver = agg.driver.unwrap();
        assert_eq!(driver.transit, Body::Saturn);
        assert!(driver.score < 0.0);
    }

    #[test]
    fn test_filter_restricts_subset() {
        let k = EngineConstants::default();
        let chart = chart();
        let aspects = [
            TransitAspect::new(Body::Moon, NatalPoint::Venus, AspectKind::Trine, 0.0, 13.2),
            TransitAspect::new(Body::Saturn, NatalPoint::Sun, AspectKind::Square, 0.0, 0.1),
        ];
        let filter = MeterFilter {
            natal_points: crate::filter::FilterSet::Only(vec![NatalPoint::Venus]),
            transit_bodies: crate::filter::FilterSet::Any,
            aspect_kinds: crate::filter::FilterSet::Any,
        };
        let agg = filtered_aggregate(&k, &filter, &chart, &aspects);
        assert_eq!(agg.driver.unwrap().natal, NatalPoint::Venus);
        assert!(agg.hqs > 0.0);
    }

    #[test]
    fn test_hqs_is_signed_sum() {
        let k = EngineConstants::default();
        let chart = chart();
        let aspects = [
            TransitAspect::new(Body::Moon, NatalPoint::Venus, AspectKind::Trine, 0.0, 13.2),
            TransitAspect::new(Body::Moon, NatalPoint::Venus, AspectKind::Square, 0.0, 13.2),
        ];
        let agg = filtered_aggregate(&k, &MeterFilter::any(), &chart, &aspects);
        // DTI adds magnitudes; HQS nets the signs.
        assert!(agg.dti > agg.hqs.abs());
    }
}
