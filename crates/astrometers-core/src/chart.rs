//! Natal chart container: placements, validation and the stable hash.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AstroError;
use crate::types::{NatalPoint, Sign};

/// One natal point with its zodiacal and mundane position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointPlacement {
    pub point: NatalPoint,
    /// Ecliptic longitude in degrees, [0, 360).
    pub longitude: f64,
    pub sign: Sign,
    /// House placement, 1..=12.
    pub house: u8,
}

impl PointPlacement {
    /// Placement for a body, deriving the sign from the longitude.
    pub fn new(point: NatalPoint, longitude: f64, house: u8) -> Self {
        PointPlacement {
            point,
            longitude,
            sign: Sign::from_longitude(longitude),
            house,
        }
    }

    /// Placement for a chart angle. Angles live on the angular house cusps:
    /// Asc 1, IC 4, Dsc 7, MC 10.
    pub fn angle(point: NatalPoint, longitude: f64) -> Self {
        let house = match point {
            NatalPoint::Asc => 1,
            NatalPoint::Ic => 4,
            NatalPoint::Dsc => 7,
            NatalPoint::Mc => 10,
            other => panic!("{:?} is not a chart angle", other),
        };
        PointPlacement::new(point, longitude, house)
    }
}

/// An immutable natal chart: the 11 bodies and 4 angles, plus the stable
/// 64-bit hash that seeds the per-day dither.
///
/// The hash is the first 8 bytes (big-endian) of a SHA-256 digest over each
/// point id and its longitude rounded to arc-minute precision, taken in the
/// fixed `NatalPoint::ALL` order, so it is insensitive to input ordering
/// and to sub-arc-minute ephemeris jitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    placements: Vec<PointPlacement>,
    chart_hash: u64,
}

impl NatalChart {
    /// Build a chart from placements, validating completeness and ranges.
    pub fn from_placements(placements: Vec<PointPlacement>) -> Result<NatalChart, AstroError> {
        validate_placements(&placements)?;

        // Store in canonical order so lookups and hashing are stable.
        let mut ordered = Vec::with_capacity(NatalPoint::COUNT);
        for point in NatalPoint::ALL {
            let found = placements
                .iter()
                .find(|p| p.point == point)
                .copied()
                .expect("validated placements contain every point");
            ordered.push(found);
        }

        let chart_hash = compute_hash(&ordered);
        Ok(NatalChart {
            placements: ordered,
            chart_hash,
        })
    }

    pub fn placement(&self, point: NatalPoint) -> &PointPlacement {
        // Placements are stored in NatalPoint::ALL order.
        &self.placements[point.index()]
    }

    pub fn placements(&self) -> &[PointPlacement] {
        &self.placements
    }

    pub fn ascendant_sign(&self) -> Sign {
        self.placement(NatalPoint::Asc).sign
    }

    pub fn chart_hash(&self) -> u64 {
        self.chart_hash
    }

    /// Re-check a chart that was built through deserialization.
    pub fn validate(&self) -> Result<(), AstroError> {
        validate_placements(&self.placements)?;
        for (i, point) in NatalPoint::ALL.iter().enumerate() {
            if self.placements[i].point != *point {
                return Err(AstroError::InvalidChart(format!(
                    "placements out of canonical order at position {}",
                    i
                )));
            }
        }
        Ok(())
    }
}

fn validate_placements(placements: &[PointPlacement]) -> Result<(), AstroError> {
    if placements.len() != NatalPoint::COUNT {
        return Err(AstroError::InvalidChart(format!(
            "expected {} placements, got {}",
            NatalPoint::COUNT,
            placements.len()
        )));
    }
    for point in NatalPoint::ALL {
        let count = placements.iter().filter(|p| p.point == point).count();
        if count != 1 {
            return Err(AstroError::InvalidChart(format!(
                "point '{}' appears {} times",
                point.id(),
                count
            )));
        }
    }
    for p in placements {
        if !p.longitude.is_finite() || !(0.0..360.0).contains(&p.longitude) {
            return Err(AstroError::InvalidChart(format!(
                "longitude of '{}' outside [0, 360)",
                p.point.id()
            )));
        }
        if !(1..=12).contains(&p.house) {
            return Err(AstroError::InvalidChart(format!(
                "house of '{}' outside 1..=12",
                p.point.id()
            )));
        }
    }
    Ok(())
}

fn compute_hash(ordered: &[PointPlacement]) -> u64 {
    let mut hasher = Sha256::new();
    for p in ordered {
        hasher.update(p.point.id().as_bytes());
        let arc_minutes = (p.longitude * 60.0).round() as i64;
        hasher.update(arc_minutes.to_be_bytes());
    }
    let digest = hasher.finalize();
    u64::from_be_bytes(digest[..8].try_into().expect("digest has 32 bytes"))
}
