//! Bodies, signs and aspects — the shared vocabulary of the platform.
//!
//! All enumerations carry a dense `index()` so lookup tables can be plain
//! fixed-size arrays, and serialize to the stable snake_case identifiers
//! used by the per-meter configuration files and the JSON API surface.

use serde::{Deserialize, Serialize};

use crate::error::AstroError;

/// A moving body whose position is taken at the request instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
}

impl Body {
    pub const COUNT: usize = 11;

    pub const ALL: [Body; Body::COUNT] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::NorthNode,
    ];

    /// Dense index for table lookups, following `ALL` order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable identifier, identical to the serde representation.
    pub fn id(self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
            Body::NorthNode => "north_node",
        }
    }
}

/// A point in the natal chart an aspect can touch: the eleven bodies plus
/// the four chart angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NatalPoint {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
    Asc,
    Ic,
    Dsc,
    Mc,
}

impl NatalPoint {
    pub const COUNT: usize = 15;

    pub const ALL: [NatalPoint; NatalPoint::COUNT] = [
        NatalPoint::Sun,
        NatalPoint::Moon,
        NatalPoint::Mercury,
        NatalPoint::Venus,
        NatalPoint::Mars,
        NatalPoint::Jupiter,
        NatalPoint::Saturn,
        NatalPoint::Uranus,
        NatalPoint::Neptune,
        NatalPoint::Pluto,
        NatalPoint::NorthNode,
        NatalPoint::Asc,
        NatalPoint::Ic,
        NatalPoint::Dsc,
        NatalPoint::Mc,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_angle(self) -> bool {
        matches!(
            self,
            NatalPoint::Asc | NatalPoint::Ic | NatalPoint::Dsc | NatalPoint::Mc
        )
    }

    /// The body behind this point, if it is not an angle.
    pub fn as_body(self) -> Option<Body> {
        match self {
            NatalPoint::Sun => Some(Body::Sun),
            NatalPoint::Moon => Some(Body::Moon),
            NatalPoint::Mercury => Some(Body::Mercury),
            NatalPoint::Venus => Some(Body::Venus),
            NatalPoint::Mars => Some(Body::Mars),
            NatalPoint::Jupiter => Some(Body::Jupiter),
            NatalPoint::Saturn => Some(Body::Saturn),
            NatalPoint::Uranus => Some(Body::Uranus),
            NatalPoint::Neptune => Some(Body::Neptune),
            NatalPoint::Pluto => Some(Body::Pluto),
            NatalPoint::NorthNode => Some(Body::NorthNode),
            _ => None,
        }
    }

    pub fn from_body(body: Body) -> NatalPoint {
        match body {
            Body::Sun => NatalPoint::Sun,
            Body::Moon => NatalPoint::Moon,
            Body::Mercury => NatalPoint::Mercury,
            Body::Venus => NatalPoint::Venus,
            Body::Mars => NatalPoint::Mars,
            Body::Jupiter => NatalPoint::Jupiter,
            Body::Saturn => NatalPoint::Saturn,
            Body::Uranus => NatalPoint::Uranus,
            Body::Neptune => NatalPoint::Neptune,
            Body::Pluto => NatalPoint::Pluto,
            Body::NorthNode => NatalPoint::NorthNode,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            NatalPoint::Asc => "asc",
            NatalPoint::Ic => "ic",
            NatalPoint::Dsc => "dsc",
            NatalPoint::Mc => "mc",
            other => other.as_body().expect("non-angle point has a body").id(),
        }
    }
}

/// One of the twelve zodiac signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    pub const COUNT: usize = 12;

    pub const ALL: [Sign; Sign::COUNT] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The sign containing an ecliptic longitude (30° per sign from 0° Aries).
    pub fn from_longitude(longitude: f64) -> Sign {
        let norm = longitude.rem_euclid(360.0);
        Sign::ALL[(norm / 30.0) as usize % Sign::COUNT]
    }

    pub fn opposite(self) -> Sign {
        Sign::ALL[(self.index() + 6) % Sign::COUNT]
    }

    /// Modern rulership: Scorpio→Pluto, Aquarius→Uranus, Pisces→Neptune.
    pub fn modern_ruler(self) -> Body {
        match self {
            Sign::Aries => Body::Mars,
            Sign::Taurus => Body::Venus,
            Sign::Gemini => Body::Mercury,
            Sign::Cancer => Body::Moon,
            Sign::Leo => Body::Sun,
            Sign::Virgo => Body::Mercury,
            Sign::Libra => Body::Venus,
            Sign::Scorpio => Body::Pluto,
            Sign::Sagittarius => Body::Jupiter,
            Sign::Capricorn => Body::Saturn,
            Sign::Aquarius => Body::Uranus,
            Sign::Pisces => Body::Neptune,
        }
    }
}

/// The angular relation classes recognized by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
    Quincunx,
}

impl AspectKind {
    pub const COUNT: usize = 6;

    pub const ALL: [AspectKind; AspectKind::COUNT] = [
        AspectKind::Conjunction,
        AspectKind::Sextile,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Opposition,
        AspectKind::Quincunx,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Exact angle of the aspect in degrees.
    pub fn angle(self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
            AspectKind::Trine => 120.0,
            AspectKind::Opposition => 180.0,
            AspectKind::Quincunx => 150.0,
        }
    }

    /// Default orb tolerance in degrees for aspect detection.
    pub fn orb_tolerance(self) -> f64 {
        match self {
            AspectKind::Conjunction | AspectKind::Opposition => 8.0,
            AspectKind::Square | AspectKind::Trine => 6.0,
            AspectKind::Sextile => 4.0,
            AspectKind::Quincunx => 3.0,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Sextile => "sextile",
            AspectKind::Square => "square",
            AspectKind::Trine => "trine",
            AspectKind::Opposition => "opposition",
            AspectKind::Quincunx => "quincunx",
        }
    }
}

/// A transit-to-natal aspect as supplied by the ephemeris adapter.
///
/// `orb` is the non-negative deviation from the exact angle in degrees.
/// `speed` is the absolute instantaneous angular speed of the transit body
/// in degrees per solar day; retrograde motion is tracked by the flag and
/// never changes the sign of the speed used in decay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitAspect {
    pub transit: Body,
    pub natal: NatalPoint,
    pub kind: AspectKind,
    pub orb: f64,
    pub speed: f64,
    #[serde(default)]
    pub retrograde: bool,
}

impl TransitAspect {
    pub fn new(transit: Body, natal: NatalPoint, kind: AspectKind, orb: f64, speed: f64) -> Self {
        TransitAspect {
            transit,
            natal,
            kind,
            orb,
            speed,
            retrograde: false,
        }
    }

    /// Canonical ordering key, used to make aggregation order-independent
    /// of the adapter's enumeration order.
    pub fn sort_key(&self) -> (usize, usize, usize) {
        (
            self.transit.index(),
            self.natal.index(),
            self.kind.index(),
        )
    }

    /// Check the numeric input contract of the adapter boundary.
    pub fn validate(&self) -> Result<(), AstroError> {
        if !self.orb.is_finite() || self.orb < 0.0 {
            return Err(AstroError::OutOfRange {
                field: "orb",
                message: "must be a finite, non-negative number of degrees".into(),
            });
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(AstroError::OutOfRange {
                field: "speed",
                message: "must be a finite, non-negative number of degrees per day".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_from_longitude() {
        assert_eq!(Sign::from_longitude(0.0), Sign::Aries);
        assert_eq!(Sign::from_longitude(29.999), Sign::Aries);
        assert_eq!(Sign::from_longitude(30.0), Sign::Taurus);
        assert_eq!(Sign::from_longitude(359.9), Sign::Pisces);
        assert_eq!(Sign::from_longitude(-10.0), Sign::Pisces);
        assert_eq!(Sign::from_longitude(360.0), Sign::Aries);
        assert_eq!(Sign::from_longitude(725.0), Sign::Aries);
    }

    #[test]
    fn test_sign_opposite() {
        assert_eq!(Sign::Aries.opposite(), Sign::Libra);
        assert_eq!(Sign::Leo.opposite(), Sign::Aquarius);
        assert_eq!(Sign::Pisces.opposite(), Sign::Virgo);
    }

    #[test]
    fn test_modern_rulers() {
        assert_eq!(Sign::Scorpio.modern_ruler(), Body::Pluto);
        assert_eq!(Sign::Aquarius.modern_ruler(), Body::Uranus);
        assert_eq!(Sign::Pisces.modern_ruler(), Body::Neptune);
        assert_eq!(Sign::Aries.modern_ruler(), Body::Mars);
    }

    #[test]
    fn test_snake_case_ids_round_trip() {
        for body in Body::ALL {
            let json = serde_json::to_string(&body).unwrap();
            assert_eq!(json, format!("\"{}\"", body.id()));
            let back: Body = serde_json::from_str(&json).unwrap();
            assert_eq!(back, body);
        }
        for point in NatalPoint::ALL {
            let json = serde_json::to_string(&point).unwrap();
            assert_eq!(json, format!("\"{}\"", point.id()));
        }
        for kind in AspectKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
        }
    }

    #[test]
    fn test_dense_indices_match_all_order() {
        for (i, body) in Body::ALL.iter().enumerate() {
            assert_eq!(body.index(), i);
        }
        for (i, point) in NatalPoint::ALL.iter().enumerate() {
            assert_eq!(point.index(), i);
        }
        for (i, kind) in AspectKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_aspect_validation() {
        let good = TransitAspect::new(Body::Moon, NatalPoint::Venus, AspectKind::Trine, 0.5, 13.2);
        assert!(good.validate().is_ok());

        let negative_orb =
            TransitAspect::new(Body::Moon, NatalPoint::Venus, AspectKind::Trine, -0.1, 13.2);
        assert!(matches!(
            negative_orb.validate(),
            Err(AstroError::OutOfRange { field: "orb", .. })
        ));

        let nan_speed =
            TransitAspect::new(Body::Moon, NatalPoint::Venus, AspectKind::Trine, 0.5, f64::NAN);
        assert!(matches!(
            nan_speed.validate(),
            Err(AstroError::OutOfRange { field: "speed", .. })
        ));
    }

    #[test]
    fn test_orb_tolerances() {
        assert_eq!(AspectKind::Conjunction.orb_tolerance(), 8.0);
        assert_eq!(AspectKind::Opposition.orb_tolerance(), 8.0);
        assert_eq!(AspectKind::Square.orb_tolerance(), 6.0);
        assert_eq!(AspectKind::Trine.orb_tolerance(), 6.0);
        assert_eq!(AspectKind::Sextile.orb_tolerance(), 4.0);
        assert_eq!(AspectKind::Quincunx.orb_tolerance(), 3.0);
    }
}
