//! Meter filters: which aspects a meter listens to.
//!
//! Filters are pure data, loaded from the per-meter configuration files.
//! Each of the three dimensions is either the wildcard (`"*"` in JSON) or
//! an explicit list; an aspect passes only if all three admit it.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use astrometers_core::{AspectKind, Body, NatalPoint, TransitAspect};

/// One filter dimension: wildcard or an explicit allow-list.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSet<T> {
    Any,
    Only(Vec<T>),
}

impl<T: PartialEq> FilterSet<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            FilterSet::Any => true,
            FilterSet::Only(values) => values.contains(value),
        }
    }
}

impl<T: Serialize> Serialize for FilterSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterSet::Any => serializer.serialize_str("*"),
            FilterSet::Only(values) => values.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFilterSet<T> {
    Wildcard(String),
    Listed(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FilterSet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawFilterSet::<T>::deserialize(deserializer)? {
            RawFilterSet::Wildcard(s) if s == "*" => Ok(FilterSet::Any),
            RawFilterSet::Wildcard(s) => Err(D::Error::custom(format!(
                "filter entry must be \"*\" or a list, got \"{}\"",
                s
            ))),
            RawFilterSet::Listed(values) => Ok(FilterSet::Only(values)),
        }
    }
}

/// The full filter of one meter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterFilter {
    #[serde(rename = "natal_planets")]
    pub natal_points: FilterSet<NatalPoint>,
    #[serde(rename = "transit_planets")]
    pub transit_bodies: FilterSet<Body>,
    pub aspect_kinds: FilterSet<AspectKind>,
}

impl MeterFilter {
    /// A filter that admits everything.
    pub fn any() -> Self {
        MeterFilter {
            natal_points: FilterSet::Any,
            transit_bodies: FilterSet::Any,
            aspect_kinds: FilterSet::Any,
        }
    }

    pub fn admits(&self, aspect: &TransitAspect) -> bool {
        self.natal_points.admits(&aspect.natal)
            && self.transit_bodies.admits(&aspect.transit)
            && self.aspect_kinds.admits(&aspect.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aspect(transit: Body, natal: NatalPoint, kind: AspectKind) -> TransitAspect {
        TransitAspect::new(transit, natal, kind, 1.0, 1.0)
    }

    #[test]
    fn test_wildcard_admits_everything() {
        let filter = MeterFilter::any();
        assert!(filter.admits(&aspect(Body::Moon, NatalPoint::Venus, AspectKind::Trine)));
        assert!(filter.admits(&aspect(Body::Pluto, NatalPoint::Asc, AspectKind::Quincunx)));
    }

    #[test]
    fn test_all_three_dimensions_must_match() {
        let filter = MeterFilter {
            natal_points: FilterSet::Only(vec![NatalPoint::Venus, NatalPoint::Moon]),
            transit_bodies: FilterSet::Only(vec![Body::Moon]),
            aspect_kinds: FilterSet::Only(vec![AspectKind::Trine, AspectKind::Sextile]),
        };
        assert!(filter.admits(&aspect(Body::Moon, NatalPoint::Venus, AspectKind::Trine)));
        assert!(!filter.admits(&aspect(Body::Sun, NatalPoint::Venus, AspectKind::Trine)));
        assert!(!filter.admits(&aspect(Body::Moon, NatalPoint::Sun, AspectKind::Trine)));
        assert!(!filter.admits(&aspect(Body::Moon, NatalPoint::Venus, AspectKind::Square)));
    }

    #[test]
    fn test_json_wildcard_and_list() {
        let json = r#"{
            "natal_planets": ["venus", "moon"],
            "transit_planets": "*",
            "aspect_kinds": ["trine"]
        }"#;
        let filter: MeterFilter = serde_json::from_str(json).unwrap();
        assert_eq!(filter.transit_bodies, FilterSet::Any);
        assert_eq!(
            filter.natal_points,
            FilterSet::Only(vec![NatalPoint::Venus, NatalPoint::Moon])
        );

        let round = serde_json::to_string(&filter).unwrap();
        let back: MeterFilter = serde_json::from_str(&round).unwrap();
        assert_eq!(back, filter);
    }

    #[test]
    fn test_bad_wildcard_rejected() {
        let json = r#"{
            "natal_planets": "all",
            "transit_planets": "*",
            "aspect_kinds": "*"
        }"#;
        assert!(serde_json::from_str::<MeterFilter>(json).is_err());
    }
}
