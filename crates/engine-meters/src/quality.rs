//! Signed quality factor of an aspect, in [-1, +1].

use astrometers_core::{AspectKind, Body, NatalPoint, TransitAspect};

use crate::constants::EngineConstants;

/// Nature of one side of an aspect, for conjunction polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairClass {
    Luminary,
    Benefic,
    Malefic,
    Transformer,
    Neutral,
}

fn classify_body(body: Body, k: &EngineConstants) -> PairClass {
    match body {
        Body::Uranus | Body::Neptune | Body::Pluto => PairClass::Transformer,
        Body::Sun | Body::Moon => PairClass::Luminary,
        _ if k.is_benefic(body) => PairClass::Benefic,
        _ if k.is_malefic(body) => PairClass::Malefic,
        _ => PairClass::Neutral,
    }
}

fn classify_point(point: NatalPoint, k: &EngineConstants) -> PairClass {
    match point.as_body() {
        Some(body) => classify_body(body, k),
        None => PairClass::Neutral,
    }
}

/// Conjunction polarity is context-sensitive and resolved by the pair of
/// natures touching. Transformer involvement dominates: those contacts are
/// ambivalent, amplifying whatever they touch rather than carrying a sign
/// of their own.
fn conjunction_polarity(a: PairClass, b: PairClass) -> f64 {
    use PairClass::*;
    let pair = |x: PairClass, y: PairClass| (a == x && b == y) || (a == y && b == x);

    if a == Transformer || b == Transformer {
        0.0
    } else if pair(Luminary, Benefic) || pair(Benefic, Benefic) {
        1.0
    } else if pair(Luminary, Malefic) {
        -0.5
    } else if pair(Malefic, Malefic) {
        -1.0
    } else if pair(Luminary, Luminary) {
        0.5
    } else if pair(Neutral, Benefic) {
        0.5
    } else if pair(Neutral, Malefic) {
        -0.5
    } else {
        // benefic+malefic and the remaining neutral pairs
        0.0
    }
}

/// Quality factor of one aspect.
///
/// Starts from the aspect kind's polarity (conjunctions via pair lookup),
/// doubles positive contributions touched by a benefic, halves negative
/// contributions touched by a malefic, clamps to [-1, +1].
pub fn quality_factor(aspect: &TransitAspect, k: &EngineConstants) -> f64 {
    let base = if aspect.kind == AspectKind::Conjunction {
        conjunction_polarity(
            classify_body(aspect.transit, k),
            classify_point(aspect.natal, k),
        )
    } else {
        k.quality_base(aspect.kind)
    };

    let touches_benefic = k.is_benefic(aspect.transit)
        || aspect.natal.as_body().map_or(false, |b| k.is_benefic(b));
    let touches_malefic = k.is_malefic(aspect.transit)
        || aspect.natal.as_body().map_or(false, |b| k.is_malefic(b));

    let mut q = base;
    if q > 0.0 && touches_benefic {
        q *= 2.0;
    }
    if q < 0.0 && touches_malefic {
        q *= 0.5;
    }
    q.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aspect(transit: Body, natal: NatalPoint, kind: AspectKind) -> TransitAspect {
        TransitAspect::new(transit, natal, kind, 0.0, 1.0)
    }

    #[test]
    fn test_trine_with_benefic_saturates() {
        let k = EngineConstants::default();
        let q = quality_factor(&aspect(Body::Moon, NatalPoint::Venus, AspectKind::Trine), &k);
        assert_eq!(q, 1.0);
    }

    #[test]
    fn test_trine_without_benefic_stays_at_base() {
        let k = EngineConstants::default();
        let q = quality_factor(&aspect(Body::Moon, NatalPoint::Mercury, AspectKind::Trine), &k);
        assert_eq!(q, 1.0);
    }

    #[test]
    fn test_malefic_square_softened() {
        let k = EngineConstants::default();
        let q = quality_factor(&aspect(Body::Saturn, NatalPoint::Sun, AspectKind::Square), &k);
        assert_eq!(q, -0.5);
    }

    #[test]
    fn test_square_without_malefic_full_strength() {
        let k = EngineConstants::default();
        let q = quality_factor(&aspect(Body::Sun, NatalPoint::Moon, AspectKind::Square), &k);
        assert_eq!(q, -1.0);
    }

    #[test]
    fn test_quincunx_base() {
        let k = EngineConstants::default();
        let q = quality_factor(&aspect(Body::Sun, NatalPoint::Moon, AspectKind::Quincunx), &k);
        assert_eq!(q, -0.5);
        // Malefic participation softens the negative base.
        let q = quality_factor(&aspect(Body::Mars, NatalPoint::Moon, AspectKind::Quincunx), &k);
        assert_eq!(q, -0.25);
    }

    #[test]
    fn test_conjunction_luminary_benefic() {
        let k = EngineConstants::default();
        // Base +1, then the benefic boost clamps back to +1.
        let q = quality_factor(&aspect(Body::Venus, NatalPoint::Sun, AspectKind::Conjunction), &k);
        assert_eq!(q, 1.0);
    }

    #[test]
    fn test_conjunction_luminary_malefic() {
        let k = EngineConstants::default();
        // Base -0.5, softened by the malefic to -0.25.
        let q = quality_factor(&aspect(Body::Saturn, NatalPoint::Moon, AspectKind::Conjunction), &k);
        assert_eq!(q, -0.25);
    }

    #[test]
    fn test_conjunction_two_malefics() {
        let k = EngineConstants::default();
        // Base -1, softened to -0.5.
        let q = quality_factor(&aspect(Body::Mars, NatalPoint::Saturn, AspectKind::Conjunction), &k);
        assert_eq!(q, -0.5);
    }

    #[test]
    fn test_conjunction_transformer_is_ambivalent() {
        let k = EngineConstants::default();
        for natal in [NatalPoint::Sun, NatalPoint::Venus, NatalPoint::Mars, NatalPoint::Asc] {
            let q = quality_factor(&aspect(Body::Pluto, natal, AspectKind::Conjunction), &k);
            assert_eq!(q, 0.0, "pluto conjunct {:?}", natal);
        }
        // Venus conjunct transiting Uranus: transformer still dominates.
        let q = quality_factor(&aspect(Body::Uranus, NatalPoint::Venus, AspectKind::Conjunction), &k);
        assert_eq!(q, 0.0);
    }

    #[test]
    fn test_conjunction_angle_with_benefic() {
        let k = EngineConstants::default();
        // Angles are neutral partners; a benefic lifts them.
        let q = quality_factor(&aspect(Body::Jupiter, NatalPoint::Asc, AspectKind::Conjunction), &k);
        assert_eq!(q, 1.0);
    }

    #[test]
    fn test_bounds() {
        let k = EngineConstants::default();
        for transit in Body::ALL {
            for natal in NatalPoint::ALL {
                for kind in AspectKind::ALL {
                    let q = quality_factor(&aspect(transit, natal, kind), &k);
                    assert!((-1.0..=1.0).contains(&q));
                }
            }
        }
    }
}
