//! Natal-side weightage: how much a touched natal point matters.

use astrometers_core::{NatalChart, NatalPoint};

use crate::constants::EngineConstants;

/// Weightage factor of a natal point in its chart:
/// (base + dignity + ruler bonus) × house multiplier × sensitivity.
///
/// Angles contribute base and house multiplier only; the ruler bonus goes
/// to the modern ruler of the ascendant sign.
pub fn weightage(chart: &NatalChart, natal: NatalPoint, k: &EngineConstants) -> f64 {
    let placement = chart.placement(natal);
    let base = k.planet_base(natal);

    let (dignity, ruler) = match natal.as_body() {
        Some(body) => {
            let dignity = k.dignity_bonus(body, placement.sign);
            let ruler = if body == chart.ascendant_sign().modern_ruler() {
                k.ruler_bonus()
            } else {
                0.0
            };
            (dignity, ruler)
        }
        None => (0.0, 0.0),
    };

    (base + dignity + ruler) * k.house_multiplier(placement.house) * k.sensitivity()
}
