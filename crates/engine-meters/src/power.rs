//! Transit power: time-normalized Gaussian decay per aspect.

use astrometers_core::TransitAspect;

use crate::constants::EngineConstants;

/// Scalar power of one aspect.
///
/// The orb is converted to days using the transit body's current speed, so
/// a slow body carrying a wide orb and a fast body carrying a narrow one
/// decay on comparable time scales. The decay window is the body's tier
/// window divided by the sigma divisor; speed is floored near stations so
/// the time deviation stays finite.
pub fn transit_power(aspect: &TransitAspect, k: &EngineConstants) -> f64 {
    let sigma_days = k.tier_window_days(aspect.transit) / k.sigma_divisor();
    let speed = aspect.speed.max(k.speed_floor());
    let deviation_days = aspect.orb / speed;
    let gaussian = (-(deviation_days * deviation_days) / (2.0 * sigma_days * sigma_days)).exp();
    gaussian * k.tier_weight(aspect.transit) * k.aspect_modifier(aspect.kind)
}
