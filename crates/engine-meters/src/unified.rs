//! Unified score composition.

/// Combine normalized intensity and harmony into the 0..100 unified score.
///
/// Intensity is tanh-stretched so moderately active days keep resolution
/// without saturating the output; the signed harmony coefficient gives the
/// direction; a second tanh bounds the headroom while preserving detail
/// near neutral. Dither lands after the final stretch, attenuated by
/// proximity to neutral: an exactly-neutral reading moves by the full
/// dither, a strongly-signed one barely moves and can never be tipped
/// across the neutral line.
pub fn unified_score(intensity: f64, harmony: f64, dither: f64) -> f64 {
    let harmony_coef = (harmony - 50.0) / 50.0;
    let stretched_intensity = 100.0 * (intensity / 60.0).tanh();
    let raw = 50.0 + (stretched_intensity / 2.0) * harmony_coef;

    let deviation = raw - 50.0;
    let mut unified = 50.0 + 50.0 * (deviation / 25.0).tanh();

    let proximity = 1.0 - (unified - 50.0).abs() / 50.0;
    unified += dither * proximity.max(0.0);

    (round1(unified)).clamp(0.0, 100.0)
}

/// Round to one decimal, half away from zero.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
