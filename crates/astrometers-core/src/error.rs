//! Unified error type for the Astrometers platform.

/// Main error type for the engine, the calibration harness and the loaders.
///
/// Failures are structured (kind + message + offending field) and never
/// embed untrusted input data. Missing calibration is fatal at startup;
/// the only local recovery anywhere in the pipeline is dropping a single
/// malformed aspect, which is a warning, not an error.
#[derive(Debug, thiserror::Error)]
pub enum AstroError {
    #[error("invalid natal chart: {0}")]
    InvalidChart(String),

    #[error("ephemeris unavailable: {0}")]
    EphemerisUnavailable(String),

    #[error("calibration missing for meter '{meter}': {reason}")]
    CalibrationMissing { meter: String, reason: String },

    #[error("value out of range in field '{field}': {message}")]
    OutOfRange { field: &'static str, message: String },

    #[error("deadline exceeded before meter '{meter}' was scored")]
    Cancelled { meter: String },

    #[error("configuration error: {0}")]
    ConfigError(String),
}
