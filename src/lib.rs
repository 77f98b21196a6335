//! Astrometers - deterministic transit-scoring engine
//!
//! This facade re-exports the platform crates: core types and the
//! ephemeris boundary (`astrometers-core`), the scoring pipeline
//! (`engine-meters`) and the offline calibration harness
//! (`astrometers-calibration`).
//!
//! The serving path is a pure pipeline: the ephemeris adapter yields the
//! transit-to-natal aspect list, each of the seventeen meters filters it,
//! aggregates weightage × power (× quality) into raw DTI/HQS, normalizes
//! against its calibrated percentile tables, applies ballast and the
//! deterministic near-neutral dither, and composes the 0..100 unified
//! score. Group rollups, labels and the writing-guidance pattern sit on
//! top. Same chart, same instant, same tables: same bytes out.

pub use astrometers_core::{
    AspectKind, AstroError, AstrometersReading, Body, DayPattern, DriverAspect, EphemerisSource,
    FixedEphemeris, GroupId, GroupReading, MeterId, MeterReading, NatalChart, NatalPoint,
    NullEphemeris, OverallReading, PointPlacement, Sign, SyntheticEphemeris, TransitAspect,
    WritingGuidance,
};

pub use engine_meters::{
    Astrometers, EngineConstants, EvaluateOptions, MeterConfig, MeterFilter, MeterRegistry,
    PercentileTable,
};

pub use astrometers_calibration as calibration;
