//! Astrometers Core — shared types for the Astrometers scoring platform.
//!
//! This crate carries the vocabulary every other crate speaks: bodies,
//! signs and aspects, the natal chart container with its stable hash, the
//! reading/output contract, the unified error type, and the async boundary
//! to the opaque ephemeris collaborator.

pub mod chart;
pub mod ephemeris;
pub mod error;
pub mod reading;
pub mod synthetic;
pub mod types;

pub use chart::{NatalChart, PointPlacement};
pub use ephemeris::{EphemerisSource, FixedEphemeris, NullEphemeris};
pub use error::AstroError;
pub use reading::{
    AstrometersReading, DayPattern, DriverAspect, GroupId, GroupReading, MeterId, MeterReading,
    OverallReading, WritingGuidance,
};
pub use synthetic::SyntheticEphemeris;
pub use types::{AspectKind, Body, NatalPoint, Sign, TransitAspect};
