//! Meters Engine — the Astrometers scoring pipeline.
//!
//! Turns a natal chart plus the current transit-to-natal aspect list into
//! seventeen bounded, calibrated meter readings: per-aspect power,
//! weightage and quality feed the DTI/HQS sums of each meter's filtered
//! subset, which normalize against historical percentile tables, take a
//! deterministic dither near neutral, and compose into the 0..100 unified
//! score with its label, group rollups and writing guidance.

pub mod aggregate;
pub mod constants;
pub mod dither;
pub mod engine;
pub mod filter;
pub mod hierarchy;
pub mod labels;
pub mod meter;
pub mod normalize;
pub mod power;
pub mod quality;
pub mod unified;
pub mod weightage;

pub use aggregate::{aggregate, filtered_aggregate, score_aspects, Aggregate, AspectScore};
pub use constants::{EngineConstants, Tier, BUILTIN_CONSTANTS_JSON};
pub use dither::{dither_for, stable_id_hash, SplitMix64};
pub use engine::{Astrometers, EvaluateOptions};
pub use filter::{FilterSet, MeterFilter};
pub use hierarchy::{classify, compose};
pub use labels::{group_label, overall_label};
pub use meter::{MeterConfig, MeterDef, MeterRegistry};
pub use normalize::{normalize, NormalizedScores, PercentileTable};
pub use power::transit_power;
pub use quality::quality_factor;
pub use unified::{round1, unified_score};
pub use weightage::weightage;
