//! Deterministic per-(chart, date, meter) dither.
//!
//! The generator is pinned to SplitMix64 and the seed to an XOR of three
//! 64-bit values, so any implementation of this pipeline, in any language,
//! reproduces the identical perturbation. A fresh generator is built per
//! call and never shared.

use chrono::NaiveDate;

use astrometers_core::MeterId;

/// SplitMix64. Reference outputs from seed 0:
/// 0xE220A8397B1DCDAF, 0x6E789E6AA1B965F4, 0x06C45D188009454F.
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        SplitMix64 { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1) from the top 53 bits.
    pub fn next_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

/// FNV-1a 64 over the identifier bytes.
pub fn stable_id_hash(id: &str) -> u64 {
    let mut hash: u64 = 0xCBF2_9CE4_8422_2325;
    for byte in id.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
    }
    hash
}

/// Day count since 1970-01-01 of the UTC calendar date, two's-complement
/// into u64 so pre-epoch dates stay deterministic.
pub fn date_ordinal(date: NaiveDate) -> u64 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch date");
    date.signed_duration_since(epoch).num_days() as u64
}

/// The dither value for one (chart, date, meter) triple, in [-span, +span].
pub fn dither_for(chart_hash: u64, date: NaiveDate, meter: MeterId, span: f64) -> f64 {
    let seed = chart_hash ^ date_ordinal(date) ^ stable_id_hash(meter.id());
    let mut rng = SplitMix64::new(seed);
    -span + 2.0 * span * rng.next_unit()
}
