//! Engine constants and lookup tables.
//!
//! Every table is stored as a dense array indexed by the enum's `index()`,
//! so the hot path never does a string or map lookup. The tables can be
//! loaded from the single JSON constants file or taken from the frozen
//! defaults; a unit test pins the shipped file to the defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use astrometers_core::{AspectKind, AstroError, Body, NatalPoint, Sign};

/// Coarse time-scale class of a transit body, setting its decay window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Trigger,
    Event,
    Season,
    Era,
}

/// All tuning constants of the scoring pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConstants {
    planet_base: [f64; NatalPoint::COUNT],
    domicile: [Vec<Sign>; Body::COUNT],
    exaltation: [Option<Sign>; Body::COUNT],
    dignity_bonus: f64,
    ruler_bonus: f64,
    house_multipliers: [f64; 3],
    tier_window_days: [f64; Body::COUNT],
    tier_weight: [f64; Body::COUNT],
    aspect_modifier: [f64; AspectKind::COUNT],
    quality_base: [f64; AspectKind::COUNT],
    benefic: [bool; Body::COUNT],
    malefic: [bool; Body::COUNT],
    sensitivity: f64,
    sigma_divisor: f64,
    speed_floor: f64,
    dither_span: f64,
}

impl EngineConstants {
    pub fn planet_base(&self, point: NatalPoint) -> f64 {
        self.planet_base[point.index()]
    }

    /// Dignity contribution of a body in a sign: +bonus for domicile or
    /// exaltation, −bonus for detriment or fall (the opposite signs),
    /// 0 otherwise. Angles carry no dignity.
    pub fn dignity_bonus(&self, body: Body, sign: Sign) -> f64 {
        let domicile = &self.domicile[body.index()];
        let exaltation = self.exaltation[body.index()];
        if domicile.contains(&sign) || exaltation == Some(sign) {
            return self.dignity_bonus;
        }
        let detriment = domicile.iter().any(|d| d.opposite() == sign);
        let fall = exaltation.map(|e| e.opposite() == sign).unwrap_or(false);
        if detriment || fall {
            return -self.dignity_bonus;
        }
        0.0
    }

    pub fn ruler_bonus(&self) -> f64 {
        self.ruler_bonus
    }

    /// Angular houses 1/4/7/10, succedent 2/5/8/11, cadent 3/6/9/12.
    pub fn house_multiplier(&self, house: u8) -> f64 {
        match house {
            1 | 4 | 7 | 10 => self.house_multipliers[0],
            2 | 5 | 8 | 11 => self.house_multipliers[1],
            _ => self.house_multipliers[2],
        }
    }

    pub fn tier_window_days(&self, body: Body) -> f64 {
        self.tier_window_days[body.index()]
    }

    pub fn tier_weight(&self, body: Body) -> f64 {
        self.tier_weight[body.index()]
    }

    pub fn aspect_modifier(&self, kind: AspectKind) -> f64 {
        self.aspect_modifier[kind.index()]
    }

    pub fn quality_base(&self, kind: AspectKind) -> f64 {
        self.quality_base[kind.index()]
    }

    pub fn is_benefic(&self, body: Body) -> bool {
        self.benefic[body.index()]
    }

    pub fn is_malefic(&self, body: Body) -> bool {
        self.malefic[body.index()]
    }

    pub fn sensitivity(&self) -> f64 {
        self.sensitivity
    }

    pub fn sigma_divisor(&self) -> f64 {
        self.sigma_divisor
    }

    pub fn speed_floor(&self) -> f64 {
        self.speed_floor
    }

    pub fn dither_span(&self) -> f64 {
        self.dither_span
    }

    /// Load from the JSON constants file format.
    pub fn from_json_str(json: &str) -> Result<EngineConstants, AstroError> {
        let raw: RawConstants = serde_json::from_str(json)
            .map_err(|e| AstroError::ConfigError(format!("constants file: {}", e)))?;
        raw.build()
    }
}

impl Default for EngineConstants {
    fn default() -> Self {
        RawConstants::default()
            .build()
            .expect("default constants are valid")
    }
}

// ---------------------------------------------------------------------------
// Raw (on-disk) form
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct RawDignity {
    bonus: f64,
    domicile: BTreeMap<Body, Vec<Sign>>,
    exaltation: BTreeMap<Body, Sign>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawHouseMultipliers {
    angular: f64,
    succedent: f64,
    cadent: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct RawConstants {
    planet_base: BTreeMap<NatalPoint, f64>,
    dignity: RawDignity,
    ruler_bonus: f64,
    house_multipliers: RawHouseMultipliers,
    tier_windows: BTreeMap<Tier, f64>,
    tiers: BTreeMap<Body, Tier>,
    tier_weight: BTreeMap<Body, f64>,
    aspect_modifier: BTreeMap<AspectKind, f64>,
    quality_base: BTreeMap<AspectKind, f64>,
    benefics: Vec<Body>,
    malefics: Vec<Body>,
    sensitivity: f64,
    sigma_divisor: f64,
    speed_floor: f64,
    dither_span: f64,
}

impl RawConstants {
    fn build(self) -> Result<EngineConstants, AstroError> {
        let mut planet_base = [0.0; NatalPoint::COUNT];
        for point in NatalPoint::ALL {
            planet_base[point.index()] = *self.planet_base.get(&point).ok_or_else(|| {
                AstroError::ConfigError(format!("planet_base missing '{}'", point.id()))
            })?;
        }

        let mut tier_window_days = [0.0; Body::COUNT];
        let mut tier_weight = [0.0; Body::COUNT];
        for body in Body::ALL {
            let tier = self.tiers.get(&body).ok_or_else(|| {
                AstroError::ConfigError(format!("tiers missing '{}'", body.id()))
            })?;
            let window = *self.tier_windows.get(tier).ok_or_else(|| {
                AstroError::ConfigError(format!("tier_windows missing '{:?}'", tier))
            })?;
            if window <= 0.0 {
                return Err(AstroError::ConfigError(format!(
                    "tier window for '{}' must be positive",
                    body.id()
                )));
            }
            tier_window_days[body.index()] = window;

            let weight = *self.tier_weight.get(&body).ok_or_else(|| {
                AstroError::ConfigError(format!("tier_weight missing '{}'", body.id()))
            })?;
            if !(0.0..=1.0).contains(&weight) {
                return Err(AstroError::ConfigError(format!(
                    "tier_weight for '{}' outside [0, 1]",
                    body.id()
                )));
            }
            tier_weight[body.index()] = weight;
        }

        let mut aspect_modifier = [0.0; AspectKind::COUNT];
        let mut quality_base = [0.0; AspectKind::COUNT];
        for kind in AspectKind::ALL {
            aspect_modifier[kind.index()] = *self.aspect_modifier.get(&kind).ok_or_else(|| {
                AstroError::ConfigError(format!("aspect_modifier missing '{}'", kind.id()))
            })?;
            quality_base[kind.index()] = *self.quality_base.get(&kind).ok_or_else(|| {
                AstroError::ConfigError(format!("quality_base missing '{}'", kind.id()))
            })?;
        }

        const EMPTY: Vec<Sign> = Vec::new();
        let mut domicile: [Vec<Sign>; Body::COUNT] = [EMPTY; Body::COUNT];
        for (body, signs) in self.dignity.domicile {
            domicile[body.index()] = signs;
        }
        let mut exaltation: [Option<Sign>; Body::COUNT] = [None; Body::COUNT];
        for (body, sign) in self.dignity.exaltation {
            exaltation[body.index()] = Some(sign);
        }

        let mut benefic = [false; Body::COUNT];
        for body in &self.benefics {
            benefic[body.index()] = true;
        }
        let mut malefic = [false; Body::COUNT];
        for body in &self.malefics {
            malefic[body.index()] = true;
        }

        if self.sigma_divisor <= 0.0 {
            return Err(AstroError::ConfigError("sigma_divisor must be positive".into()));
        }
        if self.speed_floor <= 0.0 {
            return Err(AstroError::ConfigError("speed_floor must be positive".into()));
        }
        if self.dither_span < 0.0 {
            return Err(AstroError::ConfigError("dither_span must be non-negative".into()));
        }

        Ok(EngineConstants {
            planet_base,
            domicile,
            exaltation,
            dignity_bonus: self.dignity.bonus,
            ruler_bonus: self.ruler_bonus,
            house_multipliers: [
                self.house_multipliers.angular,
                self.house_multipliers.succedent,
                self.house_multipliers.cadent,
            ],
            tier_window_days,
            tier_weight,
            aspect_modifier,
            quality_base,
            benefic,
            malefic,
            sensitivity: self.sensitivity,
            sigma_divisor: self.sigma_divisor,
            speed_floor: self.speed_floor,
            dither_span: self.dither_span,
        })
    }
}

impl Default for RawConstants {
    fn default() -> Self {
        use AspectKind::*;
        use Body::*;

        let planet_base = [
            (NatalPoint::Sun, 10.0),
            (NatalPoint::Moon, 10.0),
            (NatalPoint::Mercury, 7.0),
            (NatalPoint::Venus, 7.0),
            (NatalPoint::Mars, 7.0),
            (NatalPoint::Jupiter, 5.0),
            (NatalPoint::Saturn, 5.0),
            (NatalPoint::Uranus, 3.0),
            (NatalPoint::Neptune, 3.0),
            (NatalPoint::Pluto, 3.0),
            (NatalPoint::NorthNode, 3.0),
            (NatalPoint::Asc, 8.0),
            (NatalPoint::Ic, 6.0),
            (NatalPoint::Dsc, 6.0),
            (NatalPoint::Mc, 8.0),
        ]
        .into_iter()
        .collect();

        let domicile = [
            (Sun, vec![Sign::Leo]),
            (Moon, vec![Sign::Cancer]),
            (Mercury, vec![Sign::Gemini, Sign::Virgo]),
            (Venus, vec![Sign::Taurus, Sign::Libra]),
            (Mars, vec![Sign::Aries]),
            (Jupiter, vec![Sign::Sagittarius]),
            (Saturn, vec![Sign::Capricorn]),
            (Uranus, vec![Sign::Aquarius]),
            (Neptune, vec![Sign::Pisces]),
            (Pluto, vec![Sign::Scorpio]),
        ]
        .into_iter()
        .collect();

        let exaltation = [
            (Sun, Sign::Aries),
            (Moon, Sign::Taurus),
            (Mercury, Sign::Virgo),
            (Venus, Sign::Pisces),
            (Mars, Sign::Capricorn),
            (Jupiter, Sign::Cancer),
            (Saturn, Sign::Libra),
        ]
        .into_iter()
        .collect();

        let tiers = [
            (Sun, Tier::Event),
            (Moon, Tier::Trigger),
            (Mercury, Tier::Event),
            (Venus, Tier::Event),
            (Mars, Tier::Event),
            (Jupiter, Tier::Season),
            (Saturn, Tier::Season),
            (Uranus, Tier::Era),
            (Neptune, Tier::Era),
            (Pluto, Tier::Era),
            (NorthNode, Tier::Era),
        ]
        .into_iter()
        .collect();

        let tier_windows = [
            (Tier::Trigger, 1.0),
            (Tier::Event, 4.0),
            (Tier::Season, 45.0),
            (Tier::Era, 100.0),
        ]
        .into_iter()
        .collect();

        let tier_weight = [
            (Sun, 0.60),
            (Moon, 0.35),
            (Mercury, 0.50),
            (Venus, 0.55),
            (Mars, 0.65),
            (Jupiter, 0.80),
            (Saturn, 0.85),
            (Uranus, 0.90),
            (Neptune, 0.90),
            (Pluto, 1.00),
            (NorthNode, 0.70),
        ]
        .into_iter()
        .collect();

        let aspect_modifier = [
            (Conjunction, 1.0),
            (Sextile, 0.6),
            (Square, 0.85),
            (Trine, 0.8),
            (Opposition, 0.9),
            (Quincunx, 0.45),
        ]
        .into_iter()
        .collect();

        let quality_base = [
            (Conjunction, 0.0),
            (Sextile, 1.0),
            (Square, -1.0),
            (Trine, 1.0),
            (Opposition, -1.0),
            (Quincunx, -0.5),
        ]
        .into_iter()
        .collect();

        RawConstants {
            planet_base,
            dignity: RawDignity {
                bonus: 2.0,
                domicile,
                exaltation,
            },
            ruler_bonus: 3.0,
            house_multipliers: RawHouseMultipliers {
                angular: 3.0,
                succedent: 2.0,
                cadent: 1.0,
            },
            tier_windows,
            tiers,
            tier_weight,
            aspect_modifier,
            quality_base,
            benefics: vec![Venus, Jupiter],
            malefics: vec![Mars, Saturn],
            sensitivity: 1.0,
            sigma_divisor: 9.0,
            speed_floor: 0.01,
            dither_span: 8.0,
        }
    }
}

/// The shipped constants file.
pub const BUILTIN_CONSTANTS_JSON: &str = include_str!("../config/constants.json");
