//! Output contract: per-meter readings, group rollups and writing guidance.

use serde::{Deserialize, Serialize};

use crate::types::{AspectKind, Body, NatalPoint};

/// The seventeen meter identifiers, in fixed output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterId {
    Clarity,
    Focus,
    Voice,
    Strategy,
    Outlook,
    Connections,
    Vulnerability,
    Battery,
    Strength,
    Drive,
    Recovery,
    GutCheck,
    Vision,
    Timing,
    Ambition,
    Grind,
    Evolution,
}

impl MeterId {
    pub const COUNT: usize = 17;

    pub const ALL: [MeterId; MeterId::COUNT] = [
        MeterId::Clarity,
        MeterId::Focus,
        MeterId::Voice,
        MeterId::Strategy,
        MeterId::Outlook,
        MeterId::Connections,
        MeterId::Vulnerability,
        MeterId::Battery,
        MeterId::Strength,
        MeterId::Drive,
        MeterId::Recovery,
        MeterId::GutCheck,
        MeterId::Vision,
        MeterId::Timing,
        MeterId::Ambition,
        MeterId::Grind,
        MeterId::Evolution,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn id(self) -> &'static str {
        match self {
            MeterId::Clarity => "clarity",
            MeterId::Focus => "focus",
            MeterId::Voice => "voice",
            MeterId::Strategy => "strategy",
            MeterId::Outlook => "outlook",
            MeterId::Connections => "connections",
            MeterId::Vulnerability => "vulnerability",
            MeterId::Battery => "battery",
            MeterId::Strength => "strength",
            MeterId::Drive => "drive",
            MeterId::Recovery => "recovery",
            MeterId::GutCheck => "gut_check",
            MeterId::Vision => "vision",
            MeterId::Timing => "timing",
            MeterId::Ambition => "ambition",
            MeterId::Grind => "grind",
            MeterId::Evolution => "evolution",
        }
    }
}

/// The five meter groups, in fixed output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupId {
    Mind,
    Heart,
    Body,
    Instincts,
    Growth,
}

impl GroupId {
    pub const COUNT: usize = 5;

    pub const ALL: [GroupId; GroupId::COUNT] = [
        GroupId::Mind,
        GroupId::Heart,
        GroupId::Body,
        GroupId::Instincts,
        GroupId::Growth,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn id(self) -> &'static str {
        match self {
            GroupId::Mind => "mind",
            GroupId::Heart => "heart",
            GroupId::Body => "body",
            GroupId::Instincts => "instincts",
            GroupId::Growth => "growth",
        }
    }

    /// Deterministic tie-break priority for strongest/weakest selection:
    /// heart > mind > body > instincts > growth. Lower rank wins ties.
    pub fn tiebreak_rank(self) -> usize {
        match self {
            GroupId::Heart => 0,
            GroupId::Mind => 1,
            GroupId::Body => 2,
            GroupId::Instincts => 3,
            GroupId::Growth => 4,
        }
    }
}

/// Descriptor of the single strongest aspect behind a meter reading,
/// by absolute signed contribution (weightage × power × quality).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriverAspect {
    pub transit: Body,
    pub natal: NatalPoint,
    pub kind: AspectKind,
    pub orb: f64,
    pub retrograde: bool,
    /// Signed contribution of this aspect.
    pub score: f64,
}

/// Output for one meter on one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    pub id: MeterId,
    pub group: GroupId,
    /// How much activity is present, 0..=100.
    pub intensity: u8,
    /// Quality of the activity, 0..=100, 50 neutral.
    pub harmony: u8,
    /// Composite 0..=100 score, rounded to one decimal; 50 is neutral.
    pub unified: f64,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<DriverAspect>,
}

/// Rollup for one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupReading {
    pub id: GroupId,
    pub unified: f64,
    pub label: String,
}

/// Overall-day classification consumed by narrative generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPattern {
    AllFlowing,
    AllChallenging,
    OneShining,
    OneChallenging,
    MixedDay,
    NeutralDay,
}

/// Writing-guidance block: the day pattern plus which groups carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingGuidance {
    pub pattern: DayPattern,
    pub strongest_group: GroupId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenging_group: Option<GroupId>,
    pub strong_groups: Vec<GroupId>,
    pub challenging_groups: Vec<GroupId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallReading {
    pub intensity: u8,
    pub harmony: u8,
    pub unified: f64,
    pub label: String,
    pub pattern: WritingGuidance,
}

/// The full engine output for one (chart, instant) request.
///
/// `groups` always holds five entries in `GroupId::ALL` order and `meters`
/// seventeen entries in `MeterId::ALL` order; every numeric field is bounded
/// and the whole structure is JSON-serializable without loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstrometersReading {
    pub overall: OverallReading,
    pub groups: Vec<GroupReading>,
    pub meters: Vec<MeterReading>,
}
