//! Qualitative labels from unified-score bands.

use astrometers_core::GroupId;

/// Band edges: [0, 35), [35, 50), [50, 70), [70, 100].
fn bucket(unified: f64) -> usize {
    if unified < 35.0 {
        0
    } else if unified < 50.0 {
        1
    } else if unified < 70.0 {
        2
    } else {
        3
    }
}

const MIND_LABELS: [&str; 4] = ["Overloaded", "Hazy", "Clear", "Sharp"];
const HEART_LABELS: [&str; 4] = ["Heavy", "Raw", "Steady", "Open"];
const BODY_LABELS: [&str; 4] = ["Empty", "Lagging", "Ready", "Charged"];
const INSTINCTS_LABELS: [&str; 4] = ["Silent", "Doubting", "Trusting", "On Point"];
const GROWTH_LABELS: [&str; 4] = ["Uphill", "Pacing", "Climbing", "Unstoppable"];
const OVERALL_LABELS: [&str; 4] = ["Challenging", "Turbulent", "Peaceful", "Flowing"];

/// Label for a meter or group reading, from its parent group's table.
pub fn group_label(group: GroupId, unified: f64) -> &'static str {
    let table = match group {
        GroupId::Mind => &MIND_LABELS,
        GroupId::Heart => &HEART_LABELS,
        GroupId::Body => &BODY_LABELS,
        GroupId::Instincts => &INSTINCTS_LABELS,
        GroupId::Growth => &GROWTH_LABELS,
    };
    table[bucket(unified)]
}

/// Label for the overall reading.
pub fn overall_label(unified: f64) -> &'static str {
    OVERALL_LABELS[bucket(unified)]
}
