//! Group rollups, the overall reading and writing guidance.

use astrometers_core::{
    AstrometersReading, DayPattern, GroupId, GroupReading, MeterReading, OverallReading,
    WritingGuidance,
};

use crate::labels::{group_label, overall_label};
use crate::unified::round1;

const STRONG_THRESHOLD: f64 = 60.0;
const CHALLENGING_THRESHOLD: f64 = 40.0;

/// Roll seventeen meter readings up into groups, the overall reading and
/// the writing-guidance pattern.
pub fn compose(meters: Vec<MeterReading>) -> AstrometersReading {
    let groups: Vec<GroupReading> = GroupId::ALL
        .iter()
        .map(|&group| {
            let members: Vec<&MeterReading> =
                meters.iter().filter(|m| m.group == group).collect();
            let unified = round1(
                members.iter().map(|m| m.unified).sum::<f64>() / members.len() as f64,
            );
            GroupReading {
                id: group,
                unified,
                label: group_label(group, unified).to_string(),
            }
        })
        .collect();

    let overall_unified = round1(
        groups.iter().map(|g| g.unified).sum::<f64>() / groups.len() as f64,
    );
    let overall_intensity = (meters.iter().map(|m| m.intensity as f64).sum::<f64>()
        / meters.len() as f64)
        .round() as u8;
    let overall_harmony = (meters.iter().map(|m| m.harmony as f64).sum::<f64>()
        / meters.len() as f64)
        .round() as u8;

    let pattern = classify(&groups);

    AstrometersReading {
        overall: OverallReading {
            intensity: overall_intensity,
            harmony: overall_harmony,
            unified: overall_unified,
            label: overall_label(overall_unified).to_string(),
            pattern,
        },
        groups,
        meters,
    }
}

/// Classify the day over the five group scores.
///
/// Rules are checked in a fixed order; a 5-tuple matching none of the
/// explicit shapes classifies as a neutral day. Strongest/weakest
/// selection breaks ties with the group priority order.
pub fn classify(groups: &[GroupReading]) -> WritingGuidance {
    let strong_groups: Vec<GroupId> = groups
        .iter()
        .filter(|g| g.unified >= STRONG_THRESHOLD)
        .map(|g| g.id)
        .collect();
    let challenging_groups: Vec<GroupId> = groups
        .iter()
        .filter(|g| g.unified < CHALLENGING_THRESHOLD)
        .map(|g| g.id)
        .collect();

    let strong = strong_groups.len();
    let challenging = challenging_groups.len();
    let others_below_fifty = groups
        .iter()
        .filter(|g| g.unified < STRONG_THRESHOLD)
        .all(|g| g.unified < 50.0);
    let others_at_least_fifty = groups
        .iter()
        .filter(|g| g.unified >= CHALLENGING_THRESHOLD)
        .all(|g| g.unified >= 50.0);

    let pattern = if strong == groups.len() {
        DayPattern::AllFlowing
    } else if challenging == groups.len() {
        DayPattern::AllChallenging
    } else if strong == 1 && others_below_fifty {
        DayPattern::OneShining
    } else if challenging == 1 && others_at_least_fifty {
        DayPattern::OneChallenging
    } else if strong >= 1 && challenging >= 1 {
        DayPattern::MixedDay
    } else {
        DayPattern::NeutralDay
    };

    let strongest_group = groups
        .iter()
        .max_by(|a, b| {
            a.unified
                .partial_cmp(&b.unified)
                .expect("unified scores are finite")
                // On equal scores the higher-priority (lower-rank) group wins.
                .then(b.id.tiebreak_rank().cmp(&a.id.tiebreak_rank()))
        })
        .expect("five groups present")
        .id;

    let challenging_group = groups
        .iter()
        .filter(|g| g.unified < CHALLENGING_THRESHOLD)
        .min_by(|a, b| {
            a.unified
                .partial_cmp(&b.unified)
                .expect("unified scores are finite")
                .then(a.id.tiebreak_rank().cmp(&b.id.tiebreak_rank()))
        })
        .map(|g| g.id);

    WritingGuidance {
        pattern,
        strongest_group,
        challenging_group,
        strong_groups,
        challenging_groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrometers_core::MeterId;

    fn group_reading(id: GroupId, unified: f64) -> GroupReading {
        GroupReading {
            id,
            unified,
            label: group_label(id, unified).to_string(),
        }
    }

    fn groups(scores: [f64; 5]) -> Vec<GroupReading> {
        GroupId::ALL
            .iter()
            .zip(scores)
            .map(|(&id, s)| group_reading(id, s))
            .collect()
    }

    #[test]
    fn test_all_flowing() {
        let guidance = classify(&groups([65.0, 70.0, 62.0, 61.0, 80.0]));
        assert_eq!(guidance.pattern, DayPattern::AllFlowing);
        assert_eq!(guidance.strongest_group, GroupId::Growth);
        assert_eq!(guidance.strong_groups.len(), 5);
        assert!(guidance.challenging_group.is_none());
    }

    #[test]
    fn test_all_challenging() {
        let guidance = classify(&groups([20.0, 35.0, 30.0, 25.0, 39.0]));
        assert_eq!(guidance.pattern, DayPattern::AllChallenging);
        assert_eq!(guidance.challenging_group, Some(GroupId::Mind));
    }

    #[test]
    fn test_one_shining() {
        let guidance = classify(&groups([72.0, 45.0, 48.0, 42.0, 44.0]));
        assert_eq!(guidance.pattern, DayPattern::OneShining);
        assert_eq!(guidance.strongest_group, GroupId::Mind);
    }

    #[test]
    fn test_one_challenging() {
        let guidance = classify(&groups([55.0, 52.0, 35.0, 50.0, 58.0]));
        assert_eq!(guidance.pattern, DayPattern::OneChallenging);
        assert_eq!(guidance.challenging_group, Some(GroupId::Body));
    }

    #[test]
    fn test_mixed_day() {
        let guidance = classify(&groups([72.0, 30.0, 55.0, 50.0, 45.0]));
        assert_eq!(guidance.pattern, DayPattern::MixedDay);
        assert_eq!(guidance.strongest_group, GroupId::Mind);
        assert_eq!(guidance.challenging_group, Some(GroupId::Heart));
    }

    #[test]
    fn test_neutral_day() {
        let guidance = classify(&groups([50.0, 45.0, 55.0, 48.0, 59.9]));
        assert_eq!(guidance.pattern, DayPattern::NeutralDay);
        assert!(guidance.strong_groups.is_empty());
        assert!(guidance.challenging_groups.is_empty());
    }

    #[test]
    fn test_uncovered_shape_falls_back_to_neutral() {
        // Two strong groups, nothing challenging, another group at 55:
        // matches no explicit rule.
        let guidance = classify(&groups([65.0, 62.0, 55.0, 45.0, 41.0]));
        assert_eq!(guidance.pattern, DayPattern::NeutralDay);
        assert_eq!(guidance.strong_groups.len(), 2);
    }

    #[test]
    fn test_one_shining_requires_others_below_fifty() {
        // One strong group but a sibling at 55 breaks the shape.
        let guidance = classify(&groups([72.0, 55.0, 48.0, 42.0, 44.0]));
        assert_eq!(guidance.pattern, DayPattern::NeutralDay);
    }

    #[test]
    fn test_strongest_tiebreak_prefers_heart() {
        let guidance = classify(&groups([70.0, 70.0, 70.0, 50.0, 50.0]));
        assert_eq!(guidance.strongest_group, GroupId::Heart);
    }

    #[test]
    fn test_weakest_tiebreak_prefers_heart() {
        let guidance = classify(&groups([30.0, 30.0, 30.0, 55.0, 55.0]));
        assert_eq!(guidance.challenging_group, Some(GroupId::Heart));
    }

    #[test]
    fn test_compose_orders_and_averages() {
        // One meter per group except mind, which gets two.
        let meters = vec![
            meter(MeterId::Clarity, GroupId::Mind, 60.0),
            meter(MeterId::Focus, GroupId::Mind, 70.0),
            meter(MeterId::Connections, GroupId::Heart, 80.0),
            meter(MeterId::Battery, GroupId::Body, 50.0),
            meter(MeterId::GutCheck, GroupId::Instincts, 40.0),
            meter(MeterId::Grind, GroupId::Growth, 30.0),
        ];
        let reading = compose(meters);
        assert_eq!(reading.groups.len(), 5);
        assert_eq!(reading.groups[0].id, GroupId::Mind);
        assert_eq!(reading.groups[0].unified, 65.0);
        assert_eq!(reading.groups[1].unified, 80.0);
        // Overall is the mean of the five group scores.
        assert_eq!(reading.overall.unified, round1((65.0 + 80.0 + 50.0 + 40.0 + 30.0) / 5.0));
    }

    fn meter(id: MeterId, group: GroupId, unified: f64) -> MeterReading {
        MeterReading {
            id,
            group,
            intensity: 50,
            harmony: 50,
            unified,
            label: group_label(group, unified).to_string(),
            driver: None,
        }
    }
}
