//! Per-meter configuration and the serving registry.
//!
//! All seventeen filter specifications live in data files, not in code;
//! adding or retuning a meter is a config change plus a calibration rerun.
//! The registry is fail-closed: a meter without usable percentile tables
//! refuses to load.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use astrometers_core::{AstroError, GroupId, MeterId};

use crate::filter::MeterFilter;
use crate::normalize::PercentileTable;

/// On-disk shape of one meter's configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterConfig {
    pub id: MeterId,
    pub group: GroupId,
    pub filter: MeterFilter,
    /// Additive denominator term against harmony extremes on quiet days.
    pub ballast: f64,
    /// Historical raw DTI samples, sorted ascending. Empty until calibrated.
    #[serde(default)]
    pub dti_samples: Vec<f64>,
    /// Historical raw HQS samples, sorted ascending. Empty until calibrated.
    #[serde(default)]
    pub hqs_samples: Vec<f64>,
}

impl MeterConfig {
    pub fn from_json_str(json: &str) -> Result<MeterConfig, AstroError> {
        serde_json::from_str(json)
            .map_err(|e| AstroError::ConfigError(format!("meter file: {}", e)))
    }

    /// The shipped filter definitions (uncalibrated templates: the
    /// percentile tables are empty until the calibration harness fills
    /// them). Returned in `MeterId::ALL` order.
    pub fn builtin() -> Vec<MeterConfig> {
        BUILTIN_METER_JSON
            .iter()
            .map(|json| MeterConfig::from_json_str(json).expect("builtin meter config is valid"))
            .collect()
    }
}

/// In `MeterId::ALL` order.
const BUILTIN_METER_JSON: [&str; MeterId::COUNT] = [
    include_str!("../config/meters/clarity.json"),
    include_str!("../config/meters/focus.json"),
    include_str!("../config/meters/voice.json"),
    include_str!("../config/meters/strategy.json"),
    include_str!("../config/meters/outlook.json"),
    include_str!("../config/meters/connections.json"),
    include_str!("../config/meters/vulnerability.json"),
    include_str!("../config/meters/battery.json"),
    include_str!("../config/meters/strength.json"),
    include_str!("../config/meters/drive.json"),
    include_str!("../config/meters/recovery.json"),
    include_str!("../config/meters/gut_check.json"),
    include_str!("../config/meters/vision.json"),
    include_str!("../config/meters/timing.json"),
    include_str!("../config/meters/ambition.json"),
    include_str!("../config/meters/grind.json"),
    include_str!("../config/meters/evolution.json"),
];

/// Validated runtime form of one meter.
#[derive(Debug, Clone)]
pub struct MeterDef {
    pub id: MeterId,
    pub group: GroupId,
    pub filter: MeterFilter,
    pub ballast: f64,
    pub dti_table: PercentileTable,
    pub hqs_table: PercentileTable,
}

/// The serving registry: all seventeen meters, calibrated, read-only.
#[derive(Debug, Clone)]
pub struct MeterRegistry {
    meters: Vec<MeterDef>,
}

impl MeterRegistry {
    /// Build from configs, failing closed on anything unusable.
    pub fn from_configs(configs: Vec<MeterConfig>) -> Result<MeterRegistry, AstroError> {
        for meter in MeterId::ALL {
            let count = configs.iter().filter(|c| c.id == meter).count();
            if count != 1 {
                return Err(AstroError::ConfigError(format!(
                    "meter '{}' configured {} times, expected exactly 1",
                    meter.id(),
                    count
                )));
            }
        }

        let mut meters = Vec::with_capacity(MeterId::COUNT);
        for id in MeterId::ALL {
            let config = configs
                .iter()
                .find(|c| c.id == id)
                .expect("presence checked above")
                .clone();

            if !config.ballast.is_finite() || config.ballast <= 0.0 {
                return Err(AstroError::ConfigError(format!(
                    "meter '{}' ballast must be a positive number",
                    id.id()
                )));
            }
            if config.dti_samples.is_empty() || config.hqs_samples.is_empty() {
                return Err(AstroError::CalibrationMissing {
                    meter: id.id().to_string(),
                    reason: "empty percentile table (calibration has not been run)".into(),
                });
            }

            let dti_table =
                PercentileTable::new(config.dti_samples).map_err(|e| {
                    AstroError::CalibrationMissing {
                        meter: id.id().to_string(),
                        reason: e.to_string(),
                    }
                })?;
            let hqs_table =
                PercentileTable::new(config.hqs_samples).map_err(|e| {
                    AstroError::CalibrationMissing {
                        meter: id.id().to_string(),
                        reason: e.to_string(),
                    }
                })?;

            meters.push(MeterDef {
                id,
                group: config.group,
                filter: config.filter,
                ballast: config.ballast,
                dti_table,
                hqs_table,
            });
        }

        for group in GroupId::ALL {
            if !meters.iter().any(|m| m.group == group) {
                return Err(AstroError::ConfigError(format!(
                    "group '{}' has no meters",
                    group.id()
                )));
            }
        }

        Ok(MeterRegistry { meters })
    }

    /// Load every `*.json` file in a directory of calibrated meter files.
    pub fn from_dir(dir: &Path) -> Result<MeterRegistry, AstroError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| AstroError::ConfigError(format!("meter dir '{}': {}", dir.display(), e)))?;

        let mut configs = Vec::new();
        for entry in entries {
            let entry = entry
                .map_err(|e| AstroError::ConfigError(format!("meter dir entry: {}", e)))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let json = fs::read_to_string(&path).map_err(|e| {
                AstroError::ConfigError(format!("meter file '{}': {}", path.display(), e))
            })?;
            configs.push(MeterConfig::from_json_str(&json)?);
        }
        MeterRegistry::from_configs(configs)
    }

    /// All meters, in `MeterId::ALL` order.
    pub fn meters(&self) -> &[MeterDef] {
        &self.meters
    }

    pub fn get(&self, id: MeterId) -> &MeterDef {
        &self.meters[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Builtin configs with small ramp tables attached, for registry tests.
    fn calibrated_configs() -> Vec<MeterConfig> {
        MeterConfig::builtin()
            .into_iter()
            .map(|mut c| {
                c.dti_samples = (0..=20).map(|v| v as f64).collect();
                c.hqs_samples = (-20..=20).map(|v| v as f64).collect();
                c
            })
            .collect()
    }

    #[test]
    fn test_builtin_has_all_meters_in_order() {
        let configs = MeterConfig::builtin();
        assert_eq!(configs.len(), MeterId::COUNT);
        for (config, id) in configs.iter().zip(MeterId::ALL) {
            assert_eq!(config.id, id);
        }
    }

    #[test]
    fn test_builtin_group_sizes() {
        let configs = MeterConfig::builtin();
        let count = |g: GroupId| configs.iter().filter(|c| c.group == g).count();
        assert_eq!(count(GroupId::Mind), 4);
        assert_eq!(count(GroupId::Heart), 3);
        assert_eq!(count(GroupId::Body), 4);
        assert_eq!(count(GroupId::Instincts), 3);
        assert_eq!(count(GroupId::Growth), 3);
    }

    #[test]
    fn test_builtin_is_uncalibrated() {
        let err = MeterRegistry::from_configs(MeterConfig::builtin()).unwrap_err();
        assert!(matches!(err, AstroError::CalibrationMissing { .. }));
    }

    #[test]
    fn test_registry_builds_from_calibrated_configs() {
        let registry = MeterRegistry::from_configs(calibrated_configs()).unwrap();
        assert_eq!(registry.meters().len(), MeterId::COUNT);
        assert_eq!(registry.get(MeterId::Grind).id, MeterId::Grind);
    }

    #[test]
    fn test_duplicate_meter_rejected() {
        let mut configs = calibrated_configs();
        let duplicate = configs[0].clone();
        configs[1] = MeterConfig {
            id: duplicate.id,
            ..configs[1].clone()
        };
        let err = MeterRegistry::from_configs(configs).unwrap_err();
        assert!(matches!(err, AstroError::ConfigError(_)));
    }

    #[test]
    fn test_bad_ballast_rejected() {
        let mut configs = calibrated_configs();
        configs[3].ballast = 0.0;
        assert!(MeterRegistry::from_configs(configs).is_err());
    }

    #[test]
    fn test_unsorted_table_rejected() {
        let mut configs = calibrated_configs();
        configs[5].dti_samples.reverse();
        let err = MeterRegistry::from_configs(configs).unwrap_err();
        assert!(matches!(err, AstroError::CalibrationMissing { .. }));
    }

    #[test]
    fn test_round_trip_through_dir() {
        let dir = std::env::temp_dir().join(format!("meters-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        for config in calibrated_configs() {
            let path = dir.join(format!("{}.json", config.id.id()));
            fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
        }
        let registry = MeterRegistry::from_dir(&dir).unwrap();
        assert_eq!(registry.meters().len(), MeterId::COUNT);
        fs::remove_dir_all(&dir).unwrap();
    }
}
