// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod validator;

use crate::request::{AircraftModel, ApproachCategory, FlapSetting, LandingRequest, RunwayCode};
use crate::LandingError;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Per-unit correction coefficients for one configuration and runway code.
/// Units follow the grouping the engine applies: per 1000 kg, per 1000 ft,
/// per 5 °C, per 5 kt, per 1 % of slope, per inoperative reverser.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coefficients {
    pub weight_below: f64,
    pub weight_above: f64,
    pub altitude: f64,
    pub temp_below_isa: f64,
    pub temp_above_isa: f64,
    pub headwind: f64,
    pub tailwind: f64,
    pub uphill: f64,
    pub downhill: f64,
    pub vref_additive: f64,
    pub reverser_inop: f64,
}

/// One runway-code row as stored in the table file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayEntry {
    #[serde(rename = "ref_distance")]
    pub reference_distance: f64,
    /// `None` when the row has no coefficient set or an incomplete one.
    #[serde(
        rename = "corrections",
        default,
        deserialize_with = "lenient_coefficients",
        skip_serializing_if = "Option::is_none"
    )]
    pub coefficients: Option<Coefficients>,
}

/// An incomplete coefficient set disables its own row only; the rest of the
/// table stays usable.
fn lenient_coefficients<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Coefficients>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match serde_json::from_value::<Coefficients>(v) {
        Ok(coefficients) => Some(coefficients),
        Err(e) => {
            log::warn!("Ignoring unusable correction set: {}", e);
            None
        }
    }))
}

/// A configuration bucket: runway codes plus the configuration-wide
/// overweight coefficient.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigEntry {
    #[serde(default)]
    pub rwycc: BTreeMap<RunwayCode, RunwayEntry>,
    #[serde(
        rename = "overweight_correction",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub overweight_coefficient: Option<f64>,
}

/// Fully resolved lookup result: everything the accumulator needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseEntry {
    pub reference_distance: f64,
    pub coefficients: Coefficients,
    pub overweight_coefficient: Option<f64>,
}

/// The reference distance table, keyed by configuration key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigTable {
    entries: BTreeMap<String, ConfigEntry>,
}

impl ConfigTable {
    pub fn new(entries: BTreeMap<String, ConfigEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let table: ConfigTable =
            serde_json::from_str(content).context("Failed to parse landing distance table")?;
        log::debug!(
            "Loaded landing table: {} configurations, {} runway rows",
            table.len(),
            table.entries.values().map(|e| e.rwycc.len()).sum::<usize>()
        );
        Ok(table)
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading landing table from {:?}", path);
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read landing table {:?}", path))?;
        Self::from_json_str(&content).with_context(|| format!("Invalid landing table {:?}", path))
    }

    pub fn get(&self, key: &TableKey) -> Option<&ConfigEntry> {
        self.entries.get(key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Components of a configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyParts {
    pub aircraft_model: AircraftModel,
    pub reverser_installed: bool,
    pub approach_category: ApproachCategory,
    pub flap_setting: FlapSetting,
    pub icing: bool,
}

impl fmt::Display for KeyParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} reversers, {}, flaps {}, {} ice",
            self.aircraft_model,
            if self.reverser_installed { "with" } else { "without" },
            self.approach_category,
            self.flap_setting,
            if self.icing { "with" } else { "without" },
        )
    }
}

/// Configuration key, e.g. `EMB145_WITH_REVERSER_CAT1_FLAP_45_WITHOUT_ICE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableKey(String);

fn with_or_without(flag: bool) -> &'static str {
    if flag {
        "WITH"
    } else {
        "WITHOUT"
    }
}

fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"(?i)^([A-Z0-9]+)_(WITH|WITHOUT)_REVERSER_",
            r"([A-Z0-9]+)_FLAP_([0-9]+)_(WITH|WITHOUT)_ICE$",
        ))
        .expect("configuration key pattern is valid")
    })
}

impl TableKey {
    pub fn from_parts(parts: &KeyParts) -> Self {
        TableKey(format!(
            "{}_{}_REVERSER_{}_FLAP_{}_{}_ICE",
            parts.aircraft_model.as_key(),
            with_or_without(parts.reverser_installed),
            parts.approach_category.as_key(),
            parts.flap_setting.as_key(),
            with_or_without(parts.icing),
        ))
    }

    /// Splits a key string back into its components. Returns `None` for keys
    /// that do not follow the layout or name an unknown variant.
    pub fn parse(key: &str) -> Option<KeyParts> {
        let caps = key_pattern().captures(key.trim())?;
        Some(KeyParts {
            aircraft_model: caps[1].parse().ok()?,
            reverser_installed: caps[2].eq_ignore_ascii_case("WITH"),
            approach_category: caps[3].parse().ok()?,
            flap_setting: caps[4].parse().ok()?,
            icing: caps[5].eq_ignore_ascii_case("WITH"),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the configuration key for a request.
pub fn resolve_key(request: &LandingRequest) -> TableKey {
    TableKey::from_parts(&KeyParts {
        aircraft_model: request.aircraft_model,
        reverser_installed: request.reverser_installed,
        approach_category: request.approach_category,
        flap_setting: request.flap_setting,
        icing: request.icing,
    })
}

/// Two-stage lookup: configuration bucket, then runway code. A missing
/// bucket, a missing runway row and a row without coefficients all report
/// the same `ConfigurationNotFound`.
pub fn lookup(
    table: &ConfigTable,
    key: &TableKey,
    runway_code: RunwayCode,
) -> Result<BaseEntry, LandingError> {
    let not_found = || {
        log::warn!("No table entry for {} at RWYCC {}", key, runway_code);
        LandingError::ConfigurationNotFound {
            key: key.to_string(),
            runway_code,
        }
    };

    let config = table.get(key).ok_or_else(not_found)?;
    let row = config.rwycc.get(&runway_code).ok_or_else(not_found)?;
    let coefficients = row.coefficients.ok_or_else(not_found)?;

    Ok(BaseEntry {
        reference_distance: row.reference_distance,
        coefficients,
        // A zero coefficient in the source data means no overweight penalty.
        overweight_coefficient: config.overweight_coefficient.filter(|c| *c != 0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "EMB145_WITH_REVERSER_CAT1_FLAP_45_WITHOUT_ICE": {
            "rwycc": {
                "6": {
                    "ref_distance": 1200,
                    "corrections": {
                        "weight_below": 20, "weight_above": 15, "altitude": 30,
                        "temp_below_isa": 6, "temp_above_isa": 8,
                        "headwind": 12, "tailwind": 40,
                        "uphill": 10, "downhill": 25,
                        "vref_additive": 35, "reverser_inop": 50
                    }
                },
                "2": { "ref_distance": 1900 }
            },
            "overweight_correction": 22
        },
        "EMB135_WITHOUT_REVERSER_CAT1_FLAP_22_WITH_ICE": {
            "rwycc": {},
            "overweight_correction": 0
        }
    }"#;

    fn request() -> LandingRequest {
        LandingRequest::new(
            AircraftModel::Emb145,
            true,
            FlapSetting::Flap45,
            false,
            ApproachCategory::Cat1,
            RunwayCode(6),
            18_000.0,
        )
    }

    #[test]
    fn test_resolve_key_layout() {
        assert_eq!(
            resolve_key(&request()).as_str(),
            "EMB145_WITH_REVERSER_CAT1_FLAP_45_WITHOUT_ICE"
        );

        let mut other = request();
        other.aircraft_model = AircraftModel::Emb145Xr;
        other.reverser_installed = false;
        other.approach_category = ApproachCategory::Cat2;
        other.flap_setting = FlapSetting::Flap22;
        other.icing = true;
        assert_eq!(
            resolve_key(&other).as_str(),
            "EMB145XR_WITHOUT_REVERSER_CAT2_FLAP_22_WITH_ICE"
        );
    }

    #[test]
    fn test_parse_key_inverts_resolve() {
        let key = resolve_key(&request());
        let parts = TableKey::parse(key.as_str()).unwrap();
        assert_eq!(TableKey::from_parts(&parts), key);
        assert_eq!(parts.aircraft_model, AircraftModel::Emb145);
        assert!(parts.reverser_installed);
        assert!(!parts.icing);
    }

    #[test]
    fn test_parse_key_rejects_garbage() {
        assert!(TableKey::parse("EMB145").is_none());
        assert!(TableKey::parse("A320_WITH_REVERSER_CAT1_FLAP_45_WITHOUT_ICE").is_none());
        assert!(TableKey::parse("EMB145_WITH_REVERSER_CAT1_FLAP_30_WITHOUT_ICE").is_none());
        assert!(TableKey::parse("emb145_with_reverser_cat1_flap_45_without_ice").is_some());
    }

    #[test]
    fn test_lookup_found() {
        let table = ConfigTable::from_json_str(TABLE).unwrap();
        let entry = lookup(&table, &resolve_key(&request()), RunwayCode(6)).unwrap();

        assert_eq!(entry.reference_distance, 1200.0);
        assert_eq!(entry.coefficients.weight_above, 15.0);
        assert_eq!(entry.coefficients.reverser_inop, 50.0);
        assert_eq!(entry.overweight_coefficient, Some(22.0));
    }

    #[test]
    fn test_lookup_misses_are_all_configuration_not_found() {
        let table = ConfigTable::from_json_str(TABLE).unwrap();
        let key = resolve_key(&request());

        // Unknown runway code.
        let err = lookup(&table, &key, RunwayCode(5)).unwrap_err();
        assert_eq!(
            err,
            LandingError::ConfigurationNotFound {
                key: key.to_string(),
                runway_code: RunwayCode(5),
            }
        );

        // Row present but without coefficients.
        assert!(matches!(
            lookup(&table, &key, RunwayCode(2)),
            Err(LandingError::ConfigurationNotFound { .. })
        ));

        // Unknown configuration.
        let mut other = request();
        other.icing = true;
        assert!(matches!(
            lookup(&table, &resolve_key(&other), RunwayCode(6)),
            Err(LandingError::ConfigurationNotFound { .. })
        ));
    }

    #[test]
    fn test_zero_overweight_coefficient_is_absent() {
        let mut entries = BTreeMap::new();
        let mut rwycc = BTreeMap::new();
        rwycc.insert(
            RunwayCode(6),
            RunwayEntry {
                reference_distance: 1000.0,
                coefficients: Some(Coefficients::default()),
            },
        );
        entries.insert(
            resolve_key(&request()).to_string(),
            ConfigEntry {
                rwycc,
                overweight_coefficient: Some(0.0),
            },
        );
        let table = ConfigTable::new(entries);

        let entry = lookup(&table, &resolve_key(&request()), RunwayCode(6)).unwrap();
        assert_eq!(entry.overweight_coefficient, None);
    }

    #[test]
    fn test_malformed_table_is_a_load_error() {
        assert!(ConfigTable::from_json_str("{ not json").is_err());
        assert!(
            ConfigTable::from_json_str(r#"{"K": {"rwycc": {"x": {"ref_distance": 1}}}}"#).is_err()
        );
    }

    #[test]
    fn test_incomplete_coefficients_only_disable_their_row() {
        let table = ConfigTable::from_json_str(
            r#"{
            "EMB145_WITH_REVERSER_CAT1_FLAP_45_WITHOUT_ICE": {
                "rwycc": {
                    "6": {
                        "ref_distance": 1200,
                        "corrections": {
                            "weight_below": 20, "weight_above": 15, "altitude": 30,
                            "temp_below_isa": 6, "temp_above_isa": 8,
                            "headwind": 12, "tailwind": 40,
                            "uphill": 10, "downhill": 25,
                            "vref_additive": 35, "reverser_inop": 50
                        }
                    },
                    "4": {
                        "ref_distance": 1450,
                        "corrections": {
                            "weight_below": 20, "weight_above": 15, "altitude": 30,
                            "temp_below_isa": 6, "temp_above_isa": 8,
                            "headwind": 12, "tailwind": 40,
                            "uphill": 10, "downhill": 25,
                            "vref_additive": 35
                        }
                    },
                    "3": { "ref_distance": 1600, "corrections": null },
                    "2": { "ref_distance": 1800, "corrections": { "altitude": "n/a" } }
                }
            }
        }"#,
        )
        .unwrap();
        let key = resolve_key(&request());

        let entry = lookup(&table, &key, RunwayCode(6)).unwrap();
        assert_eq!(entry.reference_distance, 1200.0);
        assert_eq!(entry.coefficients.reverser_inop, 50.0);

        for code in [4, 3, 2] {
            let code = RunwayCode(code);
            let config = table.get(&key).unwrap();
            assert_eq!(config.rwycc[&code].coefficients, None);
            assert_eq!(
                lookup(&table, &key, code),
                Err(LandingError::ConfigurationNotFound {
                    key: key.to_string(),
                    runway_code: code,
                })
            );
        }
    }

    #[test]
    fn test_ref_distance_is_still_required() {
        let missing = r#"{"K": {"rwycc": {"6": {"corrections": null}}}}"#;
        assert!(ConfigTable::from_json_str(missing).is_err());
    }
}
