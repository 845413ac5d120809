// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::table::{Coefficients, ConfigTable, TableKey};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ValidationIssue {
    pub config_key: String,
    pub severity: ValidationSeverity,
    pub issue_type: String, // e.g., "non_finite_coefficient"
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn has_critical(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == ValidationSeverity::Critical)
    }

    fn push(&mut self, key: &str, severity: ValidationSeverity, issue_type: &str, message: String) {
        self.issues.push(ValidationIssue {
            config_key: key.to_string(),
            severity,
            issue_type: issue_type.to_string(),
            message,
        });
    }
}

/// Data-integrity checks for a landing table. Nothing here fails: problems
/// are collected into the report so a bad table can be inspected as a whole.
pub struct TableValidator;

impl TableValidator {
    pub fn validate(table: &ConfigTable) -> ValidationReport {
        let mut report = ValidationReport::default();

        for (key, config) in table.iter() {
            if TableKey::parse(key).is_none() {
                report.push(
                    key,
                    ValidationSeverity::Warning,
                    "unparseable_key",
                    format!(
                        "'{}' is not a recognised configuration key; requests can never reach it",
                        key
                    ),
                );
            }

            if config.rwycc.is_empty() {
                report.push(
                    key,
                    ValidationSeverity::Warning,
                    "empty_configuration",
                    "Configuration has no runway condition codes".to_string(),
                );
            }

            if let Some(overweight) = config.overweight_coefficient {
                if !overweight.is_finite() || overweight < 0.0 {
                    report.push(
                        key,
                        ValidationSeverity::Warning,
                        "suspicious_overweight",
                        format!("Overweight coefficient {} is negative or not finite", overweight),
                    );
                }
            }

            for (code, row) in &config.rwycc {
                if !code.is_standard() {
                    report.push(
                        key,
                        ValidationSeverity::Info,
                        "non_standard_rwycc",
                        format!("RWYCC {} is outside the 0-6 range", code),
                    );
                }

                if !row.reference_distance.is_finite() || row.reference_distance <= 0.0 {
                    report.push(
                        key,
                        ValidationSeverity::Critical,
                        "bad_reference_distance",
                        format!(
                            "RWYCC {}: reference distance {} must be a positive number",
                            code, row.reference_distance
                        ),
                    );
                }

                match &row.coefficients {
                    None => report.push(
                        key,
                        ValidationSeverity::Warning,
                        "missing_coefficients",
                        format!("RWYCC {}: no correction coefficients, lookups will fail", code),
                    ),
                    Some(coefficients) => {
                        for name in non_finite_coefficients(coefficients) {
                            report.push(
                                key,
                                ValidationSeverity::Critical,
                                "non_finite_coefficient",
                                format!("RWYCC {}: coefficient '{}' is not finite", code, name),
                            );
                        }
                    }
                }
            }
        }

        report
    }
}

fn non_finite_coefficients(c: &Coefficients) -> Vec<&'static str> {
    [
        ("weight_below", c.weight_below),
        ("weight_above", c.weight_above),
        ("altitude", c.altitude),
        ("temp_below_isa", c.temp_below_isa),
        ("temp_above_isa", c.temp_above_isa),
        ("headwind", c.headwind),
        ("tailwind", c.tailwind),
        ("uphill", c.uphill),
        ("downhill", c.downhill),
        ("vref_additive", c.vref_additive),
        ("reverser_inop", c.reverser_inop),
    ]
    .into_iter()
    .filter(|(_, v)| !v.is_finite())
    .map(|(name, _)| name)
    .collect()
}
