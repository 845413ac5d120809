// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::engine::{CorrectionKind, LandingResult, DISTANCE_UNIT};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Write as _;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("unknown output format '{}' (text, json, csv)", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        };
        f.write_str(name)
    }
}

/// Integer with an explicit sign, `+0` for zero.
pub fn signed(value: i64) -> String {
    if value >= 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

/// Renders the breakdown as an aligned Step / Correction / Total table
/// followed by the final distance.
pub fn render_text(result: &LandingResult) -> String {
    let width = result
        .steps
        .iter()
        .map(|s| s.description.chars().count())
        .chain(std::iter::once("Step".len()))
        .max()
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  {:>12}  {:>10}", "Step", "Correction", "Total");
    let _ = writeln!(out, "{}", "-".repeat(width + 26));
    for step in &result.steps {
        let correction = format!("{} {}", signed(step.display_magnitude()), step.unit);
        let total = format!("{} {}", step.display_total(), DISTANCE_UNIT);
        let _ = writeln!(
            out,
            "{:<width$}  {:>12}  {:>10}",
            step.description, correction, total
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Landing distance: {} {}", result.final_distance, DISTANCE_UNIT);
    out
}

pub fn render_json(result: &LandingResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize landing result")
}

#[derive(Serialize)]
struct CsvRow<'a> {
    step: usize,
    kind: CorrectionKind,
    description: &'a str,
    correction: i64,
    total: i64,
    unit: &'a str,
}

/// Writes one CSV row per step, with display-rounded values.
pub fn write_csv<W: Write>(result: &LandingResult, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (i, step) in result.steps.iter().enumerate() {
        wtr.serialize(CsvRow {
            step: i + 1,
            kind: step.kind,
            description: &step.description,
            correction: step.display_magnitude(),
            total: step.display_total(),
            unit: step.unit,
        })
        .context("Failed to write CSV row")?;
    }
    wtr.flush().context("Failed to flush CSV output")?;
    Ok(())
}

pub fn render(result: &LandingResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => render_json(result),
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_csv(result, &mut buf)?;
            String::from_utf8(buf).context("CSV output was not UTF-8")
        }
    }
}
