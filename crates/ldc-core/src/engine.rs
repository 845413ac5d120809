// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Landing distance correction engine.
//!
//! A computation starts from the table's reference distance and applies nine
//! conditional linear corrections in a fixed order. Each applied correction
//! becomes a [`CorrectionStep`] so the final figure can be audited line by
//! line. The running distance is carried unrounded; rounding only happens
//! for display values and for the final distance.

use crate::request::{LandingRequest, RunwayCode, SlopeDirection, WindDirection};
use crate::table::{lookup, resolve_key, BaseEntry, ConfigTable};
use crate::LandingError;
use serde::Serialize;

/// Weight the reference distances are published for.
pub const REFERENCE_WEIGHT_KG: f64 = 18_000.0;
pub const DISTANCE_UNIT: &str = "m";

const WEIGHT_STEP_KG: f64 = 1_000.0;
const ALTITUDE_STEP_FT: f64 = 1_000.0;
const TEMPERATURE_GROUP_C: f64 = 5.0;
const WIND_GROUP_KT: f64 = 5.0;
const VREF_GROUP_KT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorrectionKind {
    Reference,
    Weight,
    Altitude,
    Temperature,
    Wind,
    Slope,
    SpeedAdditive,
    ReverserInop,
    Overweight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrectionStep {
    pub kind: CorrectionKind,
    pub description: String,
    /// Signed contribution of this step, unrounded.
    pub magnitude: f64,
    /// Distance after this step, unrounded.
    pub running_total: f64,
    pub unit: &'static str,
}

impl CorrectionStep {
    pub fn display_magnitude(&self) -> i64 {
        round_half_up(self.magnitude)
    }

    pub fn display_total(&self) -> i64 {
        round_half_up(self.running_total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandingResult {
    pub final_distance: i64,
    pub steps: Vec<CorrectionStep>,
}

impl LandingResult {
    pub fn reference_distance(&self) -> f64 {
        self.steps.first().map(|s| s.magnitude).unwrap_or_default()
    }

    /// Accumulated distance before the final rounding.
    pub fn unrounded_distance(&self) -> f64 {
        self.steps.last().map(|s| s.running_total).unwrap_or_default()
    }
}

/// Rounds half-way values toward positive infinity (-2.5 becomes -2).
pub fn round_half_up(value: f64) -> i64 {
    // Adding 0.5 first would round 0.49999999999999994 up to 1.
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

struct Accumulator {
    distance: f64,
    steps: Vec<CorrectionStep>,
}

impl Accumulator {
    fn start(reference_distance: f64, runway_code: RunwayCode) -> Self {
        let mut steps = Vec::with_capacity(10);
        steps.push(CorrectionStep {
            kind: CorrectionKind::Reference,
            description: format!("Reference distance (RWYCC {})", runway_code),
            magnitude: reference_distance,
            running_total: reference_distance,
            unit: DISTANCE_UNIT,
        });
        Self {
            distance: reference_distance,
            steps,
        }
    }

    fn apply(&mut self, kind: CorrectionKind, description: String, magnitude: f64) {
        self.distance += magnitude;
        log::debug!(
            "{:?}: {:+.1} {} -> {:.1} {}",
            kind,
            magnitude,
            DISTANCE_UNIT,
            self.distance,
            DISTANCE_UNIT
        );
        self.steps.push(CorrectionStep {
            kind,
            description,
            magnitude,
            running_total: self.distance,
            unit: DISTANCE_UNIT,
        });
    }

    fn finish(self) -> LandingResult {
        LandingResult {
            final_distance: round_half_up(self.distance),
            steps: self.steps,
        }
    }
}

/// Applies the correction rules to a resolved table entry.
///
/// The request is assumed to be validated. Rules whose trigger is false are
/// skipped entirely and leave no step behind.
pub fn accumulate(request: &LandingRequest, entry: &BaseEntry) -> LandingResult {
    let c = &entry.coefficients;
    let weight = request.landing_weight_kg;
    let mut acc = Accumulator::start(entry.reference_distance, request.runway_code);

    // 1 / 2: weight. At exactly the reference weight the delta is zero and
    // neither rule leaves a step.
    if weight < REFERENCE_WEIGHT_KG {
        let diff = (REFERENCE_WEIGHT_KG - weight) / WEIGHT_STEP_KG;
        acc.apply(
            CorrectionKind::Weight,
            format!("Weight correction ({} kg, {:.1}k below reference)", weight, diff),
            diff * c.weight_below,
        );
    } else if weight > REFERENCE_WEIGHT_KG {
        let diff = (weight - REFERENCE_WEIGHT_KG) / WEIGHT_STEP_KG;
        acc.apply(
            CorrectionKind::Weight,
            format!("Weight correction ({} kg, {:.1}k above reference)", weight, diff),
            diff * c.weight_above,
        );
    }

    // 3: altitude, signed by the altitude itself.
    let altitude = request.pressure_altitude_ft;
    if altitude != 0.0 {
        acc.apply(
            CorrectionKind::Altitude,
            format!("Altitude correction ({} ft)", altitude),
            altitude / ALTITUDE_STEP_FT * c.altitude,
        );
    }

    // 4: temperature, per 5 °C of ISA deviation.
    let temperature = request.isa_deviation_c;
    if temperature != 0.0 {
        let groups = temperature.abs() / TEMPERATURE_GROUP_C;
        let magnitude = if temperature < 0.0 {
            -groups * c.temp_below_isa
        } else {
            groups * c.temp_above_isa
        };
        acc.apply(
            CorrectionKind::Temperature,
            format!("Temperature correction (ISA {:+} °C)", temperature),
            magnitude,
        );
    }

    // 5: wind, per 5 kt.
    let wind = request.wind_speed_kt;
    if wind != 0.0 {
        let groups = wind / WIND_GROUP_KT;
        let magnitude = match request.wind_direction {
            WindDirection::Headwind => -groups * c.headwind,
            WindDirection::Tailwind => groups * c.tailwind,
        };
        acc.apply(
            CorrectionKind::Wind,
            format!("Wind correction ({} kt {})", wind, request.wind_direction),
            magnitude,
        );
    }

    // 6: slope, per 1 % of grade.
    let slope = request.runway_slope_pct;
    if slope != 0.0 {
        let magnitude = match request.slope_direction {
            SlopeDirection::Uphill => slope * c.uphill,
            SlopeDirection::Downhill => -slope * c.downhill,
        };
        acc.apply(
            CorrectionKind::Slope,
            format!("Slope correction ({}% {})", slope, request.slope_direction),
            magnitude,
        );
    }

    // 7: approach speed additive, per 5 kt. Only positive additives count.
    let additive = request.vref_additive_kt;
    if additive > 0.0 {
        acc.apply(
            CorrectionKind::SpeedAdditive,
            format!("Speed correction (VREF + {} kt)", additive),
            additive / VREF_GROUP_KT * c.vref_additive,
        );
    }

    // 8: inoperative reversers, only when reversers are fitted.
    if request.reverser_installed && request.reversers_inop > 0 {
        acc.apply(
            CorrectionKind::ReverserInop,
            format!("Inoperative reverser correction ({})", request.reversers_inop),
            f64::from(request.reversers_inop) * c.reverser_inop,
        );
    }

    // 9: overweight. Stacks on top of rule 2 rather than replacing it.
    if let Some(overweight) = entry.overweight_coefficient {
        if weight > REFERENCE_WEIGHT_KG {
            let diff = (weight - REFERENCE_WEIGHT_KG) / WEIGHT_STEP_KG;
            acc.apply(
                CorrectionKind::Overweight,
                format!(
                    "Overweight correction ({:.1}k above {} kg)",
                    diff, REFERENCE_WEIGHT_KG
                ),
                diff * overweight,
            );
        }
    }

    acc.finish()
}

/// Validates the request, resolves its table entry and accumulates the
/// corrections. Nothing is computed unless both earlier stages succeed.
pub fn compute(
    request: &LandingRequest,
    table: &ConfigTable,
) -> Result<LandingResult, LandingError> {
    request.validate()?;
    let key = resolve_key(request);
    let entry = lookup(table, &key, request.runway_code)?;
    let result = accumulate(request, &entry);
    log::info!(
        "{} RWYCC {}: {} {} in {} steps",
        key,
        request.runway_code,
        result.final_distance,
        DISTANCE_UNIT,
        result.steps.len()
    );
    Ok(result)
}
