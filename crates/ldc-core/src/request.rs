// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::LandingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_LANDING_WEIGHT_KG: f64 = 12_000.0;
pub const MAX_LANDING_WEIGHT_KG: f64 = 22_000.0;
pub const MAX_ISA_DEVIATION_C: f64 = 50.0;

/// Declares an enum whose variants are spelled the same way in table keys,
/// request files and on the command line. Parsing ignores ASCII case.
macro_rules! key_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $key:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_key())
            }
        }

        impl FromStr for $name {
            type Err = LandingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_key().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| {
                        LandingError::InvalidRequest(format!(
                            "unknown {} '{}'",
                            stringify!($name),
                            s
                        ))
                    })
            }
        }

        impl TryFrom<String> for $name {
            type Error = LandingError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                s.parse()
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.as_key().to_string()
            }
        }
    };
}

key_enum! {
    /// EMB-135/145 family variant.
    AircraftModel {
        Emb135 => "EMB135",
        Emb140 => "EMB140",
        Emb145 => "EMB145",
        Emb145Xr => "EMB145XR",
    }
}

key_enum! {
    /// Landing flap setting in degrees.
    FlapSetting {
        Flap22 => "22",
        Flap45 => "45",
    }
}

key_enum! {
    ApproachCategory {
        Cat1 => "CAT1",
        Cat2 => "CAT2",
    }
}

key_enum! {
    WindDirection {
        Headwind => "headwind",
        Tailwind => "tailwind",
    }
}

key_enum! {
    SlopeDirection {
        Uphill => "uphill",
        Downhill => "downhill",
    }
}

impl Default for WindDirection {
    fn default() -> Self {
        WindDirection::Headwind
    }
}

impl Default for SlopeDirection {
    fn default() -> Self {
        SlopeDirection::Uphill
    }
}

/// Runway condition code (RWYCC), the friction class used to index the
/// per-configuration distance table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunwayCode(pub u8);

impl RunwayCode {
    /// Highest code defined by the runway condition assessment matrix.
    pub const MAX: u8 = 6;

    pub fn is_standard(&self) -> bool {
        self.0 <= Self::MAX
    }
}

impl fmt::Display for RunwayCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RunwayCode {
    type Err = LandingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map(RunwayCode)
            .map_err(|_| LandingError::InvalidRequest(format!("invalid runway code '{}'", s)))
    }
}

/// Everything needed to compute one landing distance.
///
/// The configuration fields and the landing weight are mandatory. The
/// environmental fields default to zero when absent from a request file, and
/// `LandingRequest::new` starts them at zero as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingRequest {
    pub aircraft_model: AircraftModel,
    pub reverser_installed: bool,
    pub flap_setting: FlapSetting,
    pub icing: bool,
    pub approach_category: ApproachCategory,
    pub runway_code: RunwayCode,
    pub landing_weight_kg: f64,
    /// Pressure altitude, negative below sea level.
    #[serde(default)]
    pub pressure_altitude_ft: f64,
    /// Deviation from ISA at the airfield.
    #[serde(default)]
    pub isa_deviation_c: f64,
    #[serde(default)]
    pub wind_speed_kt: f64,
    #[serde(default)]
    pub wind_direction: WindDirection,
    /// Slope magnitude in percent; the sign is carried by `slope_direction`.
    #[serde(default)]
    pub runway_slope_pct: f64,
    #[serde(default)]
    pub slope_direction: SlopeDirection,
    #[serde(default)]
    pub vref_additive_kt: f64,
    #[serde(default)]
    pub reversers_inop: u32,
}

impl LandingRequest {
    pub fn new(
        aircraft_model: AircraftModel,
        reverser_installed: bool,
        flap_setting: FlapSetting,
        icing: bool,
        approach_category: ApproachCategory,
        runway_code: RunwayCode,
        landing_weight_kg: f64,
    ) -> Self {
        Self {
            aircraft_model,
            reverser_installed,
            flap_setting,
            icing,
            approach_category,
            runway_code,
            landing_weight_kg,
            pressure_altitude_ft: 0.0,
            isa_deviation_c: 0.0,
            wind_speed_kt: 0.0,
            wind_direction: WindDirection::default(),
            runway_slope_pct: 0.0,
            slope_direction: SlopeDirection::default(),
            vref_additive_kt: 0.0,
            reversers_inop: 0,
        }
    }

    pub fn with_altitude(mut self, feet: f64) -> Self {
        self.pressure_altitude_ft = feet;
        self
    }

    pub fn with_isa_deviation(mut self, celsius: f64) -> Self {
        self.isa_deviation_c = celsius;
        self
    }

    pub fn with_wind(mut self, speed_kt: f64, direction: WindDirection) -> Self {
        self.wind_speed_kt = speed_kt;
        self.wind_direction = direction;
        self
    }

    pub fn with_slope(mut self, percent: f64, direction: SlopeDirection) -> Self {
        self.runway_slope_pct = percent;
        self.slope_direction = direction;
        self
    }

    pub fn with_vref_additive(mut self, knots: f64) -> Self {
        self.vref_additive_kt = knots;
        self
    }

    pub fn with_reversers_inop(mut self, count: u32) -> Self {
        self.reversers_inop = count;
        self
    }

    /// Checks the declared input ranges. Runs before any table lookup.
    pub fn validate(&self) -> Result<(), LandingError> {
        let numeric = [
            ("landing weight", self.landing_weight_kg),
            ("pressure altitude", self.pressure_altitude_ft),
            ("ISA deviation", self.isa_deviation_c),
            ("wind speed", self.wind_speed_kt),
            ("runway slope", self.runway_slope_pct),
            ("VREF additive", self.vref_additive_kt),
        ];
        for (name, value) in numeric {
            if !value.is_finite() {
                return Err(LandingError::InvalidRequest(format!(
                    "{} must be a finite number",
                    name
                )));
            }
        }

        if self.landing_weight_kg < MIN_LANDING_WEIGHT_KG
            || self.landing_weight_kg > MAX_LANDING_WEIGHT_KG
        {
            return Err(LandingError::InvalidRequest(format!(
                "landing weight must be between {} and {} kg (got {})",
                MIN_LANDING_WEIGHT_KG, MAX_LANDING_WEIGHT_KG, self.landing_weight_kg
            )));
        }

        if self.isa_deviation_c.abs() > MAX_ISA_DEVIATION_C {
            return Err(LandingError::InvalidRequest(format!(
                "ISA deviation must be between -{max} and +{max} °C (got {})",
                self.isa_deviation_c,
                max = MAX_ISA_DEVIATION_C
            )));
        }

        let magnitudes = [
            ("wind speed", self.wind_speed_kt),
            ("runway slope", self.runway_slope_pct),
            ("VREF additive", self.vref_additive_kt),
        ];
        for (name, value) in magnitudes {
            if value < 0.0 {
                return Err(LandingError::InvalidRequest(format!(
                    "{} must not be negative (got {})",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
