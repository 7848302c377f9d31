//! Request models, defaults, and loaders for the motor design calculator.
//!
//! Every field is optional; missing fields take the documented defaults. Keys
//! accept both the descriptive names and the short symbols (`F`, `p0`, `pe`,
//! `T0`, `k`, `R`) used on design worksheets.

use std::fs::File;
use std::path::Path;

use motor_nozzle::contour::{ContourKind, DEFAULT_BELL_LENGTH_PERCENT};
use motor_nozzle::expansion::usable_manual_ratio;
use motor_nozzle::{ChamberConditions, NozzleDesignInput};
use motor_performance::PerformanceInput;
use serde::de::{Deserializer, IgnoredAny};
use serde::Deserialize;
use thiserror::Error;

/// Nozzle design request.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct NozzleRequest {
    #[serde(alias = "F")]
    pub thrust_n: f64,
    #[serde(alias = "p0")]
    pub chamber_pressure_pa: f64,
    #[serde(alias = "pe")]
    pub exit_pressure_pa: f64,
    #[serde(alias = "T0")]
    pub chamber_temperature_k: f64,
    #[serde(alias = "k")]
    pub specific_heat_ratio: f64,
    #[serde(alias = "R")]
    pub gas_constant_j_kg_k: f64,
    #[serde(alias = "tipo", deserialize_with = "contour_kind")]
    pub contour: ContourKind,
    /// Manual expansion ratio; malformed values are treated as absent.
    #[serde(alias = "razao_expansao", deserialize_with = "lenient_ratio")]
    pub expansion_ratio: Option<f64>,
    pub bell_length_percent: f64,
}

impl Default for NozzleRequest {
    fn default() -> Self {
        Self {
            thrust_n: 544.81,
            chamber_pressure_pa: 6_106_000.0,
            exit_pressure_pa: 101_320.0,
            chamber_temperature_k: 1_601.209,
            specific_heat_ratio: 1.136397,
            gas_constant_j_kg_k: 234.918,
            contour: ContourKind::Conical,
            expansion_ratio: None,
            bell_length_percent: DEFAULT_BELL_LENGTH_PERCENT,
        }
    }
}

impl NozzleRequest {
    pub fn to_input(&self) -> NozzleDesignInput {
        NozzleDesignInput {
            thrust_n: self.thrust_n,
            chamber: ChamberConditions {
                stagnation_pressure_pa: self.chamber_pressure_pa,
                exit_pressure_pa: self.exit_pressure_pa,
                stagnation_temperature_k: self.chamber_temperature_k,
                specific_heat_ratio: self.specific_heat_ratio,
                gas_constant_j_kg_k: self.gas_constant_j_kg_k,
            },
            contour: self.contour,
            manual_expansion_ratio: self.expansion_ratio,
            bell_length_percent: self.bell_length_percent,
        }
    }
}

/// Apogee-targeting request.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PerformanceRequest {
    pub target_apogee_m: f64,
    pub burn_time_s: f64,
    #[serde(alias = "rocket_empty_mass_kg")]
    pub empty_mass_kg: f64,
    pub propellant_mass_percent: f64,
    #[serde(alias = "rocket_diameter_cm")]
    pub diameter_cm: f64,
    pub drag_coefficient: f64,
}

impl Default for PerformanceRequest {
    fn default() -> Self {
        Self {
            target_apogee_m: 500.0,
            burn_time_s: 3.0,
            empty_mass_kg: 1.5,
            propellant_mass_percent: 20.0,
            diameter_cm: 8.0,
            drag_coefficient: 0.4,
        }
    }
}

impl PerformanceRequest {
    pub fn to_input(&self) -> PerformanceInput {
        PerformanceInput {
            target_apogee_m: self.target_apogee_m,
            burn_time_s: self.burn_time_s,
            empty_mass_kg: self.empty_mass_kg,
            propellant_mass_percent: self.propellant_mass_percent,
            diameter_cm: self.diameter_cm,
            drag_coefficient: self.drag_coefficient,
        }
    }
}

/// Parse a contour name. Unknown names select the conical wall.
pub fn parse_contour_kind(name: &str) -> ContourKind {
    match name.trim().to_ascii_lowercase().as_str() {
        "parabolica" | "parabolic" | "rao" | "bell" => ContourKind::Parabolic,
        _ => ContourKind::Conical,
    }
}

/// Interpret a textual expansion ratio override; blanks and junk are absent.
pub fn parse_expansion_ratio(text: &str) -> Option<f64> {
    usable_manual_ratio(text.trim().parse::<f64>().ok())
}

fn contour_kind<'de, D>(deserializer: D) -> Result<ContourKind, D::Error>
where
    D: Deserializer<'de>,
{
    let name: Option<String> = Option::deserialize(deserializer)?;
    Ok(name.as_deref().map(parse_contour_kind).unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRatio {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_ratio<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<RawRatio> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawRatio::Number(value)) => usable_manual_ratio(Some(value)),
        Some(RawRatio::Text(text)) => parse_expansion_ratio(&text),
        Some(RawRatio::Other(_)) | None => None,
    })
}

/// Errors that can occur while loading request files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read request file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load a nozzle request from a TOML file, or YAML (and therefore JSON) otherwise.
pub fn load_nozzle_request<P: AsRef<Path>>(path: P) -> Result<NozzleRequest, ConfigError> {
    load_record(path)
}

/// Load an apogee-targeting request from a TOML or YAML file.
pub fn load_performance_request<P: AsRef<Path>>(
    path: P,
) -> Result<PerformanceRequest, ConfigError> {
    load_record(path)
}

fn load_record<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mapping_takes_defaults() {
        let request: NozzleRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, NozzleRequest::default());
        let request: PerformanceRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, PerformanceRequest::default());
    }

    #[test]
    fn worksheet_symbols_are_accepted() {
        let request: NozzleRequest = serde_json::from_str(
            r#"{"F": 300.0, "p0": 4000000, "pe": 100000, "T0": 1700, "k": 1.2, "R": 250, "tipo": "parabolica"}"#,
        )
        .unwrap();
        assert_eq!(request.thrust_n, 300.0);
        assert_eq!(request.chamber_pressure_pa, 4_000_000.0);
        assert_eq!(request.contour, ContourKind::Parabolic);
    }

    #[test]
    fn expansion_override_parsing_is_lenient() {
        let cases = [
            (r#"{"razao_expansao": 12.5}"#, Some(12.5)),
            (r#"{"razao_expansao": "8"}"#, Some(8.0)),
            (r#"{"razao_expansao": " 9.5 "}"#, Some(9.5)),
            (r#"{"razao_expansao": ""}"#, None),
            (r#"{"razao_expansao": "abc"}"#, None),
            (r#"{"razao_expansao": null}"#, None),
            (r#"{"razao_expansao": 0.8}"#, None),
            (r#"{"expansion_ratio": [1, 2]}"#, None),
        ];
        for (json, expected) in cases {
            let request: NozzleRequest = serde_json::from_str(json).unwrap();
            assert_eq!(request.expansion_ratio, expected, "{json}");
        }
    }

    #[test]
    fn unknown_contour_falls_back_to_cone() {
        assert_eq!(parse_contour_kind("conica"), ContourKind::Conical);
        assert_eq!(parse_contour_kind("Bell"), ContourKind::Parabolic);
        assert_eq!(parse_contour_kind("aerospike"), ContourKind::Conical);
    }

    #[test]
    fn request_converts_to_engine_input() {
        let request = NozzleRequest {
            expansion_ratio: Some(10.0),
            ..NozzleRequest::default()
        };
        let input = request.to_input();
        assert_eq!(input.manual_expansion_ratio, Some(10.0));
        assert_eq!(input.chamber.stagnation_pressure_pa, 6_106_000.0);
        assert_eq!(input.bell_length_percent, 80.0);
    }
}
