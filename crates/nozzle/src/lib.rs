//! Converging–diverging nozzle design for small solid motors.
//!
//! [`design_nozzle`] sizes the throat from a target thrust, resolves the
//! expansion ratio, and samples the divergent wall. Physics runs in SI units;
//! [`NozzleParameters`] and [`NozzleGeometry`] carry the presentation values
//! (mm, mm²) next to the SI throat and exit areas.

pub mod contour;
pub mod expansion;
pub mod thermo;

use motor_core::units::{m2_to_mm2, m_to_mm};
use serde::Serialize;
use thiserror::Error;

pub use contour::{ContourKind, ContourProfile, DEFAULT_BELL_LENGTH_PERCENT, WallAngles};
pub use expansion::{ExitGeometry, ExpansionSource};
pub use thermo::{ChamberConditions, ThroatState};

/// Inputs for a single nozzle design.
#[derive(Debug, Clone, PartialEq)]
pub struct NozzleDesignInput {
    /// Target thrust `F` (N).
    pub thrust_n: f64,
    pub chamber: ChamberConditions,
    pub contour: ContourKind,
    /// Manual expansion ratio; ignored unless finite and greater than one.
    pub manual_expansion_ratio: Option<f64>,
    /// Bell length relative to a 15° cone (percent). Unused for conical walls.
    pub bell_length_percent: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum NozzleError {
    #[error("invalid {field} ({value}): {reason}")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Scalar results in the presentation contract (lengths in mm, areas in m²).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NozzleParameters {
    pub exhaust_velocity_m_s: f64,
    pub mass_flow_kg_s: f64,
    pub throat_temperature_k: f64,
    pub throat_velocity_m_s: f64,
    pub throat_specific_volume_m3_kg: f64,
    pub throat_area_m2: f64,
    pub throat_radius_mm: f64,
    pub exit_area_m2: f64,
    pub exit_radius_mm: f64,
    pub expansion_ratio: f64,
    pub length_m: f64,
    pub length_mm: f64,
}

/// Plot-ready wall geometry: three equal-length sequences.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NozzleGeometry {
    /// Axial position (mm).
    pub x: Vec<f64>,
    /// Wall radius (mm).
    pub r: Vec<f64>,
    /// Cross-sectional area (mm²).
    pub areas: Vec<f64>,
}

impl NozzleGeometry {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Complete design, owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NozzleDesignResult {
    pub contour_kind: ContourKind,
    pub throat: ThroatState,
    pub exit: ExitGeometry,
    pub contour: ContourProfile,
    /// Cross-sectional area at each contour sample (m²).
    pub areas_m2: Vec<f64>,
}

impl NozzleDesignResult {
    pub fn parameters(&self) -> NozzleParameters {
        NozzleParameters {
            exhaust_velocity_m_s: self.throat.ideal_exhaust_velocity_m_s,
            mass_flow_kg_s: self.throat.mass_flow_kg_s,
            throat_temperature_k: self.throat.temperature_k,
            throat_velocity_m_s: self.throat.sonic_velocity_m_s,
            throat_specific_volume_m3_kg: self.throat.specific_volume_m3_kg,
            throat_area_m2: self.throat.area_m2,
            throat_radius_mm: m_to_mm(self.throat.radius_m),
            exit_area_m2: self.exit.area_m2,
            exit_radius_mm: m_to_mm(self.exit.radius_m),
            expansion_ratio: self.exit.expansion_ratio,
            length_m: self.contour.length_m,
            length_mm: m_to_mm(self.contour.length_m),
        }
    }

    pub fn geometry(&self) -> NozzleGeometry {
        NozzleGeometry {
            x: self.contour.x_m.iter().copied().map(m_to_mm).collect(),
            r: self.contour.r_m.iter().copied().map(m_to_mm).collect(),
            areas: self.areas_m2.iter().copied().map(m2_to_mm2).collect(),
        }
    }
}

fn require(
    field: &'static str,
    value: f64,
    ok: bool,
    reason: &'static str,
) -> Result<(), NozzleError> {
    if ok {
        Ok(())
    } else {
        Err(NozzleError::InvalidInput {
            field,
            value,
            reason,
        })
    }
}

/// Reject inputs for which the closed-form stages cannot produce finite values.
pub fn validate(input: &NozzleDesignInput) -> Result<(), NozzleError> {
    let c = &input.chamber;
    require("thrust", input.thrust_n, input.thrust_n > 0.0, "must be positive")?;
    require(
        "chamber pressure",
        c.stagnation_pressure_pa,
        c.stagnation_pressure_pa > 0.0,
        "must be positive",
    )?;
    require(
        "exit pressure",
        c.exit_pressure_pa,
        c.exit_pressure_pa > 0.0 && c.exit_pressure_pa < c.stagnation_pressure_pa,
        "must be positive and below the chamber pressure",
    )?;
    require(
        "chamber temperature",
        c.stagnation_temperature_k,
        c.stagnation_temperature_k > 0.0,
        "must be positive",
    )?;
    require(
        "specific heat ratio",
        c.specific_heat_ratio,
        c.specific_heat_ratio > 1.0,
        "must be greater than one",
    )?;
    require(
        "gas constant",
        c.gas_constant_j_kg_k,
        c.gas_constant_j_kg_k > 0.0,
        "must be positive",
    )?;
    if input.contour == ContourKind::Parabolic {
        require(
            "bell length percentage",
            input.bell_length_percent,
            input.bell_length_percent > 0.0,
            "must be positive",
        )?;
    }
    Ok(())
}

/// Design a nozzle: throat sizing, expansion ratio, then wall contour.
pub fn design_nozzle(input: &NozzleDesignInput) -> Result<NozzleDesignResult, NozzleError> {
    validate(input)?;

    let throat = thermo::size_throat(&input.chamber, input.thrust_n);
    let exit =
        expansion::resolve_expansion_ratio(&throat, &input.chamber, input.manual_expansion_ratio);
    let contour = contour::generate_contour(
        input.contour,
        throat.radius_m,
        exit.radius_m,
        exit.expansion_ratio,
        input.bell_length_percent,
    );
    let areas_m2 = contour.areas_m2();

    tracing::debug!(
        kind = ?input.contour,
        throat_radius_m = throat.radius_m,
        exit_radius_m = exit.radius_m,
        length_m = contour.length_m,
        samples = contour.len(),
        "nozzle design complete"
    );

    Ok(NozzleDesignResult {
        contour_kind: input.contour,
        throat,
        exit,
        contour,
        areas_m2,
    })
}
