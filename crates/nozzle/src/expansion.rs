//! Expansion ratio selection and exit sizing.

use motor_core::geometry::circle_radius;
use serde::Serialize;

use crate::thermo::{ChamberConditions, ThroatState};

/// Where the expansion ratio came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpansionSource {
    /// Supplied by the caller and used verbatim.
    Manual,
    /// Ideal expansion (`Pe == Pa`) for the design pressure ratio.
    Optimal,
}

/// Exit plane sizing for a resolved expansion ratio `ε = Ae / At`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExitGeometry {
    pub expansion_ratio: f64,
    pub source: ExpansionSource,
    pub area_m2: f64,
    pub radius_m: f64,
}

/// Expansion ratio that expands the flow exactly to the design exit pressure.
///
/// Large chamber-to-ambient pressure ratios legitimately produce ratios in the
/// hundreds; the value is not clamped.
pub fn optimal_expansion_ratio(chamber: &ChamberConditions) -> f64 {
    let k = chamber.specific_heat_ratio;
    let pressure_ratio = chamber.pressure_ratio();

    let critical = ((k + 1.0) / 2.0).powf(1.0 / (k - 1.0));
    let pressure = pressure_ratio.powf(-1.0 / k);
    let velocity =
        (((k + 1.0) / (k - 1.0)) * (1.0 - pressure_ratio.powf((k - 1.0) / k))).sqrt();
    critical * pressure * velocity
}

/// Accept a manual override only when it is a finite ratio greater than one.
pub fn usable_manual_ratio(manual: Option<f64>) -> Option<f64> {
    manual.filter(|eps| eps.is_finite() && *eps > 1.0)
}

/// Resolve the expansion ratio and size the exit plane from the throat area.
pub fn resolve_expansion_ratio(
    throat: &ThroatState,
    chamber: &ChamberConditions,
    manual: Option<f64>,
) -> ExitGeometry {
    let (expansion_ratio, source) = match usable_manual_ratio(manual) {
        Some(eps) => (eps, ExpansionSource::Manual),
        None => (optimal_expansion_ratio(chamber), ExpansionSource::Optimal),
    };
    tracing::debug!(expansion_ratio, ?source, "resolved expansion ratio");
    if expansion_ratio <= 1.0 {
        tracing::warn!(
            expansion_ratio,
            "ideal expansion ratio is not greater than one; exit is no wider than the throat"
        );
    }

    let area = expansion_ratio * throat.area_m2;
    ExitGeometry {
        expansion_ratio,
        source,
        area_m2: area,
        radius_m: circle_radius(area),
    }
}
