//! Throat thermodynamics and throat sizing from a target thrust.

use motor_core::geometry::circle_radius;
use serde::Serialize;

/// Chamber stagnation conditions and the design exit pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChamberConditions {
    /// Chamber stagnation pressure `p0` (Pa).
    pub stagnation_pressure_pa: f64,
    /// Design exit (ambient) pressure `pe` (Pa).
    pub exit_pressure_pa: f64,
    /// Chamber stagnation temperature `T0` (K).
    pub stagnation_temperature_k: f64,
    /// Ratio of specific heats `k`.
    pub specific_heat_ratio: f64,
    /// Specific gas constant `R` (J/(kg·K)).
    pub gas_constant_j_kg_k: f64,
}

impl ChamberConditions {
    /// `pe / p0`.
    #[inline]
    pub fn pressure_ratio(&self) -> f64 {
        self.exit_pressure_pa / self.stagnation_pressure_pa
    }

    /// Chamber specific volume `Vc = R·T0 / p0` (m³/kg).
    #[inline]
    pub fn chamber_specific_volume(&self) -> f64 {
        self.gas_constant_j_kg_k * self.stagnation_temperature_k / self.stagnation_pressure_pa
    }

    /// Exhaust velocity for loss-free expansion from `p0` down to `pe`.
    pub fn ideal_exhaust_velocity(&self) -> f64 {
        let k = self.specific_heat_ratio;
        let expansion_term = 1.0 - self.pressure_ratio().powf((k - 1.0) / k);
        let rt0 = self.gas_constant_j_kg_k * self.stagnation_temperature_k;
        ((2.0 * k / (k - 1.0)) * rt0 * expansion_term).sqrt()
    }
}

/// Sonic throat state derived once per design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThroatState {
    pub temperature_k: f64,
    pub sonic_velocity_m_s: f64,
    /// Ideal exhaust velocity used only to back out the mass flow.
    pub ideal_exhaust_velocity_m_s: f64,
    pub mass_flow_kg_s: f64,
    pub specific_volume_m3_kg: f64,
    pub area_m2: f64,
    pub radius_m: f64,
}

/// Size the throat for `thrust_n` with the given chamber conditions.
///
/// The throat depends only on the thrust and chamber thermodynamics, never on
/// the expansion ratio. No range checks are performed: `pe >= p0` or `k <= 1`
/// yield NaN or infinite values which callers must treat as invalid input.
pub fn size_throat(chamber: &ChamberConditions, thrust_n: f64) -> ThroatState {
    let k = chamber.specific_heat_ratio;
    let r = chamber.gas_constant_j_kg_k;

    let temperature = 2.0 * chamber.stagnation_temperature_k / (k + 1.0);
    let sonic_velocity = (k * r * temperature).sqrt();

    let ideal_exhaust_velocity = chamber.ideal_exhaust_velocity();
    let mass_flow = thrust_n / ideal_exhaust_velocity;

    let specific_volume =
        chamber.chamber_specific_volume() * ((k + 1.0) / 2.0).powf(1.0 / (k - 1.0));
    let area = mass_flow * specific_volume / sonic_velocity;

    ThroatState {
        temperature_k: temperature,
        sonic_velocity_m_s: sonic_velocity,
        ideal_exhaust_velocity_m_s: ideal_exhaust_velocity,
        mass_flow_kg_s: mass_flow,
        specific_volume_m3_kg: specific_volume,
        area_m2: area,
        radius_m: circle_radius(area),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_chamber() -> ChamberConditions {
        ChamberConditions {
            stagnation_pressure_pa: 6_106_000.0,
            exit_pressure_pa: 101_320.0,
            stagnation_temperature_k: 1_601.209,
            specific_heat_ratio: 1.136397,
            gas_constant_j_kg_k: 234.918,
        }
    }

    #[test]
    fn throat_state_is_positive_for_valid_inputs() {
        let throat = size_throat(&reference_chamber(), 544.81);
        assert!(throat.temperature_k > 0.0);
        assert!(throat.area_m2 > 0.0);
        assert!(throat.radius_m > 0.0);
        // Throat is colder than the chamber and the flow is sonic there.
        assert!(throat.temperature_k < 1_601.209);
        assert!(throat.sonic_velocity_m_s < throat.ideal_exhaust_velocity_m_s);
    }

    #[test]
    fn throat_area_scales_linearly_with_thrust() {
        let chamber = reference_chamber();
        let small = size_throat(&chamber, 100.0);
        let large = size_throat(&chamber, 400.0);
        assert!((large.area_m2 / small.area_m2 - 4.0).abs() < 1e-9);
        assert!((large.radius_m / small.radius_m - 2.0).abs() < 1e-9);
    }

    #[test]
    fn exit_pressure_above_chamber_is_not_finite() {
        let mut chamber = reference_chamber();
        chamber.exit_pressure_pa = chamber.stagnation_pressure_pa * 2.0;
        let throat = size_throat(&chamber, 544.81);
        assert!(!throat.area_m2.is_finite());
    }

    #[test]
    fn reference_throat_matches_hand_calculation() {
        let chamber = reference_chamber();
        let throat = size_throat(&chamber, 544.81);
        let k = chamber.specific_heat_ratio;
        let tt = 2.0 * 1_601.209 / (k + 1.0);
        assert!((throat.temperature_k - tt).abs() < 1e-9);
        assert!((throat.mass_flow_kg_s * throat.ideal_exhaust_velocity_m_s - 544.81).abs() < 1e-9);
    }
}
