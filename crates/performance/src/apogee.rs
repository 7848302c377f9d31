//! Goal-seek on average thrust until the drag-corrected apogee matches a target.
//!
//! Each step evaluates the drag-free powered and coasting phases in closed
//! form, then scales the peak altitude by the drag reduction factor for the
//! current drag influence number.

use motor_core::constants::{G, SPEED_OF_SOUND_M_S};
use motor_core::units::percent_to_fraction;
use motor_drag::DragFactors;
use serde::Serialize;

use crate::classification::{MotorClass, classify};

pub const MAX_ITERATIONS: usize = 50;
/// Accepted apogee error (m).
pub const APOGEE_TOLERANCE_M: f64 = 0.5;
/// Initial thrust as a multiple of the average weight.
pub const INITIAL_THRUST_TO_WEIGHT: f64 = 5.0;
/// Damping exponent applied to `target / apogee`.
pub const THRUST_CORRECTION_EXPONENT: f64 = 0.55;
/// Thrust multiplier used while the corrected apogee is at or below 1 m.
pub const STALLED_THRUST_KICK: f64 = 1.5;
/// Largest drag influence number the method is validated for.
pub const MAX_VALIDATED_DRAG_NUMBER: f64 = 2_000.0;
/// Highest plausible specific impulse for amateur solid propellants (s).
pub const MAX_PLAUSIBLE_ISP_S: f64 = 260.0;

/// Vehicle and mission description for the goal-seek.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceInput {
    pub target_apogee_m: f64,
    pub burn_time_s: f64,
    pub empty_mass_kg: f64,
    /// Propellant mass as a percentage of the empty mass.
    pub propellant_mass_percent: f64,
    pub diameter_cm: f64,
    pub drag_coefficient: f64,
}

impl PerformanceInput {
    pub fn propellant_mass_kg(&self) -> f64 {
        self.empty_mass_kg * percent_to_fraction(self.propellant_mass_percent)
    }

    /// Mean mass over the burn: empty mass plus half the propellant.
    pub fn average_mass_kg(&self) -> f64 {
        self.empty_mass_kg + 0.5 * self.propellant_mass_kg()
    }
}

/// Drag-free flight for one thrust guess.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdealFlight {
    pub burnout_altitude_m: f64,
    pub burnout_velocity_m_s: f64,
    pub peak_altitude_m: f64,
    pub time_to_apogee_s: f64,
}

#[derive(Debug, Clone, Copy)]
struct IterationState {
    thrust_n: f64,
    ideal: IdealFlight,
    drag_number: f64,
    factors: DragFactors,
    corrected_peak_m: f64,
}

impl IterationState {
    fn evaluate(input: &PerformanceInput, average_mass_kg: f64, thrust_n: f64) -> Self {
        let ideal = ideal_flight(thrust_n, average_mass_kg, input.burn_time_s);
        let drag_number = drag_influence_number(
            input.drag_coefficient,
            input.diameter_cm,
            ideal.burnout_velocity_m_s,
            input.empty_mass_kg,
        );
        let factors = motor_drag::lookup(drag_number);
        IterationState {
            thrust_n,
            ideal,
            drag_number,
            factors,
            corrected_peak_m: factors.fz * ideal.peak_altitude_m,
        }
    }
}

/// Closed-form drag-free trajectory for a constant average thrust.
pub fn ideal_flight(thrust_n: f64, average_mass_kg: f64, burn_time_s: f64) -> IdealFlight {
    let accel = (thrust_n / average_mass_kg - G).max(0.0);
    let burnout_altitude = 0.5 * accel * burn_time_s * burn_time_s;
    let burnout_velocity = if burnout_altitude > 0.0 {
        (2.0 * burnout_altitude * accel).sqrt()
    } else {
        0.0
    };
    let peak_altitude = thrust_n * burnout_altitude / (average_mass_kg * G);
    let time_to_apogee = if peak_altitude > burnout_altitude {
        burn_time_s + ((2.0 / G) * (peak_altitude - burnout_altitude)).sqrt()
    } else {
        burn_time_s
    };

    IdealFlight {
        burnout_altitude_m: burnout_altitude,
        burnout_velocity_m_s: burnout_velocity,
        peak_altitude_m: peak_altitude,
        time_to_apogee_s: time_to_apogee,
    }
}

/// Drag influence number `N = Cd·D²·V1² / (1000·m_empty)` with `D` in cm.
pub fn drag_influence_number(
    drag_coefficient: f64,
    diameter_cm: f64,
    burnout_velocity_m_s: f64,
    empty_mass_kg: f64,
) -> f64 {
    drag_coefficient * diameter_cm.powi(2) * burnout_velocity_m_s.powi(2)
        / (1_000.0 * empty_mass_kg)
}

/// Outcome of the goal-seek.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceResult {
    pub propellant_mass_kg: f64,
    pub average_mass_kg: f64,
    pub average_thrust_n: f64,
    pub total_impulse_ns: f64,
    pub specific_impulse_s: f64,
    pub motor_class: MotorClass,
    pub burnout_altitude_m: f64,
    pub burnout_velocity_m_s: f64,
    pub mach_burnout: f64,
    pub peak_altitude_m: f64,
    pub time_to_apogee_s: f64,
    pub max_acceleration_g: f64,
    pub drag_influence_number: f64,
    pub drag_factors: DragFactors,
    /// Drag-free flight for the final thrust.
    pub ideal: IdealFlight,
    pub iterations: usize,
    /// False when the iteration cap was hit before the tolerance was met.
    pub converged: bool,
    pub warnings: Vec<String>,
}

/// Run the goal-seek without range checks.
///
/// Always terminates within [`MAX_ITERATIONS`] evaluations. Hitting the cap is
/// reported through [`PerformanceResult::converged`], never as an error.
pub fn solve_unchecked(input: &PerformanceInput) -> PerformanceResult {
    let average_mass = input.average_mass_kg();
    let mut thrust = average_mass * G * INITIAL_THRUST_TO_WEIGHT;

    let mut iterations = 0;
    let mut converged = false;
    let mut state = IterationState::evaluate(input, average_mass, thrust);
    loop {
        iterations += 1;
        let error = state.corrected_peak_m - input.target_apogee_m;
        tracing::debug!(
            iteration = iterations,
            thrust_n = state.thrust_n,
            corrected_apogee_m = state.corrected_peak_m,
            drag_number = state.drag_number,
            error_m = error,
            "apogee goal-seek step"
        );
        if error.abs() < APOGEE_TOLERANCE_M {
            converged = true;
            break;
        }
        if iterations >= MAX_ITERATIONS {
            break;
        }

        thrust *= if state.corrected_peak_m > 1.0 {
            (input.target_apogee_m / state.corrected_peak_m).powf(THRUST_CORRECTION_EXPONENT)
        } else {
            STALLED_THRUST_KICK
        };
        state = IterationState::evaluate(input, average_mass, thrust);
    }

    tracing::info!(
        iterations,
        converged,
        thrust_n = state.thrust_n,
        apogee_m = state.corrected_peak_m,
        "apogee goal-seek finished"
    );

    finish(input, average_mass, &state, iterations, converged)
}

fn finish(
    input: &PerformanceInput,
    average_mass: f64,
    state: &IterationState,
    iterations: usize,
    converged: bool,
) -> PerformanceResult {
    let factors = state.factors;
    let burnout_velocity = factors.fv * state.ideal.burnout_velocity_m_s;
    let propellant_mass = input.propellant_mass_kg();
    let total_impulse = state.thrust_n * input.burn_time_s;
    let specific_impulse = if propellant_mass > 0.0 {
        total_impulse / (propellant_mass * G)
    } else {
        0.0
    };

    let mut warnings = Vec::new();
    if state.drag_number > MAX_VALIDATED_DRAG_NUMBER {
        warnings.push(format!(
            "N ({:.0}) > 2000: outside the validated range of the method.",
            state.drag_number
        ));
    }
    if specific_impulse > MAX_PLAUSIBLE_ISP_S {
        warnings.push(format!(
            "Required Isp ({specific_impulse:.0}s) is too high for amateur solid propellants."
        ));
    }
    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    PerformanceResult {
        propellant_mass_kg: propellant_mass,
        average_mass_kg: average_mass,
        average_thrust_n: state.thrust_n,
        total_impulse_ns: total_impulse,
        specific_impulse_s: specific_impulse,
        motor_class: classify(total_impulse),
        burnout_altitude_m: factors.fzbo * state.ideal.burnout_altitude_m,
        burnout_velocity_m_s: burnout_velocity,
        mach_burnout: burnout_velocity / SPEED_OF_SOUND_M_S,
        peak_altitude_m: state.corrected_peak_m,
        time_to_apogee_s: factors.ft * state.ideal.time_to_apogee_s,
        max_acceleration_g: state.thrust_n / average_mass / G,
        drag_influence_number: state.drag_number,
        drag_factors: factors,
        ideal: state.ideal,
        iterations,
        converged,
        warnings,
    }
}
