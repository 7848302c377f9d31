//! Average thrust and total impulse needed to reach a target apogee.
//!
//! Uses the simplified drag-correction method: a drag-free ballistic estimate
//! scaled by empirical reduction factors (see `motor_drag`), iterated on the
//! average thrust until the corrected apogee hits the target.

pub mod apogee;
pub mod classification;

use thiserror::Error;

pub use apogee::{IdealFlight, PerformanceInput, PerformanceResult, solve_unchecked};
pub use classification::{MotorClass, classify};
pub use motor_drag::DragFactors;

#[derive(Debug, Error, PartialEq)]
pub enum PerformanceError {
    #[error("invalid {field} ({value}): {reason}")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

fn positive(field: &'static str, value: f64) -> Result<(), PerformanceError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(PerformanceError::InvalidInput {
            field,
            value,
            reason: "must be positive",
        })
    }
}

/// Reject inputs the closed-form kinematics cannot handle.
pub fn validate(input: &PerformanceInput) -> Result<(), PerformanceError> {
    positive("target apogee", input.target_apogee_m)?;
    positive("burn time", input.burn_time_s)?;
    positive("empty mass", input.empty_mass_kg)?;
    positive("diameter", input.diameter_cm)?;
    if input.drag_coefficient.is_nan() || input.drag_coefficient < 0.0 {
        return Err(PerformanceError::InvalidInput {
            field: "drag coefficient",
            value: input.drag_coefficient,
            reason: "must not be negative",
        });
    }
    let total_mass = input.empty_mass_kg + input.propellant_mass_kg();
    if total_mass.is_nan() || total_mass <= 0.0 {
        return Err(PerformanceError::InvalidInput {
            field: "propellant mass percent",
            value: input.propellant_mass_percent,
            reason: "leaves no positive vehicle mass",
        });
    }
    Ok(())
}

/// Validate the input, then run the apogee goal-seek.
pub fn solve_apogee(input: &PerformanceInput) -> Result<PerformanceResult, PerformanceError> {
    validate(input)?;
    Ok(solve_unchecked(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> PerformanceInput {
        PerformanceInput {
            target_apogee_m: 500.0,
            burn_time_s: 3.0,
            empty_mass_kg: 1.5,
            propellant_mass_percent: 20.0,
            diameter_cm: 8.0,
            drag_coefficient: 0.4,
        }
    }

    #[test]
    fn rejects_non_positive_burn_time() {
        let mut bad = input();
        bad.burn_time_s = 0.0;
        assert!(matches!(
            solve_apogee(&bad),
            Err(PerformanceError::InvalidInput {
                field: "burn time",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_drag_and_nan() {
        let mut bad = input();
        bad.drag_coefficient = -0.1;
        assert!(solve_apogee(&bad).is_err());
        bad.drag_coefficient = f64::NAN;
        assert!(solve_apogee(&bad).is_err());
    }

    #[test]
    fn rejects_propellant_fraction_that_removes_all_mass() {
        let mut bad = input();
        bad.propellant_mass_percent = -100.0;
        assert!(solve_apogee(&bad).is_err());
    }

    #[test]
    fn zero_drag_is_allowed() {
        let mut ok = input();
        ok.drag_coefficient = 0.0;
        let result = solve_apogee(&ok).expect("solve");
        assert_eq!(result.drag_factors, DragFactors::IDENTITY);
    }
}
