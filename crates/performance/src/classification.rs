//! Letter classification of total impulse (A..O).

use std::fmt;

use serde::{Serialize, Serializer};

/// Upper impulse bound (N·s) of each class; every bound doubles the previous one.
pub const MOTOR_CLASSES: [(f64, char); 15] = [
    (2.5, 'A'),
    (5.0, 'B'),
    (10.0, 'C'),
    (20.0, 'D'),
    (40.0, 'E'),
    (80.0, 'F'),
    (160.0, 'G'),
    (320.0, 'H'),
    (640.0, 'I'),
    (1_280.0, 'J'),
    (2_560.0, 'K'),
    (5_120.0, 'L'),
    (10_240.0, 'M'),
    (20_480.0, 'N'),
    (40_960.0, 'O'),
];

/// Motor class and position inside the class range `(max/2, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotorClass {
    Rated { letter: char, percent: f64 },
    /// Total impulse above the O ceiling.
    BeyondO,
}

impl MotorClass {
    pub fn letter(&self) -> char {
        match self {
            MotorClass::Rated { letter, .. } => *letter,
            MotorClass::BeyondO => 'O',
        }
    }
}

impl fmt::Display for MotorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorClass::Rated { letter, percent } => write!(f, "{letter} {percent:.0}%"),
            MotorClass::BeyondO => f.write_str("O+100%"),
        }
    }
}

impl Serialize for MotorClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Classify a total impulse in N·s.
///
/// Impulses at or below 2.5 N·s are class A; the percentage is taken over the
/// class range and is not clamped, so impulses under 1.25 N·s report a
/// negative position.
pub fn classify(total_impulse_ns: f64) -> MotorClass {
    MOTOR_CLASSES
        .iter()
        .find(|(max, _)| total_impulse_ns <= *max)
        .map(|&(max, letter)| {
            let min = max / 2.0;
            MotorClass::Rated {
                letter,
                percent: (total_impulse_ns - min) / (max - min) * 100.0,
            }
        })
        .unwrap_or(MotorClass::BeyondO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_bound_of_b_is_full() {
        assert_eq!(classify(5.0).to_string(), "B 100%");
    }

    #[test]
    fn formula_applies_below_half_of_a() {
        // (1.0 - 1.25) / (2.5 - 1.25)
        match classify(1.0) {
            MotorClass::Rated { letter, percent } => {
                assert_eq!(letter, 'A');
                assert!((percent + 20.0).abs() < 1e-12);
            }
            other => panic!("unexpected class {other:?}"),
        }
        assert_eq!(classify(1.0).to_string(), "A -20%");
    }

    #[test]
    fn lower_edge_is_exclusive() {
        let class = classify(10.0 + 1e-9);
        assert_eq!(class.letter(), 'D');
        assert_eq!(class.to_string(), "D 0%");
        assert_eq!(classify(15.0).to_string(), "D 50%");
    }

    #[test]
    fn above_o_reports_overflow() {
        assert_eq!(classify(40_960.0).to_string(), "O 100%");
        assert_eq!(classify(50_000.0), MotorClass::BeyondO);
        assert_eq!(classify(50_000.0).to_string(), "O+100%");
    }
}
