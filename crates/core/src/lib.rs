//! Core units, constants, and shared primitives for the motor design calculator workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Gravitational acceleration used by the simplified apogee method (m/s²).
    pub const G: f64 = 9.81;
    /// Reference speed of sound for burnout Mach estimates (m/s).
    pub const SPEED_OF_SOUND_M_S: f64 = 340.0;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert metres to millimetres.
    #[inline]
    pub fn m_to_mm(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert square metres to square millimetres.
    #[inline]
    pub fn m2_to_mm2(v: f64) -> f64 {
        v * 1.0e6
    }

    /// Convert a percentage to a fraction.
    #[inline]
    pub fn percent_to_fraction(v: f64) -> f64 {
        v / 100.0
    }
}

/// Circular cross-section helpers.
pub mod geometry {
    use std::f64::consts::PI;

    /// Area of a circle of radius `r`.
    #[inline]
    pub fn circle_area(r: f64) -> f64 {
        PI * r * r
    }

    /// Radius of a circle with area `area`.
    #[inline]
    pub fn circle_radius(area: f64) -> f64 {
        (area / PI).sqrt()
    }

    /// Linear interpolation over monotonically increasing knots, clamped to the end values.
    pub fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
        debug_assert_eq!(xs.len(), ys.len());
        match (xs.first(), xs.last()) {
            (Some(&lo), _) if x <= lo => ys[0],
            (_, Some(&hi)) if x >= hi => ys[ys.len() - 1],
            (Some(_), Some(_)) => {
                let idx = xs.partition_point(|&knot| knot <= x).max(1) - 1;
                let (x0, x1) = (xs[idx], xs[idx + 1]);
                let t = (x - x0) / (x1 - x0);
                ys[idx] + t * (ys[idx + 1] - ys[idx])
            }
            _ => f64::NAN,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn interp_hits_knots_and_clamps() {
            let xs = [4.0, 10.0, 20.0];
            let ys = [21.5, 26.3, 28.8];
            assert_eq!(interp(10.0, &xs, &ys), 26.3);
            assert_eq!(interp(1.0, &xs, &ys), 21.5);
            assert_eq!(interp(50.0, &xs, &ys), 28.8);
            assert!((interp(15.0, &xs, &ys) - 27.55).abs() < 1e-12);
        }

        #[test]
        fn circle_round_trip() {
            let r = 0.0123;
            assert!((circle_radius(circle_area(r)) - r).abs() < 1e-15);
        }
    }
}
