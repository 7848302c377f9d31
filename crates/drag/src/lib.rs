//! Drag reduction factors for the simplified (Nakka) apogee method.
//!
//! The factors scale an idealised drag-free flight towards a drag-corrected
//! estimate. They are read off the published "Drag Reduction Factors" chart and
//! are indexed by the drag influence number `N = Cd·D²·V1² / (1000·m_empty)`.

use serde::Serialize;

/// Correction factors applied to the drag-free trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DragFactors {
    /// Peak altitude factor.
    pub fz: f64,
    /// Burnout altitude factor.
    pub fzbo: f64,
    /// Maximum (burnout) velocity factor.
    pub fv: f64,
    /// Time-to-apogee factor.
    pub ft: f64,
}

impl DragFactors {
    /// Factors for a drag-free flight.
    pub const IDENTITY: DragFactors = DragFactors {
        fz: 1.0,
        fzbo: 1.0,
        fv: 1.0,
        ft: 1.0,
    };

    fn lerp(a: &DragFactors, b: &DragFactors, t: f64) -> DragFactors {
        DragFactors {
            fz: a.fz + t * (b.fz - a.fz),
            fzbo: a.fzbo + t * (b.fzbo - a.fzbo),
            fv: a.fv + t * (b.fv - a.fv),
            ft: a.ft + t * (b.ft - a.ft),
        }
    }
}

/// Upper end of the tabulated drag influence numbers.
pub const MAX_TABULATED_N: f64 = 1_000.0;

const fn row(n: f64, fz: f64, fzbo: f64, fv: f64, ft: f64) -> (f64, DragFactors) {
    (n, DragFactors { fz, fzbo, fv, ft })
}

/// Reference rows `(N, factors)` in increasing `N`.
pub static DRAG_TABLE: [(f64, DragFactors); 13] = [
    row(0.0, 1.000, 1.000, 1.000, 1.000),
    row(50.0, 0.910, 0.998, 0.995, 0.940),
    row(100.0, 0.840, 0.995, 0.990, 0.890),
    row(150.0, 0.780, 0.992, 0.985, 0.850),
    row(200.0, 0.720, 0.990, 0.980, 0.810),
    row(300.0, 0.630, 0.985, 0.970, 0.750),
    row(400.0, 0.570, 0.980, 0.960, 0.700),
    row(500.0, 0.520, 0.975, 0.950, 0.660),
    row(600.0, 0.480, 0.970, 0.945, 0.630),
    row(700.0, 0.450, 0.965, 0.940, 0.600),
    row(800.0, 0.420, 0.960, 0.935, 0.580),
    row(900.0, 0.405, 0.955, 0.930, 0.570),
    row(1000.0, 0.400, 0.950, 0.925, 0.560),
];

/// Look up the drag reduction factors for a drag influence number.
///
/// Values at or below zero return [`DragFactors::IDENTITY`], values at or above
/// [`MAX_TABULATED_N`] clamp to the last row, everything else is linearly
/// interpolated between the bracketing rows.
pub fn lookup(n: f64) -> DragFactors {
    if n <= 0.0 {
        return DragFactors::IDENTITY;
    }
    let last = DRAG_TABLE[DRAG_TABLE.len() - 1].1;
    if n >= MAX_TABULATED_N {
        return last;
    }

    DRAG_TABLE
        .windows(2)
        .find(|pair| pair[0].0 <= n && n <= pair[1].0)
        .map(|pair| {
            let (n1, lo) = pair[0];
            let (n2, hi) = pair[1];
            DragFactors::lerp(&lo, &hi, (n - n1) / (n2 - n1))
        })
        // NaN falls through every bracket.
        .unwrap_or(last)
}
