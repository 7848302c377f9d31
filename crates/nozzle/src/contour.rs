//! Divergent wall contours: 15° cone and Rao thrust-optimised bell.
//!
//! Profiles run from the throat (`x = 0`) to the exit plane (`x = L`) and are
//! expressed in metres. The bell is approximated by a circular throat arc
//! blended into a quadratic Bézier whose control point is the intersection of
//! the inflection and exit tangents.

use std::f64::consts::FRAC_PI_2;

use motor_core::geometry::{circle_area, interp};
use serde::{Deserialize, Serialize};

/// Half-angle of the reference conical nozzle (degrees).
pub const CONE_HALF_ANGLE_DEG: f64 = 15.0;
/// Bell length as a percentage of the equivalent 15° cone.
pub const DEFAULT_BELL_LENGTH_PERCENT: f64 = 80.0;
/// Downstream throat arc radius as a fraction of the throat radius.
pub const THROAT_ARC_RADIUS_FACTOR: f64 = 0.382;
/// Substitute length for degenerate (non-positive) contours (m).
pub const MIN_CONTOUR_LENGTH_M: f64 = 0.001;

pub const CONE_SAMPLES: usize = 100;
pub const ARC_SAMPLES: usize = 20;
pub const BELL_SAMPLES: usize = 80;

/// Slope difference below which the two bell tangents count as parallel.
const PARALLEL_SLOPE_EPS: f64 = 1e-5;
/// Perturbation applied to the exit slope when the tangents are parallel.
const PARALLEL_SLOPE_NUDGE: f64 = 0.01;

/// Reference expansion ratios for the Rao wall angle charts.
pub const RAO_EXPANSION_REFS: [f64; 5] = [4.0, 10.0, 20.0, 50.0, 100.0];
/// Initial divergence angle `θn` at each reference ratio (degrees).
pub const RAO_INITIAL_ANGLE_DEG: [f64; 5] = [21.5, 26.3, 28.8, 31.5, 33.5];
/// Exit angle `θe` at each reference ratio (degrees).
pub const RAO_EXIT_ANGLE_DEG: [f64; 5] = [14.0, 11.0, 9.0, 7.5, 7.0];

/// Wall profile family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContourKind {
    #[default]
    Conical,
    Parabolic,
}

/// Sampled wall profile, throat to exit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContourProfile {
    pub x_m: Vec<f64>,
    pub r_m: Vec<f64>,
    pub length_m: f64,
}

impl ContourProfile {
    pub fn len(&self) -> usize {
        self.x_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_m.is_empty()
    }

    /// Cross-sectional area `π·r²` at every sample (m²).
    pub fn areas_m2(&self) -> Vec<f64> {
        self.r_m.iter().copied().map(circle_area).collect()
    }

    /// Iterate `(x, r)` pairs.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x_m.iter().copied().zip(self.r_m.iter().copied())
    }
}

/// Bell wall angles interpolated from the Rao charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WallAngles {
    pub initial_deg: f64,
    pub exit_deg: f64,
}

impl WallAngles {
    pub fn initial_rad(&self) -> f64 {
        self.initial_deg.to_radians()
    }

    pub fn exit_rad(&self) -> f64 {
        self.exit_deg.to_radians()
    }
}

/// Interpolate `θn` and `θe` for an expansion ratio clamped to `[4, 100]`.
pub fn rao_wall_angles(expansion_ratio: f64) -> WallAngles {
    let eps = expansion_ratio.clamp(RAO_EXPANSION_REFS[0], RAO_EXPANSION_REFS[4]);
    WallAngles {
        initial_deg: interp(eps, &RAO_EXPANSION_REFS, &RAO_INITIAL_ANGLE_DEG),
        exit_deg: interp(eps, &RAO_EXPANSION_REFS, &RAO_EXIT_ANGLE_DEG),
    }
}

/// Length of a 15° cone between the two radii, before any flooring.
pub fn cone_length(throat_radius_m: f64, exit_radius_m: f64) -> f64 {
    (exit_radius_m - throat_radius_m) / CONE_HALF_ANGLE_DEG.to_radians().tan()
}

fn floored_length(raw: f64) -> f64 {
    if raw > 0.0 {
        raw
    } else {
        tracing::warn!(
            raw_length_m = raw,
            floor_m = MIN_CONTOUR_LENGTH_M,
            "degenerate contour length, substituting floor"
        );
        MIN_CONTOUR_LENGTH_M
    }
}

fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Straight 15° wall from the throat to the exit plane.
pub fn conical_contour(throat_radius_m: f64, exit_radius_m: f64) -> ContourProfile {
    let raw = cone_length(throat_radius_m, exit_radius_m);
    let length = floored_length(raw);
    let slope = CONE_HALF_ANGLE_DEG.to_radians().tan();

    let x_m = linspace(0.0, length, CONE_SAMPLES);
    let mut r_m: Vec<f64> = x_m.iter().map(|x| throat_radius_m + x * slope).collect();
    if raw > 0.0 {
        if let Some(last) = r_m.last_mut() {
            *last = exit_radius_m;
        }
    }

    ContourProfile {
        x_m,
        r_m,
        length_m: length,
    }
}

/// Rao bell approximated by a throat arc and a quadratic Bézier.
///
/// `length_percent` is the bell length relative to the equivalent 15° cone.
pub fn bell_contour(
    throat_radius_m: f64,
    exit_radius_m: f64,
    expansion_ratio: f64,
    length_percent: f64,
) -> ContourProfile {
    let angles = rao_wall_angles(expansion_ratio);
    let theta_n = angles.initial_rad();
    let theta_e = angles.exit_rad();

    let length =
        floored_length((length_percent / 100.0) * cone_length(throat_radius_m, exit_radius_m));

    // Throat arc, centred above the throat, swept from -90° to θn - 90°.
    let arc_radius = THROAT_ARC_RADIUS_FACTOR * throat_radius_m;
    let arc_centre_r = throat_radius_m + arc_radius;
    let sweep = linspace(-FRAC_PI_2, theta_n - FRAC_PI_2, ARC_SAMPLES);
    let mut x_m: Vec<f64> = sweep.iter().map(|t| arc_radius * t.cos()).collect();
    let mut r_m: Vec<f64> = sweep
        .iter()
        .map(|t| arc_radius * t.sin() + arc_centre_r)
        .collect();
    if let (Some(x0), Some(r0)) = (x_m.first_mut(), r_m.first_mut()) {
        *x0 = 0.0;
        *r0 = throat_radius_m;
    }

    let inflection = (
        x_m.last().copied().unwrap_or(0.0),
        r_m.last().copied().unwrap_or(throat_radius_m),
    );
    let exit = (length, exit_radius_m);
    if inflection.0 >= exit.0 || inflection.1 >= exit.1 {
        tracing::warn!(
            inflection_x_m = inflection.0,
            inflection_r_m = inflection.1,
            exit_x_m = exit.0,
            exit_r_m = exit.1,
            "bell inflection point lies beyond the exit plane"
        );
    }

    let control = tangent_intersection(inflection, theta_n.tan(), exit, theta_e.tan());

    for t in linspace(0.0, 1.0, BELL_SAMPLES).into_iter().skip(1) {
        let (x, r) = quadratic_bezier(inflection, control, exit, t);
        x_m.push(x);
        r_m.push(r);
    }

    ContourProfile {
        x_m,
        r_m,
        length_m: length,
    }
}

/// Intersection of the line through `n` with slope `m1` and the line through `e` with slope `m2`.
fn tangent_intersection(n: (f64, f64), m1: f64, e: (f64, f64), m2: f64) -> (f64, f64) {
    let m2 = if (m1 - m2).abs() < PARALLEL_SLOPE_EPS {
        m2 + PARALLEL_SLOPE_NUDGE
    } else {
        m2
    };
    let qx = (e.1 - n.1 + m1 * n.0 - m2 * e.0) / (m1 - m2);
    let qy = m1 * (qx - n.0) + n.1;
    (qx, qy)
}

fn quadratic_bezier(p0: (f64, f64), q: (f64, f64), p1: (f64, f64), t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    let a = u * u;
    let b = 2.0 * u * t;
    let c = t * t;
    (a * p0.0 + b * q.0 + c * p1.0, a * p0.1 + b * q.1 + c * p1.1)
}

/// Generate the profile for `kind`.
pub fn generate_contour(
    kind: ContourKind,
    throat_radius_m: f64,
    exit_radius_m: f64,
    expansion_ratio: f64,
    bell_length_percent: f64,
) -> ContourProfile {
    match kind {
        ContourKind::Conical => conical_contour(throat_radius_m, exit_radius_m),
        ContourKind::Parabolic => bell_contour(
            throat_radius_m,
            exit_radius_m,
            expansion_ratio,
            bell_length_percent,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_non_decreasing(values: &[f64]) {
        for pair in values.windows(2) {
            assert!(pair[1] >= pair[0], "{} followed by {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn cone_matches_reference_length_and_endpoints() {
        let profile = conical_contour(0.01, 0.03);
        let expected = 0.02 / 15f64.to_radians().tan();
        assert!((profile.length_m - expected).abs() < 1e-12);
        assert!((profile.length_m - 0.0746).abs() < 1e-4);
        assert_eq!(profile.len(), CONE_SAMPLES);
        assert_eq!(profile.x_m[0], 0.0);
        assert_eq!(profile.r_m[0], 0.01);
        assert_eq!(*profile.x_m.last().unwrap(), profile.length_m);
        assert_eq!(*profile.r_m.last().unwrap(), 0.03);
        assert_non_decreasing(&profile.r_m);
    }

    #[test]
    fn degenerate_cone_uses_floor() {
        let profile = conical_contour(0.02, 0.02);
        assert_eq!(profile.length_m, MIN_CONTOUR_LENGTH_M);
        assert_eq!(profile.len(), CONE_SAMPLES);
        assert!(profile.x_m.iter().all(|x| x.is_finite()));
    }

    #[test]
    fn wall_angles_hit_reference_points() {
        let angles = rao_wall_angles(10.0);
        assert!((angles.initial_deg - 26.3).abs() < 1e-12);
        assert!((angles.exit_deg - 11.0).abs() < 1e-12);
    }

    #[test]
    fn wall_angles_clamp_outside_chart() {
        assert_eq!(rao_wall_angles(2.0), rao_wall_angles(4.0));
        assert_eq!(rao_wall_angles(400.0).initial_deg, 33.5);
        assert_eq!(rao_wall_angles(400.0).exit_deg, 7.0);
        let mid = rao_wall_angles(15.0);
        assert!((mid.initial_deg - 27.55).abs() < 1e-9);
        assert!((mid.exit_deg - 10.0).abs() < 1e-9);
    }

    #[test]
    fn bell_profile_is_monotone_and_hits_exit() {
        let rt = 0.01;
        let eps: f64 = 10.0;
        let re = rt * eps.sqrt();
        let profile = bell_contour(rt, re, eps, DEFAULT_BELL_LENGTH_PERCENT);

        assert_eq!(profile.len(), ARC_SAMPLES + BELL_SAMPLES - 1);
        assert_eq!(profile.r_m[0], rt);
        assert_eq!(profile.x_m[0], 0.0);
        let (x_end, r_end) = profile.points().last().unwrap();
        assert!((x_end - profile.length_m).abs() < 1e-6);
        assert!((r_end - re).abs() < 1e-6);
        assert_non_decreasing(&profile.r_m);
        assert_non_decreasing(&profile.x_m);

        let expected_length = 0.8 * cone_length(rt, re);
        assert!((profile.length_m - expected_length).abs() < 1e-12);
    }

    #[test]
    fn bell_has_no_duplicate_junction_point() {
        let profile = bell_contour(0.01, 0.04, 16.0, 80.0);
        let junction = ARC_SAMPLES - 1;
        assert!(profile.x_m[junction + 1] > profile.x_m[junction]);
    }

    #[test]
    fn bell_is_shorter_than_cone() {
        let cone = conical_contour(0.01, 0.05);
        let bell = bell_contour(0.01, 0.05, 25.0, 80.0);
        assert!(bell.length_m < cone.length_m);
    }

    #[test]
    fn parallel_tangents_are_nudged() {
        let (qx, qy) = tangent_intersection((0.0, 0.0), 0.3, (1.0, 0.3), 0.3);
        assert!(qx.is_finite() && qy.is_finite());
    }

    #[test]
    fn areas_follow_radius() {
        let profile = conical_contour(0.01, 0.03);
        let areas = profile.areas_m2();
        assert_eq!(areas.len(), profile.len());
        assert!((areas[0] - std::f64::consts::PI * 1e-4).abs() < 1e-15);
    }
}
