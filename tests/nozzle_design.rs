use motor_design_calculator::nozzle::contour::{
    bell_contour, cone_length, conical_contour, rao_wall_angles,
};
use motor_design_calculator::nozzle::expansion::optimal_expansion_ratio;
use motor_design_calculator::nozzle::{
    ChamberConditions, ContourKind, DEFAULT_BELL_LENGTH_PERCENT, ExpansionSource,
    NozzleDesignInput, design_nozzle,
};

fn chamber(exit_pressure_pa: f64) -> ChamberConditions {
    ChamberConditions {
        stagnation_pressure_pa: 6_106_000.0,
        exit_pressure_pa,
        stagnation_temperature_k: 1_601.209,
        specific_heat_ratio: 1.136397,
        gas_constant_j_kg_k: 234.918,
    }
}

fn input(contour: ContourKind, manual: Option<f64>) -> NozzleDesignInput {
    NozzleDesignInput {
        thrust_n: 544.81,
        chamber: chamber(101_320.0),
        contour,
        manual_expansion_ratio: manual,
        bell_length_percent: DEFAULT_BELL_LENGTH_PERCENT,
    }
}

#[test]
fn throat_is_physical_across_pressure_ratios() {
    for pe in [20_000.0, 101_320.0, 500_000.0, 3_000_000.0] {
        let mut design = input(ContourKind::Conical, Some(4.0));
        design.chamber = chamber(pe);
        let result = design_nozzle(&design).expect("valid input");
        assert!(result.throat.area_m2 > 0.0);
        assert!(result.throat.radius_m > 0.0);
        assert!(result.throat.temperature_k > 0.0);
    }
}

#[test]
fn manual_ratio_fixes_exit_area() {
    for pe in [50_000.0, 101_320.0, 1_000_000.0] {
        let mut design = input(ContourKind::Conical, Some(10.0));
        design.chamber = chamber(pe);
        let result = design_nozzle(&design).unwrap();
        assert_eq!(result.exit.source, ExpansionSource::Manual);
        let expected = 10.0 * result.throat.area_m2;
        assert!((result.exit.area_m2 - expected).abs() <= 1e-12 * expected);
    }
}

#[test]
fn omitted_ratio_uses_ideal_expansion() {
    let design = input(ContourKind::Conical, None);
    let result = design_nozzle(&design).unwrap();
    assert_eq!(result.exit.source, ExpansionSource::Optimal);
    let expected = optimal_expansion_ratio(&design.chamber);
    assert!((result.exit.expansion_ratio - expected).abs() < 1e-9 * expected);
}

#[test]
fn conical_wall_spans_throat_to_exit() {
    let profile = conical_contour(0.01, 0.03);
    let expected = 0.02 / 15f64.to_radians().tan();
    assert!((profile.length_m - expected).abs() < 1e-12);
    assert!((profile.length_m - 0.0746).abs() < 1e-4);
    assert_eq!(profile.r_m.first().copied(), Some(0.01));
    assert_eq!(profile.r_m.last().copied(), Some(0.03));
    assert_eq!(profile.x_m.last().copied(), Some(profile.length_m));
}

#[test]
fn bell_wall_is_monotone_and_ends_at_exit() {
    let rt = 0.01;
    let re = rt * 10f64.sqrt();
    let profile = bell_contour(rt, re, 10.0, DEFAULT_BELL_LENGTH_PERCENT);
    for pair in profile.r_m.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
    let (x_end, r_end) = profile.points().last().unwrap();
    assert!((x_end - profile.length_m).abs() < 1e-6);
    assert!((r_end - re).abs() < 1e-6);
    assert!((profile.length_m - 0.8 * cone_length(rt, re)).abs() < 1e-12);
}

#[test]
fn rao_angles_at_reference_ratio() {
    let angles = rao_wall_angles(10.0);
    assert!((angles.initial_deg - 26.3).abs() < 1e-12);
    assert!((angles.exit_deg - 11.0).abs() < 1e-12);
}

#[test]
fn design_is_repeatable() {
    let design = input(ContourKind::Parabolic, None);
    assert_eq!(design_nozzle(&design).unwrap(), design_nozzle(&design).unwrap());
}
