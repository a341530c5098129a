use crate::*;
use ndarray::{s, Array1, Array2, Axis};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sc_core::{CompactionError, CompactionParams, Constants, Param, Profile, DEFAULT_CONSTANTS};

fn max_porosity(porosity_max: f64) -> CompactionParams {
    CompactionParams::default().porosity_max(porosity_max)
}

fn uniform(n: usize) -> (Vec<f64>, Vec<f64>) {
    (vec![1.0; n], vec![0.5; n])
}

fn compacted_thickness(dz: &[f64], phi: &[f64], phi_new: &[f64]) -> Vec<f64> {
    dz.iter()
        .zip(phi)
        .zip(phi_new)
        .map(|((&dz, &phi), &phi_new)| conserved_thickness(dz, phi, phi_new))
        .collect()
}

fn is_strictly_decreasing(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[1] < w[0])
}

// ========== Load ==========

#[test]
fn test_layer_load() {
    assert_eq!(layer_load(1.0, 0.5, 2650.0, 1000.0, 10.0), 8250.0);
    assert_eq!(layer_load(0.0, 0.5, 2650.0, 1000.0, 10.0), 0.0);
    assert_eq!(layer_load(3.0, 1.0, 2650.0, 1000.0, 10.0), 0.0);
}

#[test]
fn test_overlying_load_excludes_own_weight() {
    let params = CompactionParams::default().gravity(10.0);
    let load =
        overlying_load(column_view(&[1.0, 2.0, 1.0]), column_view(&[0.5; 3]), &params).unwrap();
    assert_eq!(load.column(0).to_vec(), vec![0.0, 8250.0, 24750.0]);
}

#[test]
fn test_overlying_load_excess_pressure() {
    let params = CompactionParams::default().gravity(10.0).excess_pressure(100.0);
    let load = overlying_load(column_view(&[1.0, 2.0]), column_view(&[0.5; 2]), &params).unwrap();
    assert_eq!(load.column(0).to_vec(), vec![-100.0, 8150.0]);
}

// ========== Porosity ==========

#[test]
fn test_equilibrium_porosity_without_load() {
    assert_eq!(equilibrium_porosity(0.0, 5e-8, 0.1, 0.6), 0.6);
    assert!(equilibrium_porosity(1e9, 5e-8, 0.1, 0.6) > 0.1);
}

#[test]
fn test_decreasing_porosity() {
    let (dz, phi) = uniform(100);
    let phi_new = compact_porosity(&dz, &phi, &max_porosity(0.5)).unwrap();

    assert_eq!(phi_new[0], phi[0]);
    assert!(phi_new[1..].iter().all(|&p| p < 0.5));
    assert!(is_strictly_decreasing(&phi_new));
    assert!(phi_new.iter().all(|&p| (0.0..=0.5).contains(&p)));
}

#[test]
fn test_spatially_distributed() {
    let dz = Array2::from_elem((100, 10), 1.0);
    let phi = Array2::from_elem((100, 10), 0.5);
    let phi_new = compute_porosity(dz.view(), phi.view(), &max_porosity(0.5)).unwrap();

    assert_eq!(phi_new.row(0), phi.row(0));
    assert!(phi_new.slice(s![1.., ..]).iter().all(|&p| p < 0.5));
    for column in phi_new.axis_iter(Axis(1)) {
        assert!(is_strictly_decreasing(&column.to_vec()));
        assert_eq!(column, phi_new.column(0));
    }
}

#[test]
fn test_equilibrium_compaction() {
    let (dz_0, phi_0) = uniform(100);
    let params = max_porosity(0.5);

    let phi_1 = compact_porosity(&dz_0, &phi_0, &params).unwrap();
    let dz_1 = compacted_thickness(&dz_0, &phi_0, &phi_1);
    let phi_2 = compact_porosity(&dz_1, &phi_1, &params).unwrap();

    for (a, b) in phi_2.iter().zip(&phi_1) {
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }
}

#[test]
fn test_no_decompaction() {
    let (dz_0, phi_0) = uniform(100);
    let params = max_porosity(0.5);

    let phi_1 = compact_porosity(&dz_0, &phi_0, &params).unwrap();
    let mut dz_1 = compacted_thickness(&dz_0, &phi_0, &phi_1);
    dz_1[0] /= 2.0;

    let phi_2 = compact_porosity(&dz_1, &phi_1, &params).unwrap();
    assert_eq!(phi_2, phi_1);
}

#[test]
fn test_increasing_load() {
    let (dz_0, phi_0) = uniform(100);
    let params = max_porosity(0.5);

    let phi_1 = compact_porosity(&dz_0, &phi_0, &params).unwrap();
    let mut dz_1 = compacted_thickness(&dz_0, &phi_0, &phi_1);
    dz_1[0] *= 2.0;

    let phi_2 = compact_porosity(&dz_1, &phi_1, &params).unwrap();
    assert!(phi_2[1..].iter().zip(&phi_1[1..]).all(|(a, b)| a < b));
}

#[test]
fn test_zero_compaction() {
    let (dz, phi) = uniform(100);
    assert_eq!(compact_porosity(&dz, &phi, &max_porosity(0.5).c(0.0)).unwrap(), phi);
    let params = CompactionParams::default().c(0.0);
    assert_eq!(compact_porosity(&dz, &phi, &params).unwrap(), vec![0.5; 100]);
}

#[test]
fn test_increasing_compactability() {
    let (dz, phi) = uniform(100);
    let phi_1 = compact_porosity(&dz, &phi, &max_porosity(0.5).c(1e-6)).unwrap();
    let phi_2 = compact_porosity(&dz, &phi, &max_porosity(0.5).c(1e-3)).unwrap();
    assert!(phi_2[1..].iter().zip(&phi_1[1..]).all(|(a, b)| a < b));
}

#[test]
fn test_void_is_air() {
    let (dz, phi) = uniform(100);
    let phi_air = compact_porosity(&dz, &phi, &max_porosity(0.5).rho_void(0.0)).unwrap();
    let phi_water = compact_porosity(&dz, &phi, &max_porosity(0.5).rho_void(1000.0)).unwrap();
    assert!(phi_air[1..].iter().zip(&phi_water[1..]).all(|(a, b)| a < b));
}

#[test]
fn test_excess_pressure_reduces_compaction() {
    let (dz, phi) = uniform(100);
    let phi_0 = compact_porosity(&dz, &phi, &max_porosity(0.5)).unwrap();
    let phi_ep = compact_porosity(&dz, &phi, &max_porosity(0.5).excess_pressure(1e5)).unwrap();
    assert!(phi_ep.iter().zip(&phi_0).all(|(a, b)| a >= b));
    assert!(phi_ep[99] > phi_0[99]);
    assert_eq!(phi_ep[0], 0.5);
}

#[test]
fn test_porosity_min_floor() {
    let (dz, phi) = uniform(100);
    let params = max_porosity(0.5).porosity_min(0.2).c(1e-3);
    let phi_new = compact_porosity(&dz, &phi, &params).unwrap();
    assert!(phi_new.iter().all(|&p| p >= 0.2));
    assert!((phi_new[99] - 0.2).abs() < 1e-12);
}

#[test]
fn test_never_exceeds_input() {
    let mut rng = StdRng::seed_from_u64(42);
    let n = 200;
    let dz: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..10.0)).collect();
    let phi: Vec<f64> = (0..n).map(|_| rng.gen_range(0.0..=1.0)).collect();
    let params = CompactionParams::default().porosity_min(0.05).porosity_max(0.7).c(1e-7);

    let (dz_new, phi_new) = compact_column(&dz, &phi, &params).unwrap();
    for i in 0..n {
        assert!(phi_new[i] <= phi[i]);
        assert!(dz_new[i] <= dz[i]);
        assert!(dz_new[i] >= 0.0 && dz_new[i].is_finite());
    }
}

#[test]
fn test_to_analytical() {
    let (c, rho_s, rho_w, phi_0, g) = (3.68e-8, 2650.0, 1000.0, 0.6, 9.81);
    let dz = vec![10.0; 2000];
    let phi = vec![phi_0; 2000];
    let params = CompactionParams::from(Constants {
        c,
        rho_grain: rho_s,
        rho_void: rho_w,
        porosity_min: 0.0,
        porosity_max: phi_0,
        excess_pressure: 0.0,
        gravity: g,
    });

    let (dz_new, phi_numerical) = compact_column(&dz, &phi, &params).unwrap();

    let mut z = 0.0;
    let mut sup_norm: f64 = 0.0;
    for (dz, phi) in dz_new.iter().zip(&phi_numerical) {
        z += dz;
        let decay = (-c * g * (rho_s - rho_w) * z).exp();
        let phi_analytical = decay / (decay + (1.0 - phi_0) / phi_0);
        sup_norm = sup_norm.max((phi - phi_analytical).abs() / phi_analytical);
    }
    assert!(sup_norm < 0.01, "sup norm = {sup_norm}");
}

// ========== Broadcast parameters ==========

#[test]
fn test_per_column_parameter() {
    let dz = Array2::from_elem((50, 2), 1.0);
    let phi = Array2::from_elem((50, 2), 0.5);
    let params = max_porosity(0.5).c(Param::PerColumn(Array1::from(vec![0.0, 5e-8])));
    let phi_new = compute_porosity(dz.view(), phi.view(), &params).unwrap();

    assert!(phi_new.column(0).iter().all(|&p| p == 0.5));
    assert!(is_strictly_decreasing(&phi_new.column(1).to_vec()));
}

#[test]
fn test_per_layer_parameter() {
    let (dz, phi) = uniform(3);
    let params = max_porosity(0.5).rho_grain(vec![2650.0, 1000.0, 2650.0]);
    let load = overlying_load(column_view(&dz), column_view(&phi), &params).unwrap();
    // the middle layer is neutrally buoyant
    assert_eq!(load[[1, 0]], load[[2, 0]]);
}

#[test]
fn test_parameter_shape_mismatch() {
    let (dz, phi) = uniform(100);
    let params = CompactionParams::default().c(vec![5e-8; 3]);
    let err = compact_porosity(&dz, &phi, &params).unwrap_err();
    assert!(matches!(err, CompactionError::ShapeMismatch { name: "c", .. }));
}

#[test]
fn test_profile_shape_mismatch() {
    let err = compact_porosity(&[1.0; 3], &[0.5; 4], &CompactionParams::default()).unwrap_err();
    match err {
        CompactionError::ShapeMismatch { name, expected, actual } => {
            assert_eq!(name, "porosity");
            assert_eq!(expected, vec![3, 1]);
            assert_eq!(actual, vec![4, 1]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ========== Thickness ==========

#[test]
fn test_thickness_decreases_with_depth() {
    let (dz, phi) = uniform(100);
    let (dz_new, phi_new) = compact_column(&dz, &phi, &max_porosity(0.5)).unwrap();

    assert_eq!(phi_new[0], 0.5);
    assert_eq!(dz_new[0], 1.0);
    assert!(dz_new[1..].iter().all(|&t| t < 1.0));
    assert!(is_strictly_decreasing(&dz_new));
}

#[test]
fn test_thickness_conserves_solids() {
    let (dz, phi) = uniform(20);
    let (dz_new, phi_new) = compact_column(&dz, &phi, &max_porosity(0.5).c(1e-6)).unwrap();
    for i in 0..20 {
        let before = dz[i] * (1.0 - phi[i]);
        let after = dz_new[i] * (1.0 - phi_new[i]);
        assert!((before - after).abs() < 1e-12);
    }
}

#[test]
fn test_full_void_layer() {
    assert_eq!(conserved_thickness(1.0, 1.0, 1.0), 0.0);
    assert_eq!(conserved_thickness(2.0, 0.5, 1.0), 0.0);

    let (dz_new, phi_new) =
        compact_column(&[1.0, 1.0, 1.0], &[1.0, 0.5, 1.0], &CompactionParams::default()).unwrap();
    assert_eq!(phi_new[0], 1.0);
    assert_eq!(dz_new[0], 0.0);
    assert!(phi_new[2] < 1.0);
    assert_eq!(dz_new[2], 0.0);
    assert!(dz_new.iter().all(|t| t.is_finite()));
}

#[test]
fn test_thickness_formula_without_compaction_clamp() {
    assert!((conserved_thickness(1.0, 0.5, 0.6) - 1.25).abs() < 1e-12);
    assert_eq!(conserved_thickness(2.0, 0.5, 0.75), 4.0);
    assert_eq!(conserved_thickness(1.0, 0.5, 0.5), 1.0);
    assert!(conserved_thickness(1.0, 0.5, 0.25) < 1.0);
}

#[test]
fn test_thickness_propagates_nan() {
    assert!(conserved_thickness(1.0, 0.5, f64::NAN).is_nan());
    assert!(conserved_thickness(f64::NAN, 0.5, 0.4).is_nan());
}

#[test]
fn test_zero_thickness_layer() {
    let (dz_new, phi_new) =
        compact_column(&[1.0, 0.0, 1.0], &[0.5; 3], &max_porosity(0.5)).unwrap();
    assert_eq!(dz_new[1], 0.0);
    assert_eq!(phi_new[1], phi_new[2]);
    assert!(phi_new.iter().all(|p| p.is_finite()));
}

#[test]
fn test_output_buffer() {
    let dz = Array2::from_elem((100, 1), 1.0);
    let phi = Array2::from_elem((100, 1), 0.5);
    let params = max_porosity(0.5);
    let phi_new = compute_porosity(dz.view(), phi.view(), &params).unwrap();

    let mut out = Array2::from_elem((100, 1), f64::NAN);
    compute_thickness_into(dz.view(), phi.view(), phi_new.view(), out.view_mut()).unwrap();
    assert_eq!(out, compute_thickness(dz.view(), phi.view(), phi_new.view()).unwrap());
}

#[test]
fn test_output_buffer_shape_mismatch() {
    let dz = Array2::from_elem((100, 1), 1.0);
    let phi = Array2::from_elem((100, 1), 0.5);
    let phi_new = compute_porosity(dz.view(), phi.view(), &max_porosity(0.5)).unwrap();

    let mut out = Array2::from_elem((99, 1), -1.0);
    let err = compute_thickness_into(dz.view(), phi.view(), phi_new.view(), out.view_mut())
        .unwrap_err();
    match err {
        CompactionError::ShapeMismatch { name, expected, actual } => {
            assert_eq!(name, "output buffer");
            assert_eq!(expected, vec![100, 1]);
            assert_eq!(actual, vec![99, 1]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(out.iter().all(|&v| v == -1.0));
}

// ========== Fused / profile ==========

#[test]
fn test_compact_matches_parts() {
    let dz = Array2::from_elem((30, 4), 2.0);
    let phi = Array2::from_elem((30, 4), 0.4);
    let params = max_porosity(0.4);
    let out = compact(dz.view(), phi.view(), &params).unwrap();
    let phi_new = compute_porosity(dz.view(), phi.view(), &params).unwrap();
    assert_eq!(out.porosity, phi_new);
    assert_eq!(out.thickness, compute_thickness(dz.view(), phi.view(), phi_new.view()).unwrap());
}

#[test]
fn test_compact_empty_profile() {
    let (dz, phi) = compact_column(&[], &[], &CompactionParams::default()).unwrap();
    assert!(dz.is_empty() && phi.is_empty());
}

#[test]
fn test_compact_profile() {
    let profile = Profile::uniform(3, 100.0, 0.5);
    let out = compact_profile(&profile, &max_porosity(0.5)).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out.thickness[0], 100.0);
    assert!(out.porosity[2] < out.porosity[1]);
}

// ========== Layer stack ==========

#[test]
fn test_stack_without_layers() {
    let mut stack = LayerStack::new(15);
    Compact::new(DEFAULT_CONSTANTS).unwrap().run_one_step(&mut stack).unwrap();
    assert_eq!(stack.n_layers(), 0);
    assert_eq!(stack.n_columns(), 15);
}

#[test]
fn test_stack_with_layers() {
    let mut stack = LayerStack::new(15);
    for _ in 0..5 {
        stack.add(100.0, 0.7).unwrap();
    }
    let compact = Compact::new(Constants {
        porosity_min: 0.1,
        porosity_max: 0.7,
        ..DEFAULT_CONSTANTS
    })
    .unwrap();
    compact.run_one_step(&mut stack).unwrap();

    // row 4 is the top of the stack
    assert!(stack.porosity().row(4).iter().all(|&p| p == 0.7));
    assert!(stack.dz().row(4).iter().all(|&t| t == 100.0));
    assert!(stack.porosity().slice(s![..4, ..]).iter().all(|&p| p < 0.7));
    assert!(stack.dz().slice(s![..4, ..]).iter().all(|&t| t < 100.0));
}

#[test]
fn test_stack_matches_top_first_engine() {
    let mut stack = LayerStack::new(1);
    let deposits = [(10.0, 0.6), (20.0, 0.5), (5.0, 0.55)];
    for (dz, phi) in deposits {
        stack.add(dz, phi).unwrap();
    }
    Compact::new(DEFAULT_CONSTANTS).unwrap().run_one_step(&mut stack).unwrap();

    let dz: Vec<f64> = deposits.iter().rev().map(|d| d.0).collect();
    let phi: Vec<f64> = deposits.iter().rev().map(|d| d.1).collect();
    let (dz_new, phi_new) = compact_column(&dz, &phi, &CompactionParams::default()).unwrap();

    let stacked_phi: Vec<f64> = stack.porosity().column(0).iter().rev().copied().collect();
    let stacked_dz: Vec<f64> = stack.dz().column(0).iter().rev().copied().collect();
    assert_eq!(stacked_phi, phi_new);
    assert_eq!(stacked_dz, dz_new);
}

#[test]
fn test_stack_compacts_evenly() {
    let mut stack = LayerStack::new(15);
    for _ in 0..3 {
        stack.add(100.0, 0.7).unwrap();
    }
    Compact::new(Constants { porosity_min: 0.1, porosity_max: 0.7, ..DEFAULT_CONSTANTS })
        .unwrap()
        .run_one_step(&mut stack)
        .unwrap();
    for row in stack.porosity().axis_iter(Axis(0)) {
        assert!(row.iter().all(|&p| p == row[0]));
    }
}

#[test]
fn test_stack_per_layer_params_follow_stack_order() {
    let mut stack = LayerStack::new(2);
    for _ in 0..3 {
        stack.add(10.0, 0.5).unwrap();
    }
    // deepest layer is incompressible
    let params = max_porosity(0.5).c(vec![0.0, 1e-7, 1e-7]);
    Compact::with_params(params).unwrap().run_one_step(&mut stack).unwrap();

    assert!(stack.porosity().row(0).iter().all(|&p| p == 0.5));
    assert!(stack.porosity().row(1).iter().all(|&p| p < 0.5));
    assert!(stack.porosity().row(2).iter().all(|&p| p == 0.5));
}

#[test]
fn test_stack_add_layer_shape() {
    let mut stack = LayerStack::new(3);
    let err = stack.add_layer(&[1.0, 1.0], &[0.5, 0.5, 0.5]).unwrap_err();
    assert!(matches!(err, CompactionError::ShapeMismatch { name: "thickness", .. }));
    assert_eq!(stack.n_layers(), 0);
    stack.add_layer(&[1.0, 2.0, 3.0], &[0.5, 0.4, 0.3]).unwrap();
    assert_eq!(stack.dz().row(0).to_vec(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_compact_rejects_bad_constants() {
    let bad = [
        Constants { c: -1.0, ..DEFAULT_CONSTANTS },
        Constants { rho_grain: 0.0, ..DEFAULT_CONSTANTS },
        Constants { porosity_min: -1e-6, ..DEFAULT_CONSTANTS },
        Constants { porosity_max: 1.0 + 1e-6, ..DEFAULT_CONSTANTS },
        Constants { rho_void: -1.0, ..DEFAULT_CONSTANTS },
    ];
    for constants in bad {
        assert!(matches!(
            Compact::new(constants),
            Err(CompactionError::InvalidParameter { .. })
        ));
    }
    assert!(Compact::with_params(CompactionParams::default().gravity(-9.8)).is_err());
}

#[test]
fn test_with_params_rejects_inverted_scalar_bounds() {
    let inverted = CompactionParams::default().porosity_min(0.8).porosity_max(0.2);
    assert!(matches!(
        Compact::with_params(inverted),
        Err(CompactionError::InvalidParameter { name: "porosity_max", .. })
    ));
    let ordered = CompactionParams::default().porosity_min(0.2).porosity_max(0.8);
    assert!(Compact::with_params(ordered).is_ok());
}
