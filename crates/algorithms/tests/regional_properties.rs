//! Properties of the regional statistics that hold across modules.

use approx::assert_relative_eq;
use gwstats_algorithms::prelude::*;
use gwstats_algorithms::statistics::{kernel_weight, signed_cube_root};

fn grid(rows: usize, cols: usize, name: &str, f: impl Fn(usize, usize) -> f64) -> Raster {
    let data = (0..rows * cols).map(|i| f(i / cols, i % cols)).collect();
    Raster::from_vec(data, rows, cols)
        .unwrap()
        .with_transform(GeoTransform::square(500.0, 1000.0, 10.0))
        .with_name(name)
}

/// Deterministic pseudo-random surface
fn rough(row: usize, col: usize) -> f64 {
    let x = (row * 7919 + col * 104_729) % 1009;
    (x as f64 * 0.37).sin() * 50.0 + row as f64
}

#[test]
fn weights_decay_monotonically() {
    for wf in [0.0, 0.25, 0.5, 1.0, 2.0, 3.5] {
        let mut last = f64::INFINITY;
        for step in 0..100 {
            let delta = step as f64 * 0.1;
            match kernel_weight(10.0, 2.0, wf, delta) {
                Some(w) => {
                    assert!(w <= last, "wf {wf} at {delta}");
                    last = w;
                }
                None => panic!("{delta} is inside the kernel"),
            }
        }
        assert_eq!(kernel_weight(10.0, 2.0, wf, 10.0), None);
        assert_eq!(kernel_weight(10.0, 2.0, wf, 12.5), None);
    }
}

#[test]
fn flat_kernel_weighted_mean_matches_mean() {
    let g = grid(12, 12, "dem", rough);
    let kernel = KernelSpec::for_grid(&g, 25.0, 1.0, 0.0).unwrap();
    let sel = Selection::from_tokens(["Mean", "WMean1"]);
    let out = region_univariate_statistics(&g, &sel, &kernel, &GwsConfig::default()).unwrap();
    let mean = out.get("Mean_dem").unwrap();
    let w_mean = out.get("WMean1_dem").unwrap();
    for row in 3..9 {
        for col in 3..9 {
            assert_relative_eq!(mean.get(row, col).unwrap(), w_mean.get(row, col).unwrap(), epsilon = 1e-9);
        }
    }
}

#[test]
fn incremental_weighted_mean_matches_ratio() {
    let mut g = grid(14, 14, "dem", rough);
    g.set(6, 6, -9999.0).unwrap();
    for wf in [-1.5, 0.5, 2.0] {
        let kernel = KernelSpec::for_grid(&g, 40.0, 3.0, wf).unwrap();
        let sel = Selection::from_tokens(["WMean1", "WMean2"]);
        let out = region_univariate_statistics(&g, &sel, &kernel, &GwsConfig::default()).unwrap();
        let ratio = out.get("WMean1_dem").unwrap();
        let running = out.get("WMean2_dem").unwrap();
        for (x, y) in ratio.data().iter().zip(running.data()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-9, max_relative = 1e-12);
        }
    }
}

#[test]
fn kernel_wider_than_grid_sweeps_directly() {
    let g = grid(8, 8, "dem", rough);
    // 40 cells reach past every edge from every cell
    let kernel = KernelSpec::for_grid(&g, 400.0, 1.0, 0.0).unwrap();
    let direct = GwsConfig {
        fast_path_max_cell_distance: 8,
        ..Default::default()
    };
    let sel = Selection::from_tokens(["WSum", "Mean"]);
    let out = region_univariate_statistics(&g, &sel, &kernel, &direct).unwrap();
    let total: f64 = g.data().iter().sum();
    for &v in out.get("WSum_dem").unwrap().data() {
        assert_relative_eq!(v, total, max_relative = 1e-12);
    }
    for &v in out.get("Mean_dem").unwrap().data() {
        assert_relative_eq!(v, total / 64.0, max_relative = 1e-12);
    }
}

#[test]
fn cube_root_keeps_sign() {
    for x in [-8.0, -0.001, 0.0, 0.001, 27.0] {
        let c = signed_cube_root(x);
        assert_relative_eq!(c * c * c, x, epsilon = 1e-12);
        assert!(c * x >= 0.0);
    }
}

#[test]
fn unsupported_cells_are_sentinel_everywhere() {
    let mut g = grid(10, 10, "holes", |_, _| -9999.0);
    g.set(0, 0, 1.0).unwrap();
    g.set(0, 1, 2.0).unwrap();
    let kernel = KernelSpec::for_grid(&g, 20.0, 1.0, 1.0).unwrap();
    let sel = Selection::from_tokens(["FirstOrder", "SecondOrder"]);
    let out = region_univariate_statistics(&g, &sel, &kernel, &GwsConfig::default()).unwrap();
    assert_eq!(out.len(), 1 + Statistic::ALL.len());
    for (name, raster) in out.iter() {
        assert_eq!(raster.get(9, 9).unwrap(), -9999.0, "{name}");
        assert!(raster.data().iter().all(|v| v.is_finite()), "{name}");
    }
}

#[test]
fn uniform_grid_has_uniform_density() {
    let g = grid(20, 20, "u", |_, _| 1.0);
    let out = geometric_density(&g, 80.0, &GwsConfig::default()).unwrap();
    assert_eq!(out.len(), 4);
    for (_, raster) in out.iter() {
        for &v in raster.data() {
            assert_relative_eq!(v, 1.0, epsilon = 1e-9);
        }
    }
}

#[test]
fn cached_and_direct_sweeps_agree() {
    let mut g = grid(20, 20, "dem", rough);
    g.set(5, 5, -9999.0).unwrap();
    g.set(12, 3, f64::NAN).unwrap();
    let sel = Selection::from_tokens(["All"]);
    let direct = GwsConfig {
        fast_path_max_cell_distance: 0,
        ..Default::default()
    };

    for (distance, wf) in [(10.0, 0.0), (25.0, 1.0), (35.0, -0.5), (50.0, 2.0)] {
        let kernel = KernelSpec::for_grid(&g, distance, 1.5, wf).unwrap();
        assert!(kernel.cell_distance() <= 5);
        let fast = region_univariate_statistics(&g, &sel, &kernel, &GwsConfig::default()).unwrap();
        let slow = region_univariate_statistics(&g, &sel, &kernel, &direct).unwrap();
        assert_eq!(fast.len(), slow.len());
        for ((name, a), (_, b)) in fast.iter().zip(slow.iter()) {
            for (x, y) in a.data().iter().zip(b.data()) {
                assert_relative_eq!(*x, *y, epsilon = 1e-9, max_relative = 1e-9);
            }
            assert!(!name.is_empty());
        }
    }
}

#[test]
fn bivariate_difference_is_antisymmetric() {
    let a = grid(15, 15, "a", rough);
    let b = grid(15, 15, "b", |r, c| rough(c, r) * 0.5 + 3.0);
    let kernel = KernelSpec::for_grid(&a, 35.0, 1.0, 1.0).unwrap();
    let sel = Selection::from_tokens(["All"]);
    let config = GwsConfig::default();
    let ab = region_bivariate_statistics(&a, &b, &sel, &kernel, &config).unwrap();
    let ba = region_bivariate_statistics(&b, &a, &sel, &kernel, &config).unwrap();

    for code in ["Diff", "WDiff", "NDiff", "WNDiff", "ZDiff", "WZDiff"] {
        let x = ab.get(&format!("a_{code}_b")).unwrap();
        let y = ba.get(&format!("b_{code}_a")).unwrap();
        for (u, v) in x.data().iter().zip(y.data()) {
            if *u == -9999.0 {
                assert_eq!(*v, -9999.0, "{code}");
            } else {
                assert_relative_eq!(*u, -*v, epsilon = 1e-9);
            }
        }
    }
    for code in ["Corr", "WCorr"] {
        let x = ab.get(&format!("a_{code}_b")).unwrap();
        let y = ba.get(&format!("b_{code}_a")).unwrap();
        for (u, v) in x.data().iter().zip(y.data()) {
            assert_relative_eq!(*u, *v, epsilon = 1e-12);
        }
    }
    // interior windows hold enough pairs
    assert!(ab.get("a_Diff_b").unwrap().get(7, 7).unwrap() != -9999.0);
}

#[test]
fn centre_mean_of_counting_grid() {
    let g = Raster::from_vec((1..=25).map(f64::from).collect(), 5, 5)
        .unwrap()
        .with_name("n");
    let kernel = KernelSpec::for_grid(&g, 1.5, 1.0, 0.0).unwrap();
    let out = region_univariate_statistics(&g, &Selection::from_tokens(["mean"]), &kernel, &GwsConfig::default())
        .unwrap();
    assert_eq!(out.get("Mean_n").unwrap().get(2, 2).unwrap(), 13.0);
}

#[test]
fn algorithms_run_through_the_common_trait() {
    let g = grid(8, 8, "t", rough);
    let uni = RegionUnivariate.execute_default(g.clone()).unwrap();
    assert!(uni.get("SumWeight_t").is_some());

    let params = DensityParams {
        max_distance: 20.0,
        ..Default::default()
    };
    let density = GeometricDensity.execute(g.clone(), params).unwrap();
    assert_eq!(density.len(), 2);

    let bi = RegionBivariate
        .execute(
            (g.clone(), g),
            BivariateParams {
                distance: 40.0,
                ..Default::default()
            },
        )
        .unwrap();
    let diff = bi.get("t_Diff_t").unwrap();
    assert_eq!(diff.get(4, 4).unwrap(), 0.0);
}

#[test]
fn config_roundtrips_through_json() {
    let config = GwsConfig {
        min_pairs: 5,
        ..Default::default()
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: GwsConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
    let partial: GwsConfig = serde_json::from_str(r#"{"min_pairs": 3}"#).unwrap();
    assert_eq!(partial.fast_path_max_cell_distance, 1024);
}
