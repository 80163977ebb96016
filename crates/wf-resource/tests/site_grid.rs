//! Default offshore site: grid dimensions and probability mass.

use wf_core::PROBABILITY_SUM_TOL;
use wf_resource::{ResourceGridBuilder, ResourceProfile, axis};

#[test]
fn default_site_grid_dimensions() {
    let directions = axis(0.0, 360.0, 10.0).unwrap();
    let speeds = axis(3.0, 25.0, 1.0).unwrap();
    let grid = ResourceGridBuilder::default()
        .build(&directions, &speeds)
        .unwrap();

    assert_eq!(grid.shape(), (36, speeds.len()));
    assert_eq!(grid.cell_count(), directions.len() * speeds.len());
    assert_eq!(grid.cell_weights().dim(), (36, speeds.len()));

    let sum: f64 = grid.sector_frequency().sum();
    assert!((sum - 1.0).abs() < PROBABILITY_SUM_TOL);
}

#[test]
fn explicit_twenty_one_speeds() {
    let directions = axis(0.0, 360.0, 10.0).unwrap();
    let speeds: Vec<f64> = (3..24).map(f64::from).collect();
    let grid = ResourceGridBuilder::default()
        .build(&directions, &speeds)
        .unwrap();
    assert_eq!(grid.shape(), (36, 21));
    assert_eq!(grid.cell_count(), 36 * 21);
}

#[test]
fn summary_reports_site_statistics() {
    let directions = axis(0.0, 360.0, 10.0).unwrap();
    let speeds = axis(3.0, 25.0, 1.0).unwrap();
    let grid = ResourceGridBuilder::new(ResourceProfile::default())
        .build(&directions, &speeds)
        .unwrap();
    let summary = grid.summary();

    // The cosine/sine modulations average out over a full rose
    assert!((summary.mean_weibull_a - 9.0).abs() < 1e-9);
    assert!((summary.mean_weibull_k - 2.1).abs() < 1e-9);
    assert!((summary.mean_turbulence - 0.08).abs() < 1e-12);
    assert_eq!(grid.sector_table().len(), 36);
}

#[test]
fn cell_weights_cover_most_of_the_distribution() {
    let directions = axis(0.0, 360.0, 10.0).unwrap();
    let speeds = axis(3.0, 25.0, 1.0).unwrap();
    let grid = ResourceGridBuilder::default()
        .build(&directions, &speeds)
        .unwrap();
    let total = grid.cell_weights().sum();
    // 3..24 m/s excludes the calm tail below ~2.5 m/s
    assert!(total > 0.85 && total < 1.0, "total weight {total}");
}
