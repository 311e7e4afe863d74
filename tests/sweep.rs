extern crate bifurcation;
extern crate rand;

use bifurcation::raster::{intensity, rasterize};
use bifurcation::{BifurcationRenderer, SweepConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn small(concurrent_units: usize) -> SweepConfig {
    SweepConfig {
        image_size: 24,
        vertical_diffusion: 60,
        columns_per_pixel: 2,
        preiterations: 100,
        lambda_min: 2.8,
        lambda_max: 4.0,
        concurrent_units,
    }
}

#[test]
fn every_column_receives_every_sample() {
    let config = small(6);
    let (grid, stats) = BifurcationRenderer::new(config).unwrap().sweep().unwrap();
    assert_eq!(stats.units, 24);
    assert_eq!(stats.units_per_worker.iter().sum::<usize>(), 24);
    for column in 0..grid.width() {
        assert_eq!(grid.column_total(column), 120, "column {}", column);
    }
}

#[test]
fn sweeps_are_deterministic() {
    let renderer = BifurcationRenderer::new(small(8)).unwrap();
    let (first, _) = renderer.sweep().unwrap();
    let (second, _) = renderer.sweep().unwrap();
    assert_eq!(first, second);
}

#[test]
fn parallelism_does_not_change_the_histogram() {
    let (expected, _) = BifurcationRenderer::new(small(1)).unwrap().sweep_single();
    for cap in 1..=24 {
        let (grid, stats) = BifurcationRenderer::new(small(cap)).unwrap().sweep().unwrap();
        assert_eq!(stats.workers, cap);
        assert_eq!(grid, expected, "concurrency cap {}", cap);
    }
}

#[test]
fn random_configurations_agree_with_the_sequential_sweep() {
    let mut rng = StdRng::seed_from_u64(0x10_6157);
    for _ in 0..12 {
        let lambda_min = rng.gen_range(2.5, 3.9);
        let config = SweepConfig {
            image_size: rng.gen_range(1, 20),
            vertical_diffusion: rng.gen_range(1, 50),
            columns_per_pixel: rng.gen_range(1, 4),
            preiterations: rng.gen_range(0, 200),
            lambda_min,
            lambda_max: rng.gen_range(lambda_min + 0.01, 4.0),
            concurrent_units: rng.gen_range(1, 30),
        };
        let renderer = BifurcationRenderer::new(config).unwrap();
        let (threaded, stats) = renderer.sweep().unwrap();
        let (sequential, _) = renderer.sweep_single();
        assert_eq!(stats.units, config.image_size);
        assert_eq!(threaded, sequential, "{:?}", config);
        for column in 0..threaded.width() {
            assert_eq!(
                threaded.column_total(column),
                u64::from(config.samples_per_column())
            );
        }
    }
}

#[test]
fn tiny_sweep_near_four() {
    let config = SweepConfig {
        image_size: 10,
        vertical_diffusion: 5,
        columns_per_pixel: 1,
        preiterations: 0,
        lambda_min: 3.99,
        lambda_max: 4.0,
        concurrent_units: 2,
    };
    let (grid, stats) = BifurcationRenderer::new(config).unwrap().sweep().unwrap();
    assert_eq!(stats.units, 10);
    assert_eq!(stats.workers, 2);
    assert_eq!(grid.width(), 10);
    assert_eq!(grid.height(), 10);
    for column in 0..10 {
        assert_eq!(grid.column_total(column), 5);
    }
}

#[test]
fn lambda_of_exactly_four_does_not_escape() {
    // Columns start at 3.0, 3.5, 4.0 and 4.5; the last one diverges.
    let config = SweepConfig {
        image_size: 4,
        vertical_diffusion: 5000,
        columns_per_pixel: 1,
        preiterations: 0,
        lambda_min: 3.0,
        lambda_max: 5.0,
        concurrent_units: 4,
    };
    let (grid, _) = BifurcationRenderer::new(config).unwrap().sweep().unwrap();
    assert_eq!(grid.total(), 4 * 5000);
    for column in 0..4 {
        assert_eq!(grid.column_total(column), 5000);
    }
    // At lambda = 4 the orbit from 0.5 hits exactly 1.0, clamped into
    // the top row, and then sits at 0 forever.
    assert_eq!(grid.get(2, 3), 1);
    assert_eq!(grid.get(2, 0), 4999);
}

#[test]
fn low_lambda_settles_into_one_or_two_rows() {
    let config = SweepConfig {
        image_size: 20,
        vertical_diffusion: 500,
        columns_per_pixel: 3,
        preiterations: 1000,
        lambda_min: 2.5,
        lambda_max: 2.95,
        concurrent_units: 4,
    };
    let (grid, _) = BifurcationRenderer::new(config).unwrap().sweep().unwrap();
    for column in 0..grid.width() {
        let counts = grid.column(column);
        let best = (0..counts.len() - 1)
            .map(|row| u64::from(counts[row]) + u64::from(counts[row + 1]))
            .max()
            .unwrap();
        let total = grid.column_total(column);
        assert!(best * 100 >= total * 99, "column {} is spread out", column);
    }
}

#[test]
fn rendered_pixels_stay_in_range() {
    let config = small(4);
    let renderer = BifurcationRenderer::new(config).unwrap();
    let (grid, _) = renderer.sweep().unwrap();
    let cap = config.max_points_per_pixel();
    let pixels = rasterize(&grid, cap);
    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let count = grid.get(x, grid.height() - 1 - y);
            assert_eq!(pixels.get(x, y), intensity(count, cap));
            if count == 0 {
                assert_eq!(pixels.get(x, y), 0);
            }
        }
    }
}
