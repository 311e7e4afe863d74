// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The renderer ties the pipeline together: validate the configuration,
//! sweep every column into a histogram, wait for all of the workers,
//! normalize the histogram into pixels, and hand the pixels to the
//! image sink.

use std::path::Path;

use config::SweepConfig;
use errors::{BifurcationError, Result};
use histogram::HistogramGrid;
use planes::PlaneMapper;
use raster::{rasterize, PixelGrid};
use scheduler::{Scheduler, SweepStats};
use sink::write_image;

/// Renders bifurcation diagrams of the logistic map for a single,
/// fixed configuration.  Once built, this object is not mutable.
#[derive(Debug)]
pub struct BifurcationRenderer {
    config: SweepConfig,
    plane: PlaneMapper,
    scheduler: Scheduler,
}

impl BifurcationRenderer {
    /// Validates the configuration up front, so that a bad one fails
    /// before any sampling is done.
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        let plane = PlaneMapper::new(
            config.image_size,
            config.image_size,
            config.lambda_min,
            config.lambda_max,
            config.columns_per_pixel,
        )
        .map_err(BifurcationError::InvalidConfig)?;
        Ok(BifurcationRenderer {
            config,
            plane,
            scheduler: Scheduler::new(&config),
        })
    }

    /// The configuration this renderer was built with.
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    fn empty_grid(&self) -> HistogramGrid {
        HistogramGrid::new(self.plane.integral_plane.0, self.plane.integral_plane.1)
    }

    /// Samples every column on the pool of workers and returns the
    /// histogram once every one of them has finished.
    pub fn sweep(&self) -> Result<(HistogramGrid, SweepStats)> {
        info!(
            "Sweeping lambda {}..{} over {} columns ({} sub-columns, {} samples, {} preiterations) with up to {} workers",
            self.config.lambda_min,
            self.config.lambda_max,
            self.config.image_size,
            self.config.columns_per_pixel,
            self.config.vertical_diffusion,
            self.config.preiterations,
            self.config.concurrent_units
        );
        let mut grid = self.empty_grid();
        let stats = self.scheduler.run(&self.plane, &mut grid)?;
        info!("Sampled {} columns on {} workers", stats.units, stats.workers);
        Ok((grid, stats))
    }

    /// The single-threaded version of `sweep`.  Produces exactly the
    /// same histogram.
    pub fn sweep_single(&self) -> (HistogramGrid, SweepStats) {
        let mut grid = self.empty_grid();
        let stats = self.scheduler.run_sequential(&self.plane, &mut grid);
        (grid, stats)
    }

    /// Normalizes a finished histogram into pixels.
    pub fn rasterize(&self, grid: &HistogramGrid) -> PixelGrid {
        info!("Creating image...");
        rasterize(grid, self.config.max_points_per_pixel())
    }

    /// The whole pipeline: sweep, rasterize, and write to `path`.
    pub fn render<P: AsRef<Path>>(&self, path: P) -> Result<SweepStats> {
        let (grid, stats) = self.sweep()?;
        let pixels = self.rasterize(&grid);
        write_image(path.as_ref(), &pixels)?;
        Ok(stats)
    }
}
