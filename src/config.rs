// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The knobs and dials of a sweep.  A `SweepConfig` is built once,
//! validated once, and never mutated afterwards.

use errors::{BifurcationError, Result};

/// Output image width and height, in pixels.
pub const DEFAULT_IMAGE_SIZE: usize = 1000;
/// Samples recorded per sub-lambda after the transient is discarded.
pub const DEFAULT_VERTICAL_DIFFUSION: usize = 1000;
/// Sub-lambdas sampled for every output column.
pub const DEFAULT_COLUMNS_PER_PIXEL: usize = 3;
/// Iterations thrown away before sampling begins.
pub const DEFAULT_PREITERATIONS: usize = 1000;
/// Lower bound of the lambda sweep.
pub const DEFAULT_LAMBDA_MIN: f64 = 3.4;
/// Upper bound of the lambda sweep.
pub const DEFAULT_LAMBDA_MAX: f64 = 4.0;
/// Sampling units allowed to run at the same time.
pub const DEFAULT_CONCURRENT_UNITS: usize = 16;

/// Describes one complete sweep of the logistic map.  The image is
/// always square: `image_size` is both its width and its height.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SweepConfig {
    /// Width (and height) of the output image in pixels.
    pub image_size: usize,
    /// Samples taken per sub-lambda once the transient is discarded.
    pub vertical_diffusion: usize,
    /// Number of sub-lambdas sampled per output pixel column.
    pub columns_per_pixel: usize,
    /// Number of iterations discarded before sampling.
    pub preiterations: usize,
    /// Lower bound of the lambda sweep.
    pub lambda_min: f64,
    /// Upper bound of the lambda sweep.
    pub lambda_max: f64,
    /// Maximum number of sampling units running at once.
    pub concurrent_units: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            image_size: DEFAULT_IMAGE_SIZE,
            vertical_diffusion: DEFAULT_VERTICAL_DIFFUSION,
            columns_per_pixel: DEFAULT_COLUMNS_PER_PIXEL,
            preiterations: DEFAULT_PREITERATIONS,
            lambda_min: DEFAULT_LAMBDA_MIN,
            lambda_max: DEFAULT_LAMBDA_MAX,
            concurrent_units: DEFAULT_CONCURRENT_UNITS,
        }
    }
}

fn invalid<T>(msg: String) -> Result<T> {
    Err(BifurcationError::InvalidConfig(msg))
}

impl SweepConfig {
    /// Rejects anything that would make the sweep meaningless or
    /// overflow the counters.  Called before a single sample is taken.
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("image size", self.image_size),
            ("vertical diffusion", self.vertical_diffusion),
            ("columns per pixel", self.columns_per_pixel),
            ("concurrent units", self.concurrent_units),
        ];
        for &(name, value) in counts.iter() {
            if value == 0 {
                return invalid(format!("{} must be greater than zero", name));
            }
        }

        if self.image_size > u32::max_value() as usize {
            return invalid(format!(
                "image size {} does not fit an image dimension",
                self.image_size
            ));
        }

        if !self.lambda_min.is_finite() || !self.lambda_max.is_finite() {
            return invalid("lambda bounds must be finite numbers".to_string());
        }

        if self.lambda_max <= self.lambda_min {
            return invalid(format!(
                "lambda max ({}) must be greater than lambda min ({})",
                self.lambda_max, self.lambda_min
            ));
        }

        match self.checked_points(10) {
            Some(_) => Ok(()),
            None => invalid(
                "vertical diffusion times columns per pixel is too large to count".to_string(),
            ),
        }
    }

    // `factor` columns' worth of samples, if that fits the u32 counters.
    fn checked_points(&self, factor: u64) -> Option<u32> {
        let points = (self.vertical_diffusion as u64)
            .checked_mul(self.columns_per_pixel as u64)?
            .checked_mul(factor)?;
        if points <= u64::from(u32::max_value()) {
            Some(points as u32)
        } else {
            None
        }
    }

    /// The fixed saturation threshold, ten columns' worth of samples:
    /// any bucket holding this many points or more renders as pure
    /// white.  Saturates at `u32::MAX` on a configuration that
    /// `validate` would reject.
    pub fn max_points_per_pixel(&self) -> u32 {
        self.checked_points(10).unwrap_or_else(u32::max_value)
    }

    /// The exact number of increments every column receives.
    /// Saturates at `u32::MAX` on a configuration that `validate`
    /// would reject.
    pub fn samples_per_column(&self) -> u32 {
        self.checked_points(1).unwrap_or_else(u32::max_value)
    }
}
