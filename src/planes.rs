// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and the real plane of the bifurcation diagram: lambda along the
//! x-axis, and the logistic map's output, always within [0, 1], along
//! the y-axis.
use num::clamp;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the lower and upper lambda bounds of the sweep.  The
/// y-extent of the real plane is fixed at [0, 1] and so isn't stored.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LambdaRange(pub f64, pub f64);

/// Linearly maps `value` from the range [from_min, from_max] onto
/// [to_min, to_max].  Values outside the source range extrapolate.
#[inline]
pub fn remap(value: f64, from_min: f64, from_max: f64, to_min: f64, to_max: f64) -> f64 {
    let slope = (to_max - to_min) / (from_max - from_min);
    to_min + slope * (value - from_min)
}

/// Maps columns of the integral plane to runs of lambda values, and
/// map outputs back to rows of the integral plane.
#[derive(Debug)]
pub struct PlaneMapper {
    /// The right-upper hand corner of the integral cartesian plane.
    /// The left-lower is assumed to be at 0,0
    pub integral_plane: IntegralPlane,
    /// The lambda bounds of the real plane.
    pub lambda_range: LambdaRange,
    /// How many sub-lambdas are sampled per integral column.
    pub columns_per_pixel: usize,
    // Distance between two neighbouring sub-lambdas.
    lambda_step: f64,
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the integral plane, the lambda
    /// bounds, and the supersampling factor.
    pub fn new(
        width: usize,
        height: usize,
        lambda_min: f64,
        lambda_max: f64,
        columns_per_pixel: usize,
    ) -> Result<PlaneMapper, String> {
        if !(lambda_max > lambda_min) {
            return Err("The lambda maximum is not greater than the lambda minimum.".to_string());
        }

        if width == 0 || height == 0 || columns_per_pixel == 0 {
            return Err("The integral plane has no area to sample.".to_string());
        }

        let lambda_step = (lambda_max - lambda_min) / ((width * columns_per_pixel) as f64);

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            lambda_range: LambdaRange(lambda_min, lambda_max),
            columns_per_pixel,
            lambda_step,
        })
    }

    /// Distance in lambda between two neighbouring sub-lambdas.
    pub fn lambda_step(&self) -> f64 {
        self.lambda_step
    }

    /// The first lambda sampled for a given column.  Computed by
    /// multiplication rather than accumulation, so every column lands
    /// on the same value no matter which worker gets to it or when.
    pub fn column_to_lambda(&self, column: usize) -> f64 {
        self.lambda_range.0 + ((column * self.columns_per_pixel) as f64) * self.lambda_step
    }

    /// Given an output of the logistic map, find the histogram row it
    /// belongs in.  Row 0 holds x = 0.  Anything that has drifted out
    /// of [0, 1) is clamped into the nearest edge row rather than
    /// indexing off the plane; NaN lands in row 0.
    pub fn value_to_row(&self, x: f64) -> usize {
        let height = self.integral_plane.1;
        let row = remap(x, 0.0, 1.0, 0.0, height as f64).floor();
        if row.is_nan() {
            return 0;
        }
        clamp(row, 0.0, (height - 1) as f64) as usize
    }
}
