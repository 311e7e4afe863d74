// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The column sampler.  For each lambda assigned to an output column
//! we start the logistic map at x = 0.5, let it run long enough to
//! forget where it started, and then record every value it visits
//! afterwards.  Where it ends up is the attractor: a single point for
//! small lambda, a period-doubling cascade of points above 3, and a
//! smear of chaos approaching 4.

use histogram::ColumnMut;
use planes::PlaneMapper;

/// Where every orbit starts.
pub const INITIAL_X: f64 = 0.5;

/// The logistic map, x' = λx(1 - x).
#[inline]
pub fn logistic(lambda: f64, x: f64) -> f64 {
    lambda * x * (1.0 - x)
}

/// One output column's worth of work.  Created by the scheduler,
/// consumed once by a worker, and then forgotten.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SamplingUnit {
    /// The column of the histogram this unit writes to.
    pub column: usize,
    /// The first sub-lambda of the column.
    pub lambda: f64,
    /// Spacing between sub-lambdas.
    pub lambda_step: f64,
    /// How many sub-lambdas to sample.
    pub sub_columns: usize,
    /// Iterations discarded before sampling.
    pub preiterations: usize,
    /// Samples recorded per sub-lambda.
    pub samples: usize,
}

impl SamplingUnit {
    /// The sub-lambdas this unit samples, in increasing order.
    pub fn lambdas<'a>(&'a self) -> impl Iterator<Item = f64> + 'a {
        (0..self.sub_columns).map(move |step| self.lambda + (step as f64) * self.lambda_step)
    }
}

/// Runs the orbit for a single lambda: `preiterations` steps thrown
/// away, then `samples` steps each handed to `visit`.
pub fn orbit<F>(lambda: f64, preiterations: usize, samples: usize, mut visit: F)
where
    F: FnMut(f64),
{
    let mut x = INITIAL_X;
    for _ in 0..preiterations {
        x = logistic(lambda, x);
    }
    for _ in 0..samples {
        x = logistic(lambda, x);
        visit(x);
    }
}

/// Samples every sub-lambda of `unit` and increments the matching
/// rows of `column`.  Deterministic: the same unit always produces the
/// same counts.  The column must be the one the unit was made for.
pub fn sample_column(plane: &PlaneMapper, unit: &SamplingUnit, column: &mut ColumnMut) {
    debug_assert_eq!(unit.column, column.index());
    for lambda in unit.lambdas() {
        orbit(lambda, unit.preiterations, unit.samples, |x| {
            column.increment(plane.value_to_row(x))
        });
    }
}
