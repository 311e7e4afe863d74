#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Bifurcation diagram renderer
//!
//! The logistic map, x' = λx(1 - x), is about the simplest recurrence
//! that exhibits deterministic chaos.  For a small λ, repeatedly
//! applying it from almost any starting point settles on a single
//! value.  Past λ = 3 that value splits into two, then four, then
//! eight, faster and faster, until somewhere around 3.57 the orbit
//! stops settling at all.  Plotting the values an orbit visits against
//! λ produces the bifurcation diagram.
//!
//! Every column of the image is a narrow band of λ.  For each column
//! we run the map a while to forget the starting point, then count
//! where each further iteration lands in a histogram of that column.
//! Columns are entirely independent of one another, so they are
//! farmed out to a bounded pool of threads, each worker owning the
//! columns it was handed outright.  When every worker has finished,
//! the counts are scaled against a fixed cap into gray levels and the
//! result is written out as an image.

#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;
extern crate tempfile;

pub mod config;
pub mod errors;
pub mod histogram;
pub mod planes;
pub mod raster;
pub mod renderer;
pub mod sampler;
pub mod scheduler;
pub mod sink;

pub use config::SweepConfig;
pub use errors::{BifurcationError, Result};
pub use histogram::HistogramGrid;
pub use raster::PixelGrid;
pub use renderer::BifurcationRenderer;
pub use scheduler::SweepStats;
