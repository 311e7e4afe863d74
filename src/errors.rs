// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The error type shared by every stage of a render.

use image::ImageError;
use std::io;

/// Everything that can stop a bifurcation render.  Sampling itself
/// cannot fail on a validated configuration, so apart from bad
/// configuration these all come from the very edges of the pipeline.
#[derive(Debug, Fail)]
pub enum BifurcationError {
    /// The sweep configuration was rejected before any sampling began.
    #[fail(display = "Invalid configuration: {}", _0)]
    InvalidConfig(String),

    /// A sampling worker panicked; the histogram is not trustworthy.
    #[fail(display = "A sampling worker panicked during the sweep")]
    WorkerPanicked,

    /// The image file could not be created or written.
    #[fail(display = "Could not write image: {}", _0)]
    Io(#[cause] io::Error),

    /// The image encoder refused the pixel data.
    #[fail(display = "Could not encode image: {}", _0)]
    Encode(#[cause] ImageError),
}

impl From<io::Error> for BifurcationError {
    fn from(err: io::Error) -> Self {
        BifurcationError::Io(err)
    }
}

impl From<ImageError> for BifurcationError {
    fn from(err: ImageError) -> Self {
        BifurcationError::Encode(err)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = ::std::result::Result<T, BifurcationError>;
