// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The work scheduler.  A fixed pool of scoped worker threads shares
//! a single queue of columns.  Whenever a worker finishes a column it
//! goes back to the queue for the next one, so the pool stays full
//! until the queue runs dry, and then the scope joins everybody.
//!
//! The queue hands out columns in increasing order, each exactly once,
//! along with exclusive write access to that column of the histogram.
//! No two workers ever hold the same column, so the histogram itself
//! needs no lock; the only lock is around the queue's cursor.

use crossbeam;
use crossbeam::thread::ScopedJoinHandle;
use std::sync::{Arc, Mutex};
use std::thread;

use config::SweepConfig;
use errors::{BifurcationError, Result};
use histogram::HistogramGrid;
use planes::PlaneMapper;
use sampler::{sample_column, SamplingUnit};

/// What happened during a sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct SweepStats {
    /// Sampling units dispatched; always the width of the grid.
    pub units: usize,
    /// Worker threads that took part.
    pub workers: usize,
    /// How many units each worker processed.  Depends on timing, so
    /// only the sum is meaningful.
    pub units_per_worker: Vec<usize>,
}

/// Hands out sampling units to a bounded pool of workers.
#[derive(Copy, Clone, Debug)]
pub struct Scheduler {
    concurrent_units: usize,
    preiterations: usize,
    samples: usize,
}

impl Scheduler {
    /// Builds a scheduler from a validated configuration.
    pub fn new(config: &SweepConfig) -> Self {
        Scheduler {
            concurrent_units: config.concurrent_units,
            preiterations: config.preiterations,
            samples: config.vertical_diffusion,
        }
    }

    /// The number of workers actually started for a grid this wide.
    /// There's no point starting a worker with nothing to do.
    pub fn workers_for(&self, width: usize) -> usize {
        self.concurrent_units.min(width)
    }

    /// The unit of work for a given column.  The column alone decides
    /// its lambdas, so completion order can't influence the result.
    pub fn unit(&self, plane: &PlaneMapper, column: usize) -> SamplingUnit {
        SamplingUnit {
            column,
            lambda: plane.column_to_lambda(column),
            lambda_step: plane.lambda_step(),
            sub_columns: plane.columns_per_pixel,
            preiterations: self.preiterations,
            samples: self.samples,
        }
    }

    /// Samples every column of `grid` using at most `concurrent_units`
    /// threads.  Returns only after every worker has finished writing.
    pub fn run(&self, plane: &PlaneMapper, grid: &mut HistogramGrid) -> Result<SweepStats> {
        let width = grid.width();
        let workers = self.workers_for(width);
        let queue = grid
            .columns_mut()
            .map(|column| (self.unit(plane, column.index()), column));
        let queue = Arc::new(Mutex::new(queue));

        let joined = crossbeam::scope(|spawner| {
            let handles: Vec<ScopedJoinHandle<usize>> = (0..workers)
                .map(|worker| {
                    let queue = queue.clone();
                    spawner.spawn(move |_| {
                        let mut processed = 0;
                        loop {
                            // A poisoned queue means another worker
                            // panicked; stop and let the join report it.
                            let next = match queue.lock() {
                                Ok(mut pending) => pending.next(),
                                Err(_) => None,
                            };
                            match next {
                                Some((unit, mut column)) => {
                                    debug!("Calculating column {}, lambda {}", unit.column, unit.lambda);
                                    sample_column(plane, &unit, &mut column);
                                    processed += 1;
                                }
                                None => {
                                    break;
                                }
                            }
                        }
                        trace!("Worker {} finished after {} units", worker, processed);
                        processed
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<thread::Result<Vec<usize>>>()
        })
        .map_err(|_| BifurcationError::WorkerPanicked)?;

        let units_per_worker = joined.map_err(|_| BifurcationError::WorkerPanicked)?;
        let units = units_per_worker.iter().sum();
        Ok(SweepStats {
            units,
            workers,
            units_per_worker,
        })
    }

    /// Samples every column of `grid` on the calling thread, in column
    /// order.  The reference the threaded sweep must agree with.
    pub fn run_sequential(&self, plane: &PlaneMapper, grid: &mut HistogramGrid) -> SweepStats {
        let mut units = 0;
        for mut column in grid.columns_mut() {
            let unit = self.unit(plane, column.index());
            debug!("Calculating column {}, lambda {}", unit.column, unit.lambda);
            sample_column(plane, &unit, &mut column);
            units += 1;
        }
        SweepStats {
            units,
            workers: 1,
            units_per_worker: vec![units],
        }
    }
}
