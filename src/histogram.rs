// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The histogram grid: one counter per (column, row) of the output
//! image.  The counters are stored column-major in a single buffer so
//! that a column is a contiguous slice.  During a sweep the buffer is
//! carved up with `chunks_mut`, and each worker gets exclusive
//! ownership of whichever columns it is handed; partitioning, not
//! locking, is what keeps concurrent writers apart.

use std::slice::ChunksMut;

/// A zero-initialized grid of hit counters, `width` columns by
/// `height` rows.  Row 0 corresponds to a map output of 0.
#[derive(Clone, Debug, PartialEq)]
pub struct HistogramGrid {
    width: usize,
    height: usize,
    counts: Vec<u32>,
}

impl HistogramGrid {
    /// Allocates a grid with every counter at zero.
    pub fn new(width: usize, height: usize) -> Self {
        HistogramGrid {
            width,
            height,
            counts: vec![0 as u32; width * height],
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows in every column.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Adds one to the counter at (column, row).  Out-of-range indices
    /// are a mapping bug and panic.
    pub fn increment(&mut self, column: usize, row: usize) {
        assert!(column < self.width, "column {} out of range", column);
        assert!(row < self.height, "row {} out of range", row);
        self.counts[column * self.height + row] += 1;
    }

    /// The count at (column, row).
    pub fn get(&self, column: usize, row: usize) -> u32 {
        self.column(column)[row]
    }

    /// All of one column's counters, bottom row first.
    pub fn column(&self, column: usize) -> &[u32] {
        let start = column * self.height;
        &self.counts[start..start + self.height]
    }

    /// Sum of every counter in a column.
    pub fn column_total(&self, column: usize) -> u64 {
        self.column(column).iter().map(|&c| u64::from(c)).sum()
    }

    /// Sum of every counter in the grid.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    /// Splits the grid into its columns, in increasing column order.
    /// Every column is handed out exactly once, so each one can be
    /// written to from a different thread.
    pub fn columns_mut(&mut self) -> ColumnsMut {
        ColumnsMut {
            index: 0,
            chunks: self.counts.chunks_mut(self.height.max(1)),
        }
    }
}

/// Iterator over the disjoint, mutable columns of a `HistogramGrid`.
pub struct ColumnsMut<'a> {
    index: usize,
    chunks: ChunksMut<'a, u32>,
}

impl<'a> Iterator for ColumnsMut<'a> {
    type Item = ColumnMut<'a>;

    fn next(&mut self) -> Option<ColumnMut<'a>> {
        let cells = self.chunks.next()?;
        let column = ColumnMut {
            index: self.index,
            cells,
        };
        self.index += 1;
        Some(column)
    }
}

/// Exclusive write access to one column of the grid.
#[derive(Debug)]
pub struct ColumnMut<'a> {
    index: usize,
    cells: &'a mut [u32],
}

impl<'a> ColumnMut<'a> {
    /// Which column of the grid this is.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of rows in the column.
    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Adds one to the counter in `row`.  A row outside the column is
    /// a mapping bug and panics.
    #[inline]
    pub fn increment(&mut self, row: usize) {
        assert!(
            row < self.cells.len(),
            "row {} out of range for column {}",
            row,
            self.index
        );
        self.cells[row] += 1;
    }
}
