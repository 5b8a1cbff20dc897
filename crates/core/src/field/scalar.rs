//! Owned scalar field storage
//!
//! Stores one value per lattice cell, border included, as a flat `Vec<f32>`.

use super::FieldBuffer;
use crate::grid::Grid;

/// Scalar field on the padded lattice.
///
/// Used directly for pressure and divergence, and as each half of a
/// [`DoubleBufferedField`](super::DoubleBufferedField).
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    data: Vec<f32>,
    grid: Grid,
}

impl ScalarField {
    /// Create a field on `grid` with every cell zero.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self::with_value(grid, 0.0)
    }

    /// Create a field on `grid` with every cell set to `value`.
    #[must_use]
    pub fn with_value(grid: Grid, value: f32) -> Self {
        Self {
            data: vec![value; grid.cell_count()],
            grid,
        }
    }

    /// Fill every cell, border included.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Copy of the interior values in row-major order (`N²` entries).
    #[must_use]
    pub fn interior_values(&self) -> Vec<f32> {
        self.grid
            .interior()
            .map(|(i, j)| self.data[self.grid.index(i, j)])
            .collect()
    }
}

impl FieldBuffer for ScalarField {
    #[inline]
    fn grid(&self) -> Grid {
        self.grid
    }

    #[inline]
    fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}
