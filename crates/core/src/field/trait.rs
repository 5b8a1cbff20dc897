//! Abstract 2D field interface
//!
//! This module defines the `FieldBuffer` trait, the array abstraction every solver stage
//! is generic over. Implementors only expose their grid and a flat row-major slice; the
//! checked accessors and interior reductions are provided.

use crate::grid::Grid;

/// Flat `(N + 2) × (N + 2)` scalar storage shared by every solver stage.
///
/// Hot loops should go through [`as_slice`](Self::as_slice) and index with
/// [`Grid::index`]; the provided accessors bounds-check every call.
pub trait FieldBuffer {
    /// Lattice this buffer is laid out on.
    fn grid(&self) -> Grid;

    /// Values in row-major order (`j * extent + i`).
    fn as_slice(&self) -> &[f32];

    /// Mutable values in row-major order.
    fn as_mut_slice(&mut self) -> &mut [f32];

    /// Value at `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` lies outside `[0, N + 1]`.
    #[inline]
    fn get(&self, i: usize, j: usize) -> f32 {
        let grid = self.grid();
        assert!(grid.contains(i, j), "Coordinates out of bounds");
        self.as_slice()[grid.index(i, j)]
    }

    /// Overwrite the value at `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` lies outside `[0, N + 1]`.
    #[inline]
    fn set(&mut self, i: usize, j: usize, value: f32) {
        let grid = self.grid();
        assert!(grid.contains(i, j), "Coordinates out of bounds");
        self.as_mut_slice()[grid.index(i, j)] = value;
    }

    /// Add `value` to the cell at `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` lies outside `[0, N + 1]`.
    #[inline]
    fn add(&mut self, i: usize, j: usize, value: f32) {
        let grid = self.grid();
        assert!(grid.contains(i, j), "Coordinates out of bounds");
        self.as_mut_slice()[grid.index(i, j)] += value;
    }

    /// Sum over interior cells, accumulated in `f64`.
    fn interior_sum(&self) -> f64 {
        let grid = self.grid();
        let values = self.as_slice();
        grid.interior()
            .map(|(i, j)| f64::from(values[grid.index(i, j)]))
            .sum()
    }

    /// Largest interior value.
    fn interior_max(&self) -> f32 {
        let grid = self.grid();
        let values = self.as_slice();
        grid.interior()
            .map(|(i, j)| values[grid.index(i, j)])
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Smallest interior value.
    fn interior_min(&self) -> f32 {
        let grid = self.grid();
        let values = self.as_slice();
        grid.interior()
            .map(|(i, j)| values[grid.index(i, j)])
            .fold(f32::INFINITY, f32::min)
    }
}
