//! Padded square lattice addressing
//!
//! Every field in the simulation shares one shape: an `N × N` interior surrounded by a
//! ring of border cells, giving `(N + 2) × (N + 2)` stored values. Interior cells are
//! indexed `1..=N` on both axes; the border lives at index `0` and `N + 1`.
//!
//! ```text
//!   j = N+1  ┌───┬───────────┬───┐
//!            │ c │  border   │ c │
//!            ├───┼───────────┼───┤
//!            │ b │ interior  │ b │
//!            │   │  1..=N    │   │
//!            ├───┼───────────┼───┤
//!   j = 0    │ c │  border   │ c │
//!            └───┴───────────┴───┘
//!           i = 0           i = N+1
//! ```
//!
//! Storage is row-major (`j * extent + i`), matching the rest of the field code.

use serde::Serialize;

/// Width of the border ring around the interior, in cells.
///
/// Fixed at one cell: the bilinear stencil used by advection reaches exactly one cell
/// past the clamped back-trace position.
pub const BORDER: usize = 1;

/// Immutable description of the padded lattice shared by all fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Grid {
    resolution: usize,
}

impl Grid {
    /// Create a grid with `resolution` interior cells per axis.
    ///
    /// # Panics
    ///
    /// Panics if `resolution` is zero.
    #[must_use]
    pub fn new(resolution: usize) -> Self {
        assert!(resolution > 0, "Grid resolution must be positive");
        Self { resolution }
    }

    /// Interior cell count per axis (`N`).
    #[inline]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Allocated cells per axis (`N + 2`).
    #[inline]
    pub const fn extent(&self) -> usize {
        self.resolution + 2 * BORDER
    }

    /// Total allocated cells (`(N + 2)²`).
    #[inline]
    pub const fn cell_count(&self) -> usize {
        self.extent() * self.extent()
    }

    /// Flat row-major index of cell `(i, j)`.
    #[inline(always)]
    pub const fn index(&self, i: usize, j: usize) -> usize {
        j * self.extent() + i
    }

    /// Whether `(i, j)` addresses an allocated cell (`[0, N + 1]` on both axes).
    #[inline]
    pub const fn contains(&self, i: usize, j: usize) -> bool {
        i < self.extent() && j < self.extent()
    }

    /// Whether `(i, j)` is an interior cell (`[1, N]` on both axes).
    #[inline]
    pub const fn is_interior(&self, i: usize, j: usize) -> bool {
        i >= BORDER && i <= self.resolution && j >= BORDER && j <= self.resolution
    }

    /// Physical size of one cell on a unit domain (`h = 1 / N`).
    #[inline]
    pub fn cell_size(&self) -> f32 {
        1.0 / self.resolution as f32
    }

    /// Iterate interior cells in row-major order.
    pub fn interior(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.resolution;
        (1..=n).flat_map(move |j| (1..=n).map(move |i| (i, j)))
    }

    /// Iterate every border cell, corners included.
    pub fn border(&self) -> impl Iterator<Item = (usize, usize)> {
        let extent = self.extent();
        (0..extent)
            .flat_map(move |j| (0..extent).map(move |i| (i, j)))
            .filter(move |&(i, j)| i == 0 || j == 0 || i == extent - 1 || j == extent - 1)
    }
}
