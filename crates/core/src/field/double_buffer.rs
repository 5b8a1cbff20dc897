//! Double-buffered field with O(1) role swap
//!
//! Each solver stage reads the `previous` buffer as its anchor or sample source and
//! writes `current`. Swapping between stages turns the last stage's output into the
//! next stage's input without copying.

use super::{FieldBuffer, ScalarField};
use crate::grid::Grid;
use rayon::prelude::*;

/// Two same-shaped buffers with a `current`/`previous` role flag.
///
/// Both buffers are allocated once at construction; [`swap`](Self::swap) only flips
/// which one is authoritative.
#[derive(Debug, Clone)]
pub struct DoubleBufferedField {
    buffers: [ScalarField; 2],
    current: usize,
}

impl DoubleBufferedField {
    /// Allocate both buffers on `grid`, zero-filled.
    #[must_use]
    pub fn new(grid: Grid) -> Self {
        Self {
            buffers: [ScalarField::new(grid), ScalarField::new(grid)],
            current: 0,
        }
    }

    /// Lattice both buffers are laid out on.
    #[inline]
    pub fn grid(&self) -> Grid {
        self.buffers[0].grid()
    }

    /// Authoritative (latest) buffer.
    #[inline]
    pub fn current(&self) -> &ScalarField {
        &self.buffers[self.current]
    }

    /// Anchor / source buffer for the next stage.
    #[inline]
    pub fn previous(&self) -> &ScalarField {
        &self.buffers[self.current ^ 1]
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut ScalarField {
        &mut self.buffers[self.current]
    }

    #[inline]
    pub fn previous_mut(&mut self) -> &mut ScalarField {
        &mut self.buffers[self.current ^ 1]
    }

    /// Borrow `current` mutably and `previous` immutably at the same time.
    ///
    /// This is the shape every stage needs: write one buffer while reading the other.
    pub fn split_mut(&mut self) -> (&mut ScalarField, &ScalarField) {
        let (current, previous) = self.pair_mut();
        (current, &*previous)
    }

    fn pair_mut(&mut self) -> (&mut ScalarField, &mut ScalarField) {
        let [first, second] = &mut self.buffers;
        if self.current == 0 {
            (first, second)
        } else {
            (second, first)
        }
    }

    /// Exchange the roles of `current` and `previous`.
    ///
    /// Contents of both buffers are preserved; no data moves.
    #[inline]
    pub fn swap(&mut self) {
        self.current ^= 1;
    }

    /// Fold the pending source into the field: `current += dt * previous`, then clear
    /// `previous` so the same impulse is never applied twice.
    ///
    /// Runs over every cell, border included.
    pub fn add_source(&mut self, dt: f32) {
        let (current, previous) = self.pair_mut();
        current
            .as_mut_slice()
            .par_iter_mut()
            .zip(previous.as_mut_slice().par_iter_mut())
            .for_each(|(value, source)| {
                *value += dt * *source;
                *source = 0.0;
            });
    }

    /// Zero the `previous` buffer ahead of queuing the next frame's impulses.
    pub fn clear_previous(&mut self) {
        self.previous_mut().fill(0.0);
    }
}
