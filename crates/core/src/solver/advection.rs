//! Semi-Lagrangian advection
//!
//! For every interior cell the solver asks where the quantity now at `(i, j)` was one
//! timestep ago, tracing backwards along the velocity field:
//!
//! ```text
//! x = i - dt · N · h[i,j]
//! y = j - dt · N · v[i,j]
//! ```
//!
//! The trace point is clamped to `[0.5, N + 0.5]` so the bilinear stencil never reaches
//! past the border ring, then the source field is sampled there.
//!
//! Each output cell depends only on immutable inputs, so rows are written in parallel.

use crate::field::{DoubleBufferedField, FieldBuffer, ScalarField};
use crate::grid::{contain, reflect_velocity};
use rayon::prelude::*;

/// Bilinear sample of a row-major buffer of row length `width` at `(x, y)`.
///
/// Callers must keep `x` and `y` within `[0, width - 2]` so the `i0 + 1`/`j0 + 1`
/// stencil stays in bounds.
#[inline]
pub fn sample_bilinear(values: &[f32], width: usize, x: f32, y: f32) -> f32 {
    let i0 = x.floor() as usize;
    let j0 = y.floor() as usize;
    let i1 = i0 + 1;
    let j1 = j0 + 1;

    let right_weight = x - i0 as f32;
    let left_weight = 1.0 - right_weight;
    let top_weight = y - j0 as f32;
    let bottom_weight = 1.0 - top_weight;

    left_weight
        * (bottom_weight * values[j0 * width + i0] + top_weight * values[j1 * width + i0])
        + right_weight
            * (bottom_weight * values[j0 * width + i1] + top_weight * values[j1 * width + i1])
}

/// Back-trace every interior cell of `target` through `(h_velocity, v_velocity)` and
/// sample `source` at the departure point.
///
/// Only interior cells are written; the caller refills the border.
pub fn advect<F, S, V>(target: &mut F, source: &S, h_velocity: &V, v_velocity: &V, dt: f32)
where
    F: FieldBuffer + ?Sized,
    S: FieldBuffer + ?Sized,
    V: FieldBuffer + ?Sized,
{
    let grid = target.grid();
    debug_assert_eq!(grid, source.grid(), "advection buffers must share a grid");

    let n = grid.resolution();
    let width = grid.extent();
    let trace_scale = dt * n as f32;
    let upper = n as f32 + 0.5;

    let source = source.as_slice();
    let h = h_velocity.as_slice();
    let v = v_velocity.as_slice();

    target
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .skip(1)
        .take(n)
        .for_each(|(j, row)| {
            for i in 1..=n {
                let idx = j * width + i;
                let x = (i as f32 - trace_scale * h[idx]).clamp(0.5, upper);
                let y = (j as f32 - trace_scale * v[idx]).clamp(0.5, upper);
                row[i] = sample_bilinear(source, width, x, y);
            }
        });
}

/// Move density through the (already projected) velocity field, then contain it.
pub fn advect_scalar(
    field: &mut DoubleBufferedField,
    h_velocity: &ScalarField,
    v_velocity: &ScalarField,
    dt: f32,
) {
    let (current, previous) = field.split_mut();
    advect(current, previous, h_velocity, v_velocity, dt);
    contain(current);
}

/// Self-advect the velocity field.
///
/// Both components trace through the `previous` buffers, so neither sees the other's
/// freshly advected values. Reflection runs once after both components are written.
pub fn advect_velocity(
    h_velocity: &mut DoubleBufferedField,
    v_velocity: &mut DoubleBufferedField,
    dt: f32,
) {
    let (h_current, h_previous) = h_velocity.split_mut();
    let (v_current, v_previous) = v_velocity.split_mut();

    advect(h_current, h_previous, h_previous, v_previous, dt);
    advect(v_current, v_previous, h_previous, v_previous, dt);
    reflect_velocity(h_current, v_current);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use approx::assert_relative_eq;

    /// Bilinear sample of `field` at the continuous lattice position `(x, y)`.
    fn sample(field: &ScalarField, x: f32, y: f32) -> f32 {
        let grid = field.grid();
        let upper = grid.resolution() as f32 + 0.5;
        assert!((0.0..=upper).contains(&x) && (0.0..=upper).contains(&y));
        sample_bilinear(field.as_slice(), grid.extent(), x, y)
    }

    fn uniform(grid: Grid, value: f32) -> ScalarField {
        ScalarField::with_value(grid, value)
    }

    #[test]
    fn test_bilinear_weights() {
        let grid = Grid::new(4);
        let mut field = ScalarField::new(grid);
        field.set(1, 1, 1.0);
        field.set(2, 1, 3.0);
        field.set(1, 2, 5.0);
        field.set(2, 2, 7.0);

        assert_eq!(sample(&field, 1.0, 1.0), 1.0);
        assert_relative_eq!(sample(&field, 1.5, 1.0), 2.0);
        assert_relative_eq!(sample(&field, 1.0, 1.5), 3.0);
        assert_relative_eq!(sample(&field, 1.5, 1.5), 4.0);
        assert_relative_eq!(sample(&field, 1.25, 1.75), 4.5);
    }

    #[test]
    fn test_zero_velocity_is_identity() {
        let grid = Grid::new(8);
        let zero = ScalarField::new(grid);
        let mut source = ScalarField::new(grid);
        source.set(3, 6, 2.5);
        source.set(7, 2, 1.0);
        let mut target = ScalarField::with_value(grid, -1.0);

        advect(&mut target, &source, &zero, &zero, 0.1);

        for (i, j) in grid.interior() {
            assert_eq!(target.get(i, j), source.get(i, j));
        }
    }

    #[test]
    fn test_uniform_velocity_shifts_by_whole_cell() {
        // dt · N · h = 0.1 · 10 · 1 = one cell to the right
        let grid = Grid::new(10);
        let h = uniform(grid, 1.0);
        let v = uniform(grid, 0.0);
        let mut source = ScalarField::new(grid);
        source.set(4, 5, 1.0);
        let mut target = ScalarField::new(grid);

        advect(&mut target, &source, &h, &v, 0.1);

        assert_relative_eq!(target.get(5, 5), 1.0, epsilon = 1e-5);
        assert_relative_eq!(target.get(4, 5), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_half_cell_shift_splits_value() {
        let grid = Grid::new(10);
        let h = uniform(grid, 0.0);
        let v = uniform(grid, 0.5);
        let mut source = ScalarField::new(grid);
        source.set(4, 5, 1.0);
        let mut target = ScalarField::new(grid);

        advect(&mut target, &source, &h, &v, 0.1);

        assert_relative_eq!(target.get(4, 5), 0.5, epsilon = 1e-5);
        assert_relative_eq!(target.get(4, 6), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_large_velocity_is_clamped_into_stencil() {
        let grid = Grid::new(6);
        let h = uniform(grid, 1.0e6);
        let v = uniform(grid, -1.0e6);
        let mut source = ScalarField::new(grid);
        for (i, j) in grid.interior() {
            source.set(i, j, (i * 10 + j) as f32);
        }
        contain(&mut source);
        let mut target = ScalarField::new(grid);

        advect(&mut target, &source, &h, &v, 0.1);

        // Everything traces back to the (0.5, N + 0.5) corner region
        let expected = sample(&source, 0.5, 6.5);
        for (i, j) in grid.interior() {
            assert_eq!(target.get(i, j), expected);
        }
    }

    #[test]
    fn test_border_left_untouched_by_raw_advection() {
        let grid = Grid::new(4);
        let zero = ScalarField::new(grid);
        let source = uniform(grid, 1.0);
        let mut target = uniform(grid, 9.0);

        advect(&mut target, &source, &zero, &zero, 0.1);

        assert!(grid.border().all(|(i, j)| target.get(i, j) == 9.0));
    }

    #[test]
    fn test_velocity_self_advection_reflects() {
        let grid = Grid::new(8);
        let mut h = DoubleBufferedField::new(grid);
        let mut v = DoubleBufferedField::new(grid);
        for (i, j) in grid.interior() {
            h.previous_mut().set(i, j, 0.3);
            v.previous_mut().set(i, j, -0.2);
        }

        advect_velocity(&mut h, &mut v, 0.1);

        assert_relative_eq!(h.current().get(4, 4), 0.3, epsilon = 1e-6);
        assert_relative_eq!(v.current().get(4, 4), -0.2, epsilon = 1e-6);
        assert_eq!(h.current().get(0, 4), -h.current().get(1, 4));
        assert_eq!(v.current().get(4, 0), -v.current().get(4, 1));
    }
}
