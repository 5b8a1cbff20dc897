//! Implicit diffusion by fixed-budget relaxation
//!
//! Each interior cell solves
//!
//! ```text
//! x[i,j] = (x0[i,j] + k · (x[i-1,j] + x[i+1,j] + x[i,j-1] + x[i,j+1])) / (1 + 4k)
//! ```
//!
//! where `x0` is the `previous` buffer (held fixed as the anchor) and `x` is `current`,
//! which doubles as the evolving estimate and the neighbour source. Sweeps are
//! lexicographic Gauss-Seidel: a cell sees the values its left and lower neighbours
//! already received in the same sweep.
//!
//! The coupling constant differs per field kind:
//! - scalars: `k = dt · rate · N²`
//! - velocity components: `k = dt · rate · N`
//!
//! Scalar diffusion refills the border after every sweep; velocity diffusion reflects
//! once after the whole loop.

use super::RELAXATION_ITERATIONS;
use crate::field::{DoubleBufferedField, FieldBuffer};
use crate::grid::{contain, reflect_velocity};

/// One in-place Gauss-Seidel sweep of the implicit diffusion equation.
///
/// `k = 0` copies `anchor` into the interior of `current`; the denominator `1 + 4k`
/// never drops below one.
pub fn relax<F, A>(current: &mut F, anchor: &A, k: f32)
where
    F: FieldBuffer + ?Sized,
    A: FieldBuffer + ?Sized,
{
    let grid = current.grid();
    debug_assert_eq!(grid, anchor.grid(), "relaxation buffers must share a grid");

    let n = grid.resolution();
    let width = grid.extent();
    let inv_denominator = 1.0 / (1.0 + 4.0 * k);
    let anchor = anchor.as_slice();
    let x = current.as_mut_slice();

    for j in 1..=n {
        let row = j * width;
        for i in 1..=n {
            let idx = row + i;
            let neighbors = x[idx - 1] + x[idx + 1] + x[idx - width] + x[idx + width];
            x[idx] = (anchor[idx] + k * neighbors) * inv_denominator;
        }
    }
}

/// Coupling constant for a scalar field: `dt · rate · N²`.
#[inline]
pub fn scalar_coupling(resolution: usize, rate: f32, dt: f32) -> f32 {
    let n = resolution as f32;
    dt * rate * n * n
}

/// Coupling constant for a velocity component: `dt · rate · N`.
#[inline]
pub fn velocity_coupling(resolution: usize, rate: f32, dt: f32) -> f32 {
    dt * rate * resolution as f32
}

/// Diffuse a scalar field (density) from `previous` into `current`.
///
/// Containment runs after every sweep.
pub fn diffuse_scalar(field: &mut DoubleBufferedField, rate: f32, dt: f32) {
    let k = scalar_coupling(field.grid().resolution(), rate, dt);
    let (current, previous) = field.split_mut();

    for _ in 0..RELAXATION_ITERATIONS {
        relax(current, previous, k);
        contain(current);
    }
}

/// Diffuse both velocity components from `previous` into `current`.
///
/// Reflection runs once, after the full relaxation loop.
pub fn diffuse_velocity(
    h_velocity: &mut DoubleBufferedField,
    v_velocity: &mut DoubleBufferedField,
    viscosity: f32,
    dt: f32,
) {
    let k = velocity_coupling(h_velocity.grid().resolution(), viscosity, dt);
    let (h_current, h_previous) = h_velocity.split_mut();
    let (v_current, v_previous) = v_velocity.split_mut();

    for _ in 0..RELAXATION_ITERATIONS {
        relax(h_current, h_previous, k);
        relax(v_current, v_previous, k);
    }
    reflect_velocity(h_current, v_current);
}
