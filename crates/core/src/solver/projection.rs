//! Pressure projection (discrete Hodge decomposition)
//!
//! Removes the divergent part of the velocity field so the flow stays approximately
//! incompressible.
//!
//! # Theory
//!
//! Any velocity field splits into a divergence-free part plus a gradient:
//!
//! ```text
//! u = u_free + ∇p
//! ```
//!
//! Taking the divergence of both sides gives a Poisson equation for `p`:
//!
//! ```text
//! ∇²p = ∇·u
//! ```
//!
//! On the lattice with `h = 1/N` the solver computes
//!
//! ```text
//! div[i,j] = -0.5 · h · (h_vel[i+1,j] - h_vel[i-1,j] + v_vel[i,j+1] - v_vel[i,j-1])
//! p[i,j]   = (div[i,j] + p[i-1,j] + p[i+1,j] + p[i,j-1] + p[i,j+1]) / 4
//! ```
//!
//! relaxes `p` for a fixed number of Gauss-Seidel sweeps, then subtracts the central
//! difference gradient:
//!
//! ```text
//! h_vel[i,j] -= 0.5 · (p[i+1,j] - p[i-1,j]) / h
//! v_vel[i,j] -= 0.5 · (p[i,j+1] - p[i,j-1]) / h
//! ```

use super::RELAXATION_ITERATIONS;
use crate::field::{FieldBuffer, ScalarField};
use crate::grid::{contain, reflect_velocity};
use rayon::prelude::*;

/// Write the discrete divergence of `(h_velocity, v_velocity)` into the interior of
/// `divergence`. The border is left for the caller to contain.
pub fn compute_divergence<V, D>(h_velocity: &V, v_velocity: &V, divergence: &mut D)
where
    V: FieldBuffer + ?Sized,
    D: FieldBuffer + ?Sized,
{
    let grid = divergence.grid();
    let n = grid.resolution();
    let width = grid.extent();
    let scale = -0.5 * grid.cell_size();
    let h = h_velocity.as_slice();
    let v = v_velocity.as_slice();

    divergence
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .skip(1)
        .take(n)
        .for_each(|(j, row)| {
            for i in 1..=n {
                let idx = j * width + i;
                row[i] = scale * (h[idx + 1] - h[idx - 1] + v[idx + width] - v[idx - width]);
            }
        });
}

/// L2 norm of the discrete divergence over interior cells.
///
/// Diagnostic only; allocates a scratch field.
pub fn divergence_l2<V: FieldBuffer + ?Sized>(h_velocity: &V, v_velocity: &V) -> f32 {
    let grid = h_velocity.grid();
    let mut divergence = ScalarField::new(grid);
    compute_divergence(h_velocity, v_velocity, &mut divergence);

    let sum_sq: f64 = divergence
        .interior_values()
        .iter()
        .map(|&d| f64::from(d) * f64::from(d))
        .sum();
    sum_sq.sqrt() as f32
}

/// One in-place Gauss-Seidel sweep of the pressure Poisson equation.
fn relax_pressure<P, D>(pressure: &mut P, divergence: &D)
where
    P: FieldBuffer + ?Sized,
    D: FieldBuffer + ?Sized,
{
    let grid = pressure.grid();
    let n = grid.resolution();
    let width = grid.extent();
    let rhs = divergence.as_slice();
    let p = pressure.as_mut_slice();

    for j in 1..=n {
        let row = j * width;
        for i in 1..=n {
            let idx = row + i;
            p[idx] = (rhs[idx] + p[idx - 1] + p[idx + 1] + p[idx - width] + p[idx + width]) * 0.25;
        }
    }
}

/// Subtract the pressure gradient from the velocity interior.
fn subtract_gradient<V, P>(h_velocity: &mut V, v_velocity: &mut V, pressure: &P)
where
    V: FieldBuffer + ?Sized,
    P: FieldBuffer + ?Sized,
{
    let grid = pressure.grid();
    let n = grid.resolution();
    let width = grid.extent();
    let gradient_scale = 0.5 / grid.cell_size();
    let p = pressure.as_slice();

    h_velocity
        .as_mut_slice()
        .par_chunks_mut(width)
        .zip(v_velocity.as_mut_slice().par_chunks_mut(width))
        .enumerate()
        .skip(1)
        .take(n)
        .for_each(|(j, (h_row, v_row))| {
            for i in 1..=n {
                let idx = j * width + i;
                h_row[i] -= gradient_scale * (p[idx + 1] - p[idx - 1]);
                v_row[i] -= gradient_scale * (p[idx + width] - p[idx - width]);
            }
        });
}

/// Project `(h_velocity, v_velocity)` onto its approximately divergence-free part.
///
/// `pressure` and `divergence` are scratch fields recomputed in full on every call.
/// Velocity reflection is reapplied on exit.
pub fn project<V, S>(h_velocity: &mut V, v_velocity: &mut V, pressure: &mut S, divergence: &mut S)
where
    V: FieldBuffer + ?Sized,
    S: FieldBuffer + ?Sized,
{
    compute_divergence(&*h_velocity, &*v_velocity, divergence);
    pressure.as_mut_slice().fill(0.0);

    contain(divergence);
    contain(pressure);

    for _ in 0..RELAXATION_ITERATIONS {
        relax_pressure(pressure, divergence);
        contain(pressure);
    }

    subtract_gradient(h_velocity, v_velocity, pressure);
    reflect_velocity(h_velocity, v_velocity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use approx::assert_relative_eq;

    struct Scratch {
        h: ScalarField,
        v: ScalarField,
        pressure: ScalarField,
        divergence: ScalarField,
    }

    impl Scratch {
        fn new(n: usize) -> Self {
            let grid = Grid::new(n);
            Self {
                h: ScalarField::new(grid),
                v: ScalarField::new(grid),
                pressure: ScalarField::new(grid),
                divergence: ScalarField::new(grid),
            }
        }

        fn project(&mut self) {
            project(
                &mut self.h,
                &mut self.v,
                &mut self.pressure,
                &mut self.divergence,
            );
        }
    }

    #[test]
    fn test_divergence_of_point_source() {
        let mut s = Scratch::new(16);
        s.h.set(8, 8, 1.0);
        compute_divergence(&s.h, &s.v, &mut s.divergence);

        // -0.5 · (1/16) · (right - left)
        assert_relative_eq!(s.divergence.get(7, 8), -1.0 / 32.0);
        assert_relative_eq!(s.divergence.get(9, 8), 1.0 / 32.0);
        assert_eq!(s.divergence.get(8, 8), 0.0);
        assert_relative_eq!(
            divergence_l2(&s.h, &s.v),
            (2.0_f32 / 1024.0).sqrt(),
            max_relative = 1e-5
        );
    }

    #[test]
    fn test_projection_reduces_horizontal_point_source_divergence() {
        let mut s = Scratch::new(16);
        s.h.set(8, 8, 1.0);
        reflect_velocity(&mut s.h, &mut s.v);
        let before = divergence_l2(&s.h, &s.v);

        s.project();

        let after = divergence_l2(&s.h, &s.v);
        assert!(
            after < before,
            "Divergence should shrink: before={before}, after={after}"
        );
        assert!(after < 0.75 * before);
    }

    #[test]
    fn test_projection_reduces_vertical_point_source_divergence() {
        let mut s = Scratch::new(16);
        s.v.set(5, 11, -2.0);
        let before = divergence_l2(&s.h, &s.v);

        s.project();

        assert!(divergence_l2(&s.h, &s.v) < before);
    }

    #[test]
    fn test_divergence_free_field_is_unchanged() {
        let mut s = Scratch::new(8);
        s.project();

        assert!(s.h.as_slice().iter().all(|&v| v == 0.0));
        assert!(s.v.as_slice().iter().all(|&v| v == 0.0));
        assert!(s.pressure.as_slice().iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_projection_reflects_velocity_border() {
        let mut s = Scratch::new(8);
        s.h.set(1, 3, 0.7);
        s.v.set(6, 8, 0.4);

        s.project();

        for k in 1..=8 {
            assert_eq!(s.h.get(0, k), -s.h.get(1, k));
            assert_eq!(s.v.get(k, 9), -s.v.get(k, 8));
        }
    }

    #[test]
    fn test_scratch_fields_are_contained() {
        let mut s = Scratch::new(8);
        s.h.set(4, 4, 1.0);
        s.v.set(5, 2, -1.0);

        s.project();

        for k in 1..=8 {
            assert_eq!(s.pressure.get(0, k), s.pressure.get(1, k));
            assert_eq!(s.divergence.get(k, 9), s.divergence.get(k, 8));
        }
    }
}
