//! Border-ring fill rules
//!
//! Relaxation and advection only write interior cells, so the border must be refilled
//! from its interior neighbours after every stage that touches the interior.
//!
//! - **Scalar containment** (density, pressure, divergence): each border cell copies its
//!   nearest interior neighbour, a zero-Neumann no-flux wall.
//! - **Velocity reflection**: the component normal to a wall is negated there
//!   (no penetration) and the tangential component is copied (free slip).
//!
//! Both rules set each corner to the mean of its two adjacent border cells.

use crate::field::FieldBuffer;

/// How a field's border ring is derived from its interior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryPolicy {
    /// Mirror the nearest interior value on every side.
    Scalar,
    /// Horizontal velocity component: negated at the left/right walls, copied at the
    /// top/bottom walls.
    Horizontal,
    /// Vertical velocity component: negated at the top/bottom walls, copied at the
    /// left/right walls.
    Vertical,
}

impl BoundaryPolicy {
    /// Sign applied when copying across the left/right and the top/bottom walls.
    const fn wall_signs(self) -> (f32, f32) {
        match self {
            Self::Scalar => (1.0, 1.0),
            Self::Horizontal => (-1.0, 1.0),
            Self::Vertical => (1.0, -1.0),
        }
    }

    /// Refill the border ring of `field` from its interior.
    pub fn apply<F: FieldBuffer + ?Sized>(self, field: &mut F) {
        let grid = field.grid();
        let n = grid.resolution();
        let (side_sign, cap_sign) = self.wall_signs();
        let values = field.as_mut_slice();

        for k in 1..=n {
            values[grid.index(0, k)] = side_sign * values[grid.index(1, k)];
            values[grid.index(n + 1, k)] = side_sign * values[grid.index(n, k)];
            values[grid.index(k, 0)] = cap_sign * values[grid.index(k, 1)];
            values[grid.index(k, n + 1)] = cap_sign * values[grid.index(k, n)];
        }

        let corner = |values: &[f32], a: (usize, usize), b: (usize, usize)| {
            0.5 * (values[grid.index(a.0, a.1)] + values[grid.index(b.0, b.1)])
        };
        values[grid.index(0, 0)] = corner(values, (1, 0), (0, 1));
        values[grid.index(0, n + 1)] = corner(values, (1, n + 1), (0, n));
        values[grid.index(n + 1, 0)] = corner(values, (n, 0), (n + 1, 1));
        values[grid.index(n + 1, n + 1)] = corner(values, (n, n + 1), (n + 1, n));
    }
}

/// Scalar containment: mirror interior values into the border.
pub fn contain<F: FieldBuffer + ?Sized>(field: &mut F) {
    BoundaryPolicy::Scalar.apply(field);
}

/// Velocity reflection applied to both components of a velocity field.
pub fn reflect_velocity<H, V>(h_velocity: &mut H, v_velocity: &mut V)
where
    H: FieldBuffer + ?Sized,
    V: FieldBuffer + ?Sized,
{
    BoundaryPolicy::Horizontal.apply(h_velocity);
    BoundaryPolicy::Vertical.apply(v_velocity);
}
