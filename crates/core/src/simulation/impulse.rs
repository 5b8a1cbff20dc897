//! Source impulses
//!
//! Drivers express pointer-style input as impulses: an additive value stamped over a
//! small disk of cells in one field's `previous` buffer. The next
//! [`add_source`](crate::field::DoubleBufferedField::add_source) folds them into the
//! field, scaled by `dt`.

use crate::field::{FieldBuffer, ScalarField};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Which simulated quantity an impulse targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Density,
    HorizontalVelocity,
    VerticalVelocity,
}

/// An impulse queued between frames and applied at the start of the next step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceImpulse {
    /// Column of the disk center.
    pub x: usize,
    /// Row of the disk center.
    pub y: usize,
    /// Target field.
    pub kind: FieldKind,
    /// Amount added to every covered cell.
    pub value: f32,
}

impl SourceImpulse {
    pub fn new(x: usize, y: usize, kind: FieldKind, value: f32) -> Self {
        Self { x, y, kind, value }
    }

    pub fn density(x: usize, y: usize, value: f32) -> Self {
        Self::new(x, y, FieldKind::Density, value)
    }
}

/// Add `value` to every cell with `dx² + dy² ≤ radius²` around `(x, y)`.
///
/// Only the part of the disk's bounding square that overlaps the allocated lattice
/// `[0, N+1]²` is visited, so a disk near (or centered past) the edge is clipped rather
/// than wrapped. Returns the number of cells touched.
pub fn stamp_disk(field: &mut ScalarField, x: usize, y: usize, radius: usize, value: f32) -> usize {
    let grid = field.grid();
    let last = grid.extent() - 1;
    let (Some(columns), Some(rows)) = (clipped_span(x, radius, last), clipped_span(y, radius, last))
    else {
        return 0;
    };

    // Squared distances in u128: radius² alone can exceed u64.
    let radius_squared = (radius as u128) * (radius as u128);
    let mut touched = 0;

    for j in rows {
        let dy = j.abs_diff(y) as u128;
        for i in columns.clone() {
            let dx = i.abs_diff(x) as u128;
            if (dx * dx).saturating_add(dy * dy) <= radius_squared {
                field.add(i, j, value);
                touched += 1;
            }
        }
    }

    touched
}

/// `[center - radius, center + radius] ∩ [0, last]`, or `None` when empty.
fn clipped_span(center: usize, radius: usize, last: usize) -> Option<RangeInclusive<usize>> {
    let low = center.saturating_sub(radius);
    let high = center.saturating_add(radius).min(last);
    (low <= high).then_some(low..=high)
}
