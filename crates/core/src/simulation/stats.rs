//! Per-frame diagnostics and export snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary statistics over the interior of the current buffers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidStats {
    /// Completed steps.
    pub frame: u64,
    /// Sum of density over interior cells.
    pub total_density: f64,
    /// Largest interior density value.
    pub max_density: f32,
    /// Largest interior velocity magnitude.
    pub max_speed: f32,
    /// L2 norm of the discrete divergence of the current velocity field.
    pub divergence_l2: f32,
}

impl fmt::Display for FluidStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "frame {:>5} | mass {:>10.4} | max density {:>8.4} | max speed {:>8.4} | div {:.3e}",
            self.frame, self.total_density, self.max_density, self.max_speed, self.divergence_l2
        )
    }
}

/// Interior-only copy of the renderable fields, row-major with `j` outer.
///
/// Each vector holds `resolution²` values; entry `(j - 1) * resolution + (i - 1)` is
/// cell `(i, j)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidSnapshot {
    pub frame: u64,
    pub resolution: usize,
    pub density: Vec<f32>,
    pub h_velocity: Vec<f32>,
    pub v_velocity: Vec<f32>,
}

impl FluidSnapshot {
    /// Density at interior cell `(i, j)`, 1-based like the lattice.
    ///
    /// # Panics
    /// Panics if `(i, j)` is not an interior cell.
    pub fn density_at(&self, i: usize, j: usize) -> f32 {
        let n = self.resolution;
        assert!(
            (1..=n).contains(&i) && (1..=n).contains(&j),
            "Coordinates out of bounds"
        );
        self.density[(j - 1) * n + (i - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_display() {
        let stats = FluidStats {
            frame: 12,
            total_density: 5.0,
            max_density: 2.5,
            max_speed: 0.25,
            divergence_l2: 0.0,
        };
        let line = stats.to_string();
        assert!(line.starts_with("frame    12"));
        assert!(line.contains("mass     5.0000"));
        assert!(line.contains("max speed   0.2500"));
    }

    #[test]
    fn test_snapshot_indexing() {
        let snapshot = FluidSnapshot {
            frame: 0,
            resolution: 2,
            density: vec![1.0, 2.0, 3.0, 4.0],
            h_velocity: vec![0.0; 4],
            v_velocity: vec![0.0; 4],
        };
        assert_eq!(snapshot.density_at(1, 1), 1.0);
        assert_eq!(snapshot.density_at(2, 1), 2.0);
        assert_eq!(snapshot.density_at(1, 2), 3.0);
    }

    #[test]
    #[should_panic(expected = "Coordinates out of bounds")]
    fn test_snapshot_rejects_border() {
        let snapshot = FluidSnapshot {
            frame: 0,
            resolution: 2,
            density: vec![0.0; 4],
            h_velocity: vec![0.0; 4],
            v_velocity: vec![0.0; 4],
        };
        let _ = snapshot.density_at(0, 1);
    }
}
