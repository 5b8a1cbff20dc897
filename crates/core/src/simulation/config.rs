//! Fluid configuration
//!
//! Construction parameters for [`FluidField`](super::FluidField). Validated once when
//! the field is built; the solver itself never re-checks them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Construction parameters for a fluid simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidConfig {
    /// Interior cells per axis (N). The allocated lattice is `(N + 2)²`.
    pub resolution: usize,
    /// Kinematic viscosity used by velocity diffusion (≥ 0).
    pub viscosity: f32,
    /// Density diffusion rate (≥ 0).
    pub diffusion_rate: f32,
    /// Radius in cells of the disk stamped by [`add_source`](super::FluidField::add_source).
    pub source_radius: usize,
    /// Default density injected per impulse by drivers.
    pub density_amount: f32,
    /// Default velocity magnitude injected per impulse by drivers.
    pub force: f32,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            resolution: 100,
            viscosity: 0.0,
            diffusion_rate: 0.0,
            source_radius: 3,
            density_amount: 5.0,
            force: 0.1,
        }
    }
}

impl FluidConfig {
    /// Default configuration at a different resolution.
    pub fn with_resolution(resolution: usize) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    /// Check every parameter against its admissible range.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found: zero resolution, a source radius
    /// above `2 · (N + 1)`, a negative or non-finite rate, or
    /// a non-finite impulse amount.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        let max_radius = self.resolution.saturating_add(1).saturating_mul(2);
        if self.source_radius > max_radius {
            return Err(ConfigError::RadiusTooLarge {
                radius: self.source_radius,
                max: max_radius,
            });
        }
        for (name, value) in [
            ("viscosity", self.viscosity),
            ("diffusion_rate", self.diffusion_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRate { name, value });
            }
        }
        for (name, value) in [
            ("density_amount", self.density_amount),
            ("force", self.force),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteAmount { name, value });
            }
        }
        Ok(())
    }
}

/// Reasons a [`FluidConfig`] is rejected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// `resolution` was zero; a lattice needs at least one interior cell.
    ZeroResolution,
    /// `source_radius` exceeds `2 · (N + 1)`, the largest useful disk on the lattice.
    RadiusTooLarge { radius: usize, max: usize },
    /// A diffusion coefficient was negative, NaN or infinite.
    InvalidRate { name: &'static str, value: f32 },
    /// An impulse magnitude was NaN or infinite.
    NonFiniteAmount { name: &'static str, value: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroResolution => write!(f, "Grid resolution must be positive"),
            ConfigError::RadiusTooLarge { radius, max } => {
                write!(f, "Source radius {radius} exceeds the lattice limit {max}")
            }
            ConfigError::InvalidRate { name, value } => {
                write!(f, "Parameter '{name}' must be finite and non-negative, got {value}")
            }
            ConfigError::NonFiniteAmount { name, value } => {
                write!(f, "Parameter '{name}' must be finite, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
