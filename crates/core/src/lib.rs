//! Stable Fluids Core Library
//!
//! A 2D grid-based incompressible fluid solver in the semi-Lagrangian "stable fluids"
//! style. A passive density is carried by a velocity field that is diffused, advected
//! through itself and projected onto its divergence-free part every step.
//!
//! ## Layout
//!
//! - [`grid`]: the `(N+2)²` lattice and its boundary policies
//! - [`field`]: flat scalar storage and the double-buffered field
//! - [`solver`]: diffusion, advection and pressure projection stages
//! - [`simulation`]: [`FluidField`], the per-step orchestrator
//!
//! ## Example
//!
//! ```
//! use stable_fluids_core::{FieldKind, FluidConfig, FluidField, Vec2};
//!
//! let mut fluid = FluidField::new(FluidConfig::with_resolution(32));
//! for _ in 0..10 {
//!     fluid.reset_fields();
//!     fluid.add_source(16, 8, FieldKind::Density, 5.0);
//!     fluid.add_velocity_impulse(16, 8, Vec2::new(0.0, 0.1));
//!     fluid.step(0.1);
//! }
//! assert!(fluid.stats().total_density > 0.0);
//! ```

// Core types and utilities
pub mod core_types;

// Storage and lattice
pub mod field;
pub mod grid;

// Numerical stages and their orchestration
pub mod simulation;
pub mod solver;

pub use core_types::Vec2;
pub use field::{DoubleBufferedField, FieldBuffer, ScalarField};
pub use grid::{BoundaryPolicy, Grid};
pub use simulation::{
    ConfigError, FieldKind, FluidConfig, FluidField, FluidSnapshot, FluidStats, SourceImpulse,
};
pub use solver::RELAXATION_ITERATIONS;
