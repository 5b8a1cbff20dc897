//! Stable-fluids solver stages
//!
//! Each stage is a free function over [`FieldBuffer`](crate::field::FieldBuffer)
//! implementors or [`DoubleBufferedField`](crate::field::DoubleBufferedField)s; stages
//! never call each other; [`FluidField`](crate::simulation::FluidField) sequences them.
//!
//! | Stage      | Reads                      | Writes             | Border policy after   |
//! |------------|----------------------------|--------------------|-----------------------|
//! | diffusion  | `previous` (anchor)        | `current`          | contain / reflect     |
//! | advection  | `previous`, velocity       | `current`          | contain / reflect     |
//! | projection | velocity                   | velocity, scratch  | reflect               |
//!
//! Relaxation loops (diffusion, pressure) are sequential Gauss-Seidel sweeps. Every
//! other sweep reads only immutable inputs and is split across rows with Rayon.

pub mod advection;
pub mod diffusion;
pub mod profiler;
pub mod projection;

pub use advection::{advect, advect_scalar, advect_velocity, sample_bilinear};
pub use diffusion::{diffuse_scalar, diffuse_velocity, relax};
pub use profiler::{FrameTimer, ProfilerScope};
pub use projection::{compute_divergence, divergence_l2, project};

/// Fixed Gauss-Seidel sweep budget for both diffusion and the pressure solve.
///
/// A deterministic stand-in for "solve to convergence": raising it changes numerical
/// output, not just cost.
pub const RELAXATION_ITERATIONS: usize = 20;
