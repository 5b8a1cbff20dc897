//! Simulation orchestration
//!
//! [`FluidField`] owns the fields and sequences the solver stages; [`FluidConfig`]
//! holds its construction parameters; impulses and diagnostics live alongside.

mod config;
mod fluid_field;
mod impulse;
mod stats;

pub use config::{ConfigError, FluidConfig};
pub use fluid_field::FluidField;
pub use impulse::{stamp_disk, FieldKind, SourceImpulse};
pub use stats::{FluidSnapshot, FluidStats};
