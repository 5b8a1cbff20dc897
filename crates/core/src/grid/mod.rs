//! Lattice addressing and border-ring policies

pub mod boundary;
pub mod lattice;

// Re-export main types
pub use boundary::{contain, reflect_velocity, BoundaryPolicy};
pub use lattice::{Grid, BORDER};
