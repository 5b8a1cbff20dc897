//! Field storage on the padded lattice
//!
//! Kernels are written against the [`FieldBuffer`] trait so any flat row-major
//! `(N + 2)²` buffer can be swept; [`ScalarField`] is the owned CPU implementation and
//! [`DoubleBufferedField`] pairs two of them with a cheap role swap.

mod double_buffer;
mod scalar;
#[allow(clippy::module_name_repetitions)]
mod r#trait;

pub use double_buffer::DoubleBufferedField;
pub use r#trait::FieldBuffer;
pub use scalar::ScalarField;
