//! Vector type alias for 2D velocities.

use nalgebra::Vector2;

/// 2D vector type for per-cell velocities and directional impulses.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`; `x` is the horizontal
/// component and `y` the vertical one.
pub type Vec2 = Vector2<f32>;
