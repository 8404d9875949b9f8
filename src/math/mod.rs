//! Small value-type linear algebra used throughout the slicer.
//!
//! Vectors and the matrix are plain `Copy` structs. Float comparisons in
//! tests go through the [`approx`] traits implemented here.

pub mod mat4;
pub mod vec2;
pub mod vec3;
pub mod vec4;

mod approx_impls;

/// Twice the signed area of the 2D triangle (x1,y1), (x2,y2), (x3,y3).
///
/// Used both for hull turn tests and for barycentric sub-areas, so the sign
/// convention must stay the same in both places.
#[inline]
pub fn tri_area_2d(x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) -> f32 {
    (x1 - x2) * (y2 - y3) - (x2 - x3) * (y1 - y2)
}
