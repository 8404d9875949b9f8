use approx::{AbsDiffEq, RelativeEq};

use super::vec2::Vec2;
use super::vec3::Vec3;
use super::vec4::Vec4;

macro_rules! impl_approx {
    ($ty:ty, $($field:ident),+) => {
        impl AbsDiffEq for $ty {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                f32::EPSILON
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                $(self.$field.abs_diff_eq(&other.$field, epsilon))&&+
            }
        }

        impl RelativeEq for $ty {
            fn default_max_relative() -> f32 {
                f32::EPSILON
            }

            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                $(self.$field.relative_eq(&other.$field, epsilon, max_relative))&&+
            }
        }
    };
}

impl_approx!(Vec2, x, y);
impl_approx!(Vec3, x, y, z);
impl_approx!(Vec4, x, y, z, w);
