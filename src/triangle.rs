//! The triangle record the splitter and triangulator operate on.

use bitflags::bitflags;

use crate::math::{vec2::Vec2, vec3::Vec3, vec4::Vec4};

bitflags! {
    /// Which per-vertex attributes a [`Triangle`] carries.
    ///
    /// Presence is per triangle, never per vertex: either all three vertices
    /// have a value or none do.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Attributes: u8 {
        const NORMAL = 1 << 0;
        /// xyz direction plus handedness sign in w.
        const TANGENT = 1 << 1;
        const COLOR = 1 << 2;
        const BONES = 1 << 3;
        const WEIGHTS = 1 << 4;
        const UV = 1 << 5;
        const UV2 = 1 << 6;
    }
}

/// A face with three ordered vertices and optional per-vertex attributes.
///
/// Vertex order defines the winding. Attribute slots for absent attributes
/// hold zeroes and are never read.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Triangle {
    pub vertices: [Vec3; 3],
    pub normals: [Vec3; 3],
    pub tangents: [Vec4; 3],
    pub colors: [Vec4; 3],
    pub bones: [Vec4; 3],
    pub weights: [Vec4; 3],
    pub uvs: [Vec2; 3],
    pub uv2s: [Vec2; 3],
    attributes: Attributes,
}

impl Triangle {
    /// Create a bare triangle with no attributes.
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self {
            vertices: [a, b, c],
            ..Self::default()
        }
    }

    pub fn attributes(&self) -> Attributes {
        self.attributes
    }

    pub fn has(&self, attributes: Attributes) -> bool {
        self.attributes.contains(attributes)
    }

    pub fn set_normals(&mut self, normals: [Vec3; 3]) -> &mut Self {
        self.normals = normals;
        self.attributes |= Attributes::NORMAL;
        self
    }

    pub fn set_tangents(&mut self, tangents: [Vec4; 3]) -> &mut Self {
        self.tangents = tangents;
        self.attributes |= Attributes::TANGENT;
        self
    }

    pub fn set_colors(&mut self, colors: [Vec4; 3]) -> &mut Self {
        self.colors = colors;
        self.attributes |= Attributes::COLOR;
        self
    }

    pub fn set_bones(&mut self, bones: [Vec4; 3]) -> &mut Self {
        self.bones = bones;
        self.attributes |= Attributes::BONES;
        self
    }

    pub fn set_weights(&mut self, weights: [Vec4; 3]) -> &mut Self {
        self.weights = weights;
        self.attributes |= Attributes::WEIGHTS;
        self
    }

    pub fn set_uvs(&mut self, uvs: [Vec2; 3]) -> &mut Self {
        self.uvs = uvs;
        self.attributes |= Attributes::UV;
        self
    }

    pub fn set_uv2s(&mut self, uv2s: [Vec2; 3]) -> &mut Self {
        self.uv2s = uv2s;
        self.attributes |= Attributes::UV2;
        self
    }

    /// Un-normalized face normal following the right-hand rule.
    pub fn face_normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a)
    }

    /// Returns the same triangle with vertices 1 and 2 swapped, flipping
    /// the winding. Attributes travel with their vertices.
    pub fn flipped(&self) -> Self {
        fn swap<T>(values: &mut [T; 3]) {
            values.swap(1, 2);
        }

        let mut flipped = *self;
        swap(&mut flipped.vertices);
        swap(&mut flipped.normals);
        swap(&mut flipped.tangents);
        swap(&mut flipped.colors);
        swap(&mut flipped.bones);
        swap(&mut flipped.weights);
        swap(&mut flipped.uvs);
        swap(&mut flipped.uv2s);
        flipped
    }
}
