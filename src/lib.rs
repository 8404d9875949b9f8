//! Plane slicing for closed triangle meshes.
//!
//! A [`Slicer`] cuts a [`Mesh`] along a [`Plane`] into an upper and a lower
//! half and seals the cut on both with a triangulated cap. Triangles that
//! cross the plane are split, and every per-vertex attribute (normals,
//! tangents, colors, UVs, bone indices and weights) is interpolated onto
//! the new vertices.
//!
//! # Quick Start
//!
//! ```
//! use meshslice::prelude::*;
//! use meshslice::primitives::uv_sphere;
//!
//! let sphere = uv_sphere(1.0, 2.0, 64, 32);
//! let outcome = Slicer::new()
//!     .slice_mesh(&sphere, Vec3::ZERO, Vec3::UP, None)
//!     .unwrap();
//!
//! let sliced = outcome.into_sliced().unwrap();
//! assert_eq!(sliced.upper.surface_count(), 2); // sphere half + cap
//! ```

// Public API - exposed to library consumers
pub mod error;
pub mod math;
pub mod mesh;
pub mod plane;
pub mod primitives;
pub mod slicer;
pub mod splitter;
pub mod surface;
pub mod transform;
pub mod triangle;
pub mod triangulator;

// Internal modules - extend public types only
mod interpolate;
mod wavefront;

// Re-export commonly needed types at crate root for convenience
pub use error::{ExportError, LoadError, MeshError, SliceError};
pub use mesh::{Material, Mesh, PrimitiveTopology, Surface, VertexArrays};
pub use plane::{Plane, Side, PLANE_EPSILON};
pub use slicer::{SliceOutcome, SlicedMesh, Slicer, SlicerConfig};
pub use splitter::{SplitCase, SplitResult, Splitter};
pub use transform::Transform;
pub use triangle::{Attributes, Triangle};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use meshslice::prelude::*;
/// ```
pub mod prelude {
    // Slicing
    pub use crate::slicer::{SliceOutcome, SlicedMesh, Slicer, SlicerConfig};

    // Geometry
    pub use crate::plane::{Plane, Side, PLANE_EPSILON};
    pub use crate::triangle::{Attributes, Triangle};

    // Mesh
    pub use crate::mesh::{Material, Mesh, Surface};

    // Transform
    pub use crate::transform::Transform;

    // Math
    pub use crate::math::vec2::Vec2;
    pub use crate::math::vec3::Vec3;
    pub use crate::math::vec4::Vec4;
}
