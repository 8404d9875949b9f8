//! Error types.
//!
//! Not crossing the plane is a normal [`SliceOutcome`](crate::SliceOutcome),
//! never an error. Broken split geometry is a bug and is asserted on instead.

use thiserror::Error;

use crate::triangle::Attributes;

/// Failure while reading an OBJ file into a [`Mesh`](crate::Mesh).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse OBJ: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("OBJ file contains no triangle geometry")]
    NoGeometry,
}

/// Failure while writing a [`Mesh`](crate::Mesh) as OBJ.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OBJ writer error: {0}")]
    Obj(#[from] obj::ObjError),
}

/// A surface could not be built from the given vertex data.
#[derive(Debug, Error, PartialEq)]
pub enum MeshError {
    /// Every triangle of one surface must carry the same attribute set.
    #[error("triangle {index} carries {found:?}, expected {expected:?}")]
    MixedAttributes {
        index: usize,
        expected: Attributes,
        found: Attributes,
    },

    #[error("{array} array has {len} entries for {vertex_count} vertices")]
    ArrayLength {
        array: &'static str,
        len: usize,
        vertex_count: usize,
    },
}

/// A slice request was rejected before any geometry was touched.
#[derive(Debug, Error, PartialEq)]
pub enum SliceError {
    #[error("plane normal has zero length")]
    ZeroNormal,

    #[error("mesh transform collapses the plane normal")]
    SingularTransform,

    #[error(transparent)]
    Mesh(#[from] MeshError),
}
