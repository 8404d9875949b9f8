//! Host mesh representation.
//!
//! A [`Mesh`] is a list of [`Surface`]s, each one a set of parallel vertex
//! arrays drawn with a single material. This is the data the slicer reads
//! from and writes back to; the geometry work itself happens on flat
//! [`Triangle`](crate::Triangle) lists (see [`crate::surface`]).

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::{LoadError, MeshError};
use crate::math::{vec2::Vec2, vec3::Vec3, vec4::Vec4};

/// How a surface's vertices are assembled into primitives.
///
/// Only [`PrimitiveTopology::Triangles`] can be sliced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    Points,
    Lines,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
}

/// A material reference. The slicer only carries it through to the output.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Material {
    pub name: String,
}

impl Material {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Parallel per-vertex arrays of one surface.
///
/// `positions` defines the vertex count. Every other array is either empty
/// (attribute absent) or holds one entry per vertex. `indices`, when set,
/// lists three vertex indices per triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexArrays {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// xyz tangent plus handedness sign in w.
    pub tangents: Vec<Vec4>,
    pub colors: Vec<Vec4>,
    pub bones: Vec<Vec4>,
    pub weights: Vec<Vec4>,
    pub uvs: Vec<Vec2>,
    pub uv2s: Vec<Vec2>,
    pub indices: Option<Vec<u32>>,
}

impl VertexArrays {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of corners the arrays describe: the index count when indexed,
    /// the vertex count otherwise.
    pub fn corner_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or(self.positions.len(), |indices| indices.len())
    }

    /// Checks that every non-empty attribute array has one entry per vertex.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.vertex_count();
        let lengths = [
            ("normals", self.normals.len()),
            ("tangents", self.tangents.len()),
            ("colors", self.colors.len()),
            ("bones", self.bones.len()),
            ("weights", self.weights.len()),
            ("uvs", self.uvs.len()),
            ("uv2s", self.uv2s.len()),
        ];

        for (array, len) in lengths {
            if len != 0 && len != vertex_count {
                return Err(MeshError::ArrayLength {
                    array,
                    len,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}

/// One drawable part of a mesh: vertex arrays plus the material they use.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Surface {
    pub topology: PrimitiveTopology,
    pub arrays: VertexArrays,
    pub material: Option<Material>,
}

impl Surface {
    /// Creates a triangle surface after checking the array lengths.
    pub fn new(arrays: VertexArrays, material: Option<Material>) -> Result<Self, MeshError> {
        arrays.validate()?;
        Ok(Self {
            topology: PrimitiveTopology::Triangles,
            arrays,
            material,
        })
    }

    /// Number of triangles, or 0 for other topologies.
    pub fn triangle_count(&self) -> usize {
        match self.topology {
            PrimitiveTopology::Triangles => self.arrays.corner_count() / 3,
            _ => 0,
        }
    }
}

/// A named collection of surfaces.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    name: String,
    surfaces: Vec<Surface>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            surfaces: Vec::new(),
        }
    }

    /// Load a mesh from an OBJ file.
    ///
    /// Every object in the file becomes one surface. Faces are triangulated
    /// and vertices re-indexed so that positions, normals and UVs share one
    /// index buffer. Materials are resolved by name only.
    pub fn from_obj(file_path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let file_path = file_path.as_ref();
        let (models, materials) = tobj::load_obj(file_path, &tobj::GPU_LOAD_OPTIONS)?;

        let name = file_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let materials = materials.unwrap_or_else(|err| {
            log::warn!("ignoring materials of {}: {}", file_path.display(), err);
            Vec::new()
        });

        Self::from_tobj(name, models, &materials)
    }

    /// Load a mesh from OBJ text. Material libraries are not followed.
    pub fn load_obj_buf(name: impl Into<String>, reader: &mut impl BufRead) -> Result<Self, LoadError> {
        let (models, _) = tobj::load_obj_buf(reader, &tobj::GPU_LOAD_OPTIONS, |_| {
            Ok((Vec::new(), HashMap::new()))
        })?;
        Self::from_tobj(name.into(), models, &[])
    }

    fn from_tobj(
        name: String,
        models: Vec<tobj::Model>,
        materials: &[tobj::Material],
    ) -> Result<Self, LoadError> {
        let mut mesh = Self::new(name);

        for model in models {
            let obj = model.mesh;
            if obj.indices.len() < 3 {
                log::debug!("skipping OBJ object {:?} without faces", model.name);
                continue;
            }

            let arrays = VertexArrays {
                positions: obj
                    .positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0], p[1], p[2]))
                    .collect(),
                normals: obj
                    .normals
                    .chunks_exact(3)
                    .map(|n| Vec3::new(n[0], n[1], n[2]))
                    .collect(),
                colors: obj
                    .vertex_color
                    .chunks_exact(3)
                    .map(|c| Vec4::new(c[0], c[1], c[2], 1.0))
                    .collect(),
                uvs: obj
                    .texcoords
                    .chunks_exact(2)
                    .map(|t| Vec2::new(t[0], t[1]))
                    .collect(),
                indices: Some(obj.indices),
                ..Default::default()
            };

            let material = obj
                .material_id
                .and_then(|id| materials.get(id))
                .map(|material| Material::new(material.name.clone()));

            mesh.add_surface(Surface {
                topology: PrimitiveTopology::Triangles,
                arrays,
                material,
            });
        }

        if mesh.surfaces.is_empty() {
            return Err(LoadError::NoGeometry);
        }
        Ok(mesh)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // ============ Surface Access ============

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn surface(&self, index: usize) -> Option<&Surface> {
        self.surfaces.get(index)
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn add_surface(&mut self, surface: Surface) {
        self.surfaces.push(surface);
    }

    /// Material of a surface, `None` if unset or out of range.
    pub fn surface_material(&self, index: usize) -> Option<&Material> {
        self.surfaces.get(index).and_then(|s| s.material.as_ref())
    }

    /// Total triangle count over all triangle surfaces.
    pub fn triangle_count(&self) -> usize {
        self.surfaces.iter().map(Surface::triangle_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.triangle_count() == 0
    }
}
