//! Conversion between host [`Surface`]s and flat [`Triangle`] lists.
//!
//! Reading is lenient: malformed surfaces produce no triangles and a
//! warning, attribute arrays of the wrong length are ignored. Writing is
//! strict: a triangle group must be attribute-homogeneous.

use crate::error::MeshError;
use crate::math::vec3::Vec3;
use crate::mesh::{Material, PrimitiveTopology, Surface, VertexArrays};
use crate::triangle::{Attributes, Triangle};

fn gather<T: Copy>(values: &[T], corners: [usize; 3]) -> [T; 3] {
    corners.map(|i| values[i])
}

/// Attributes whose arrays hold exactly one entry per vertex.
fn present_attributes(arrays: &VertexArrays) -> Attributes {
    let vertex_count = arrays.vertex_count();
    let mut present = Attributes::empty();

    for (flag, name, len) in [
        (Attributes::NORMAL, "normals", arrays.normals.len()),
        (Attributes::TANGENT, "tangents", arrays.tangents.len()),
        (Attributes::COLOR, "colors", arrays.colors.len()),
        (Attributes::BONES, "bones", arrays.bones.len()),
        (Attributes::WEIGHTS, "weights", arrays.weights.len()),
        (Attributes::UV, "uvs", arrays.uvs.len()),
        (Attributes::UV2, "uv2s", arrays.uv2s.len()),
    ] {
        if len == 0 {
            continue;
        }
        if len == vertex_count {
            present |= flag;
        } else {
            log::warn!("ignoring {name}: {len} entries for {vertex_count} vertices");
        }
    }
    present
}

/// Corner triples of every triangle, or `None` if the buffers can't be read
/// as a triangle list.
fn corner_triples(arrays: &VertexArrays) -> Option<Vec<[usize; 3]>> {
    let vertex_count = arrays.vertex_count();

    match &arrays.indices {
        Some(indices) => {
            if indices.len() % 3 != 0 {
                log::warn!("index count {} is not a multiple of 3", indices.len());
                return None;
            }
            if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                log::warn!("index {bad} out of range for {vertex_count} vertices");
                return None;
            }
            Some(
                indices
                    .chunks_exact(3)
                    .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
                    .collect(),
            )
        }
        None => {
            if vertex_count % 3 != 0 {
                log::warn!("vertex count {vertex_count} is not a multiple of 3");
                return None;
            }
            Some((0..vertex_count / 3).map(|t| [t * 3, t * 3 + 1, t * 3 + 2]).collect())
        }
    }
}

/// Reads a surface into a flat list of triangles, in buffer order.
///
/// Positions are snapped to a grid of `snap_step` when given, so vertices
/// shared between neighbouring faces compare equal after splitting.
/// Non-triangle topologies and malformed buffers yield an empty list.
pub fn triangles_from_surface(surface: &Surface, snap_step: Option<f32>) -> Vec<Triangle> {
    if surface.topology != PrimitiveTopology::Triangles {
        log::warn!("skipping {:?} surface, only triangles can be sliced", surface.topology);
        return Vec::new();
    }

    let arrays = &surface.arrays;
    let Some(triples) = corner_triples(arrays) else {
        return Vec::new();
    };
    let present = present_attributes(arrays);

    let snap = |v: Vec3| match snap_step {
        Some(step) if step > 0.0 => v.snapped(step),
        _ => v,
    };

    triples
        .into_iter()
        .map(|corners| {
            let [a, b, c] = gather(&arrays.positions, corners).map(snap);
            let mut tri = Triangle::new(a, b, c);

            if present.contains(Attributes::NORMAL) {
                tri.set_normals(gather(&arrays.normals, corners));
            }
            if present.contains(Attributes::TANGENT) {
                tri.set_tangents(gather(&arrays.tangents, corners));
            }
            if present.contains(Attributes::COLOR) {
                tri.set_colors(gather(&arrays.colors, corners));
            }
            if present.contains(Attributes::BONES) {
                tri.set_bones(gather(&arrays.bones, corners));
            }
            if present.contains(Attributes::WEIGHTS) {
                tri.set_weights(gather(&arrays.weights, corners));
            }
            if present.contains(Attributes::UV) {
                tri.set_uvs(gather(&arrays.uvs, corners));
            }
            if present.contains(Attributes::UV2) {
                tri.set_uv2s(gather(&arrays.uv2s, corners));
            }
            tri
        })
        .collect()
}

impl Surface {
    /// Builds a non-indexed triangle surface from a group of triangles.
    ///
    /// Every triangle must carry the same attribute set as the first one.
    /// With `flip` set, vertices 1 and 2 of each triangle are swapped to
    /// reverse its winding.
    pub fn from_triangles(
        triangles: &[Triangle],
        material: Option<Material>,
        flip: bool,
    ) -> Result<Self, MeshError> {
        let expected = triangles
            .first()
            .map(Triangle::attributes)
            .unwrap_or_default();

        if let Some((index, tri)) = triangles
            .iter()
            .enumerate()
            .find(|(_, tri)| tri.attributes() != expected)
        {
            return Err(MeshError::MixedAttributes {
                index,
                expected,
                found: tri.attributes(),
            });
        }

        let corner_count = triangles.len() * 3;
        let reserve = |flag: Attributes| {
            if expected.contains(flag) {
                corner_count
            } else {
                0
            }
        };

        let mut arrays = VertexArrays {
            positions: Vec::with_capacity(corner_count),
            normals: Vec::with_capacity(reserve(Attributes::NORMAL)),
            tangents: Vec::with_capacity(reserve(Attributes::TANGENT)),
            colors: Vec::with_capacity(reserve(Attributes::COLOR)),
            bones: Vec::with_capacity(reserve(Attributes::BONES)),
            weights: Vec::with_capacity(reserve(Attributes::WEIGHTS)),
            uvs: Vec::with_capacity(reserve(Attributes::UV)),
            uv2s: Vec::with_capacity(reserve(Attributes::UV2)),
            indices: None,
        };

        for tri in triangles {
            let tri = if flip { tri.flipped() } else { *tri };

            arrays.positions.extend(tri.vertices);
            if expected.contains(Attributes::NORMAL) {
                arrays.normals.extend(tri.normals);
            }
            if expected.contains(Attributes::TANGENT) {
                arrays.tangents.extend(tri.tangents);
            }
            if expected.contains(Attributes::COLOR) {
                arrays.colors.extend(tri.colors);
            }
            if expected.contains(Attributes::BONES) {
                arrays.bones.extend(tri.bones);
            }
            if expected.contains(Attributes::WEIGHTS) {
                arrays.weights.extend(tri.weights);
            }
            if expected.contains(Attributes::UV) {
                arrays.uvs.extend(tri.uvs);
            }
            if expected.contains(Attributes::UV2) {
                arrays.uv2s.extend(tri.uv2s);
            }
        }

        Ok(Self {
            topology: PrimitiveTopology::Triangles,
            arrays,
            material,
        })
    }
}
