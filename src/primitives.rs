//! Procedural meshes with deterministic tessellation.
//!
//! Faces wind counter-clockwise when seen from outside.

use std::f32::consts::PI;

use crate::math::{vec2::Vec2, vec3::Vec3, vec4::Vec4};
use crate::mesh::{Mesh, PrimitiveTopology, Surface, VertexArrays};

/// A UV sphere made of `rings + 2` rows of `radial_segments + 1` vertices,
/// pole to pole along Y.
///
/// `height` stretches the sphere along Y. The seam column is duplicated so
/// UVs wrap cleanly. The pole rows are collapsed, so the first and last
/// band contain zero-area triangles.
pub fn uv_sphere(radius: f32, height: f32, radial_segments: u32, rings: u32) -> Mesh {
    let radial_segments = radial_segments.max(3);
    let row_len = radial_segments + 1;
    let row_count = rings + 2;

    let vertex_count = (row_len * row_count) as usize;
    let mut arrays = VertexArrays {
        positions: Vec::with_capacity(vertex_count),
        normals: Vec::with_capacity(vertex_count),
        tangents: Vec::with_capacity(vertex_count),
        uvs: Vec::with_capacity(vertex_count),
        ..Default::default()
    };
    let mut indices = Vec::with_capacity((radial_segments * (rings + 1) * 6) as usize);

    let mut prev_row = 0;
    let mut this_row = 0;

    for j in 0..row_count {
        let v = j as f32 / (rings + 1) as f32;
        let w = (PI * v).sin();
        let y = height * 0.5 * (PI * v).cos();

        for i in 0..row_len {
            let u = i as f32 / radial_segments as f32;
            let x = (u * PI * 2.0).sin();
            let z = (u * PI * 2.0).cos();

            let point = Vec3::new(x * radius * w, y, z * radius * w);
            arrays.positions.push(point);
            arrays.normals.push(point.normalize());
            arrays.tangents.push(Vec4::new(z, 0.0, -x, 1.0));
            arrays.uvs.push(Vec2::new(u, v));

            if i > 0 && j > 0 {
                indices.extend_from_slice(&[
                    prev_row + i - 1,
                    this_row + i - 1,
                    prev_row + i,
                    prev_row + i,
                    this_row + i - 1,
                    this_row + i,
                ]);
            }
        }

        prev_row = this_row;
        this_row += row_len;
    }

    arrays.indices = Some(indices);

    let mut mesh = Mesh::new("sphere");
    mesh.add_surface(Surface {
        topology: PrimitiveTopology::Triangles,
        arrays,
        material: None,
    });
    mesh
}

/// Outward normal plus the in-face tangent and bitangent of each cube side.
const CUBE_SIDES: [(Vec3, Vec3, Vec3); 6] = [
    // Right
    (Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 1.0, 0.0)),
    // Left
    (Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 0.0)),
    // Top
    (Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)),
    // Bottom
    (Vec3::new(0.0, -1.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0)),
    // Front
    (Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
    // Back
    (Vec3::new(0.0, 0.0, -1.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
];

/// An axis-aligned cube of edge length `size` centered on the origin.
///
/// Each side has its own four vertices so normals stay flat.
pub fn cube(size: f32) -> Mesh {
    let half = size * 0.5;
    let mut arrays = VertexArrays::default();
    let mut indices = Vec::with_capacity(36);

    for (normal, tangent, bitangent) in CUBE_SIDES {
        let base = arrays.positions.len() as u32;
        let corners = [
            (-1.0, -1.0, Vec2::new(0.0, 0.0)),
            (1.0, -1.0, Vec2::new(1.0, 0.0)),
            (1.0, 1.0, Vec2::new(1.0, 1.0)),
            (-1.0, 1.0, Vec2::new(0.0, 1.0)),
        ];

        for (s, t, uv) in corners {
            arrays
                .positions
                .push((normal + tangent * s + bitangent * t) * half);
            arrays.normals.push(normal);
            arrays.tangents.push(Vec4::from_vec3(tangent, 1.0));
            arrays.uvs.push(uv);
        }

        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    arrays.indices = Some(indices);

    let mut mesh = Mesh::new("cube");
    mesh.add_surface(Surface {
        topology: PrimitiveTopology::Triangles,
        arrays,
        material: None,
    });
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::triangles_from_surface;
    use crate::triangle::Attributes;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_tessellation() {
        let sphere = uv_sphere(1.0, 2.0, 64, 32);
        let arrays = &sphere.surfaces()[0].arrays;

        assert_eq!(arrays.vertex_count(), 65 * 34);
        assert_eq!(sphere.triangle_count(), 4224);
        assert!(arrays.validate().is_ok());

        assert_relative_eq!(arrays.positions[0], Vec3::new(0.0, 1.0, 0.0));
        for normal in &arrays.normals {
            assert_relative_eq!(normal.magnitude(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_sphere_faces_outward() {
        let sphere = uv_sphere(1.0, 2.0, 16, 8);
        let triangles = triangles_from_surface(&sphere.surfaces()[0], None);

        for tri in &triangles {
            let normal = tri.face_normal();
            if normal.magnitude() < 1e-6 {
                continue;
            }
            let [a, b, c] = tri.vertices;
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_cube() {
        let cube = cube(2.0);
        assert_eq!(cube.triangle_count(), 12);

        let triangles = triangles_from_surface(&cube.surfaces()[0], None);
        for tri in &triangles {
            assert!(tri.has(Attributes::NORMAL | Attributes::TANGENT | Attributes::UV));
            let normal = tri.face_normal().normalize();
            assert_relative_eq!(normal, tri.normals[0]);
            for vertex in tri.vertices {
                assert_relative_eq!(vertex.x.abs(), 1.0);
                assert_relative_eq!(vertex.y.abs(), 1.0);
                assert_relative_eq!(vertex.z.abs(), 1.0);
            }
        }
    }
}
