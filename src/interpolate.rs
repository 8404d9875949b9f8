//! Attribute interpolation for synthesized vertices.
//!
//! Every attribute kind is blended with the same barycentric formula:
//! `attr = λ₀*attr₀ + λ₁*attr₁ + λ₂*attr₂`. No attribute gets special
//! treatment, including tangent handedness and bone indices.

use std::ops::{Add, Mul};

use crate::math::{tri_area_2d, vec3::Vec3, vec4::Vec4};
use crate::triangle::{Attributes, Triangle};

/// UV determinants at or below this fraction of the UV edge products are
/// treated as zero area.
const MIN_RELATIVE_UV_AREA: f32 = 1e-5;

/// Weighted sum of the three per-vertex values.
#[inline]
fn blend<T>(values: &[T; 3], lambda: [f32; 3]) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    values[0] * lambda[0] + values[1] * lambda[1] + values[2] * lambda[2]
}

/// Gram-Schmidt: strips the component of `tangent` along `normal`.
fn ortho_normalize(normal: Vec3, tangent: Vec3) -> (Vec3, Vec3) {
    let normal = normal.normalize();
    let tangent = (tangent - normal * tangent.dot(normal)).normalize();
    (normal, tangent)
}

impl Triangle {
    /// Barycentric coordinates [λ₀, λ₁, λ₂] of `point` with respect to this
    /// triangle's vertices.
    ///
    /// The sub-areas are measured in whichever axis plane the triangle
    /// projects onto largest, which keeps nearly edge-on triangles stable.
    /// The weights always sum to 1; they are only all non-negative when
    /// `point` lies inside the triangle.
    pub fn barycentric_weights(&self, point: Vec3) -> [f32; 3] {
        let [a, b, c] = self.vertices;
        let p = point;
        let m = self.face_normal();

        let (x, y, z) = (m.x.abs(), m.y.abs(), m.z.abs());

        let (nu, nv, ood) = if x >= y && x >= z {
            // yz plane
            (
                tri_area_2d(p.y, p.z, b.y, b.z, c.y, c.z),
                tri_area_2d(p.y, p.z, c.y, c.z, a.y, a.z),
                1.0 / m.x,
            )
        } else if y >= x && y >= z {
            // xz plane
            (
                tri_area_2d(p.x, p.z, b.x, b.z, c.x, c.z),
                tri_area_2d(p.x, p.z, c.x, c.z, a.x, a.z),
                1.0 / -m.y,
            )
        } else {
            // xy plane
            (
                tri_area_2d(p.x, p.y, b.x, b.y, c.x, c.y),
                tri_area_2d(p.x, p.y, c.x, c.y, a.x, a.y),
                1.0 / m.z,
            )
        };

        let u = nu * ood;
        let v = nv * ood;
        [u, v, 1.0 - u - v]
    }

    /// Builds a triangle from three points lying on this one, carrying over
    /// every attribute this triangle has.
    ///
    /// Each new vertex gets the barycentric blend of this triangle's values
    /// at that vertex's position, so original vertices reproduce their own
    /// values and intersection points get interpolated ones.
    pub fn sub_face(&self, a: Vec3, b: Vec3, c: Vec3) -> Triangle {
        let mut face = Triangle::new(a, b, c);
        let lambdas = face.vertices.map(|point| self.barycentric_weights(point));

        if self.has(Attributes::NORMAL) {
            face.set_normals(lambdas.map(|l| blend(&self.normals, l)));
        }
        if self.has(Attributes::TANGENT) {
            face.set_tangents(lambdas.map(|l| blend(&self.tangents, l)));
        }
        if self.has(Attributes::COLOR) {
            face.set_colors(lambdas.map(|l| blend(&self.colors, l)));
        }
        if self.has(Attributes::BONES) {
            face.set_bones(lambdas.map(|l| blend(&self.bones, l)));
        }
        if self.has(Attributes::WEIGHTS) {
            face.set_weights(lambdas.map(|l| blend(&self.weights, l)));
        }
        if self.has(Attributes::UV) {
            face.set_uvs(lambdas.map(|l| blend(&self.uvs, l)));
        }
        if self.has(Attributes::UV2) {
            face.set_uv2s(lambdas.map(|l| blend(&self.uv2s, l)));
        }

        face
    }

    /// Derives per-vertex tangents from positions, UVs and normals.
    ///
    /// Needs both normals and UVs; does nothing otherwise. Leaves the
    /// triangle untouched when its UVs are degenerate (collinear or
    /// coincident), whatever their absolute size.
    pub fn compute_tangents(&mut self) {
        if !self.has(Attributes::NORMAL | Attributes::UV) {
            return;
        }

        let [v0, v1, v2] = self.vertices;
        let e1 = v1 - v0;
        let e2 = v2 - v0;

        let s1 = self.uvs[1].x - self.uvs[0].x;
        let s2 = self.uvs[2].x - self.uvs[0].x;
        let t1 = self.uvs[1].y - self.uvs[0].y;
        let t2 = self.uvs[2].y - self.uvs[0].y;

        // Relative to the UV edge products, so small but well-shaped UV
        // triangles still count
        let det = s1 * t2 - s2 * t1;
        if det.abs() <= ((s1 * t2).abs() + (s2 * t1).abs()) * MIN_RELATIVE_UV_AREA {
            log::warn!("skipping tangents for triangle with degenerate UVs: {:?}", self.uvs);
            return;
        }
        let r = 1.0 / det;

        let sdir = (e1 * t2 - e2 * t1) * r;
        let tdir = (e2 * s1 - e1 * s2) * r;

        let tangents = self.normals.map(|normal| {
            let (n, t) = ortho_normalize(normal, sdir);
            let handedness = if n.cross(t).dot(tdir) < 0.0 { -1.0 } else { 1.0 };
            Vec4::from_vec3(t, handedness)
        });
        self.set_tangents(tangents);
    }
}
