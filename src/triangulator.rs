//! Cross-section cap triangulation.
//!
//! The cut points are projected into a 2D frame lying in the cutting plane,
//! wrapped in a convex hull with Andrew's monotone chain, and the hull is
//! fanned into triangles. Sliced meshes are assumed convex, so the hull of
//! the cut points is the cross-section outline.

use std::cmp::Ordering;

use crate::math::{tri_area_2d, vec2::Vec2, vec3::Vec3, vec4::Vec4};
use crate::plane::PLANE_EPSILON;
use crate::triangle::{Attributes, Triangle};

/// A 3D point together with its coordinates in the plane's 2D frame.
#[derive(Clone, Copy, Debug)]
struct Mapped2D {
    original: Vec3,
    mapped: Vec2,
}

impl Mapped2D {
    fn new(original: Vec3, u: Vec3, v: Vec3) -> Self {
        Self {
            original,
            mapped: Vec2::new(original.dot(u), original.dot(v)),
        }
    }

    /// Lexicographic order on (x, y).
    fn cmp_mapped(&self, other: &Self) -> Ordering {
        let (a, b) = (self.mapped, other.mapped);
        a.x.partial_cmp(&b.x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.y.partial_cmp(&b.y).unwrap_or(Ordering::Equal))
    }
}

/// True when `a -> b -> c` makes a strict counter-clockwise turn.
fn turns_left(a: &Mapped2D, b: &Mapped2D, c: &Mapped2D) -> bool {
    let (a, b, c) = (a.mapped, b.mapped, c.mapped);
    tri_area_2d(a.x, a.y, b.x, b.y, c.x, c.y) > 0.0
}

/// Orthonormal (u, v) axes spanning the plane with the given normal.
///
/// The frame is left-handed with respect to the normal (`u × v = -n`), so a
/// counter-clockwise polygon in (u, v) faces away from the normal in 3D.
fn plane_basis(plane_normal: Vec3) -> (Vec3, Vec3) {
    let mut u = plane_normal.cross(Vec3::UP).normalize();
    if u == Vec3::ZERO {
        u = plane_normal.cross(Vec3::BACK).normalize();
    }
    let v = u.cross(plane_normal);
    (u, v)
}

/// Convex hull of the mapped points, counter-clockwise, without repeating
/// the first point. Collinear and duplicate points are dropped.
fn convex_hull(sorted: &[Mapped2D]) -> Vec<Mapped2D> {
    let mut hull: Vec<Mapped2D> = Vec::with_capacity(sorted.len() + 1);

    // Lower hull
    for point in sorted {
        while hull.len() >= 2 && !turns_left(&hull[hull.len() - 2], &hull[hull.len() - 1], point) {
            hull.pop();
        }
        hull.push(*point);
    }

    // Upper hull, never popping into the lower one
    let lower_len = hull.len() + 1;
    for point in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && !turns_left(&hull[hull.len() - 2], &hull[hull.len() - 1], point)
        {
            hull.pop();
        }
        hull.push(*point);
    }

    // The walk ends back on the first point
    hull.pop();
    hull
}

/// Triangulates the cross-section spanned by `points`, which all lie in
/// the plane with normal `plane_normal`.
///
/// Returns a fan over the convex hull of the points. Every triangle carries
/// the plane normal, UVs stretched over the hull's bounding box, and
/// tangents derived from both. Thin fan triangles whose UVs are too close
/// to collinear get the plane frame's tangent instead, which is what the
/// UV mapping implies everywhere on the cap. The fan winds so its face
/// normal points away from `plane_normal`.
///
/// Fewer than three points, collinear points, or a hull with no width or
/// height in the plane produce an empty cap.
pub fn monotone_chain(points: &[Vec3], plane_normal: Vec3) -> Vec<Triangle> {
    if points.len() < 3 {
        return Vec::new();
    }

    let (u, v) = plane_basis(plane_normal);

    let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
    let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);

    let mut mapped: Vec<Mapped2D> = points
        .iter()
        .map(|&point| {
            let m = Mapped2D::new(point, u, v);
            min = Vec2::new(min.x.min(m.mapped.x), min.y.min(m.mapped.y));
            max = Vec2::new(max.x.max(m.mapped.x), max.y.max(m.mapped.y));
            m
        })
        .collect();

    mapped.sort_by(Mapped2D::cmp_mapped);

    let hull = convex_hull(&mapped);
    if hull.len() < 3 {
        log::warn!(
            "cross-section of {} points is degenerate ({} hull points)",
            points.len(),
            hull.len()
        );
        return Vec::new();
    }

    let extent = max - min;
    if extent.x <= PLANE_EPSILON || extent.y <= PLANE_EPSILON {
        log::warn!("cross-section has no area to map UVs onto: extent {:?}", extent);
        return Vec::new();
    }

    // U grows along `u` and V along `v`
    let handedness = if plane_normal.cross(u).dot(v) < 0.0 { -1.0 } else { 1.0 };
    let cap_tangent = Vec4::from_vec3(u, handedness);

    let to_uv = |point: &Mapped2D| {
        Vec2::new(
            (point.mapped.x - min.x) / extent.x,
            (point.mapped.y - min.y) / extent.y,
        )
    };

    (1..hull.len() - 1)
        .map(|i| {
            let (a, b, c) = (&hull[0], &hull[i], &hull[i + 1]);
            let mut face = Triangle::new(a.original, b.original, c.original);
            face.set_uvs([to_uv(a), to_uv(b), to_uv(c)])
                .set_normals([plane_normal; 3]);
            face.compute_tangents();
            if !face.has(Attributes::TANGENT) {
                face.set_tangents([cap_tangent; 3]);
            }
            face
        })
        .collect()
}
