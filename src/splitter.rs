//! Splitting single triangles against a plane.
//!
//! Every triangle falls into exactly one of five cases, tested in order:
//!
//! 1. all three vertices on one side (or all three on the plane)
//! 2. two vertices on the plane
//! 3. one vertex on the plane, the others on the same side
//! 4. one vertex on the plane, the others on opposite sides
//! 5. no vertex on the plane, one vertex alone on its side
//!
//! Only cases 4 and 5 create geometry; the rest route the triangle as is.

use crate::math::vec3::Vec3;
use crate::plane::{Plane, Side, PLANE_EPSILON};
use crate::triangle::Triangle;

/// Triangles and cut points collected while splitting one surface.
///
/// Reused across all triangles of that surface, then drained by the slicer.
#[derive(Clone, Debug, Default)]
pub struct SplitResult {
    pub above: Vec<Triangle>,
    pub below: Vec<Triangle>,
    pub intersection_points: Vec<Vec3>,
}

impl SplitResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all three lists, keeping their allocations.
    pub fn reset(&mut self) {
        self.above.clear();
        self.below.clear();
        self.intersection_points.clear();
    }

    fn push(&mut self, side: Side, triangle: Triangle) {
        match side {
            Side::Above => self.above.push(triangle),
            Side::Below => self.below.push(triangle),
            Side::On => debug_assert!(false, "on-plane side has no triangle list"),
        }
    }
}

/// Which of the five split cases handled a triangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitCase {
    /// All vertices above, all below, or all on the plane.
    SameSide,
    /// Two vertices on the plane; the edge between them lies in it.
    EdgeOnPlane,
    /// One vertex touches the plane, the other two are on the same side.
    PointedAway,
    /// One vertex on the plane, the cut runs through the opposite edge.
    SplitInHalf,
    /// The cut crosses two edges.
    FullSplit,
}

/// Per-vertex sides of one triangle with running counts.
struct FaceSides {
    sides: [Side; 3],
    above: usize,
    below: usize,
    on: usize,
}

impl FaceSides {
    fn new(plane: &Plane, triangle: &Triangle, epsilon: f32) -> Self {
        let sides = triangle.vertices.map(|v| plane.classify(v, epsilon));
        let count = |side| sides.iter().filter(|&&s| s == side).count();
        Self {
            sides,
            above: count(Side::Above),
            below: count(Side::Below),
            on: count(Side::On),
        }
    }

    /// Index of the first vertex on `side`.
    fn index_of(&self, side: Side) -> Option<usize> {
        self.sides.iter().position(|&s| s == side)
    }

    /// The side holding exactly one vertex, when the other two share a side.
    fn lone_side(&self) -> Option<Side> {
        match (self.above, self.below) {
            (1, 2) => Some(Side::Above),
            (2, 1) => Some(Side::Below),
            _ => None,
        }
    }
}

/// `pivot` followed by its two neighbours in winding order.
///
/// Sub-triangles are always built from this ordering, which keeps their
/// winding identical to the source triangle whichever vertex is special.
fn around(pivot: usize) -> [usize; 3] {
    [pivot, (pivot + 1) % 3, (pivot + 2) % 3]
}

/// Splits triangles against a fixed plane.
#[derive(Clone, Copy, Debug)]
pub struct Splitter {
    plane: Plane,
    epsilon: f32,
}

impl Splitter {
    pub fn new(plane: Plane) -> Self {
        Self {
            plane,
            epsilon: PLANE_EPSILON,
        }
    }

    /// Overrides the on-plane tolerance.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Splits `triangle`, appending pieces and cut points to `result`.
    ///
    /// A triangle lying in the plane goes to neither side; only its
    /// vertices are recorded, and the cap covers it.
    pub fn split(&self, triangle: &Triangle, result: &mut SplitResult) -> SplitCase {
        let info = FaceSides::new(&self.plane, triangle, self.epsilon);

        if info.above == 3 || info.below == 3 || info.on == 3 {
            match info.sides[0] {
                Side::On => result.intersection_points.extend(triangle.vertices),
                side => result.push(side, *triangle),
            }
            return SplitCase::SameSide;
        }

        if info.on == 2 {
            let side = if info.above == 1 { Side::Above } else { Side::Below };
            result.push(side, *triangle);
            return SplitCase::EdgeOnPlane;
        }

        if info.on == 1 && (info.above == 2 || info.below == 2) {
            let side = if info.above == 2 { Side::Above } else { Side::Below };
            result.push(side, *triangle);
            return SplitCase::PointedAway;
        }

        if info.on == 1 {
            self.split_in_half(triangle, &info, result);
            return SplitCase::SplitInHalf;
        }

        self.full_split(triangle, &info, result);
        SplitCase::FullSplit
    }

    fn intersect(&self, a: Vec3, b: Vec3) -> Option<Vec3> {
        // Ends sit on opposite sides, so only a parallel segment can miss
        let hit = self.plane.crossing_point(a, b);
        if hit.is_none() {
            log::error!(
                "segment {:?} -> {:?} was classified as crossing {:?} but misses it",
                a,
                b,
                self.plane
            );
            debug_assert!(false, "classified crossing segment does not hit the plane");
        }
        hit
    }

    /// One vertex on the plane, one above, one below: cut through the edge
    /// opposite the on-plane vertex, giving one triangle per side.
    fn split_in_half(&self, triangle: &Triangle, info: &FaceSides, result: &mut SplitResult) {
        let (Some(on), Some(above), Some(below)) = (
            info.index_of(Side::On),
            info.index_of(Side::Above),
            info.index_of(Side::Below),
        ) else {
            debug_assert!(false, "split_in_half needs one vertex per side");
            return;
        };

        let v = &triangle.vertices;
        let Some(cut) = self.intersect(v[above], v[below]) else {
            return;
        };

        let [p, n1, n2] = around(on);
        result.push(info.sides[n1], triangle.sub_face(v[p], v[n1], cut));
        result.push(info.sides[n2], triangle.sub_face(v[p], cut, v[n2]));

        result.intersection_points.push(v[on]);
        result.intersection_points.push(cut);
    }

    /// No vertex on the plane: the lone vertex keeps one triangle, the
    /// remaining quad on the other side becomes two.
    fn full_split(&self, triangle: &Triangle, info: &FaceSides, result: &mut SplitResult) {
        let Some(lone_side) = info.lone_side().filter(|_| info.on == 0) else {
            log::error!(
                "full split reached with {} above, {} below, {} on",
                info.above,
                info.below,
                info.on
            );
            debug_assert!(false, "full_split called with unexpected vertex sides");
            return;
        };
        let Some(lone) = info.index_of(lone_side) else {
            return;
        };
        let pair_side = if lone_side == Side::Above { Side::Below } else { Side::Above };

        let v = &triangle.vertices;
        let [l, n1, n2] = around(lone);
        let (Some(cut1), Some(cut2)) = (self.intersect(v[n1], v[l]), self.intersect(v[n2], v[l]))
        else {
            return;
        };

        result.push(lone_side, triangle.sub_face(v[l], cut1, cut2));
        result.push(pair_side, triangle.sub_face(v[n1], cut2, cut1));
        result.push(pair_side, triangle.sub_face(v[n2], cut2, v[n1]));

        result.intersection_points.push(cut1);
        result.intersection_points.push(cut2);
    }
}
