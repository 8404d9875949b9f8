//! Cutting planes and point classification.

use crate::math::vec3::Vec3;
use crate::transform::Transform;

/// Default tolerance for treating a point as lying on a plane.
pub const PLANE_EPSILON: f32 = 1e-5;

/// Where a single point lies relative to a [`Plane`].
///
/// Three-way on purpose: a vertex exactly on the cut drives different split
/// cases than one marginally above or below it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Above,
    Below,
    On,
}

/// A plane `normal · p = distance` with a unit normal.
///
/// "Above" is the half-space the normal points into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    normal: Vec3,
    distance: f32,
}

impl Plane {
    /// Creates a plane from a normal and a signed distance along it.
    ///
    /// The normal does not need to be unit length; both values are rescaled
    /// so the described plane is unchanged. Returns `None` for a zero normal.
    pub fn new(normal: Vec3, distance: f32) -> Option<Self> {
        let length = normal.magnitude();
        if !length.is_finite() || length <= f32::EPSILON {
            return None;
        }
        Some(Self {
            normal: normal / length,
            distance: distance / length,
        })
    }

    /// Creates the plane through `point` facing `normal`.
    pub fn from_point_normal(point: Vec3, normal: Vec3) -> Option<Self> {
        let normal = normal.normalize();
        Self::new(normal, normal.dot(point))
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Signed distance from `point` to the plane. Positive above.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// Classifies `point` using [`PLANE_EPSILON`].
    pub fn side_of(&self, point: Vec3) -> Side {
        self.classify(point, PLANE_EPSILON)
    }

    /// Classifies `point`, treating anything within `epsilon` as on the plane.
    pub fn classify(&self, point: Vec3, epsilon: f32) -> Side {
        let distance = self.distance_to(point);
        if distance > epsilon {
            Side::Above
        } else if distance < -epsilon {
            Side::Below
        } else {
            Side::On
        }
    }

    /// Parameter `t` of the line `a + t * (b - a)` where it meets the plane,
    /// `None` when the segment runs parallel to it.
    fn segment_parameter(&self, a: Vec3, b: Vec3) -> Option<f32> {
        let t = (self.distance - self.normal.dot(a)) / self.normal.dot(b - a);
        t.is_finite().then_some(t)
    }

    /// Intersects the segment `a -> b` with the plane.
    ///
    /// Only parameters in `[epsilon, 1 + epsilon]` count as a hit, so a
    /// segment starting on the plane does not report its own start point.
    pub fn intersect_segment(&self, a: Vec3, b: Vec3, epsilon: f32) -> Option<Vec3> {
        let t = self.segment_parameter(a, b)?;
        (t >= epsilon && t <= 1.0 + epsilon).then(|| a + (b - a) * t)
    }

    /// Where a segment whose ends lie on opposite sides crosses the plane.
    ///
    /// The parameter is clamped to the segment, so a crossing right next to
    /// either end is kept whatever the classification tolerance was.
    pub fn crossing_point(&self, a: Vec3, b: Vec3) -> Option<Vec3> {
        let t = self.segment_parameter(a, b)?.clamp(0.0, 1.0);
        Some(a + (b - a) * t)
    }

    /// Re-expresses a world-space plane in the local space of a mesh placed
    /// by `transform`.
    ///
    /// A local point `l` sits at `B * l + o` in world space, where `B` is
    /// the rotation/scale basis and `o` the position. Substituting into the
    /// plane equation gives the local normal `Bᵀ * n` and the distance
    /// `n · (p - o)`. For a pure rotation `Bᵀ` is the inverse basis.
    ///
    /// Returns `None` only when the basis collapses the normal to zero.
    pub fn to_local(&self, transform: &Transform) -> Option<Self> {
        let local_normal = transform.basis().transpose().transform_vector(self.normal);
        let distance = self.distance - self.normal.dot(transform.position());

        // Rescaled here rather than in `Plane::new`, whose zero-normal
        // threshold would reject tiny but valid scales
        let length = local_normal.magnitude();
        if !(length > 0.0) || !length.is_finite() {
            return None;
        }
        Some(Self {
            normal: local_normal / length,
            distance: distance / length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn up_plane_at(height: f32) -> Plane {
        Plane::new(Vec3::UP, height).unwrap()
    }

    #[test]
    fn test_classifies_under() {
        assert_eq!(up_plane_at(5.0).side_of(Vec3::ZERO), Side::Below);
    }

    #[test]
    fn test_classifies_over() {
        assert_eq!(up_plane_at(5.0).side_of(Vec3::new(0.0, 6.0, 0.0)), Side::Above);
    }

    #[test]
    fn test_classifies_on_within_epsilon() {
        let plane = up_plane_at(5.0);
        assert_eq!(plane.side_of(Vec3::new(1.0, 5.0, 1.0)), Side::On);
        assert_eq!(plane.side_of(Vec3::new(1.0, 5.000_005, 1.0)), Side::On);
        assert_eq!(plane.classify(Vec3::new(1.0, 5.1, 1.0), 0.5), Side::On);
    }

    #[test]
    fn test_new_rescales_non_unit_normal() {
        let plane = Plane::new(Vec3::new(2.0, 0.0, 0.0), 4.0).unwrap();
        assert_eq!(plane.normal(), Vec3::RIGHT);
        assert_eq!(plane.distance(), 2.0);
        assert!(Plane::new(Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_from_point_normal() {
        let plane = Plane::from_point_normal(Vec3::new(3.0, 2.0, -1.0), Vec3::new(0.0, 0.0, -4.0))
            .unwrap();
        assert_eq!(plane.normal(), Vec3::BACK);
        assert_eq!(plane.distance(), 1.0);
        assert_eq!(plane.side_of(Vec3::new(0.0, 0.0, -3.0)), Side::Above);
    }

    #[test]
    fn test_intersect_segment() {
        let plane = up_plane_at(0.0);
        let hit = plane
            .intersect_segment(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, -1.0, 0.0), PLANE_EPSILON)
            .unwrap();
        assert_relative_eq!(hit, Vec3::new(1.0, 0.0, 0.0));

        // Segment that stops short of the plane
        assert!(plane
            .intersect_segment(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 1.0, 0.0), PLANE_EPSILON)
            .is_none());
    }

    #[test]
    fn test_to_local_translation() {
        let mut transform = Transform::new();
        transform.set_position_xyz(0.0, 5.0, 0.0);

        let local = up_plane_at(5.0).to_local(&transform).unwrap();
        assert_relative_eq!(local.normal(), Vec3::UP);
        assert_relative_eq!(local.distance(), 0.0);
    }

    #[test]
    fn test_to_local_rotation_and_scale() {
        let mut transform = Transform::new();
        transform
            .set_rotation(Vec3::new(0.0, 0.0, std::f32::consts::FRAC_PI_2))
            .set_scale_uniform(2.0);

        // Local +X maps to world -Y, so world "up" is local -X.
        let local = up_plane_at(1.0).to_local(&transform).unwrap();
        assert_relative_eq!(local.normal(), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-6);
        // World y = 1 is local x = -0.5 after the 2x scale
        assert_relative_eq!(local.distance(), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_crossing_point_near_an_end() {
        let plane = up_plane_at(0.0);
        let a = Vec3::new(0.0, 0.2, 0.0);
        let b = Vec3::new(0.0, -5.0, 5.2);

        // t = 0.2 / 5.2, well below a loose 0.1 tolerance
        assert!(plane.intersect_segment(a, b, 0.1).is_none());
        let hit = plane.crossing_point(a, b).unwrap();
        assert_relative_eq!(hit, Vec3::new(0.0, 0.0, 0.2), epsilon = 1e-6);

        assert!(plane.crossing_point(a, Vec3::new(3.0, 0.2, 0.0)).is_none());
    }

    #[test]
    fn test_to_local_small_scale() {
        let mut transform = Transform::new();
        transform.set_scale_uniform(0.004);

        let local = up_plane_at(0.002).to_local(&transform).unwrap();
        assert_relative_eq!(local.normal(), Vec3::UP, epsilon = 1e-6);
        assert_relative_eq!(local.distance(), 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_to_local_singular() {
        let mut transform = Transform::new();
        transform.set_scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(up_plane_at(0.0).to_local(&transform).is_none());
    }
}
