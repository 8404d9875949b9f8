//! Slicing whole meshes.
//!
//! Every surface is split on its own, then the cut points of all surfaces
//! are triangulated into one cap shared by both halves. The upper half
//! gets the cap as triangulated, facing against the plane normal; the
//! lower half gets it with each triangle flipped.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{MeshError, SliceError};
use crate::math::vec3::Vec3;
use crate::mesh::{Material, Mesh, Surface};
use crate::plane::{Plane, Side, PLANE_EPSILON};
use crate::splitter::{SplitResult, Splitter};
use crate::surface::triangles_from_surface;
use crate::transform::Transform;
use crate::triangle::Triangle;
use crate::triangulator;

/// Grid that input positions are snapped to before splitting.
pub const DEFAULT_SNAP_STEP: f32 = 1e-4;

/// Numeric settings of a [`Slicer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlicerConfig {
    epsilon: f32,
    snap_step: Option<f32>,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            epsilon: PLANE_EPSILON,
            snap_step: Some(DEFAULT_SNAP_STEP),
        }
    }
}

impl SlicerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance from the plane within which a vertex counts as on it.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f32) -> &mut Self {
        self.epsilon = epsilon;
        self
    }

    pub fn snap_step(&self) -> Option<f32> {
        self.snap_step
    }

    /// Set the snapping grid, or `None` to read positions unchanged.
    pub fn set_snap_step(&mut self, snap_step: Option<f32>) -> &mut Self {
        self.snap_step = snap_step;
        self
    }
}

/// The two closed halves of a sliced mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct SlicedMesh {
    /// Geometry on the side the plane normal points into, plus the cap.
    pub upper: Mesh,
    /// Geometry on the opposite side, plus the flipped cap.
    pub lower: Mesh,
}

/// Result of slicing a mesh.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub enum SliceOutcome {
    /// The plane crossed the mesh.
    Sliced(SlicedMesh),
    /// Nothing was cut and every triangle lies above or on the plane.
    Above,
    /// Nothing was cut and every triangle lies below or on the plane.
    Below,
    /// Nothing was cut, but there are triangles on both sides.
    Separated,
    /// The mesh has no sliceable triangles.
    Empty,
}

impl SliceOutcome {
    /// The halves, or `None` when the plane missed the mesh.
    pub fn into_sliced(self) -> Option<SlicedMesh> {
        match self {
            SliceOutcome::Sliced(sliced) => Some(sliced),
            _ => None,
        }
    }

    pub fn as_sliced(&self) -> Option<&SlicedMesh> {
        match self {
            SliceOutcome::Sliced(sliced) => Some(sliced),
            _ => None,
        }
    }

    pub fn is_sliced(&self) -> bool {
        matches!(self, SliceOutcome::Sliced(_))
    }
}

/// What one input surface turned into.
struct SurfaceSplit {
    above: Vec<Triangle>,
    below: Vec<Triangle>,
    intersection_points: Vec<Vec3>,
    material: Option<Material>,
    triangle_count: usize,
}

/// Cuts meshes in two along a plane and caps the cut.
#[derive(Clone, Copy, Debug, Default)]
pub struct Slicer {
    config: SlicerConfig,
}

impl Slicer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SlicerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SlicerConfig {
        &self.config
    }

    /// Slices `mesh` by `plane`.
    ///
    /// Each input surface keeps its material in both halves; surfaces that
    /// end up empty on one side are left out of that half. The cap uses
    /// `cap_material`, falling back to the material of the half's first
    /// surface.
    pub fn slice_by_plane(
        &self,
        mesh: &Mesh,
        plane: &Plane,
        cap_material: Option<&Material>,
    ) -> Result<SliceOutcome, SliceError> {
        let splitter = Splitter::new(*plane).with_epsilon(self.config.epsilon);

        #[cfg(feature = "parallel")]
        let splits: Vec<SurfaceSplit> = mesh
            .surfaces()
            .par_iter()
            .map(|surface| self.split_surface(&splitter, surface))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let splits: Vec<SurfaceSplit> = mesh
            .surfaces()
            .iter()
            .map(|surface| self.split_surface(&splitter, surface))
            .collect();

        let triangle_count: usize = splits.iter().map(|s| s.triangle_count).sum();
        if triangle_count == 0 {
            return Ok(SliceOutcome::Empty);
        }

        let intersection_points: Vec<Vec3> = splits
            .iter()
            .flat_map(|s| s.intersection_points.iter().copied())
            .collect();

        if intersection_points.is_empty() {
            let above = splits.iter().any(|s| !s.above.is_empty());
            let below = splits.iter().any(|s| !s.below.is_empty());
            log::debug!("plane misses {:?} (above: {above}, below: {below})", mesh.name());

            return Ok(match (above, below) {
                (true, false) => SliceOutcome::Above,
                (false, true) => SliceOutcome::Below,
                (true, true) => SliceOutcome::Separated,
                (false, false) => SliceOutcome::Empty,
            });
        }

        let cap = triangulator::monotone_chain(&intersection_points, plane.normal());
        log::debug!(
            "{} intersection points, {} cap triangles",
            intersection_points.len(),
            cap.len()
        );

        let upper = build_half(mesh.name(), &splits, &cap, cap_material, Side::Above)?;
        let lower = build_half(mesh.name(), &splits, &cap, cap_material, Side::Below)?;

        Ok(SliceOutcome::Sliced(SlicedMesh { upper, lower }))
    }

    /// Slices `mesh` by the plane through `position` facing `normal`.
    pub fn slice_mesh(
        &self,
        mesh: &Mesh,
        position: Vec3,
        normal: Vec3,
        cap_material: Option<&Material>,
    ) -> Result<SliceOutcome, SliceError> {
        let plane = Plane::from_point_normal(position, normal).ok_or(SliceError::ZeroNormal)?;
        self.slice_by_plane(mesh, &plane, cap_material)
    }

    /// Slices a mesh placed in the world by `transform`, using a plane
    /// given in world space. The halves stay in the mesh's local space.
    pub fn slice(
        &self,
        mesh: &Mesh,
        transform: &Transform,
        position: Vec3,
        normal: Vec3,
        cap_material: Option<&Material>,
    ) -> Result<SliceOutcome, SliceError> {
        let world = Plane::from_point_normal(position, normal).ok_or(SliceError::ZeroNormal)?;
        let local = world
            .to_local(transform)
            .ok_or(SliceError::SingularTransform)?;
        self.slice_by_plane(mesh, &local, cap_material)
    }

    fn split_surface(&self, splitter: &Splitter, surface: &Surface) -> SurfaceSplit {
        let triangles = triangles_from_surface(surface, self.config.snap_step);

        let mut result = SplitResult::new();
        for triangle in &triangles {
            splitter.split(triangle, &mut result);
        }

        log::debug!(
            "surface {:?}: {} triangles -> {} above, {} below, {} points",
            surface.material.as_ref().map(|m| m.name.as_str()),
            triangles.len(),
            result.above.len(),
            result.below.len(),
            result.intersection_points.len()
        );

        SurfaceSplit {
            above: result.above,
            below: result.below,
            intersection_points: result.intersection_points,
            material: surface.material.clone(),
            triangle_count: triangles.len(),
        }
    }
}

/// Assembles one half: a surface per non-empty input group, then the cap.
fn build_half(
    name: &str,
    splits: &[SurfaceSplit],
    cap: &[Triangle],
    cap_material: Option<&Material>,
    side: Side,
) -> Result<Mesh, MeshError> {
    let (suffix, flip_cap) = match side {
        Side::Below => ("lower", true),
        _ => ("upper", false),
    };
    let mut half = Mesh::new(format!("{name}_{suffix}"));

    for split in splits {
        let triangles = match side {
            Side::Below => &split.below,
            _ => &split.above,
        };
        if triangles.is_empty() {
            continue;
        }
        half.add_surface(Surface::from_triangles(triangles, split.material.clone(), false)?);
    }

    if !cap.is_empty() {
        let material = cap_material
            .or_else(|| half.surface_material(0))
            .cloned();
        half.add_surface(Surface::from_triangles(cap, material, flip_cap)?);
    }

    Ok(half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{PrimitiveTopology, VertexArrays};
    use crate::primitives::{cube, uv_sphere};
    use crate::splitter::SplitCase;

    fn default_sphere() -> Mesh {
        uv_sphere(1.0, 2.0, 64, 32)
    }

    fn with_material(mesh: Mesh, name: &str) -> Mesh {
        let mut named = Mesh::new(mesh.name());
        for surface in mesh.surfaces() {
            let mut surface = surface.clone();
            surface.material = Some(Material::new(name));
            named.add_surface(surface);
        }
        named
    }

    fn surface_triangles(mesh: &Mesh, index: usize) -> Vec<Triangle> {
        triangles_from_surface(&mesh.surfaces()[index], None)
    }

    fn flat_triangle(y: f32) -> Surface {
        Surface::new(
            VertexArrays {
                positions: vec![
                    Vec3::new(0.0, y, 0.0),
                    Vec3::new(0.0, y, 1.0),
                    Vec3::new(1.0, y, 0.0),
                ],
                ..Default::default()
            },
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_sphere_split_counts() {
        let sphere = default_sphere();
        let plane = Plane::new(Vec3::UP, 0.0).unwrap();
        let splitter = Splitter::new(plane);

        let mut result = SplitResult::new();
        for tri in triangles_from_surface(&sphere.surfaces()[0], Some(DEFAULT_SNAP_STEP)) {
            splitter.split(&tri, &mut result);
        }

        assert_eq!(result.above.len(), 2240);
        assert_eq!(result.below.len(), 2240);
        assert_eq!(result.intersection_points.len(), 256);
    }

    #[test]
    fn test_sphere_slices_in_two() {
        let outcome = Slicer::new()
            .slice_mesh(&default_sphere(), Vec3::ZERO, Vec3::UP, None)
            .unwrap();
        let sliced = outcome.into_sliced().expect("plane through the center cuts");

        assert_eq!(sliced.upper.name(), "sphere_upper");
        assert_eq!(sliced.lower.name(), "sphere_lower");
        assert_eq!(sliced.upper.surface_count(), 2);
        assert_eq!(sliced.lower.surface_count(), 2);
        assert_eq!(sliced.upper.surfaces()[0].triangle_count(), 2240);
        assert_eq!(sliced.lower.surfaces()[0].triangle_count(), 2240);

        let cap = surface_triangles(&sliced.upper, 1);
        assert!(cap.len() >= 60);
        for tri in &cap {
            for vertex in tri.vertices {
                assert!(vertex.y.abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_every_piece_is_on_its_side() {
        let plane = Plane::new(Vec3::new(0.3, 1.0, -0.4), 0.2).unwrap();
        let outcome = Slicer::new()
            .slice_by_plane(&default_sphere(), &plane, None)
            .unwrap();
        let sliced = outcome.into_sliced().unwrap();

        for tri in surface_triangles(&sliced.upper, 0) {
            for vertex in tri.vertices {
                assert!(plane.distance_to(vertex) > -1e-4);
            }
        }
        for tri in surface_triangles(&sliced.lower, 0) {
            for vertex in tri.vertices {
                assert!(plane.distance_to(vertex) < 1e-4);
            }
        }
    }

    #[test]
    fn test_piece_counts_add_up() {
        let sphere = default_sphere();
        let plane = Plane::new(Vec3::new(1.0, 0.5, 0.25), 0.1).unwrap();
        let splitter = Splitter::new(plane);

        let triangles = triangles_from_surface(&sphere.surfaces()[0], Some(DEFAULT_SNAP_STEP));
        let mut result = SplitResult::new();
        let mut expected = 0;
        for tri in &triangles {
            expected += match splitter.split(tri, &mut result) {
                SplitCase::SplitInHalf => 2,
                SplitCase::FullSplit => 3,
                _ => 1,
            };
        }

        let sliced = Slicer::new()
            .slice_by_plane(&sphere, &plane, None)
            .unwrap()
            .into_sliced()
            .unwrap();
        let upper = sliced.upper.surfaces()[0].triangle_count();
        let lower = sliced.lower.surfaces()[0].triangle_count();

        assert_eq!(upper + lower, expected);
        assert!(upper + lower > triangles.len());
    }

    #[test]
    fn test_plane_missing_the_mesh() {
        let slicer = Slicer::new();
        let sphere = default_sphere();

        let below = slicer.slice_mesh(&sphere, Vec3::new(0.0, 5.0, 0.0), Vec3::UP, None);
        assert_eq!(below, Ok(SliceOutcome::Below));

        let above = slicer.slice_mesh(&sphere, Vec3::new(0.0, -5.0, 0.0), Vec3::UP, None);
        assert_eq!(above, Ok(SliceOutcome::Above));
        assert!(above.unwrap().into_sliced().is_none());
    }

    #[test]
    fn test_separated_and_empty() {
        let slicer = Slicer::new();
        let plane = Plane::new(Vec3::UP, 0.0).unwrap();

        let mut split_pair = Mesh::new("pair");
        split_pair.add_surface(flat_triangle(1.0));
        split_pair.add_surface(flat_triangle(-1.0));
        assert_eq!(
            slicer.slice_by_plane(&split_pair, &plane, None),
            Ok(SliceOutcome::Separated)
        );

        assert_eq!(
            slicer.slice_by_plane(&Mesh::new("empty"), &plane, None),
            Ok(SliceOutcome::Empty)
        );

        let mut lines = Mesh::new("lines");
        let mut surface = flat_triangle(0.0);
        surface.topology = PrimitiveTopology::Lines;
        lines.add_surface(surface);
        assert_eq!(slicer.slice_by_plane(&lines, &plane, None), Ok(SliceOutcome::Empty));
    }

    #[test]
    fn test_cap_faces_out_of_each_half() {
        let plane = Plane::new(Vec3::UP, 0.25).unwrap();
        let sliced = Slicer::new()
            .slice_by_plane(&cube(2.0), &plane, None)
            .unwrap()
            .into_sliced()
            .unwrap();

        let upper_cap = surface_triangles(&sliced.upper, 1);
        let lower_cap = surface_triangles(&sliced.lower, 1);
        assert_eq!(upper_cap.len(), 2);
        assert_eq!(lower_cap.len(), 2);

        for tri in &upper_cap {
            assert!(tri.face_normal().dot(plane.normal()) < 0.0);
        }
        for tri in &lower_cap {
            assert!(tri.face_normal().dot(plane.normal()) > 0.0);
        }
        assert_eq!(lower_cap[0], upper_cap[0].flipped());
    }

    #[test]
    fn test_cap_material() {
        let mesh = with_material(cube(2.0), "stone");
        let slicer = Slicer::new();

        let sliced = slicer
            .slice_mesh(&mesh, Vec3::ZERO, Vec3::RIGHT, None)
            .unwrap()
            .into_sliced()
            .unwrap();
        assert_eq!(sliced.upper.surface_material(0), Some(&Material::new("stone")));
        assert_eq!(sliced.upper.surface_material(1), Some(&Material::new("stone")));

        let cut = Material::new("cut");
        let sliced = slicer
            .slice_mesh(&mesh, Vec3::ZERO, Vec3::RIGHT, Some(&cut))
            .unwrap()
            .into_sliced()
            .unwrap();
        assert_eq!(sliced.lower.surface_material(0), Some(&Material::new("stone")));
        assert_eq!(sliced.lower.surface_material(1), Some(&cut));
    }

    #[test]
    fn test_slice_along_a_face() {
        let mesh = with_material(cube(2.0), "stone");
        let sliced = Slicer::new()
            .slice_mesh(&mesh, Vec3::new(0.0, 1.0, 0.0), Vec3::UP, None)
            .unwrap()
            .into_sliced()
            .unwrap();

        // The top face lies in the plane, so only the cap is above it
        assert_eq!(sliced.upper.surface_count(), 1);
        assert_eq!(sliced.upper.surface_material(0), None);
        assert_eq!(sliced.upper.triangle_count(), 2);

        assert_eq!(sliced.lower.surface_count(), 2);
        assert_eq!(sliced.lower.surfaces()[0].triangle_count(), 10);
        assert_eq!(sliced.lower.surface_material(1), Some(&Material::new("stone")));
    }

    #[test]
    fn test_slice_with_transform() {
        let slicer = Slicer::new();
        let mut transform = Transform::new();
        transform.set_position_xyz(0.0, 10.0, 0.0).set_scale_uniform(3.0);

        let hit = slicer
            .slice(&cube(2.0), &transform, Vec3::new(0.0, 11.5, 0.0), Vec3::UP, None)
            .unwrap();
        let sliced = hit.into_sliced().unwrap();
        for tri in surface_triangles(&sliced.upper, 1) {
            for vertex in tri.vertices {
                assert!((vertex.y - 0.5).abs() < 1e-4);
            }
        }

        let miss = slicer.slice(&cube(2.0), &transform, Vec3::ZERO, Vec3::UP, None);
        assert_eq!(miss, Ok(SliceOutcome::Above));
    }

    #[test]
    fn test_rejected_requests() {
        let slicer = Slicer::new();
        assert_eq!(
            slicer.slice_mesh(&cube(1.0), Vec3::ZERO, Vec3::ZERO, None),
            Err(SliceError::ZeroNormal)
        );

        let mut flat = Transform::new();
        flat.set_scale(Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(
            slicer.slice(&cube(1.0), &flat, Vec3::ZERO, Vec3::UP, None),
            Err(SliceError::SingularTransform)
        );
    }

    #[test]
    fn test_slice_with_small_scale() {
        let slicer = Slicer::new();
        let mut tiny = Transform::new();
        tiny.set_scale_uniform(0.004);

        let outcome = slicer
            .slice(&cube(2.0), &tiny, Vec3::ZERO, Vec3::UP, None)
            .unwrap();
        let sliced = outcome.into_sliced().unwrap();
        assert_eq!(sliced.upper.surface_count(), 2);
        assert_eq!(sliced.lower.surface_count(), 2);
    }

    #[test]
    fn test_config() {
        let mut config = SlicerConfig::new();
        config.set_epsilon(0.3).set_snap_step(None);
        let slicer = Slicer::with_config(config);
        assert_eq!(slicer.config().epsilon(), 0.3);
        assert_eq!(slicer.config().snap_step(), None);

        // The triangle is within epsilon of the plane, so it lies in it
        let mut mesh = Mesh::new("flat");
        mesh.add_surface(flat_triangle(1.0));
        let plane = Plane::new(Vec3::UP, 0.8).unwrap();
        let outcome = slicer.slice_by_plane(&mesh, &plane, None).unwrap();
        assert!(outcome.is_sliced());
    }
}
