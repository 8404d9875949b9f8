use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use meshslice::math::vec3::Vec3;
use meshslice::primitives::uv_sphere;
use meshslice::triangulator::monotone_chain;
use meshslice::{Plane, Slicer};

fn benchmark_sphere_slice(c: &mut Criterion) {
    let mut group = c.benchmark_group("sphere_slice");

    let slicer = Slicer::new();
    let plane = match Plane::new(Vec3::new(0.2, 1.0, -0.1), 0.1) {
        Some(plane) => plane,
        None => return,
    };

    for (segments, rings) in [(16, 8), (64, 32), (256, 128)] {
        let sphere = uv_sphere(1.0, 2.0, segments, rings);
        group.bench_with_input(
            BenchmarkId::new("triangles", sphere.triangle_count()),
            &sphere,
            |b, mesh| {
                b.iter(|| slicer.slice_by_plane(black_box(mesh), &plane, None));
            },
        );
    }

    group.finish();
}

fn benchmark_cap_triangulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("cap_triangulation");

    for count in [64, 1024, 16384] {
        // A ring of cut points with every point repeated, as neighbouring
        // faces report shared edges twice
        let points: Vec<Vec3> = (0..count)
            .flat_map(|i| {
                let angle = i as f32 / count as f32 * std::f32::consts::TAU;
                let point = Vec3::new(angle.cos(), 0.0, angle.sin());
                [point, point]
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("points", points.len()), &points, |b, points| {
            b.iter(|| monotone_chain(black_box(points), Vec3::UP));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_sphere_slice, benchmark_cap_triangulation);
criterion_main!(benches);
