use std::path::{Path, PathBuf};

use clap::Parser;
use meshslice::prelude::*;

/// Cut an OBJ mesh in two along a plane and cap both halves.
#[derive(Parser, Debug)]
#[command(name = "meshslice", version, about)]
struct Args {
    /// Mesh to slice.
    input: PathBuf,

    /// A point on the cutting plane.
    #[arg(
        long,
        num_args = 3,
        value_names = ["X", "Y", "Z"],
        allow_negative_numbers = true,
        default_values_t = [0.0, 0.0, 0.0]
    )]
    point: Vec<f32>,

    /// Cutting plane normal; the upper half is the side it points into.
    #[arg(
        long,
        num_args = 3,
        value_names = ["X", "Y", "Z"],
        allow_negative_numbers = true,
        default_values_t = [0.0, 1.0, 0.0]
    )]
    normal: Vec<f32>,

    /// Output for the upper half [default: <INPUT>_upper.obj]
    #[arg(long)]
    upper: Option<PathBuf>,

    /// Output for the lower half [default: <INPUT>_lower.obj]
    #[arg(long)]
    lower: Option<PathBuf>,

    /// Material name for the cap surfaces.
    #[arg(long)]
    cap_material: Option<String>,

    /// On-plane tolerance.
    #[arg(long, default_value_t = PLANE_EPSILON)]
    epsilon: f32,

    /// Read vertex positions without snapping them to the 1e-4 grid.
    #[arg(long)]
    no_snap: bool,
}

fn to_vec3(values: &[f32]) -> Result<Vec3, String> {
    match values {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected 3 components, got {}", values.len())),
    }
}

fn sibling_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());
    input.with_file_name(format!("{stem}_{suffix}.obj"))
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let point = to_vec3(&args.point)?;
    let normal = to_vec3(&args.normal)?;

    let mesh = Mesh::from_obj(&args.input).map_err(|e| e.to_string())?;
    log::info!(
        "loaded {} ({} surfaces, {} triangles)",
        args.input.display(),
        mesh.surface_count(),
        mesh.triangle_count()
    );

    let mut config = SlicerConfig::default();
    config.set_epsilon(args.epsilon);
    if args.no_snap {
        config.set_snap_step(None);
    }

    let cap_material = args.cap_material.map(Material::new);
    let outcome = Slicer::with_config(config)
        .slice_mesh(&mesh, point, normal, cap_material.as_ref())
        .map_err(|e| e.to_string())?;

    let sliced = match outcome {
        SliceOutcome::Sliced(sliced) => sliced,
        SliceOutcome::Above => return Err("plane misses the mesh: it lies entirely above".into()),
        SliceOutcome::Below => return Err("plane misses the mesh: it lies entirely below".into()),
        SliceOutcome::Separated => return Err("plane passes between parts of the mesh".into()),
        SliceOutcome::Empty => return Err("mesh has no triangles to slice".into()),
    };

    let halves = [
        ("upper", &sliced.upper, args.upper),
        ("lower", &sliced.lower, args.lower),
    ];
    for (label, half, path) in halves {
        let path = path.unwrap_or_else(|| sibling_path(&args.input, label));
        half.to_obj_file(&path).map_err(|e| e.to_string())?;
        log::info!(
            "wrote {} half to {} ({} triangles)",
            label,
            path.display(),
            half.triangle_count()
        );
    }

    Ok(())
}
