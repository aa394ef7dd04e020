use std::{
    f64::consts::PI,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use ray_tracer::prelude::*;

/// Renders a built-in scene, or a Wavefront OBJ mesh, to a PPM image.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Where to write the rendered image
    #[arg(short, long, default_value = "image.ppm")]
    output: PathBuf,

    /// Width (in pixels) of the output image
    #[arg(long, default_value_t = 1000)]
    width: usize,

    /// Height (in pixels) of the output image
    #[arg(long, default_value_t = 500)]
    height: usize,

    /// Field of view of the camera in radians
    #[arg(long, default_value_t = PI / 3.)]
    fov: f64,

    /// How many times a ray may be reflected or refracted
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    depth: usize,

    /// Groups with at least this many children are split into subgroups
    #[arg(long, default_value_t = 4)]
    threshold: usize,

    /// Render this mesh instead of the built-in scene
    #[arg(long)]
    obj: Option<PathBuf>,

    /// Replace the point light with an n x n area light
    #[arg(long, value_name = "N")]
    soft_shadows: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut world = World::new();
    match &args.obj {
        Some(path) => add_mesh(&mut world, path)?,
        None => build_scene(&mut world)?,
    }
    world
        .shapes_mut()
        .divide_roots(args.threshold)
        .context("failed to subdivide the scene")?;

    let light_position = Tuple::point(-10., 10., -10.);
    match args.soft_shadows {
        Some(steps) => world.set_light(AreaLight::new(
            light_position - Tuple::vector(1., 0., 1.),
            Tuple::vector(2., 0., 0.),
            steps,
            Tuple::vector(0., 0., 2.),
            steps,
            Color::WHITE,
        )),
        None => world.set_light(PointLight::new(light_position, Color::WHITE)),
    }

    let camera = Camera::new(args.width, args.height, args.fov).with_transformation(
        view_transform(
            Tuple::point(0., 1.5, -5.),
            Tuple::point(0., 1., 0.),
            Tuple::vector(0., 1., 0.),
        ),
    )?;
    let canvas = camera.render_with_depth(&world, args.depth)?;

    fs::write(&args.output, canvas.to_ppm())
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!("wrote {}", args.output.display());
    Ok(())
}

/// Imports the mesh as a single group, scaled and centered to fit in front of the camera.
fn add_mesh(world: &mut World, path: &Path) -> Result<()> {
    let material = Material {
        color: Color::new(0.8, 0.5, 0.3),
        specular: 0.4,
        shininess: 50.,
        ..Default::default()
    };
    let parsed = obj_file::parse_obj_file(path, world.shapes_mut(), &material)
        .with_context(|| format!("failed to import {}", path.display()))?;
    let mesh = parsed.into_group(world.shapes_mut())?;

    let bounds = world.shapes().bounds_of(mesh);
    anyhow::ensure!(
        !bounds.is_empty() && bounds.is_finite(),
        "{} contains no faces",
        path.display()
    );
    let extent = bounds.max - bounds.min;
    let size = extent.x.max(extent.y).max(extent.z).max(f64::EPSILON);
    let center = bounds.min + extent / 2.;
    let scale = 2. / size;
    world.shapes_mut().set_transformation(
        mesh,
        Matrix::identity()
            .translate(-center.x, -center.y, -center.z)
            .scale(scale, scale, scale)
            .translate(0., 1., 0.),
    )?;
    Ok(())
}

fn build_scene(world: &mut World) -> Result<()> {
    let floor_material = Material {
        color: Color::new(1., 0.9, 0.9),
        specular: 0.,
        reflective: 0.1,
        ..Default::default()
    }
    .with_pattern(
        CheckerPattern::new(Color::new(1., 0.9, 0.9), Color::new(0.6, 0.5, 0.5))
            .with_transformation(Matrix::rotation_y(PI / 4.))?,
    );
    world.add(Shape::plane().with_material(floor_material));

    let wall_material = Material {
        color: Color::new(0.9, 0.9, 1.),
        specular: 0.,
        ..Default::default()
    }
    .with_pattern(
        StripePattern::new(Color::new(0.9, 0.9, 1.), Color::new(0.7, 0.7, 0.8))
            .with_transformation(Matrix::scaling(0.5, 0.5, 0.5))?,
    );
    world.add(
        Shape::plane()
            .with_transformation(Matrix::identity().rotate_x(PI / 2.).translate(0., 0., 6.))?
            .with_material(wall_material),
    );

    world.add(
        Shape::glass_sphere()
            .with_transformation(Matrix::translation(-0.5, 1., 0.5))?
            .with_material(Material {
                color: Color::new(0.1, 0.1, 0.1),
                diffuse: 0.1,
                specular: 1.,
                shininess: 300.,
                reflective: 0.9,
                ..Material::glass()
            }),
    );

    world.add(
        Shape::cube()
            .with_transformation(
                Matrix::identity()
                    .scale(0.5, 0.5, 0.5)
                    .rotate_y(PI / 6.)
                    .translate(1.5, 0.5, -0.5),
            )?
            .with_material(Material {
                color: Color::new(0.5, 1., 0.1),
                diffuse: 0.7,
                specular: 0.3,
                reflective: 0.3,
                ..Default::default()
            }),
    );

    let small_sphere = Material {
        color: Color::new(1., 0.8, 0.1),
        diffuse: 0.7,
        specular: 0.3,
        ..Default::default()
    }
    .with_pattern(
        GradientPattern::new(Color::new(1., 0.8, 0.1), Color::new(1., 0.2, 0.1))
            .with_transformation(Matrix::identity().scale(2., 1., 1.).translate(-1., 0., 0.))?,
    );
    world.add(
        Shape::sphere()
            .with_transformation(
                Matrix::identity()
                    .scale(0.33, 0.33, 0.33)
                    .translate(-1.5, 0.33, -0.75),
            )?
            .with_material(small_sphere),
    );

    add_ring_of_triangles(world)?;
    Ok(())
}

/// A fan of triangles lying on a ring-patterned disc, all inside one group.
fn add_ring_of_triangles(world: &mut World) -> Result<()> {
    let group = world.add(
        Shape::group().with_transformation(
            Matrix::identity()
                .scale(0.6, 0.6, 0.6)
                .rotate_x(-PI / 3.)
                .translate(2.5, 1.8, 2.),
        )?,
    );
    let material = Material {
        specular: 0.2,
        ..Default::default()
    }
    .with_pattern(
        RingPattern::new(Color::new(0.2, 0.4, 0.9), Color::new(0.9, 0.9, 0.9))
            .with_transformation(Matrix::scaling(0.2, 0.2, 0.2))?,
    );

    let segments = 12;
    let center = Tuple::point(0., 0., 0.);
    let corner = |i: usize| {
        let angle = 2. * PI * i as f64 / segments as f64;
        Tuple::point(angle.cos(), 0., angle.sin())
    };
    for i in 0..segments {
        let triangle = Shape::triangle(center, corner(i), corner(i + 1))
            .with_material(material.clone());
        world.shapes_mut().insert_into(group, triangle)?;
    }
    Ok(())
}
