use std::time::Instant;

use indicatif::{ParallelProgressIterator, ProgressStyle};
use log::info;
use rayon::prelude::*;

use crate::{canvas::Canvas, world::World, Matrix, Ray, Result, Tuple, DEFAULT_DEPTH};

/// Maps a canvas one unit in front of the eye onto the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    hsize: usize,
    vsize: usize,
    field_of_view: f64,
    transformation: Matrix,
    inverse: Matrix,
    half_width: f64,
    half_height: f64,
    pixel_size: f64,
}

impl Camera {
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64) -> Self {
        let half_view = (field_of_view / 2.).tan();
        let aspect = hsize as f64 / vsize as f64;

        let (half_width, half_height) = if aspect >= 1. {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };

        let pixel_size = half_width * 2. / hsize as f64;

        Self {
            hsize,
            vsize,
            field_of_view,
            transformation: Matrix::identity(),
            inverse: Matrix::identity(),
            half_width,
            half_height,
            pixel_size,
        }
    }

    /// Usually a [`view_transform`](crate::transformation::view_transform).
    /// Fails if the matrix cannot be inverted.
    pub fn with_transformation(mut self, transformation: Matrix) -> Result<Self> {
        self.inverse = transformation.inverse()?;
        self.transformation = transformation;
        Ok(self)
    }

    pub fn hsize(&self) -> usize {
        self.hsize
    }

    pub fn vsize(&self) -> usize {
        self.vsize
    }

    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn transformation(&self) -> Matrix {
        self.transformation
    }

    /// Computes the world coordinates at the center of the given pixel,
    /// then constructs a ray that passes through that point.
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray {
        // the offset from the edge of the canvas to the pixel's center
        let x_offset = (px as f64 + 0.5) * self.pixel_size;
        let y_offset = (py as f64 + 0.5) * self.pixel_size;

        // the camera looks toward -z, so +x is to the *left*
        let world_x = self.half_width - x_offset;
        let world_y = self.half_height - y_offset;

        // the canvas is at z = -1
        let pixel = self.inverse * Tuple::point(world_x, world_y, -1.);
        let origin = self.inverse * Tuple::point(0., 0., 0.);
        let direction = (pixel - origin).normalize();

        Ray::new(origin, direction)
    }

    /// Renders with the default recursion depth for reflections and refractions.
    pub fn render(&self, world: &World) -> Result<Canvas> {
        self.render_with_depth(world, DEFAULT_DEPTH)
    }

    /// Casts a ray through every pixel, rendering rows in parallel.
    /// Side-effect: creates and displays a progress bar to stderr.
    ///
    /// The first shading error aborts the render.
    pub fn render_with_depth(&self, world: &World, depth: usize) -> Result<Canvas> {
        info!(
            "rendering {}x{} image of {} shapes at depth {}",
            self.hsize,
            self.vsize,
            world.shapes().len(),
            depth
        );
        let start = Instant::now();

        let style = ProgressStyle::with_template(
            "{msg} {elapsed:>5} -- {eta:5} {bar:40.cyan/blue} {pos:>7}/{len:7} {percent}%",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());

        let rows = (0..self.vsize)
            .into_par_iter()
            .progress_with_style(style)
            .with_message("Rendering...")
            .map(|y| {
                (0..self.hsize)
                    .map(|x| world.color_at(&self.ray_for_pixel(x, y), depth))
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        info!("rendered in {:.2?}", start.elapsed());
        Ok(Canvas::from_rows(self.hsize, rows))
    }
}
