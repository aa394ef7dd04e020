pub mod bounding_box;
pub mod camera;
pub mod canvas;
pub mod color;
mod error;
pub mod intersection;
pub mod light;
pub mod material;
mod matrix;
pub mod pattern;
mod ray;
pub mod shape;
pub mod transformation;
mod tuple;
pub mod world;

pub use color::Color;
pub use error::RayTracerError;
pub use matrix::{Matrix, MatrixError};
pub use ray::Ray;
pub use tuple::Tuple;

pub type Result<T> = std::result::Result<T, RayTracerError>;

pub const EPSILON: f64 = 1e-4;

/// The recursion limit for reflected and refracted rays.
pub const DEFAULT_DEPTH: usize = 5;

pub fn equal(a: f64, b: f64) -> bool {
    let c = a - b;
    c.abs() < EPSILON
}

/// Everything needed to build and render a scene.
pub mod prelude {
    pub use crate::bounding_box::BoundingBox;
    pub use crate::camera::Camera;
    pub use crate::canvas::Canvas;
    pub use crate::intersection::{hit, ComputedIntersection, Intersection};
    pub use crate::light::{AreaLight, Light, PointLight};
    pub use crate::material::Material;
    pub use crate::pattern::{
        CheckerPattern, GradientPattern, Pattern, RingPattern, SolidPattern, StripePattern,
    };
    pub use crate::shape::{Shape, ShapeArena, ShapeId, ShapeKind};
    pub use crate::transformation::view_transform;
    pub use crate::world::World;
    pub use crate::{Color, Matrix, Ray, RayTracerError, Result, Tuple, DEFAULT_DEPTH};
}
