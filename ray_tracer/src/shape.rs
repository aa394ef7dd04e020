//! Shapes and the arena that owns them.
//!
//! Every shape lives in a [`ShapeArena`] and is addressed by a [`ShapeId`].
//! Groups hold the ids of their children and every shape remembers the id of
//! the group holding it, so transforms can be walked in both directions
//! without reference cycles. A shape is either a root of the arena or the
//! child of exactly one group; the arena's methods keep both sides of that
//! relationship in step.

use std::fmt::Debug;
use std::ops::Index;

use slotmap::{new_key_type, SlotMap};

use crate::{
    bounding_box::BoundingBox, intersection::Intersection, material::Material, Matrix, Ray,
    RayTracerError, Result, Tuple,
};

mod cube;
mod group;
mod plane;
mod sphere;
mod triangle;

pub use cube::Cube;
pub use group::Group;
pub use plane::Plane;
pub use sphere::Sphere;
pub use triangle::{SmoothTriangle, Triangle};

new_key_type! {
    /// Identifies a shape inside a [`ShapeArena`].
    pub struct ShapeId;
}

/// What a primitive has to provide, all in its own object space.
pub trait Geometry: Debug + Send + Sync {
    /// Intersections of an object-space ray with this primitive, tagged with `id`.
    fn local_intersect(&self, id: ShapeId, ray: &Ray) -> Vec<Intersection>;

    /// The surface normal at an object-space point. `hit` carries the
    /// barycentric coordinates smooth triangles interpolate with.
    fn local_normal_at(&self, point: Tuple, hit: Option<&Intersection>) -> Tuple;

    /// The untransformed bounds of the primitive.
    fn bounds(&self) -> BoundingBox;
}

#[derive(Debug)]
pub enum ShapeKind {
    Sphere(Sphere),
    Plane(Plane),
    Cube(Cube),
    Triangle(Triangle),
    SmoothTriangle(SmoothTriangle),
    Group(Group),
}

impl ShapeKind {
    /// Everything except groups is a primitive.
    pub fn as_geometry(&self) -> Option<&dyn Geometry> {
        match self {
            ShapeKind::Sphere(sphere) => Some(sphere),
            ShapeKind::Plane(plane) => Some(plane),
            ShapeKind::Cube(cube) => Some(cube),
            ShapeKind::Triangle(triangle) => Some(triangle),
            ShapeKind::SmoothTriangle(triangle) => Some(triangle),
            ShapeKind::Group(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct Shape {
    kind: ShapeKind,
    transformation: Matrix,
    inverse: Matrix,
    material: Material,
    parent: Option<ShapeId>,
}

impl Shape {
    pub fn new(kind: ShapeKind) -> Self {
        Self {
            kind,
            transformation: Matrix::identity(),
            inverse: Matrix::identity(),
            material: Material::default(),
            parent: None,
        }
    }

    pub fn sphere() -> Self {
        Self::new(ShapeKind::Sphere(Sphere))
    }

    /// A unit sphere made of clear glass.
    pub fn glass_sphere() -> Self {
        Self::sphere().with_material(Material::glass())
    }

    pub fn plane() -> Self {
        Self::new(ShapeKind::Plane(Plane))
    }

    pub fn cube() -> Self {
        Self::new(ShapeKind::Cube(Cube))
    }

    pub fn triangle(p1: Tuple, p2: Tuple, p3: Tuple) -> Self {
        Self::new(ShapeKind::Triangle(Triangle::new(p1, p2, p3)))
    }

    pub fn smooth_triangle(
        p1: Tuple,
        p2: Tuple,
        p3: Tuple,
        n1: Tuple,
        n2: Tuple,
        n3: Tuple,
    ) -> Self {
        Self::new(ShapeKind::SmoothTriangle(SmoothTriangle::new(
            p1, p2, p3, n1, n2, n3,
        )))
    }

    pub fn group() -> Self {
        Self::new(ShapeKind::Group(Group::default()))
    }

    /// Fails if the matrix cannot be inverted.
    pub fn with_transformation(mut self, transformation: Matrix) -> Result<Self> {
        self.inverse = transformation.inverse()?;
        self.transformation = transformation;
        Ok(self)
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn transformation(&self) -> Matrix {
        self.transformation
    }

    pub fn inverse(&self) -> Matrix {
        self.inverse
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// The group holding this shape, if any.
    pub fn parent(&self) -> Option<ShapeId> {
        self.parent
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.kind {
            ShapeKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        self.as_group().is_some()
    }
}

/// Owns every shape of a scene.
#[derive(Debug, Default)]
pub struct ShapeArena {
    shapes: SlotMap<ShapeId, Shape>,
    roots: Vec<ShapeId>,
}

impl ShapeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a shape at the top level.
    pub fn insert(&mut self, shape: Shape) -> ShapeId {
        let id = self.shapes.insert(shape);
        self.roots.push(id);
        id
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.contains_key(id)
    }

    /// Number of shapes in the arena, groups included.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Top-level shapes in insertion order.
    pub fn roots(&self) -> &[ShapeId] {
        &self.roots
    }

    pub fn parent(&self, id: ShapeId) -> Option<ShapeId> {
        self.shapes.get(id).and_then(|shape| shape.parent)
    }

    /// Replaces a shape's transformation, rejecting matrices that cannot be inverted.
    pub fn set_transformation(&mut self, id: ShapeId, transformation: Matrix) -> Result<()> {
        let inverse = transformation.inverse()?;
        let shape = self
            .shapes
            .get_mut(id)
            .ok_or(RayTracerError::UnknownShape(id))?;
        shape.transformation = transformation;
        shape.inverse = inverse;
        let parent = shape.parent;
        self.invalidate_bounds(parent);
        Ok(())
    }

    pub fn set_material(&mut self, id: ShapeId, material: Material) -> Result<()> {
        let shape = self
            .shapes
            .get_mut(id)
            .ok_or(RayTracerError::UnknownShape(id))?;
        shape.material = material;
        Ok(())
    }

    /// Intersects a world-space ray with the shape and everything beneath it.
    ///
    /// Panics if `id` is not in this arena.
    pub fn intersect(&self, id: ShapeId, ray: &Ray) -> Vec<Intersection> {
        let shape = &self[id];
        let local_ray = ray.transform(&shape.inverse);
        match &shape.kind {
            ShapeKind::Group(group) => self.intersect_group(group, &local_ray),
            kind => kind
                .as_geometry()
                .map(|geometry| geometry.local_intersect(id, &local_ray))
                .unwrap_or_default(),
        }
    }

    /// The world-space normal at a world-space point on the shape.
    /// Groups are never hit directly, so they report a zero vector.
    ///
    /// Panics if `id` is not in this arena.
    pub fn normal_at(&self, id: ShapeId, world_point: Tuple, hit: Option<&Intersection>) -> Tuple {
        let Some(geometry) = self[id].kind.as_geometry() else {
            return Tuple::vector(0., 0., 0.);
        };
        let local_point = self.world_to_object(id, world_point);
        let local_normal = geometry.local_normal_at(local_point, hit);
        self.normal_to_world(id, local_normal)
    }

    /// Converts a world-space point into the shape's object space,
    /// going through every enclosing group first.
    pub fn world_to_object(&self, id: ShapeId, point: Tuple) -> Tuple {
        let shape = &self[id];
        let point = match shape.parent {
            Some(parent) => self.world_to_object(parent, point),
            None => point,
        };
        shape.inverse * point
    }

    /// Converts an object-space normal back out to world space.
    pub fn normal_to_world(&self, id: ShapeId, normal: Tuple) -> Tuple {
        let shape = &self[id];
        let mut normal = shape.inverse.transpose() * normal;
        // the transposed inverse drags translation into w
        normal.w = 0.;
        let normal = normal.normalize();
        match shape.parent {
            Some(parent) => self.normal_to_world(parent, normal),
            None => normal,
        }
    }

    /// The shape's bounds in its own object space.
    pub fn bounds_of(&self, id: ShapeId) -> BoundingBox {
        match &self[id].kind {
            ShapeKind::Group(group) => self.group_bounds(group),
            kind => kind
                .as_geometry()
                .map(|geometry| geometry.bounds())
                .unwrap_or_default(),
        }
    }

    /// The shape's bounds in the space of whatever holds it.
    pub fn parent_space_bounds_of(&self, id: ShapeId) -> BoundingBox {
        self.bounds_of(id).transform(&self[id].transformation)
    }

    /// Clears the cached bounds of `start` and every group above it.
    fn invalidate_bounds(&mut self, start: Option<ShapeId>) {
        let mut current = start;
        while let Some(id) = current {
            let Some(shape) = self.shapes.get_mut(id) else {
                break;
            };
            if let ShapeKind::Group(group) = &mut shape.kind {
                group.clear_bounds();
            }
            current = shape.parent;
        }
    }
}

impl Index<ShapeId> for ShapeArena {
    type Output = Shape;

    /// Panics if `id` is not in this arena.
    fn index(&self, id: ShapeId) -> &Self::Output {
        &self.shapes[id]
    }
}
