use super::{Geometry, ShapeId};
use crate::{bounding_box::BoundingBox, intersection::Intersection, Ray, Tuple, EPSILON};

/// The xz plane through the origin.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Plane;

impl Geometry for Plane {
    fn local_intersect(&self, id: ShapeId, ray: &Ray) -> Vec<Intersection> {
        // parallel or coplanar rays never hit
        if ray.direction.y.abs() < EPSILON {
            return vec![];
        }
        let t = -ray.origin.y / ray.direction.y;
        vec![Intersection::new(t, id)]
    }

    fn local_normal_at(&self, _point: Tuple, _hit: Option<&Intersection>) -> Tuple {
        Tuple::vector(0., 1., 0.)
    }

    fn bounds(&self) -> BoundingBox {
        BoundingBox::new(
            Tuple::point(f64::NEG_INFINITY, 0., f64::NEG_INFINITY),
            Tuple::point(f64::INFINITY, 0., f64::INFINITY),
        )
    }
}
