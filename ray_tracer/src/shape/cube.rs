use super::{Geometry, ShapeId};
use crate::{
    bounding_box::{check_axis, BoundingBox},
    intersection::Intersection,
    Ray, Tuple,
};

/// The axis-aligned cube spanning -1 to 1 on every axis.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Cube;

impl Geometry for Cube {
    fn local_intersect(&self, id: ShapeId, ray: &Ray) -> Vec<Intersection> {
        let (xtmin, xtmax) = check_axis(ray.origin.x, ray.direction.x, -1., 1.);
        let (ytmin, ytmax) = check_axis(ray.origin.y, ray.direction.y, -1., 1.);
        let (ztmin, ztmax) = check_axis(ray.origin.z, ray.direction.z, -1., 1.);

        let tmin = xtmin.max(ytmin).max(ztmin);
        let tmax = xtmax.min(ytmax).min(ztmax);
        if tmin > tmax {
            return vec![];
        }
        vec![Intersection::new(tmin, id), Intersection::new(tmax, id)]
    }

    /// The face normal is the axis with the largest absolute component.
    fn local_normal_at(&self, point: Tuple, _hit: Option<&Intersection>) -> Tuple {
        let max = point.x.abs().max(point.y.abs()).max(point.z.abs());
        if max == point.x.abs() {
            Tuple::vector(point.x, 0., 0.)
        } else if max == point.y.abs() {
            Tuple::vector(0., point.y, 0.)
        } else {
            Tuple::vector(0., 0., point.z)
        }
    }

    fn bounds(&self) -> BoundingBox {
        BoundingBox::new(Tuple::point(-1., -1., -1.), Tuple::point(1., 1., 1.))
    }
}
