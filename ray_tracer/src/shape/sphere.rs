use super::{Geometry, ShapeId};
use crate::{bounding_box::BoundingBox, intersection::Intersection, Ray, Tuple};

/// The unit sphere centered at the origin.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Sphere;

impl Geometry for Sphere {
    /// Returns two intersections when the ray hits, equal ones when it only grazes the surface.
    fn local_intersect(&self, id: ShapeId, ray: &Ray) -> Vec<Intersection> {
        // the vector from the sphere's center to the ray origin
        let sphere_to_ray = ray.origin - Tuple::point(0., 0., 0.);

        let a = ray.direction.dot(&ray.direction);
        let b = 2. * ray.direction.dot(&sphere_to_ray);
        let c = sphere_to_ray.dot(&sphere_to_ray) - 1.;

        let discriminant = b.powi(2) - 4. * a * c;
        if discriminant < 0. {
            return vec![];
        }

        let t1 = (-b - discriminant.sqrt()) / (2. * a);
        let t2 = (-b + discriminant.sqrt()) / (2. * a);
        vec![Intersection::new(t1, id), Intersection::new(t2, id)]
    }

    fn local_normal_at(&self, point: Tuple, _hit: Option<&Intersection>) -> Tuple {
        point - Tuple::point(0., 0., 0.)
    }

    fn bounds(&self) -> BoundingBox {
        BoundingBox::new(Tuple::point(-1., -1., -1.), Tuple::point(1., 1., 1.))
    }
}
