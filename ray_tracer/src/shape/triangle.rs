use super::{Geometry, ShapeId};
use crate::{bounding_box::BoundingBox, intersection::Intersection, Ray, Tuple, EPSILON};

/// A flat triangle with precomputed edges and face normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p1: Tuple,
    pub p2: Tuple,
    pub p3: Tuple,
    pub e1: Tuple,
    pub e2: Tuple,
    pub normal: Tuple,
}

impl Triangle {
    pub fn new(p1: Tuple, p2: Tuple, p3: Tuple) -> Self {
        let e1 = p2 - p1;
        let e2 = p3 - p1;
        let normal = e2.cross(&e1).normalize();
        Self {
            p1,
            p2,
            p3,
            e1,
            e2,
            normal,
        }
    }

    /// Möller-Trumbore: the hit carries its barycentric `u` and `v`.
    fn intersect(&self, id: ShapeId, ray: &Ray) -> Vec<Intersection> {
        let dir_cross_e2 = ray.direction.cross(&self.e2);
        let det = self.e1.dot(&dir_cross_e2);
        if det.abs() < EPSILON {
            return vec![];
        }

        let f = 1. / det;
        let p1_to_origin = ray.origin - self.p1;
        let u = f * p1_to_origin.dot(&dir_cross_e2);
        if !(0. ..=1.).contains(&u) {
            return vec![];
        }

        let origin_cross_e1 = p1_to_origin.cross(&self.e1);
        let v = f * ray.direction.dot(&origin_cross_e1);
        if v < 0. || u + v > 1. {
            return vec![];
        }

        let t = f * self.e2.dot(&origin_cross_e1);
        vec![Intersection::with_uv(t, id, u, v)]
    }

    fn corners_bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::empty();
        for point in [self.p1, self.p2, self.p3] {
            bounds.add_point(point);
        }
        bounds
    }
}

impl Geometry for Triangle {
    fn local_intersect(&self, id: ShapeId, ray: &Ray) -> Vec<Intersection> {
        self.intersect(id, ray)
    }

    fn local_normal_at(&self, _point: Tuple, _hit: Option<&Intersection>) -> Tuple {
        self.normal
    }

    fn bounds(&self) -> BoundingBox {
        self.corners_bounds()
    }
}

/// A triangle whose normal is interpolated from one normal per vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothTriangle {
    pub triangle: Triangle,
    pub n1: Tuple,
    pub n2: Tuple,
    pub n3: Tuple,
}

impl SmoothTriangle {
    pub fn new(p1: Tuple, p2: Tuple, p3: Tuple, n1: Tuple, n2: Tuple, n3: Tuple) -> Self {
        Self {
            triangle: Triangle::new(p1, p2, p3),
            n1,
            n2,
            n3,
        }
    }
}

impl Geometry for SmoothTriangle {
    fn local_intersect(&self, id: ShapeId, ray: &Ray) -> Vec<Intersection> {
        self.triangle.intersect(id, ray)
    }

    /// Without a hit to read `u`/`v` from, falls back to the face normal.
    fn local_normal_at(&self, _point: Tuple, hit: Option<&Intersection>) -> Tuple {
        match hit {
            Some(hit) => self.n2 * hit.u + self.n3 * hit.v + self.n1 * (1. - hit.u - hit.v),
            None => self.triangle.normal,
        }
    }

    fn bounds(&self) -> BoundingBox {
        self.triangle.corners_bounds()
    }
}
