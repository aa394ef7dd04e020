use crate::{Matrix, Tuple};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Tuple,
    pub direction: Tuple,
}

impl Ray {
    pub fn new(origin: Tuple, direction: Tuple) -> Self {
        Self { origin, direction }
    }

    pub fn position(&self, t: f64) -> Tuple {
        self.origin + self.direction * t
    }

    /// The direction is left unnormalized, so `t` values stay comparable with the original ray.
    pub fn transform(&self, matrix: &Matrix) -> Self {
        Self {
            origin: *matrix * self.origin,
            direction: *matrix * self.direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_and_query_ray() {
        let origin = Tuple::point(1., 2., 3.);
        let direction = Tuple::vector(4., 5., 6.);
        let ray = Ray::new(origin, direction);
        assert_eq!(ray.origin, origin);
        assert_eq!(ray.direction, direction);
    }

    #[test]
    fn compute_point_from_distance() {
        let ray = Ray::new(Tuple::point(2., 3., 4.), Tuple::vector(1., 0., 0.));
        assert_eq!(ray.position(0.), Tuple::point(2., 3., 4.));
        assert_eq!(ray.position(1.), Tuple::point(3., 3., 4.));
        assert_eq!(ray.position(-1.), Tuple::point(1., 3., 4.));
        assert_eq!(ray.position(2.5), Tuple::point(4.5, 3., 4.));
    }

    #[test]
    fn translate_ray() {
        let ray = Ray::new(Tuple::point(1., 2., 3.), Tuple::vector(0., 1., 0.));
        let moved = ray.transform(&Matrix::translation(3., 4., 5.));
        assert_eq!(moved.origin, Tuple::point(4., 6., 8.));
        assert_eq!(moved.direction, Tuple::vector(0., 1., 0.));
    }

    #[test]
    fn scale_ray() {
        let ray = Ray::new(Tuple::point(1., 2., 3.), Tuple::vector(0., 1., 0.));
        let scaled = ray.transform(&Matrix::scaling(2., 3., 4.));
        assert_eq!(scaled.origin, Tuple::point(2., 6., 12.));
        assert_eq!(scaled.direction, Tuple::vector(0., 3., 0.));
    }
}
