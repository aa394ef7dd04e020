use crate::{equal, Matrix, Ray, Tuple, EPSILON};

/// An axis-aligned box in some shape's coordinate space.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min: Tuple,
    pub max: Tuple,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// A box containing nothing; adding anything to it yields that thing's bounds.
    pub fn empty() -> Self {
        Self {
            min: Tuple::point(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Tuple::point(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn new(min: Tuple, max: Tuple) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// True when the box is non-empty and bounded along every axis.
    pub fn is_finite(&self) -> bool {
        !self.is_empty()
            && [self.min, self.max]
                .iter()
                .all(|p| p.x.is_finite() && p.y.is_finite() && p.z.is_finite())
    }

    pub fn add_point(&mut self, point: Tuple) {
        self.min = Tuple::point(
            self.min.x.min(point.x),
            self.min.y.min(point.y),
            self.min.z.min(point.z),
        );
        self.max = Tuple::point(
            self.max.x.max(point.x),
            self.max.y.max(point.y),
            self.max.z.max(point.z),
        );
    }

    pub fn add_box(&mut self, other: &BoundingBox) {
        if other.is_empty() {
            return;
        }
        self.add_point(other.min);
        self.add_point(other.max);
    }

    pub fn contains_point(&self, point: Tuple) -> bool {
        (self.min.x..=self.max.x).contains(&point.x)
            && (self.min.y..=self.max.y).contains(&point.y)
            && (self.min.z..=self.max.z).contains(&point.z)
    }

    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// The axis-aligned box enclosing this box's eight corners after `matrix`.
    ///
    /// Computed one output axis at a time: each matrix entry picks whichever of
    /// `min`/`max` makes its term smallest (or largest). For affine matrices that is
    /// the same box as transforming every corner, and it never multiplies an
    /// infinite extent by a zero entry, so unbounded shapes such as planes stay valid.
    pub fn transform(&self, matrix: &Matrix) -> BoundingBox {
        if self.is_empty() {
            return *self;
        }
        let lo = [self.min.x, self.min.y, self.min.z];
        let hi = [self.max.x, self.max.y, self.max.z];
        let mut new_min = [0.0; 3];
        let mut new_max = [0.0; 3];
        for row in 0..3 {
            let mut low = matrix[row][3];
            let mut high = matrix[row][3];
            for column in 0..3 {
                let factor = matrix[row][column];
                if factor == 0.0 {
                    continue;
                }
                let a = factor * lo[column];
                let b = factor * hi[column];
                low += a.min(b);
                high += a.max(b);
            }
            new_min[row] = low;
            new_max[row] = high;
        }
        BoundingBox::new(
            Tuple::point(new_min[0], new_min[1], new_min[2]),
            Tuple::point(new_max[0], new_max[1], new_max[2]),
        )
    }

    /// Slab test: true when the ray's line passes through the box.
    pub fn intersects(&self, ray: &Ray) -> bool {
        let (xtmin, xtmax) = check_axis(ray.origin.x, ray.direction.x, self.min.x, self.max.x);
        let (ytmin, ytmax) = check_axis(ray.origin.y, ray.direction.y, self.min.y, self.max.y);
        let (ztmin, ztmax) = check_axis(ray.origin.z, ray.direction.z, self.min.z, self.max.z);

        let tmin = xtmin.max(ytmin).max(ztmin);
        let tmax = xtmax.min(ytmax).min(ztmax);
        tmin <= tmax
    }

    /// Cuts the box in half across its widest axis (ties go to x, then y, then z).
    pub fn split(&self) -> (BoundingBox, BoundingBox) {
        let dx = self.max.x - self.min.x;
        let dy = self.max.y - self.min.y;
        let dz = self.max.z - self.min.z;
        let greatest = dx.max(dy).max(dz);

        let (mut x0, mut y0, mut z0) = (self.min.x, self.min.y, self.min.z);
        let (mut x1, mut y1, mut z1) = (self.max.x, self.max.y, self.max.z);

        if greatest == dx {
            x0 += dx / 2.;
            x1 = x0;
        } else if greatest == dy {
            y0 += dy / 2.;
            y1 = y0;
        } else {
            z0 += dz / 2.;
            z1 = z0;
        }

        let mid_min = Tuple::point(x0, y0, z0);
        let mid_max = Tuple::point(x1, y1, z1);
        (
            BoundingBox::new(self.min, mid_max),
            BoundingBox::new(mid_min, self.max),
        )
    }
}

/// Entry and exit distances of a ray against one pair of parallel planes.
/// A direction too small to divide by treats the planes as infinitely far away.
pub(crate) fn check_axis(origin: f64, direction: f64, min: f64, max: f64) -> (f64, f64) {
    let tmin_numerator = min - origin;
    let tmax_numerator = max - origin;

    let (tmin, tmax) = if direction.abs() >= EPSILON {
        (tmin_numerator / direction, tmax_numerator / direction)
    } else {
        (
            tmin_numerator * f64::INFINITY,
            tmax_numerator * f64::INFINITY,
        )
    };

    if tmin > tmax {
        (tmax, tmin)
    } else {
        (tmin, tmax)
    }
}

fn same(a: f64, b: f64) -> bool {
    a == b || equal(a, b)
}

impl PartialEq for BoundingBox {
    fn eq(&self, other: &Self) -> bool {
        [
            (self.min.x, other.min.x),
            (self.min.y, other.min.y),
            (self.min.z, other.min.z),
            (self.max.x, other.max.x),
            (self.max.y, other.max.y),
            (self.max.z, other.max.z),
        ]
        .iter()
        .all(|(a, b)| same(*a, *b))
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Tuple::point(-1., -1., -1.), Tuple::point(1., 1., 1.))
    }

    #[test]
    fn empty_box() {
        let b = BoundingBox::empty();
        assert!(b.is_empty());
        assert!(!b.is_finite());
        assert_eq!(b, BoundingBox::default());
    }

    #[test]
    fn adding_points_grows_box() {
        let mut b = BoundingBox::empty();
        b.add_point(Tuple::point(-5., 2., 0.));
        b.add_point(Tuple::point(7., 0., -3.));
        assert_eq!(b.min, Tuple::point(-5., 0., -3.));
        assert_eq!(b.max, Tuple::point(7., 2., 0.));
        assert!(b.is_finite());
    }

    #[test]
    fn adding_one_box_to_another() {
        let mut b1 = BoundingBox::new(Tuple::point(-5., -2., 0.), Tuple::point(7., 4., 4.));
        let b2 = BoundingBox::new(Tuple::point(8., -7., -2.), Tuple::point(14., 2., 8.));
        b1.add_box(&b2);
        assert_eq!(b1.min, Tuple::point(-5., -7., -2.));
        assert_eq!(b1.max, Tuple::point(14., 4., 8.));

        // empty boxes change nothing
        let before = b1;
        b1.add_box(&BoundingBox::empty());
        assert_eq!(b1, before);
    }

    #[test]
    fn box_contains_point() {
        let b = BoundingBox::new(Tuple::point(5., -2., 0.), Tuple::point(11., 4., 7.));
        let cases = [
            (Tuple::point(5., -2., 0.), true),
            (Tuple::point(11., 4., 7.), true),
            (Tuple::point(8., 1., 3.), true),
            (Tuple::point(3., 0., 3.), false),
            (Tuple::point(8., -4., 3.), false),
            (Tuple::point(8., 1., -1.), false),
            (Tuple::point(13., 1., 3.), false),
            (Tuple::point(8., 5., 3.), false),
            (Tuple::point(8., 1., 8.), false),
        ];
        for (point, expected) in cases {
            assert_eq!(b.contains_point(point), expected, "{point:?}");
        }
    }

    #[test]
    fn box_contains_box() {
        let b = BoundingBox::new(Tuple::point(5., -2., 0.), Tuple::point(11., 4., 7.));
        let cases = [
            (Tuple::point(5., -2., 0.), Tuple::point(11., 4., 7.), true),
            (Tuple::point(6., -1., 1.), Tuple::point(10., 3., 6.), true),
            (Tuple::point(4., -3., -1.), Tuple::point(10., 3., 6.), false),
            (Tuple::point(6., -1., 1.), Tuple::point(12., 5., 8.), false),
        ];
        for (min, max, expected) in cases {
            assert_eq!(b.contains_box(&BoundingBox::new(min, max)), expected);
        }
    }

    #[test]
    fn transforming_box_encloses_rotated_corners() {
        let b = unit_box();
        let matrix = Matrix::identity().rotate_y(PI / 4.).rotate_x(PI / 4.);
        let transformed = b.transform(&matrix);
        assert_eq!(transformed.min, Tuple::point(-1.41421, -1.70711, -1.70711));
        assert_eq!(transformed.max, Tuple::point(1.41421, 1.70711, 1.70711));
    }

    #[test]
    fn transforming_infinite_box_keeps_it_unbounded() {
        let plane = BoundingBox::new(
            Tuple::point(f64::NEG_INFINITY, 0., f64::NEG_INFINITY),
            Tuple::point(f64::INFINITY, 0., f64::INFINITY),
        );
        let moved = plane.transform(&Matrix::translation(0., 2., 0.));
        assert_eq!(moved.min.y, 2.);
        assert_eq!(moved.max.y, 2.);
        assert_eq!(moved.min.x, f64::NEG_INFINITY);

        let tilted = plane.transform(&Matrix::rotation_z(PI / 4.));
        assert!(!tilted.min.y.is_nan());
        assert_eq!(tilted.min.y, f64::NEG_INFINITY);
        assert_eq!(tilted.max.y, f64::INFINITY);
    }

    #[test]
    fn intersecting_ray_with_cubic_box_at_origin() {
        let b = unit_box();
        let cases = [
            (Tuple::point(5., 0.5, 0.), Tuple::vector(-1., 0., 0.), true),
            (Tuple::point(-5., 0.5, 0.), Tuple::vector(1., 0., 0.), true),
            (Tuple::point(0.5, 5., 0.), Tuple::vector(0., -1., 0.), true),
            (Tuple::point(0.5, -5., 0.), Tuple::vector(0., 1., 0.), true),
            (Tuple::point(0.5, 0., 5.), Tuple::vector(0., 0., -1.), true),
            (Tuple::point(0.5, 0., -5.), Tuple::vector(0., 0., 1.), true),
            (Tuple::point(0., 0.5, 0.), Tuple::vector(0., 0., 1.), true),
            (Tuple::point(-2., 0., 0.), Tuple::vector(2., 4., 6.), false),
            (Tuple::point(0., -2., 0.), Tuple::vector(6., 2., 4.), false),
            (Tuple::point(0., 0., -2.), Tuple::vector(4., 6., 2.), false),
            (Tuple::point(2., 0., 2.), Tuple::vector(0., 0., -1.), false),
            (Tuple::point(0., 2., 2.), Tuple::vector(0., -1., 0.), false),
            (Tuple::point(2., 2., 0.), Tuple::vector(-1., 0., 0.), false),
        ];
        for (origin, direction, expected) in cases {
            let ray = Ray::new(origin, direction.normalize());
            assert_eq!(b.intersects(&ray), expected, "{origin:?} {direction:?}");
        }
    }

    #[test]
    fn intersecting_ray_with_non_cubic_box() {
        let b = BoundingBox::new(Tuple::point(5., -2., 0.), Tuple::point(11., 4., 7.));
        let cases = [
            (Tuple::point(15., 1., 2.), Tuple::vector(-1., 0., 0.), true),
            (Tuple::point(-5., -1., 4.), Tuple::vector(1., 0., 0.), true),
            (Tuple::point(7., 6., 5.), Tuple::vector(0., -1., 0.), true),
            (Tuple::point(9., -5., 6.), Tuple::vector(0., 1., 0.), true),
            (Tuple::point(8., 2., 12.), Tuple::vector(0., 0., -1.), true),
            (Tuple::point(6., 0., -5.), Tuple::vector(0., 0., 1.), true),
            (Tuple::point(8., 1., 3.5), Tuple::vector(0., 0., 1.), true),
            (Tuple::point(9., -1., -8.), Tuple::vector(2., 4., 6.), false),
            (Tuple::point(8., 3., -4.), Tuple::vector(6., 2., 4.), false),
            (Tuple::point(9., -1., -2.), Tuple::vector(4., 6., 2.), false),
            (Tuple::point(4., 0., 9.), Tuple::vector(0., 0., -1.), false),
            (Tuple::point(8., 6., -1.), Tuple::vector(0., -1., 0.), false),
            (Tuple::point(12., 5., 4.), Tuple::vector(-1., 0., 0.), false),
        ];
        for (origin, direction, expected) in cases {
            let ray = Ray::new(origin, direction.normalize());
            assert_eq!(b.intersects(&ray), expected, "{origin:?} {direction:?}");
        }
    }

    #[test]
    fn splitting_perfect_cube() {
        let b = BoundingBox::new(Tuple::point(-1., -4., -5.), Tuple::point(9., 6., 5.));
        let (left, right) = b.split();
        assert_eq!(left.min, Tuple::point(-1., -4., -5.));
        assert_eq!(left.max, Tuple::point(4., 6., 5.));
        assert_eq!(right.min, Tuple::point(4., -4., -5.));
        assert_eq!(right.max, Tuple::point(9., 6., 5.));
    }

    #[test]
    fn splitting_x_wide_box() {
        let b = BoundingBox::new(Tuple::point(-1., -2., -3.), Tuple::point(9., 5.5, 3.));
        let (left, right) = b.split();
        assert_eq!(left.max, Tuple::point(4., 5.5, 3.));
        assert_eq!(right.min, Tuple::point(4., -2., -3.));
    }

    #[test]
    fn splitting_y_wide_box() {
        let b = BoundingBox::new(Tuple::point(-1., -2., -3.), Tuple::point(5., 8., 3.));
        let (left, right) = b.split();
        assert_eq!(left.min, Tuple::point(-1., -2., -3.));
        assert_eq!(left.max, Tuple::point(5., 3., 3.));
        assert_eq!(right.min, Tuple::point(-1., 3., -3.));
        assert_eq!(right.max, Tuple::point(5., 8., 3.));
    }

    #[test]
    fn splitting_z_wide_box() {
        let b = BoundingBox::new(Tuple::point(-1., -2., -3.), Tuple::point(5., 3., 7.));
        let (left, right) = b.split();
        assert_eq!(left.max, Tuple::point(5., 3., 2.));
        assert_eq!(right.min, Tuple::point(-1., -2., 2.));
    }

    #[test]
    fn split_halves_cover_the_box_and_share_only_the_plane() {
        let b = BoundingBox::new(Tuple::point(-3., 0., 1.), Tuple::point(5., 2., 4.));
        let (left, right) = b.split();
        let mut union = left;
        union.add_box(&right);
        assert_eq!(union, b);
        // the halves touch along x == 1 and nowhere else
        assert_eq!(left.max.x, right.min.x);
        assert_eq!(left.max.x, 1.);
        assert!(b.contains_box(&left) && b.contains_box(&right));
    }

    #[test]
    fn check_axis_treats_tiny_direction_as_unbounded() {
        let (tmin, tmax) = check_axis(0., 0., -1., 1.);
        assert_eq!(tmin, f64::NEG_INFINITY);
        assert_eq!(tmax, f64::INFINITY);
        let (tmin, tmax) = check_axis(5., -1., -1., 1.);
        assert_eq!((tmin, tmax), (4., 6.));
    }
}
