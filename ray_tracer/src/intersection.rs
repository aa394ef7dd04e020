use crate::{
    equal,
    shape::{ShapeArena, ShapeId},
    Ray, Tuple, EPSILON,
};

/// A point along a ray where it crosses a shape's surface.
///
/// `u` and `v` are the barycentric coordinates of triangle hits and are zero
/// for every other shape.
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    pub t: f64,
    pub object: ShapeId,
    pub u: f64,
    pub v: f64,
}

impl Intersection {
    pub fn new(t: f64, object: ShapeId) -> Self {
        Self::with_uv(t, object, 0., 0.)
    }

    pub fn with_uv(t: f64, object: ShapeId, u: f64, v: f64) -> Self {
        Self { t, object, u, v }
    }
}

impl PartialEq for Intersection {
    fn eq(&self, other: &Self) -> bool {
        equal(self.t, other.t) && self.object == other.object
    }
}

/// Finds the intersection that hits the object.
/// Always picks the lowest non-negative intersection; the input does not need to be sorted.
pub fn hit(intersections: &[Intersection]) -> Option<Intersection> {
    intersections
        .iter()
        .filter(|intersection| intersection.t >= 0.)
        .min_by(|a, b| a.t.total_cmp(&b.t))
        .copied()
}

/// Everything shading needs to know about a hit, computed once up front.
#[derive(Debug, Clone, Copy)]
pub struct ComputedIntersection {
    pub t: f64,
    pub object: ShapeId,
    pub point: Tuple,
    pub eye_vector: Tuple,
    pub normal_vector: Tuple,
    pub inside: bool,
    pub reflect_vector: Tuple,
    /// Slightly above the surface, for shadow and reflection rays.
    pub over_point: Tuple,
    /// Slightly below the surface, for refraction rays.
    pub under_point: Tuple,
    /// Refractive index of the material being exited.
    pub n1: f64,
    /// Refractive index of the material being entered.
    pub n2: f64,
}

impl ComputedIntersection {
    /// Precomputes the state of `hit`, which must be one of `intersections`.
    ///
    /// `intersections` is every hit along `ray`, sorted by `t`; it is walked to
    /// work out which transparent objects the ray is inside of. An empty slice
    /// is treated as containing only `hit`.
    pub fn new(
        hit: &Intersection,
        ray: &Ray,
        intersections: &[Intersection],
        shapes: &ShapeArena,
    ) -> Self {
        let point = ray.position(hit.t);
        let eye_vector = -ray.direction;
        let normal_vector = shapes.normal_at(hit.object, point, Some(hit));

        // the eye is inside the shape when the normal points away from it
        let (inside, normal_vector) = if normal_vector.dot(&eye_vector) < 0. {
            (true, -normal_vector)
        } else {
            (false, normal_vector)
        };

        let reflect_vector = ray.direction.reflect(&normal_vector);
        let over_point = point + normal_vector * EPSILON;
        let under_point = point - normal_vector * EPSILON;

        let (n1, n2) = if intersections.is_empty() {
            refractive_indices(hit, std::slice::from_ref(hit), shapes)
        } else {
            refractive_indices(hit, intersections, shapes)
        };

        Self {
            t: hit.t,
            object: hit.object,
            point,
            eye_vector,
            normal_vector,
            inside,
            reflect_vector,
            over_point,
            under_point,
            n1,
            n2,
        }
    }

    /// The Schlick approximation of the Fresnel effect: the fraction of light
    /// reflected rather than refracted at this hit.
    pub fn schlick(&self) -> f64 {
        let mut cos = self.eye_vector.dot(&self.normal_vector);

        // total internal reflection only happens going into a less dense material
        if self.n1 > self.n2 {
            let n = self.n1 / self.n2;
            let sin2_t = n.powi(2) * (1. - cos.powi(2));
            if sin2_t > 1. {
                return 1.;
            }
            cos = (1. - sin2_t).sqrt();
        }

        let r0 = ((self.n1 - self.n2) / (self.n1 + self.n2)).powi(2);
        r0 + (1. - r0) * (1. - cos).powi(5)
    }
}

/// Tracks which objects the ray is inside of up to `hit`. The last one entered
/// before the hit gives n1 and the last one still open after it gives n2;
/// outside of everything the index is that of a vacuum.
fn refractive_indices(
    hit: &Intersection,
    intersections: &[Intersection],
    shapes: &ShapeArena,
) -> (f64, f64) {
    let index_of = |containers: &[ShapeId]| {
        containers
            .last()
            .map_or(1., |object| shapes[*object].material().refractive_index)
    };

    let mut containers: Vec<ShapeId> = vec![];
    let mut n1 = 1.;
    for intersection in intersections {
        let is_hit = intersection.object == hit.object && intersection.t == hit.t;
        if is_hit {
            n1 = index_of(&containers);
        }

        match containers.iter().position(|object| *object == intersection.object) {
            Some(position) => {
                containers.remove(position);
            }
            None => containers.push(intersection.object),
        }

        if is_hit {
            return (n1, index_of(&containers));
        }
    }
    (n1, index_of(&containers))
}
