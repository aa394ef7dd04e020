use crate::{
    intersection::{hit, ComputedIntersection, Intersection},
    light::{Light, PointLight},
    material::Material,
    shape::{Shape, ShapeArena, ShapeId},
    Color, Matrix, Ray, RayTracerError, Result, Tuple, EPSILON,
};

/// A scene: every shape plus the light illuminating them.
#[derive(Debug)]
pub struct World {
    shapes: ShapeArena,
    light: Option<Light>,
}

impl World {
    /// Constructs an empty world with no objects and no light.
    pub fn new() -> Self {
        Self {
            shapes: ShapeArena::new(),
            light: None,
        }
    }

    /// Adds a shape at the top level of the scene.
    pub fn add(&mut self, shape: Shape) -> ShapeId {
        self.shapes.insert(shape)
    }

    pub fn shapes(&self) -> &ShapeArena {
        &self.shapes
    }

    pub fn shapes_mut(&mut self) -> &mut ShapeArena {
        &mut self.shapes
    }

    pub fn light(&self) -> Option<&Light> {
        self.light.as_ref()
    }

    pub fn set_light(&mut self, light: impl Into<Light>) {
        self.light = Some(light.into());
    }

    /// Every intersection of the ray with the scene, sorted by `t`.
    pub fn intersect(&self, ray: &Ray) -> Vec<Intersection> {
        let mut xs = self
            .shapes
            .roots()
            .iter()
            .flat_map(|id| self.shapes.intersect(*id, ray))
            .collect::<Vec<_>>();
        xs.sort_by(|a, b| a.t.total_cmp(&b.t));
        xs
    }

    /// Whether something lies between `point` and a light at `light_position`.
    pub fn is_shadowed(&self, light_position: Tuple, point: Tuple) -> bool {
        let distance_vector = light_position - point;
        let distance = distance_vector.magnitude();
        let ray = Ray::new(point, distance_vector.normalize());

        hit(&self.intersect(&ray)).is_some_and(|hit| hit.t < distance)
    }

    /// Returns the color at the intersection encapsulated by comps.
    /// `remaining` bounds how many more reflected or refracted rays may be cast.
    pub fn shade_hit(&self, comps: &ComputedIntersection, remaining: usize) -> Result<Color> {
        let light = self.light.as_ref().ok_or(RayTracerError::MissingLight)?;
        let material = self.shapes[comps.object].material();

        let object_point = self.shapes.world_to_object(comps.object, comps.over_point);
        let intensity = light.intensity_at(comps.over_point, self);
        let surface = material.lighting(
            light,
            material.color_at(object_point),
            comps.over_point,
            comps.eye_vector,
            comps.normal_vector,
            intensity,
        );

        let reflected = self.reflected_color(comps, remaining)?;
        let refracted = self.refracted_color(comps, remaining)?;

        if material.reflective > 0. && material.transparency > 0. {
            let reflectance = comps.schlick();
            Ok(surface + reflected * reflectance + refracted * (1. - reflectance))
        } else {
            Ok(surface + reflected + refracted)
        }
    }

    pub fn reflected_color(&self, comps: &ComputedIntersection, remaining: usize) -> Result<Color> {
        let reflective = self.shapes[comps.object].material().reflective;
        if remaining == 0 || reflective.abs() < EPSILON {
            return Ok(Color::BLACK);
        }

        let reflect_ray = Ray::new(comps.over_point, comps.reflect_vector);
        Ok(self.color_at(&reflect_ray, remaining - 1)? * reflective)
    }

    pub fn refracted_color(&self, comps: &ComputedIntersection, remaining: usize) -> Result<Color> {
        let transparency = self.shapes[comps.object].material().transparency;
        if remaining == 0 || transparency == 0. {
            return Ok(Color::BLACK);
        }

        // Snell's law, solved for the angle of the refracted ray
        let n_ratio = comps.n1 / comps.n2;
        let cos_i = comps.eye_vector.dot(&comps.normal_vector);
        let sin2_t = n_ratio.powi(2) * (1. - cos_i.powi(2));
        if sin2_t > 1. {
            // total internal reflection
            return Ok(Color::BLACK);
        }

        let cos_t = (1. - sin2_t).sqrt();
        let direction =
            comps.normal_vector * (n_ratio * cos_i - cos_t) - comps.eye_vector * n_ratio;
        let refract_ray = Ray::new(comps.under_point, direction);
        Ok(self.color_at(&refract_ray, remaining - 1)? * transparency)
    }

    /// Intersects the world with the given ray and returns
    /// the color at the resulting hit, or black if nothing is hit.
    pub fn color_at(&self, ray: &Ray, remaining: usize) -> Result<Color> {
        let xs = self.intersect(ray);
        match hit(&xs) {
            Some(hit) => {
                let comps = ComputedIntersection::new(&hit, ray, &xs, &self.shapes);
                self.shade_hit(&comps, remaining)
            }
            None => Ok(Color::BLACK),
        }
    }
}

impl Default for World {
    /// A light at (-10, 10, -10) and two spheres at the origin:
    /// a unit sphere and, inside it, one half its size.
    fn default() -> Self {
        let mut world = Self::new();
        world.set_light(PointLight::new(Tuple::point(-10., 10., -10.), Color::WHITE));

        world.add(Shape::sphere().with_material(Material {
            color: Color::new(0.8, 1.0, 0.6),
            diffuse: 0.7,
            specular: 0.2,
            ..Default::default()
        }));
        // a uniform nonzero scale always inverts
        world.add(
            Shape::sphere()
                .with_transformation(Matrix::scaling(0.5, 0.5, 0.5))
                .unwrap_or_else(|_| Shape::sphere()),
        );
        world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pattern::TestPattern, DEFAULT_DEPTH};

    const SQRT_2_2: f64 = std::f64::consts::FRAC_1_SQRT_2;

    fn default_ids(world: &World) -> (ShapeId, ShapeId) {
        let roots = world.shapes().roots();
        (roots[0], roots[1])
    }

    fn update_material(world: &mut World, id: ShapeId, update: impl FnOnce(&mut Material)) {
        let mut material = world.shapes()[id].material().clone();
        update(&mut material);
        world.shapes_mut().set_material(id, material).unwrap();
    }

    fn comps_for(
        world: &World,
        xs: &[Intersection],
        index: usize,
        ray: &Ray,
    ) -> ComputedIntersection {
        ComputedIntersection::new(&xs[index], ray, xs, world.shapes())
    }

    #[test]
    fn create_a_world() {
        let world = World::new();
        assert!(world.shapes().is_empty());
        assert!(world.light().is_none());
    }

    #[test]
    fn create_default_world() {
        let world = World::default();
        let light = Light::from(PointLight::new(Tuple::point(-10., 10., -10.), Color::WHITE));
        assert_eq!(world.light(), Some(&light));

        let (s1, s2) = default_ids(&world);
        let material = world.shapes()[s1].material();
        assert_eq!(material.color, Color::new(0.8, 1.0, 0.6));
        assert_eq!(material.diffuse, 0.7);
        assert_eq!(material.specular, 0.2);
        assert_eq!(
            world.shapes()[s2].transformation(),
            Matrix::scaling(0.5, 0.5, 0.5)
        );
    }

    #[test]
    fn intersect_world_with_ray() {
        let world = World::default();
        let ray = Ray::new(Tuple::point(0., 0., -5.), Tuple::vector(0., 0., 1.));
        let ts = world.intersect(&ray).iter().map(|i| i.t).collect::<Vec<_>>();
        assert_eq!(ts, vec![4., 4.5, 5.5, 6.]);
    }

    #[test]
    fn shading_intersection() {
        let world = World::default();
        let (s1, _) = default_ids(&world);
        let ray = Ray::new(Tuple::point(0., 0., -5.), Tuple::vector(0., 0., 1.));
        let xs = [Intersection::new(4., s1)];
        let comps = comps_for(&world, &xs, 0, &ray);
        let color = world.shade_hit(&comps, DEFAULT_DEPTH).unwrap();
        assert_eq!(color, Color::new(0.38066, 0.47583, 0.2855));
    }

    #[test]
    fn shading_intersection_from_inside() {
        let mut world = World::default();
        world.set_light(PointLight::new(Tuple::point(0., 0.25, 0.), Color::WHITE));
        let (_, s2) = default_ids(&world);
        let ray = Ray::new(Tuple::point(0., 0., 0.), Tuple::vector(0., 0., 1.));
        let xs = [Intersection::new(0.5, s2)];
        let comps = comps_for(&world, &xs, 0, &ray);
        let color = world.shade_hit(&comps, DEFAULT_DEPTH).unwrap();
        assert_eq!(color, Color::new(0.90498, 0.90498, 0.90498));
    }

    #[test]
    fn shade_hit_is_given_intersection_in_shadow() {
        let mut world = World::new();
        world.set_light(PointLight::new(Tuple::point(0., 0., -10.), Color::WHITE));
        world.add(Shape::sphere());
        let s2 = world.add(
            Shape::sphere()
                .with_transformation(Matrix::translation(0., 0., 10.))
                .unwrap(),
        );
        let ray = Ray::new(Tuple::point(0., 0., 5.), Tuple::vector(0., 0., 1.));
        let xs = [Intersection::new(4., s2)];
        let comps = comps_for(&world, &xs, 0, &ray);
        let color = world.shade_hit(&comps, DEFAULT_DEPTH).unwrap();
        assert_eq!(color, Color::new(0.1, 0.1, 0.1));
    }

    #[test]
    fn color_when_ray_misses() {
        let world = World::default();
        let ray = Ray::new(Tuple::point(0., 0., -5.), Tuple::vector(0., 1., 0.));
        assert_eq!(world.color_at(&ray, DEFAULT_DEPTH).unwrap(), Color::BLACK);
    }

    #[test]
    fn color_when_ray_hits() {
        let world = World::default();
        let ray = Ray::new(Tuple::point(0., 0., -5.), Tuple::vector(0., 0., 1.));
        let color = world.color_at(&ray, DEFAULT_DEPTH).unwrap();
        assert_eq!(color, Color::new(0.38066, 0.47583, 0.2855));
    }

    #[test]
    fn color_with_intersection_behind_ray() {
        // the ray starts between the two spheres, pointing at the inner one
        let mut world = World::default();
        let (outer, inner) = default_ids(&world);
        update_material(&mut world, outer, |m| m.ambient = 1.);
        update_material(&mut world, inner, |m| m.ambient = 1.);

        let ray = Ray::new(Tuple::point(0., 0., 0.75), Tuple::vector(0., 0., -1.));
        let color = world.color_at(&ray, DEFAULT_DEPTH).unwrap();
        assert_eq!(color, world.shapes()[inner].material().color);
    }

    #[test]
    fn shading_without_light_is_an_error() {
        let mut world = World::new();
        world.add(Shape::sphere());
        let hit_ray = Ray::new(Tuple::point(0., 0., -5.), Tuple::vector(0., 0., 1.));
        assert!(matches!(
            world.color_at(&hit_ray, DEFAULT_DEPTH),
            Err(RayTracerError::MissingLight)
        ));

        let miss_ray = Ray::new(Tuple::point(0., 0., -5.), Tuple::vector(0., 1., 0.));
        assert_eq!(world.color_at(&miss_ray, DEFAULT_DEPTH).unwrap(), Color::BLACK);
    }

    #[test]
    fn shadows_between_point_and_light() {
        let world = World::default();
        let light_position = Tuple::point(-10., 10., -10.);
        let cases = [
            // nothing is collinear with point and light
            (Tuple::point(0., 10., 0.), false),
            // the spheres are between point and light
            (Tuple::point(10., -10., 10.), true),
            // the spheres are behind the light
            (Tuple::point(-20., 20., -20.), false),
            // the spheres are behind the point
            (Tuple::point(-2., 2., -2.), false),
        ];
        for (point, expected) in cases {
            assert_eq!(world.is_shadowed(light_position, point), expected, "{point:?}");
        }
    }

    #[test]
    fn shade_hit_uses_pattern_in_object_space() {
        let mut world = World::new();
        world.set_light(PointLight::new(Tuple::point(0., 0., -10.), Color::WHITE));
        let material = Material {
            ambient: 1.,
            diffuse: 0.,
            specular: 0.,
            ..Default::default()
        }
        .with_pattern(TestPattern::new());
        let s = world.add(
            Shape::sphere()
                .with_transformation(Matrix::scaling(2., 2., 2.))
                .unwrap()
                .with_material(material),
        );
        let ray = Ray::new(Tuple::point(0., 0., -5.), Tuple::vector(0., 0., 1.));
        let xs = [Intersection::new(3., s)];
        let comps = comps_for(&world, &xs, 0, &ray);
        let color = world.shade_hit(&comps, DEFAULT_DEPTH).unwrap();
        // the world-space hit at z = -2 is z = -1 on the unit sphere
        assert_eq!(color, Color::new(0., 0., -1.));
    }

    #[test]
    fn reflected_color_for_nonreflective_material() {
        let mut world = World::default();
        let (_, s2) = default_ids(&world);
        update_material(&mut world, s2, |m| m.ambient = 1.);
        let ray = Ray::new(Tuple::point(0., 0., 0.), Tuple::vector(0., 0., 1.));
        let xs = [Intersection::new(1., s2)];
        let comps = comps_for(&world, &xs, 0, &ray);
        let color = world.reflected_color(&comps, DEFAULT_DEPTH).unwrap();
        assert_eq!(color, Color::BLACK);
    }

    fn world_with_reflective_floor() -> (World, ShapeId) {
        let mut world = World::default();
        let floor = world.add(
            Shape::plane()
                .with_transformation(Matrix::translation(0., -1., 0.))
                .unwrap()
                .with_material(Material {
                    reflective: 0.5,
                    ..Default::default()
                }),
        );
        (world, floor)
    }

    #[test]
    fn reflected_color_for_reflective_material() {
        let (world, floor) = world_with_reflective_floor();
        let ray = Ray::new(Tuple::point(0., 0., -3.), Tuple::vector(0., -SQRT_2_2, SQRT_2_2));
        let xs = [Intersection::new(2f64.sqrt(), floor)];
        let comps = comps_for(&world, &xs, 0, &ray);
        let color = world.reflected_color(&comps, DEFAULT_DEPTH).unwrap();
        assert_eq!(color, Color::new(0.19032, 0.2379, 0.14274));
    }

    #[test]
    fn shade_hit_with_reflective_material() {
        let (world, floor) = world_with_reflective_floor();
        let ray = Ray::new(Tuple::point(0., 0., -3.), Tuple::vector(0., -SQRT_2_2, SQRT_2_2));
        let xs = [Intersection::new(2f64.sqrt(), floor)];
        let comps = comps_for(&world, &xs, 0, &ray);
        let color = world.shade_hit(&comps, DEFAULT_DEPTH).unwrap();
        assert_eq!(color, Color::new(0.87677, 0.92436, 0.82918));
    }

    #[test]
    fn reflected_color_at_maximum_recursive_depth() {
        let (world, floor) = world_with_reflective_floor();
        let ray = Ray::new(Tuple::point(0., 0., -3.), Tuple::vector(0., -SQRT_2_2, SQRT_2_2));
        let xs = [Intersection::new(2f64.sqrt(), floor)];
        let comps = comps_for(&world, &xs, 0, &ray);
        assert_eq!(world.reflected_color(&comps, 0).unwrap(), Color::BLACK);
    }

    #[test]
    fn color_at_with_mutually_reflective_surfaces() {
        let mut world = World::new();
        world.set_light(PointLight::new(Tuple::point(0., 0., 0.), Color::WHITE));
        let mirror = Material {
            reflective: 1.,
            ..Default::default()
        };
        for y in [-1., 1.] {
            world.add(
                Shape::plane()
                    .with_transformation(Matrix::translation(0., y, 0.))
                    .unwrap()
                    .with_material(mirror.clone()),
            );
        }

        // terminates instead of bouncing forever
        let ray = Ray::new(Tuple::point(0., 0., 0.), Tuple::vector(0., 1., 0.));
        assert!(world.color_at(&ray, DEFAULT_DEPTH).is_ok());
    }

    #[test]
    fn refracted_color_with_opaque_surface() {
        let world = World::default();
        let (s1, _) = default_ids(&world);
        let ray = Ray::new(Tuple::point(0., 0., -5.), Tuple::vector(0., 0., 1.));
        let xs = [Intersection::new(4., s1), Intersection::new(6., s1)];
        let comps = comps_for(&world, &xs, 0, &ray);
        assert_eq!(world.refracted_color(&comps, 5).unwrap(), Color::BLACK);
    }

    #[test]
    fn refracted_color_at_maximum_recursive_depth() {
        let mut world = World::default();
        let (s1, _) = default_ids(&world);
        update_material(&mut world, s1, |m| {
            m.transparency = 1.;
            m.refractive_index = 1.5;
        });
        let ray = Ray::new(Tuple::point(0., 0., -5.), Tuple::vector(0., 0., 1.));
        let xs = [Intersection::new(4., s1), Intersection::new(6., s1)];
        let comps = comps_for(&world, &xs, 0, &ray);
        assert_eq!(world.refracted_color(&comps, 0).unwrap(), Color::BLACK);
    }

    #[test]
    fn refracted_color_under_total_internal_reflection() {
        let mut world = World::default();
        let (s1, _) = default_ids(&world);
        update_material(&mut world, s1, |m| {
            m.transparency = 1.;
            m.refractive_index = 1.5;
        });
        let ray = Ray::new(Tuple::point(0., 0., SQRT_2_2), Tuple::vector(0., 1., 0.));
        let xs = [
            Intersection::new(-SQRT_2_2, s1),
            Intersection::new(SQRT_2_2, s1),
        ];
        // inside the sphere, so the hit is the second intersection
        let comps = comps_for(&world, &xs, 1, &ray);
        assert_eq!(world.refracted_color(&comps, 5).unwrap(), Color::BLACK);
    }

    #[test]
    fn refracted_color_with_refracted_ray() {
        let mut world = World::default();
        let (a, b) = default_ids(&world);
        update_material(&mut world, a, |m| {
            m.ambient = 1.;
            *m = m.clone().with_pattern(TestPattern::new());
        });
        update_material(&mut world, b, |m| {
            m.transparency = 1.;
            m.refractive_index = 1.5;
        });
        let ray = Ray::new(Tuple::point(0., 0., 0.1), Tuple::vector(0., 1., 0.));
        let xs = [
            Intersection::new(-0.9899, a),
            Intersection::new(-0.4899, b),
            Intersection::new(0.4899, b),
            Intersection::new(0.9899, a),
        ];
        let comps = comps_for(&world, &xs, 2, &ray);
        let color = world.refracted_color(&comps, 5).unwrap();
        assert_eq!(color, Color::new(0., 0.99888, 0.04725));
    }

    fn world_with_glass_floor_and_ball(reflective: f64) -> (World, ShapeId) {
        let mut world = World::default();
        let floor = world.add(
            Shape::plane()
                .with_transformation(Matrix::translation(0., -1., 0.))
                .unwrap()
                .with_material(Material {
                    reflective,
                    transparency: 0.5,
                    refractive_index: 1.5,
                    ..Default::default()
                }),
        );
        world.add(
            Shape::sphere()
                .with_transformation(Matrix::translation(0., -3.5, -0.5))
                .unwrap()
                .with_material(Material {
                    color: Color::new(1., 0., 0.),
                    ambient: 0.5,
                    ..Default::default()
                }),
        );
        (world, floor)
    }

    #[test]
    fn shade_hit_with_transparent_material() {
        let (world, floor) = world_with_glass_floor_and_ball(0.);
        let ray = Ray::new(Tuple::point(0., 0., -3.), Tuple::vector(0., -SQRT_2_2, SQRT_2_2));
        let xs = [Intersection::new(2f64.sqrt(), floor)];
        let comps = comps_for(&world, &xs, 0, &ray);
        let color = world.shade_hit(&comps, 5).unwrap();
        assert_eq!(color, Color::new(0.93642, 0.68642, 0.68642));
    }

    #[test]
    fn shade_hit_with_reflective_transparent_material() {
        let (world, floor) = world_with_glass_floor_and_ball(0.5);
        let ray = Ray::new(Tuple::point(0., 0., -3.), Tuple::vector(0., -SQRT_2_2, SQRT_2_2));
        let xs = [Intersection::new(2f64.sqrt(), floor)];
        let comps = comps_for(&world, &xs, 0, &ray);
        let color = world.shade_hit(&comps, 5).unwrap();
        assert_eq!(color, Color::new(0.93391, 0.69643, 0.69243));
    }

    #[test]
    fn groups_are_shaded_through_their_children() {
        let mut world = World::default();
        let (s1, s2) = default_ids(&world);
        let group = world.add(
            Shape::group()
                .with_transformation(Matrix::translation(0., 0., 10.))
                .unwrap(),
        );
        world.shapes_mut().add_child(group, s1).unwrap();
        world.shapes_mut().add_child(group, s2).unwrap();
        world.set_light(PointLight::new(Tuple::point(-10., 10., 0.), Color::WHITE));

        // same geometry as the default world, seen from 10 units further back
        let ray = Ray::new(Tuple::point(0., 0., 5.), Tuple::vector(0., 0., 1.));
        let color = world.color_at(&ray, DEFAULT_DEPTH).unwrap();
        assert_eq!(color, Color::new(0.38066, 0.47583, 0.2855));
    }
}
