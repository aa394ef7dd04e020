use std::sync::Arc;

use crate::{color::Color, light::Light, pattern::Pattern, Tuple};

/// Surface parameters for the Phong model plus reflection and refraction.
#[derive(Debug, Clone)]
pub struct Material {
    pub color: Color,
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
    pub reflective: f64,
    pub transparency: f64,
    pub refractive_index: f64,
    pub pattern: Option<Arc<dyn Pattern>>,
}

impl Material {
    /// A clear glass material, as used by glass spheres.
    pub fn glass() -> Self {
        Self {
            transparency: 1.0,
            refractive_index: 1.5,
            ..Default::default()
        }
    }

    pub fn with_pattern(mut self, pattern: impl Pattern + 'static) -> Self {
        self.pattern = Some(Arc::new(pattern));
        self
    }

    /// The surface color at a point in the shape's object space.
    pub fn color_at(&self, object_point: Tuple) -> Color {
        match &self.pattern {
            Some(pattern) => pattern.pattern_at_object(object_point),
            None => self.color,
        }
    }

    /// Adds together the ambient, diffuse and specular contributions.
    ///
    /// Diffuse and specular are averaged over every sample of the light and then
    /// scaled by `intensity`, the fraction of the light that reaches `point`.
    /// Ambient is never shadowed.
    pub fn lighting(
        &self,
        light: &Light,
        surface_color: Color,
        point: Tuple,
        eye_vector: Tuple,
        normal_vector: Tuple,
        intensity: f64,
    ) -> Color {
        // combine the surface color with the light's color
        let effective_color = surface_color * light.intensity();
        let ambient = effective_color * self.ambient;

        if intensity == 0. {
            return ambient;
        }

        let samples = light.samples();
        let lit: Color = samples
            .iter()
            .map(|sample| {
                let light_vector = (*sample - point).normalize();

                // a negative cosine means the light is on the other side of the surface
                let light_dot_normal = light_vector.dot(&normal_vector);
                if light_dot_normal < 0. {
                    return Color::BLACK;
                }
                let diffuse = effective_color * self.diffuse * light_dot_normal;

                // a negative cosine means the light reflects away from the eye
                let reflect_vector = (-light_vector).reflect(&normal_vector);
                let reflect_dot_eye = reflect_vector.dot(&eye_vector);
                let specular = if reflect_dot_eye <= 0. {
                    Color::BLACK
                } else {
                    let factor = reflect_dot_eye.powf(self.shininess);
                    light.intensity() * self.specular * factor
                };

                diffuse + specular
            })
            .sum();

        ambient + lit / samples.len() as f64 * intensity
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            ambient: 0.1,
            diffuse: 0.9,
            specular: 0.9,
            shininess: 200.,
            reflective: 0.,
            transparency: 0.,
            refractive_index: 1.,
            pattern: None,
        }
    }
}

impl PartialEq for Material {
    fn eq(&self, other: &Self) -> bool {
        self.color == other.color
            && self.ambient == other.ambient
            && self.diffuse == other.diffuse
            && self.specular == other.specular
            && self.shininess == other.shininess
            && self.reflective == other.reflective
            && self.transparency == other.transparency
            && self.refractive_index == other.refractive_index
            && self.pattern.as_deref() == other.pattern.as_deref()
    }
}
