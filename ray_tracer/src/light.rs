use crate::{world::World, Color, Tuple};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Tuple,
    pub intensity: Color,
}

impl PointLight {
    pub fn new(position: Tuple, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Tuple::point(0., 0., 0.), Color::WHITE)
    }
}

/// A rectangular light divided into `usteps * vsteps` cells, sampled at each cell's center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaLight {
    corner: Tuple,
    uvec: Tuple,
    usteps: usize,
    vvec: Tuple,
    vsteps: usize,
    intensity: Color,
    position: Tuple,
}

impl AreaLight {
    /// `full_uvec` and `full_vvec` span the whole rectangle; a step count of zero is treated as one.
    pub fn new(
        corner: Tuple,
        full_uvec: Tuple,
        usteps: usize,
        full_vvec: Tuple,
        vsteps: usize,
        intensity: Color,
    ) -> Self {
        let usteps = usteps.max(1);
        let vsteps = vsteps.max(1);
        Self {
            corner,
            uvec: full_uvec / usteps as f64,
            usteps,
            vvec: full_vvec / vsteps as f64,
            vsteps,
            intensity,
            position: corner + full_uvec / 2. + full_vvec / 2.,
        }
    }

    pub fn corner(&self) -> Tuple {
        self.corner
    }

    /// One cell's edge along u.
    pub fn uvec(&self) -> Tuple {
        self.uvec
    }

    pub fn usteps(&self) -> usize {
        self.usteps
    }

    /// One cell's edge along v.
    pub fn vvec(&self) -> Tuple {
        self.vvec
    }

    pub fn vsteps(&self) -> usize {
        self.vsteps
    }

    pub fn intensity(&self) -> Color {
        self.intensity
    }

    /// The center of the rectangle.
    pub fn position(&self) -> Tuple {
        self.position
    }

    /// The center of cell (u, v).
    pub fn point_on(&self, u: usize, v: usize) -> Tuple {
        self.corner + self.uvec * (u as f64 + 0.5) + self.vvec * (v as f64 + 0.5)
    }

    pub fn samples(&self) -> Vec<Tuple> {
        (0..self.vsteps)
            .flat_map(|v| (0..self.usteps).map(move |u| self.point_on(u, v)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Point(PointLight),
    Area(AreaLight),
}

impl Light {
    pub fn position(&self) -> Tuple {
        match self {
            Light::Point(light) => light.position,
            Light::Area(light) => light.position,
        }
    }

    pub fn intensity(&self) -> Color {
        match self {
            Light::Point(light) => light.intensity,
            Light::Area(light) => light.intensity,
        }
    }

    /// The positions lighting is averaged over.
    pub fn samples(&self) -> Vec<Tuple> {
        match self {
            Light::Point(light) => vec![light.position],
            Light::Area(light) => light.samples(),
        }
    }

    /// The fraction of this light that reaches `point`, between 0 and 1.
    pub fn intensity_at(&self, point: Tuple, world: &World) -> f64 {
        let samples = self.samples();
        let lit = samples
            .iter()
            .filter(|sample| !world.is_shadowed(**sample, point))
            .count();
        lit as f64 / samples.len() as f64
    }
}

impl From<PointLight> for Light {
    fn from(light: PointLight) -> Self {
        Light::Point(light)
    }
}

impl From<AreaLight> for Light {
    fn from(light: AreaLight) -> Self {
        Light::Area(light)
    }
}
