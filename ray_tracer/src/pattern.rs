use std::{any::Any, fmt::Debug};

use crate::{color::Color, Matrix, Result, Tuple};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternType {
    Solid,
    Stripe,
    Gradient,
    Ring,
    Checker,
    Test,
}

/// A color as a function of a point in pattern space.
///
/// Materials hold patterns behind an `Arc`, so one pattern can be shared by
/// many shapes and sampled from every render thread at once.
pub trait Pattern: Debug + Send + Sync {
    fn pattern_type(&self) -> PatternType;

    fn transformation(&self) -> Matrix;

    fn inverse(&self) -> Matrix;

    fn as_any(&self) -> &dyn Any;

    /// Value equality against another pattern of any kind.
    fn eq_pattern(&self, other: &dyn Pattern) -> bool;

    /// The color at a point that is already in pattern space.
    fn pattern_at(&self, pattern_point: Tuple) -> Color;

    /// The color at a point in the owning shape's object space.
    fn pattern_at_object(&self, object_point: Tuple) -> Color {
        self.pattern_at(self.inverse() * object_point)
    }
}

impl PartialEq for dyn Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.eq_pattern(other)
    }
}

/// A pattern's transformation together with its inverse, computed once.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PatternTransform {
    transformation: Matrix,
    inverse: Matrix,
}

impl Default for PatternTransform {
    fn default() -> Self {
        Self {
            transformation: Matrix::identity(),
            inverse: Matrix::identity(),
        }
    }
}

impl PatternTransform {
    fn new(transformation: Matrix) -> Result<Self> {
        Ok(Self {
            transformation,
            inverse: transformation.inverse()?,
        })
    }
}

/// Implements the transformation plumbing shared by every pattern.
macro_rules! transformable_pattern {
    ($pattern:ty, $pattern_type:expr) => {
        impl $pattern {
            pub fn with_transformation(mut self, transformation: Matrix) -> Result<Self> {
                self.transform = PatternTransform::new(transformation)?;
                Ok(self)
            }
        }

        impl Pattern for $pattern {
            fn pattern_type(&self) -> PatternType {
                $pattern_type
            }

            fn transformation(&self) -> Matrix {
                self.transform.transformation
            }

            fn inverse(&self) -> Matrix {
                self.transform.inverse
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn eq_pattern(&self, other: &dyn Pattern) -> bool {
                other
                    .as_any()
                    .downcast_ref::<Self>()
                    .is_some_and(|other| self == other)
            }

            fn pattern_at(&self, pattern_point: Tuple) -> Color {
                self.color_at(pattern_point)
            }
        }
    };
}

/// The same color everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidPattern {
    color: Color,
    transform: PatternTransform,
}

impl SolidPattern {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            transform: PatternTransform::default(),
        }
    }

    fn color_at(&self, _point: Tuple) -> Color {
        self.color
    }
}

transformable_pattern!(SolidPattern, PatternType::Solid);

/// Alternates between two colors every unit along x.
#[derive(Debug, Clone, PartialEq)]
pub struct StripePattern {
    a: Color,
    b: Color,
    transform: PatternTransform,
}

impl StripePattern {
    pub fn new(a: Color, b: Color) -> Self {
        Self {
            a,
            b,
            transform: PatternTransform::default(),
        }
    }

    fn color_at(&self, point: Tuple) -> Color {
        if point.x.floor().rem_euclid(2.) == 0. {
            self.a
        } else {
            self.b
        }
    }
}

impl Default for StripePattern {
    fn default() -> Self {
        Self::new(Color::WHITE, Color::BLACK)
    }
}

transformable_pattern!(StripePattern, PatternType::Stripe);

/// Blends linearly from `a` to `b` across each unit of x.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientPattern {
    a: Color,
    b: Color,
    transform: PatternTransform,
}

impl GradientPattern {
    pub fn new(a: Color, b: Color) -> Self {
        Self {
            a,
            b,
            transform: PatternTransform::default(),
        }
    }

    fn color_at(&self, point: Tuple) -> Color {
        let fraction = point.x - point.x.floor();
        self.a + (self.b - self.a) * fraction
    }
}

transformable_pattern!(GradientPattern, PatternType::Gradient);

/// Concentric rings around the y axis.
#[derive(Debug, Clone, PartialEq)]
pub struct RingPattern {
    a: Color,
    b: Color,
    transform: PatternTransform,
}

impl RingPattern {
    pub fn new(a: Color, b: Color) -> Self {
        Self {
            a,
            b,
            transform: PatternTransform::default(),
        }
    }

    fn color_at(&self, point: Tuple) -> Color {
        let distance = (point.x.powi(2) + point.z.powi(2)).sqrt();
        if distance.floor().rem_euclid(2.) == 0. {
            self.a
        } else {
            self.b
        }
    }
}

transformable_pattern!(RingPattern, PatternType::Ring);

/// Three dimensional checkers of unit size.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerPattern {
    a: Color,
    b: Color,
    transform: PatternTransform,
}

impl CheckerPattern {
    pub fn new(a: Color, b: Color) -> Self {
        Self {
            a,
            b,
            transform: PatternTransform::default(),
        }
    }

    fn color_at(&self, point: Tuple) -> Color {
        let sum = point.x.floor() + point.y.floor() + point.z.floor();
        if sum.rem_euclid(2.) == 0. {
            self.a
        } else {
            self.b
        }
    }
}

transformable_pattern!(CheckerPattern, PatternType::Checker);

/// Returns the pattern-space point itself as a color; handy for checking transforms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestPattern {
    transform: PatternTransform,
}

impl TestPattern {
    pub fn new() -> Self {
        Self::default()
    }

    fn color_at(&self, point: Tuple) -> Color {
        Color::new(point.x, point.y, point.z)
    }
}

transformable_pattern!(TestPattern, PatternType::Test);
