use thiserror::Error;

use crate::{shape::ShapeId, MatrixError};

#[derive(Debug, Error)]
pub enum RayTracerError {
    #[error(transparent)]
    NonInvertibleMatrix(#[from] MatrixError),

    #[error("Attempted to shade a hit in a world without a light")]
    MissingLight,

    #[error("Divide threshold must be at least 1")]
    InvalidDivideThreshold,

    #[error("No shape with id {0:?} in this arena")]
    UnknownShape(ShapeId),

    #[error("Shape {0:?} is not a group")]
    NotAGroup(ShapeId),

    #[error("Adding {child:?} to {group:?} would make a group contain itself")]
    CyclicGroup { group: ShapeId, child: ShapeId },

    #[error("Shape {child:?} is not a child of {group:?}")]
    NotAChild { group: ShapeId, child: ShapeId },
}
