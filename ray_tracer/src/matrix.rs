use std::ops::{Index, Mul};

use thiserror::Error;

use crate::{equal, Tuple};

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("Attempted to calculate an inverse of a non-invertible matrix")]
    NonInvertible,
}

type Result<T> = std::result::Result<T, MatrixError>;

/// A 4x4 transformation matrix.
#[derive(Clone, Copy, Debug)]
pub struct Matrix {
    data: [[f64; 4]; 4],
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        data: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn new(data: [[f64; 4]; 4]) -> Self {
        Self { data }
    }

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    pub fn transpose(&self) -> Self {
        let mut data = [[0.0; 4]; 4];
        for (i, row) in self.data.iter().enumerate() {
            for (j, item) in row.iter().enumerate() {
                data[j][i] = *item;
            }
        }
        Self { data }
    }

    pub fn determinant(&self) -> f64 {
        (0..4).map(|j| self[0][j] * self.cofactor(0, j)).sum()
    }

    /// The 3x3 matrix left after removing the given row and column.
    pub fn submatrix(&self, row_index: usize, column_index: usize) -> [[f64; 3]; 3] {
        let mut sub = [[0.0; 3]; 3];
        let rows = (0..4).filter(|&i| i != row_index);
        for (sub_row, i) in rows.enumerate() {
            let columns = (0..4).filter(|&j| j != column_index);
            for (sub_column, j) in columns.enumerate() {
                sub[sub_row][sub_column] = self[i][j];
            }
        }
        sub
    }

    pub fn minor(&self, row_index: usize, column_index: usize) -> f64 {
        determinant_3x3(&self.submatrix(row_index, column_index))
    }

    pub fn cofactor(&self, row_index: usize, column_index: usize) -> f64 {
        let minor = self.minor(row_index, column_index);
        // negate when row + column is odd
        if (row_index + column_index) % 2 == 0 {
            minor
        } else {
            -minor
        }
    }

    pub fn is_invertible(&self) -> bool {
        self.determinant() != 0.0
    }

    pub fn inverse(&self) -> Result<Self> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(MatrixError::NonInvertible);
        }

        let mut data = [[0.0; 4]; 4];
        for (row, data_row) in data.iter_mut().enumerate() {
            for (column, item) in data_row.iter_mut().enumerate() {
                // transposed on purpose
                *item = self.cofactor(column, row) / det;
            }
        }
        Ok(Self { data })
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scaling(x: f64, y: f64, z: f64) -> Self {
        Self::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_x(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cos, -sin, 0.0],
            [0.0, sin, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new([
            [cos, 0.0, sin, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-sin, 0.0, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new([
            [cos, -sin, 0.0, 0.0],
            [sin, cos, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Each component moves in proportion to the other two,
    /// e.g. `x_y` moves x in proportion to y.
    pub fn shearing(x_y: f64, x_z: f64, y_x: f64, y_z: f64, z_x: f64, z_y: f64) -> Self {
        Self::new([
            [1.0, x_y, x_z, 0.0],
            [y_x, 1.0, y_z, 0.0],
            [z_x, z_y, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    // The fluent methods below apply the new transform *after* the current one,
    // so `identity().rotate_x(a).scale(..).translate(..)` reads in application order.

    pub fn translate(self, x: f64, y: f64, z: f64) -> Self {
        Self::translation(x, y, z) * self
    }

    pub fn scale(self, x: f64, y: f64, z: f64) -> Self {
        Self::scaling(x, y, z) * self
    }

    pub fn rotate_x(self, radians: f64) -> Self {
        Self::rotation_x(radians) * self
    }

    pub fn rotate_y(self, radians: f64) -> Self {
        Self::rotation_y(radians) * self
    }

    pub fn rotate_z(self, radians: f64) -> Self {
        Self::rotation_z(radians) * self
    }

    pub fn shear(self, x_y: f64, x_z: f64, y_x: f64, y_z: f64, z_x: f64, z_y: f64) -> Self {
        Self::shearing(x_y, x_z, y_x, y_z, z_x, z_y) * self
    }
}

fn determinant_2x2(m: &[[f64; 2]; 2]) -> f64 {
    m[0][0] * m[1][1] - m[0][1] * m[1][0]
}

fn determinant_3x3(m: &[[f64; 3]; 3]) -> f64 {
    let mut det = 0.0;
    for j in 0..3 {
        let mut sub = [[0.0; 2]; 2];
        for (sub_row, row) in m.iter().skip(1).enumerate() {
            let columns = (0..3).filter(|&c| c != j);
            for (sub_column, c) in columns.enumerate() {
                sub[sub_row][sub_column] = row[c];
            }
        }
        let sign = if j % 2 == 0 { 1.0 } else { -1.0 };
        det += sign * m[0][j] * determinant_2x2(&sub);
    }
    det
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Index<usize> for Matrix {
    type Output = [f64; 4];

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.data
            .iter()
            .flatten()
            .zip(other.data.iter().flatten())
            .all(|(a, b)| equal(*a, *b))
    }
}

impl Mul<Self> for Matrix {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        let mut data = [[0.0; 4]; 4];
        for (row, data_row) in data.iter_mut().enumerate() {
            for (col, item) in data_row.iter_mut().enumerate() {
                *item = self[row][0] * other[0][col]
                    + self[row][1] * other[1][col]
                    + self[row][2] * other[2][col]
                    + self[row][3] * other[3][col];
            }
        }
        Self { data }
    }
}

impl Mul<Tuple> for Matrix {
    type Output = Tuple;

    fn mul(self, rhs: Tuple) -> Self::Output {
        let row = |i: usize| {
            self[i][0] * rhs.x + self[i][1] * rhs.y + self[i][2] * rhs.z + self[i][3] * rhs.w
        };
        Tuple::new(row(0), row(1), row(2), row(3))
    }
}
