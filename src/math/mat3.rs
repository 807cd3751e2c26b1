use crate::math::Point;

/// Column-major 3x3 matrix for 2D homogeneous transforms.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    pub data: [[f32; 3]; 3],
}

impl Mat3 {
    pub fn identity() -> Self {
        Self {
            data: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub fn zero() -> Self {
        Self { data: [[0.0; 3]; 3] }
    }

    pub fn from_translation(x: f32, y: f32) -> Self {
        Self {
            data: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [x, y, 1.0]],
        }
    }

    pub fn from_scale(x: f32, y: f32) -> Self {
        Self {
            data: [[x, 0.0, 0.0], [0.0, y, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub fn transform_point(&self, point: Point) -> Point {
        let x = self.data[0][0] * point.x + self.data[1][0] * point.y + self.data[2][0];
        let y = self.data[0][1] * point.x + self.data[1][1] * point.y + self.data[2][1];
        let w = self.data[0][2] * point.x + self.data[1][2] * point.y + self.data[2][2];

        if w != 0.0 {
            Point::new(x / w, y / w)
        } else {
            Point::new(x, y)
        }
    }

    /// Columns padded to 16 bytes, the layout WGSL expects for `mat3x3<f32>`.
    pub fn to_padded_columns(&self) -> [[f32; 4]; 3] {
        let c = &self.data;
        [
            [c[0][0], c[0][1], c[0][2], 0.0],
            [c[1][0], c[1][1], c[1][2], 0.0],
            [c[2][0], c[2][1], c[2][2], 0.0],
        ]
    }
}

impl std::ops::Mul for Mat3 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        let mut result = Self::zero();

        for i in 0..3 {
            for j in 0..3 {
                for k in 0..3 {
                    result.data[i][j] += self.data[k][j] * other.data[i][k];
                }
            }
        }

        result
    }
}
