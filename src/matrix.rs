use std::ops::Mul;

use crate::vec3::Vec3;

///
/// Index notation is: i, j - row, column.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Matrix4x4<T>([[T; 4]; 4]);

impl<T: Copy> Matrix4x4<T> {
    pub fn new(v: [[T; 4]; 4]) -> Self {
        Matrix4x4(v)
    }
}

impl Matrix4x4<f64> {
    pub fn identity() -> Self {
        Matrix4x4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_x(angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();

        Matrix4x4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, cos, -sin, 0.0],
            [0.0, sin, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();

        Matrix4x4::new([
            [cos, 0.0, sin, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-sin, 0.0, cos, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(angle: f64) -> Self {
        let (sin, cos) = angle.to_radians().sin_cos();

        Matrix4x4::new([
            [cos, -sin, 0.0, 0.0],
            [sin, cos, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    ///
    /// The demo camera: equal rotations about x, y and z in turn, the angle
    /// in degrees.
    pub fn spin(angle: f64) -> Self {
        Matrix4x4::rotation_x(angle) * Matrix4x4::rotation_y(angle) * Matrix4x4::rotation_z(angle)
    }

    pub fn translation(offset: Vec3<f64>) -> Self {
        Matrix4x4::new([
            [1.0, 0.0, 0.0, offset.x],
            [0.0, 1.0, 0.0, offset.y],
            [0.0, 0.0, 1.0, offset.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scaling(factor: f64) -> Self {
        Matrix4x4::new([
            [factor, 0.0, 0.0, 0.0],
            [0.0, factor, 0.0, 0.0],
            [0.0, 0.0, factor, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    ///
    /// Orthographic projection onto [-1, 1]^3, the glOrtho convention: the
    /// near plane sits at z = -n and maps to -1, the far plane at z = -f
    /// maps to +1.
    pub fn orthographic(l: f64, r: f64, b: f64, t: f64, n: f64, f: f64) -> Self {
        Matrix4x4::new([
            [2.0 / (r - l), 0.0, 0.0, -(r + l) / (r - l)],
            [0.0, 2.0 / (t - b), 0.0, -(t + b) / (t - b)],
            [0.0, 0.0, -2.0 / (f - n), -(f + n) / (f - n)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    ///
    /// Affine application; the projective row is never used by the demos.
    pub fn transform_point(&self, p: Vec3<f64>) -> Vec3<f64> {
        let m = &self.0;

        Vec3 {
            x: m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
            y: m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
            z: m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
        }
    }
}

impl Mul<Matrix4x4<f64>> for Matrix4x4<f64> {
    type Output = Matrix4x4<f64>;

    fn mul(self, o: Matrix4x4<f64>) -> Self::Output {
        let mut out = Matrix4x4::<f64>::default();

        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    out.0[i][j] += self.0[i][k] * o.0[k][j];
                }
            }
        }

        out
    }
}

#[test]
fn translation_moves_point() {
    let matrix = Matrix4x4::translation(Vec3::new(10.0, 0.0, 0.0));
    let p = Vec3::new(10.0, 10.0, 10.0);

    assert_eq!(Vec3::new(20.0, 10.0, 10.0), matrix.transform_point(p));
}

#[test]
fn identity_multiplication() {
    let i = Matrix4x4::identity();

    assert_eq!(i, i * i);
}

#[test]
fn orthographic_maps_volume_corners() {
    use approx::assert_relative_eq;

    let m = Matrix4x4::orthographic(-10.0, 10.0, -10.0, 10.0, -15.0, 15.0);

    let near = m.transform_point(Vec3::new(10.0, 10.0, 15.0));
    assert_relative_eq!(near.x, 1.0, epsilon = 1.0e-12);
    assert_relative_eq!(near.y, 1.0, epsilon = 1.0e-12);
    assert_relative_eq!(near.z, -1.0, epsilon = 1.0e-12);

    let far = m.transform_point(Vec3::new(-10.0, -10.0, -15.0));
    assert_relative_eq!(far.x, -1.0, epsilon = 1.0e-12);
    assert_relative_eq!(far.y, -1.0, epsilon = 1.0e-12);
    assert_relative_eq!(far.z, 1.0, epsilon = 1.0e-12);
}

#[test]
fn rotation_preserves_length() {
    use approx::assert_relative_eq;

    let p = Vec3::new(1.0, 2.0, 3.0);
    let rotated = Matrix4x4::spin(33.0).transform_point(p);

    assert_relative_eq!(p.len(), rotated.len(), epsilon = 1.0e-12);
}

#[test]
fn full_turn_is_identity() {
    use approx::assert_relative_eq;

    let p = Vec3::new(1.0, 2.0, 3.0);
    let rotated = Matrix4x4::spin(360.0).transform_point(p);

    assert_relative_eq!(p.x, rotated.x, epsilon = 1.0e-9);
    assert_relative_eq!(p.y, rotated.y, epsilon = 1.0e-9);
    assert_relative_eq!(p.z, rotated.z, epsilon = 1.0e-9);
}
