use crate::matrix::Matrix4x4;
use crate::vertex::Vertex;

pub trait Transform<T> {
    fn transform(&mut self, transformation: &Matrix4x4<T>);
}

impl Transform<f64> for Vertex {
    ///
    /// Positions move, colors ride along untouched.
    fn transform(&mut self, transformation: &Matrix4x4<f64>) {
        self.position = transformation.transform_point(self.position);
    }
}

#[test]
fn vertex_transform_leaves_color_alone() {
    use crate::color::Color;
    use crate::vec3::Vec3;

    let mut vertex = Vertex::new(Vec3::new(1.0, 0.0, 0.0), Color::new(1.0, 1.0, 0.0));
    vertex.transform(&Matrix4x4::translation(Vec3::new(0.0, 2.0, 0.0)));

    assert_eq!(Vec3::new(1.0, 2.0, 0.0), vertex.position);
    assert_eq!(Color::new(1.0, 1.0, 0.0), vertex.color);
}
