use std::f64::consts::PI;

use crate::color::Color;
use crate::geometry::{Geometry, Triangle};
use crate::vec3::Vec3;
use crate::vertex::Vertex;

///
/// Latitude/longitude sphere, uniformly colored. The planet demos tint and
/// scale instances of it per model.
pub struct Sphere {
    resolution: usize,
    radius: f64,
    color: Color,
}

impl Sphere {
    pub fn new(resolution: usize, radius: f64, color: Color) -> Self {
        Self {
            resolution,
            radius,
            color,
        }
    }

    fn grid(&self) -> Vec<Vertex> {
        let n = self.resolution;
        let mut grid = Vec::with_capacity(n * n);

        for i in 0..n {
            let phi = i as f64 / (n - 1) as f64 * PI;

            for j in 0..n {
                let theta = j as f64 / (n - 1) as f64 * 2.0 * PI;

                let position = Vec3::new(
                    self.radius * phi.sin() * theta.cos(),
                    self.radius * phi.cos(),
                    self.radius * phi.sin() * theta.sin(),
                );

                grid.push(Vertex::new(position, self.color));
            }
        }

        grid
    }
}

impl Geometry for Sphere {
    ///
    /// Strip-ordered grid walk, flattened into two triangles per quad.
    fn triangles(&self) -> Vec<Triangle> {
        let n = self.resolution;
        let grid = self.grid();
        let at = |i: usize, j: usize| grid[i * n + j];

        let mut triangles = Vec::with_capacity(2 * (n - 1) * (n - 1));

        for i in 0..n - 1 {
            for j in 0..n - 1 {
                let a = at(i, j);
                let b = at(i + 1, j);
                let c = at(i, j + 1);
                let d = at(i + 1, j + 1);

                triangles.push(Triangle::new(a, b, c));
                triangles.push(Triangle::new(c, b, d));
            }
        }

        triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn strip_decomposition_counts() {
        let sphere = Sphere::new(20, 1.0, Color::new(1.0, 1.0, 0.0));

        assert_eq!(2 * 19 * 19, sphere.triangles().len());
    }

    #[test]
    fn every_vertex_sits_on_the_radius() {
        let sphere = Sphere::new(12, 2.5, Color::new(0.2, 0.5, 1.0));

        for vertex in sphere.grid() {
            assert_relative_eq!(2.5, vertex.position.len(), epsilon = 1.0e-12);
        }
    }

    #[test]
    fn color_is_uniform_across_the_surface() {
        let color = Color::new(1.0, 0.3, 0.2);
        let sphere = Sphere::new(8, 1.0, color);

        for triangle in sphere.triangles() {
            for corner in &triangle.corners {
                assert_eq!(color, corner.color);
            }
        }
    }
}
