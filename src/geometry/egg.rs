use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::Color;
use crate::geometry::{Geometry, Triangle};
use crate::vec3::Vec3;
use crate::vertex::Vertex;

///
/// The egg of revolution: a fifth-degree profile polynomial swept over half
/// a turn, the negative lobe of the profile covering the other half. Each
/// grid vertex gets a color drawn from a seeded generator, so renders are
/// reproducible.
pub struct Egg {
    resolution: usize,
    seed: u64,
}

impl Egg {
    pub fn new(resolution: usize, seed: u64) -> Self {
        Self { resolution, seed }
    }

    fn grid(&self) -> Vec<Vertex> {
        let n = self.resolution;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut grid = Vec::with_capacity(n * n);

        for i in 0..n {
            let u = i as f64 / (n - 1) as f64;

            let profile = ((((-90.0 * u + 225.0) * u - 270.0) * u + 180.0) * u - 45.0) * u;
            let height = (((160.0 * u - 320.0) * u + 160.0) * u) * u - 5.0;

            for j in 0..n {
                let v = j as f64 / (n - 1) as f64;

                let position = Vec3::new(
                    profile * (PI * v).cos(),
                    height,
                    profile * (PI * v).sin(),
                );
                let color = Color::new(rng.gen(), rng.gen(), rng.gen());

                grid.push(Vertex::new(position, color));
            }
        }

        grid
    }
}

impl Geometry for Egg {
    fn triangles(&self) -> Vec<Triangle> {
        let n = self.resolution;
        let grid = self.grid();
        let at = |i: usize, j: usize| grid[i * n + j];

        let mut triangles = Vec::with_capacity(2 * (n - 1) * (n - 1));

        for i in 0..n - 1 {
            for j in 0..n - 1 {
                let v1 = at(i, j);
                let v2 = at(i + 1, j);
                let v3 = at(i, j + 1);
                let v4 = at(i + 1, j + 1);

                triangles.push(Triangle::new(v1, v2, v3));
                triangles.push(Triangle::new(v2, v4, v3));
            }
        }

        triangles
    }
}
