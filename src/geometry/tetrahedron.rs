use crate::fractal::Subdivide;
use crate::geometry::Triangle;
use crate::vertex::Vertex;

///
/// Ordered as [apex, v1, v2, v3]; the last three span the base.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tetrahedron {
    pub vertices: [Vertex; 4],
}

impl Tetrahedron {
    pub fn new(vertices: [Vertex; 4]) -> Self {
        Self { vertices }
    }
}

impl Subdivide for Tetrahedron {
    fn split(&self) -> Vec<Self> {
        let [v0, v1, v2, v3] = self.vertices;

        let m01 = Vertex::midpoint(&v0, &v1);
        let m02 = Vertex::midpoint(&v0, &v2);
        let m03 = Vertex::midpoint(&v0, &v3);
        let m12 = Vertex::midpoint(&v1, &v2);
        let m13 = Vertex::midpoint(&v1, &v3);
        let m23 = Vertex::midpoint(&v2, &v3);

        // One child per original vertex; the central octahedral void is
        // left out on purpose - that gap is the self-similarity.
        vec![
            Tetrahedron::new([v0, m01, m02, m03]),
            Tetrahedron::new([m01, v1, m12, m13]),
            Tetrahedron::new([m02, m12, v2, m23]),
            Tetrahedron::new([m03, m13, m23, v3]),
        ]
    }

    fn faces(&self) -> Vec<Triangle> {
        let [v0, v1, v2, v3] = self.vertices;

        vec![
            Triangle::new(v0, v1, v2),
            Triangle::new(v0, v2, v3),
            Triangle::new(v0, v3, v1),
            Triangle::new(v1, v3, v2),
        ]
    }
}
