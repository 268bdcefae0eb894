use crate::fractal::Subdivide;
use crate::geometry::Triangle;
use crate::vertex::Vertex;

///
/// Square pyramid: an apex over a four-vertex base ring b1..b4.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pyramid {
    pub apex: Vertex,
    pub base: [Vertex; 4],
}

impl Pyramid {
    pub fn new(apex: Vertex, base: [Vertex; 4]) -> Self {
        Self { apex, base }
    }
}

impl Subdivide for Pyramid {
    ///
    /// Mixed scheme: apex-edge midpoints, base-edge midpoints, and a base
    /// center taken as the mean of all four base corners (not a true edge
    /// midpoint - the asymmetry is part of the shape).
    fn split(&self) -> Vec<Self> {
        let a = self.apex;
        let [b1, b2, b3, b4] = self.base;

        let ma1 = Vertex::midpoint(&a, &b1);
        let ma2 = Vertex::midpoint(&a, &b2);
        let ma3 = Vertex::midpoint(&a, &b3);
        let ma4 = Vertex::midpoint(&a, &b4);

        let mb12 = Vertex::midpoint(&b1, &b2);
        let mb23 = Vertex::midpoint(&b2, &b3);
        let mb34 = Vertex::midpoint(&b3, &b4);
        let mb41 = Vertex::midpoint(&b4, &b1);

        let mbc = Vertex::center(&self.base);

        // Top pyramid first, then the four base corners.
        vec![
            Pyramid::new(a, [ma1, ma2, ma3, ma4]),
            Pyramid::new(ma1, [b1, mb12, mbc, mb41]),
            Pyramid::new(ma2, [mb12, b2, mb23, mbc]),
            Pyramid::new(ma3, [mbc, mb23, b3, mb34]),
            Pyramid::new(ma4, [mb41, mbc, mb34, b4]),
        ]
    }

    fn faces(&self) -> Vec<Triangle> {
        let a = self.apex;
        let [b1, b2, b3, b4] = self.base;

        // Four side faces, then the base quad split along its b1-b3
        // diagonal.
        vec![
            Triangle::new(a, b1, b2),
            Triangle::new(a, b2, b3),
            Triangle::new(a, b3, b4),
            Triangle::new(a, b4, b1),
            Triangle::new(b1, b3, b2),
            Triangle::new(b1, b4, b3),
        ]
    }
}
