use crate::color::Color;
use crate::vec3::Vec3;

///
/// A point in space together with the color it carries. Immutable once
/// computed; subdivision only ever derives fresh vertices from old ones.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec3<f64>,
    pub color: Color,
}

impl Vertex {
    #[inline]
    pub fn new(position: Vec3<f64>, color: Color) -> Self {
        Self { position, color }
    }

    ///
    /// Edge midpoint. Position and color are averaged with the same weights.
    #[inline]
    pub fn midpoint(a: &Vertex, b: &Vertex) -> Vertex {
        Vertex {
            position: Vec3::midpoint(&a.position, &b.position),
            color: Color::midpoint(&a.color, &b.color),
        }
    }

    ///
    /// Mean of all four corners of a quad, position and color alike.
    pub fn center(quad: &[Vertex; 4]) -> Vertex {
        let position = (quad[0].position + quad[1].position)
            + (quad[2].position + quad[3].position);
        let color = (quad[0].color + quad[1].color) + (quad[2].color + quad[3].color);

        Vertex {
            position: position.scale(0.25),
            color: color.scale(0.25),
        }
    }
}

#[test]
fn midpoint_interpolates_position_and_color() {
    let a = Vertex::new(Vec3::new(0.0, 6.0, 0.0), Color::new(1.0, 0.0, 0.0));
    let b = Vertex::new(Vec3::new(6.0, -4.0, 6.0), Color::new(0.0, 0.0, 1.0));

    let m = Vertex::midpoint(&a, &b);

    assert_eq!(Vec3::new(3.0, 1.0, 3.0), m.position);
    assert_eq!(Color::new(0.5, 0.0, 0.5), m.color);
}

#[test]
fn center_averages_four_corners() {
    let corner = |x: f64, z: f64, c: Color| Vertex::new(Vec3::new(x, -6.0, z), c);
    let base = [
        corner(-6.0, 6.0, Color::new(1.0, 0.0, 0.0)),
        corner(6.0, 6.0, Color::new(0.0, 1.0, 0.0)),
        corner(6.0, -6.0, Color::new(0.0, 0.0, 1.0)),
        corner(-6.0, -6.0, Color::new(1.0, 1.0, 0.0)),
    ];

    let c = Vertex::center(&base);

    assert_eq!(Vec3::new(0.0, -6.0, 0.0), c.position);
    assert_eq!(Color::new(0.5, 0.5, 0.25), c.color);
}
