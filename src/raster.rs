//! CPU rasterizer: orthographic projection, depth-buffered triangle fill
//! with per-corner color interpolation, and depth-tested line segments for
//! the axes and orbit traces. Pixel rows are independent, so they are
//! filled in parallel.

use image::{ImageBuffer, Rgb};
use rayon::prelude::*;

use crate::color::Color;
use crate::geometry::Triangle;
use crate::matrix::Matrix4x4;
use crate::transform::Transform;
use crate::vec3::Vec3;
use crate::vertex::Vertex;

///
/// Line segment between two colored endpoints.
#[derive(Copy, Clone, Debug)]
pub struct Line {
    pub a: Vertex,
    pub b: Vertex,
}

impl Line {
    #[inline]
    pub fn new(a: Vertex, b: Vertex) -> Self {
        Self { a, b }
    }
}

impl Transform<f64> for Line {
    fn transform(&mut self, transformation: &Matrix4x4<f64>) {
        self.a.transform(transformation);
        self.b.transform(transformation);
    }
}

///
/// The demos' fixed orthographic view volume: a half-extent across the
/// smaller image axis, widened along the other to keep the aspect ratio,
/// with z clipped to -depth..depth.
#[derive(Copy, Clone, Debug, Deserialize)]
pub struct Viewport {
    pub half_extent: f64,
    pub depth: f64,
}

impl Viewport {
    pub fn projection(&self, width: u32, height: u32) -> Matrix4x4<f64> {
        let aspect = width as f64 / height as f64;
        let h = self.half_extent;
        let d = self.depth;

        if width <= height {
            Matrix4x4::orthographic(-h, h, -h / aspect, h / aspect, -d, d)
        } else {
            Matrix4x4::orthographic(-h * aspect, h * aspect, -h, h, -d, d)
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct ScreenVertex {
    x: f64,
    y: f64,
    z: f64,
    color: Color,
}

fn to_screen(position: Vec3<f64>, projection: &Matrix4x4<f64>, width: u32, height: u32) -> Vec3<f64> {
    let ndc = projection.transform_point(position);

    Vec3::new(
        (ndc.x + 1.0) * 0.5 * width as f64,
        (1.0 - ndc.y) * 0.5 * height as f64,
        ndc.z,
    )
}

///
/// Doubled signed area of (a, b, p); the building block of barycentric
/// coverage.
#[inline]
fn edge(a: &ScreenVertex, b: &ScreenVertex, px: f64, py: f64) -> f64 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

struct ScreenTriangle {
    corners: [ScreenVertex; 3],
    area: f64,
    min_x: usize,
    max_x: usize,
    min_y: usize,
    max_y: usize,
}

impl ScreenTriangle {
    fn project(
        triangle: &Triangle,
        projection: &Matrix4x4<f64>,
        width: u32,
        height: u32,
    ) -> Option<ScreenTriangle> {
        let corner = |v: &Vertex| {
            let s = to_screen(v.position, projection, width, height);
            ScreenVertex {
                x: s.x,
                y: s.y,
                z: s.z,
                color: v.color,
            }
        };

        let corners = [
            corner(&triangle.corners[0]),
            corner(&triangle.corners[1]),
            corner(&triangle.corners[2]),
        ];

        // Degenerate triangles (the grid poles collapse to points) draw
        // nothing.
        let area = edge(&corners[0], &corners[1], corners[2].x, corners[2].y);
        if area.abs() < 1.0e-12 {
            return None;
        }

        let min = |f: fn(&ScreenVertex) -> f64| f(&corners[0]).min(f(&corners[1])).min(f(&corners[2]));
        let max = |f: fn(&ScreenVertex) -> f64| f(&corners[0]).max(f(&corners[1])).max(f(&corners[2]));

        let (min_x, max_x) = (min(|c| c.x), max(|c| c.x));
        let (min_y, max_y) = (min(|c| c.y), max(|c| c.y));
        let (min_z, max_z) = (min(|c| c.z), max(|c| c.z));

        // Entirely outside the view volume.
        if max_x < 0.0 || min_x > width as f64 || max_y < 0.0 || min_y > height as f64 {
            return None;
        }
        if max_z < -1.0 || min_z > 1.0 {
            return None;
        }

        Some(ScreenTriangle {
            corners,
            area,
            min_x: min_x.floor().max(0.0) as usize,
            max_x: max_x.ceil().min((width - 1) as f64) as usize,
            min_y: min_y.floor().max(0.0) as usize,
            max_y: max_y.ceil().min((height - 1) as f64) as usize,
        })
    }

    fn fill_row(&self, y: usize, colors: &mut [u8], depths: &mut [f64]) {
        if y < self.min_y || y > self.max_y {
            return;
        }

        let [a, b, c] = &self.corners;
        let py = y as f64 + 0.5;

        for x in self.min_x..=self.max_x {
            let px = x as f64 + 0.5;

            // Signed-area ratios; dividing by the signed total keeps the
            // test winding-independent, since the demos draw both sides.
            let wa = edge(b, c, px, py) / self.area;
            let wb = edge(c, a, px, py) / self.area;
            let wc = edge(a, b, px, py) / self.area;

            if wa < 0.0 || wb < 0.0 || wc < 0.0 {
                continue;
            }

            let z = wa * a.z + wb * b.z + wc * c.z;
            if z < -1.0 || z > 1.0 || z >= depths[x] {
                continue;
            }

            depths[x] = z;
            let color = a.color.scale(wa) + b.color.scale(wb) + c.color.scale(wc);
            colors[x * 3..x * 3 + 3].copy_from_slice(&color.to_rgb().0);
        }
    }
}

///
/// Line pixels grouped by row, so the row pass can stay data-parallel.
fn bucket_lines(
    lines: &[Line],
    projection: &Matrix4x4<f64>,
    width: u32,
    height: u32,
) -> Vec<Vec<(usize, f64, Rgb<u8>)>> {
    let mut rows = vec![Vec::new(); height as usize];

    for line in lines {
        let a = to_screen(line.a.position, projection, width, height);
        let b = to_screen(line.b.position, projection, width, height);

        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0);

        for step in 0..=steps as usize {
            let t = step as f64 / steps;

            let x = a.x + (b.x - a.x) * t;
            let y = a.y + (b.y - a.y) * t;
            let z = a.z + (b.z - a.z) * t;

            if x < 0.0 || x >= width as f64 || y < 0.0 || y >= height as f64 {
                continue;
            }
            if z < -1.0 || z > 1.0 {
                continue;
            }

            let color = line.a.color.scale(1.0 - t) + line.b.color.scale(t);
            rows[y as usize].push((x as usize, z, color.to_rgb()));
        }
    }

    rows
}

pub struct Framebuffer {
    width: u32,
    height: u32,
    color: ImageBuffer<Rgb<u8>, Vec<u8>>,
    depth: Vec<f64>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            color: ImageBuffer::from_pixel(width, height, background.to_rgb()),
            depth: vec![f64::INFINITY; (width * height) as usize],
        }
    }

    ///
    /// Depth-tested draw of a batch of world-space triangles and lines.
    /// The depth buffer makes the outcome independent of draw order.
    pub fn draw(&mut self, triangles: &[Triangle], lines: &[Line], projection: &Matrix4x4<f64>) {
        let screen: Vec<ScreenTriangle> = triangles
            .iter()
            .filter_map(|t| ScreenTriangle::project(t, projection, self.width, self.height))
            .collect();
        let line_rows = bucket_lines(lines, projection, self.width, self.height);

        let width = self.width as usize;
        let colors: &mut [u8] = &mut self.color;

        colors
            .par_chunks_mut(width * 3)
            .zip(self.depth.par_chunks_mut(width))
            .enumerate()
            .for_each(|(y, (colors, depths))| {
                for triangle in &screen {
                    triangle.fill_row(y, colors, depths);
                }

                for &(x, z, rgb) in &line_rows[y] {
                    if z < depths[x] {
                        depths[x] = z;
                        colors[x * 3..x * 3 + 3].copy_from_slice(&rgb.0);
                    }
                }
            });
    }

    pub fn into_image(self) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::Vec3;

    fn projection() -> Matrix4x4<f64> {
        Viewport {
            half_extent: 1.0,
            depth: 1.0,
        }
        .projection(8, 8)
    }

    fn centered_triangle(z: f64, color: Color) -> Triangle {
        let vertex = |x: f64, y: f64| Vertex::new(Vec3::new(x, y, z), color);

        Triangle::new(vertex(-0.5, -0.5), vertex(0.5, -0.5), vertex(0.0, 0.5))
    }

    #[test]
    fn fill_covers_the_center_pixel() {
        let red = Color::new(1.0, 0.0, 0.0);
        let mut fb = Framebuffer::new(8, 8, Color::new(0.0, 0.0, 0.0));

        fb.draw(&[centered_triangle(0.0, red)], &[], &projection());

        let image = fb.into_image();
        assert_eq!(Rgb([255, 0, 0]), *image.get_pixel(4, 4));
        // The image corners fall outside the triangle and keep the
        // background.
        assert_eq!(Rgb([0, 0, 0]), *image.get_pixel(0, 0));
        assert_eq!(Rgb([0, 0, 0]), *image.get_pixel(7, 0));
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let far = centered_triangle(-0.5, Color::new(1.0, 0.0, 0.0));
        let near = centered_triangle(0.5, Color::new(0.0, 1.0, 0.0));

        for batch in &[[far, near], [near, far]] {
            let mut fb = Framebuffer::new(8, 8, Color::new(0.0, 0.0, 0.0));
            fb.draw(batch, &[], &projection());

            assert_eq!(Rgb([0, 255, 0]), *fb.into_image().get_pixel(4, 4));
        }
    }

    #[test]
    fn degenerate_triangle_draws_nothing() {
        let point = Vertex::new(Vec3::new(0.0, 0.0, 0.0), Color::new(1.0, 1.0, 1.0));
        let mut fb = Framebuffer::new(8, 8, Color::new(0.0, 0.0, 0.0));

        fb.draw(&[Triangle::new(point, point, point)], &[], &projection());

        assert_eq!(Rgb([0, 0, 0]), *fb.into_image().get_pixel(4, 4));
    }

    #[test]
    fn lines_plot_depth_tested_pixels() {
        let red = Color::new(1.0, 0.0, 0.0);
        let line = Line::new(
            Vertex::new(Vec3::new(-1.0, 0.0, 0.0), red),
            Vertex::new(Vec3::new(1.0, 0.0, 0.0), red),
        );

        let mut fb = Framebuffer::new(8, 8, Color::new(0.0, 0.0, 0.0));
        fb.draw(&[], &[line], &projection());

        let image = fb.into_image();
        assert_eq!(Rgb([255, 0, 0]), *image.get_pixel(2, 4));
        assert_eq!(Rgb([0, 0, 0]), *image.get_pixel(2, 2));
    }

    #[test]
    fn occluded_line_pixels_stay_hidden() {
        let white = Color::new(1.0, 1.0, 1.0);
        // Line behind the triangle: world z -0.9 is farther from the
        // viewer than the triangle at 0.5.
        let line = Line::new(
            Vertex::new(Vec3::new(-1.0, 0.0, -0.9), white),
            Vertex::new(Vec3::new(1.0, 0.0, -0.9), white),
        );
        let near = centered_triangle(0.5, Color::new(0.0, 1.0, 0.0));

        let mut fb = Framebuffer::new(8, 8, Color::new(0.0, 0.0, 0.0));
        fb.draw(&[near], &[line], &projection());

        assert_eq!(Rgb([0, 255, 0]), *fb.into_image().get_pixel(4, 4));
    }
}
