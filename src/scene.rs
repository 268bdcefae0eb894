//! Scene configuration and the one-time geometry build step.
//!
//! A scene file picks one of the demos and its parameters. Loading
//! validates the knobs that could blow up (recursion depth, degenerate
//! grids), `build` tessellates everything exactly once, and `render` only
//! ever applies per-frame transforms to the prebuilt set.

use std::fs;
use std::path::Path;

use image::{ImageBuffer, Rgb};
use thiserror::Error;

use crate::color::Color;
use crate::fractal::MAX_LEVEL;
use crate::geometry::{Egg, Geometry, Pyramid, Sierpinski, Sphere, Tetrahedron, Triangle};
use crate::matrix::Matrix4x4;
use crate::orbit::Orbit;
use crate::raster::{Framebuffer, Line, Viewport};
use crate::transform::Transform;
use crate::vec3::Vec3;
use crate::vertex::Vertex;

const ORBIT_SEGMENTS: usize = 100;
const ORBIT_COLOR: Color = Color {
    r: 0.5,
    g: 0.5,
    b: 0.5,
};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file")]
    Io(#[from] std::io::Error),
    #[error("malformed scene file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("recursion level {level} exceeds the supported maximum {max}")]
    LevelTooDeep { level: u32, max: u32 },
    #[error("grid resolution must be at least 2, got {0}")]
    ResolutionTooSmall(usize),
    #[error("orbit axes must satisfy 0 < semi-minor <= semi-major, got {semi_major} and {semi_minor}")]
    InvalidOrbit { semi_major: f64, semi_minor: f64 },
    #[error("image dimensions must be nonzero")]
    EmptyImage,
}

#[derive(Debug, Deserialize)]
struct SceneFile {
    scene: Scene,
}

#[derive(Debug, Deserialize)]
pub struct Scene {
    width: u32,
    height: u32,
    #[serde(default)]
    background: [f64; 3],
    viewport: Viewport,
    ///
    /// Camera spin in degrees per second; every demo tumbles the whole
    /// scene around all three axes at once.
    #[serde(default)]
    spin_rate: f64,
    #[serde(default)]
    axes: Option<Axes>,
    models: Vec<Model>,
}

#[derive(Debug, Deserialize)]
struct Axes {
    length: f64,
}

#[derive(Debug, Deserialize)]
struct Model {
    geometry: GeometryKind,
    #[serde(default = "default_scale")]
    scale: f64,
    ///
    /// Own-axis spin in degrees per second, on top of any orbit.
    #[serde(default)]
    spin_rate: f64,
    #[serde(default)]
    orbit: Option<Orbit>,
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum GeometryKind {
    SierpinskiTetrahedron {
        level: u32,
        vertices: [[f64; 3]; 4],
        colors: [[f64; 3]; 4],
    },
    SierpinskiPyramid {
        level: u32,
        apex: [f64; 3],
        apex_color: [f64; 3],
        base: [[f64; 3]; 4],
        base_colors: [[f64; 3]; 4],
    },
    Egg {
        resolution: usize,
        #[serde(default)]
        seed: u64,
    },
    Sphere {
        resolution: usize,
        radius: f64,
        color: [f64; 3],
    },
}

///
/// One tessellated model and the motion it performs over time.
pub struct BuiltModel {
    pub triangles: Vec<Triangle>,
    scale: f64,
    spin_rate: f64,
    orbit: Option<Orbit>,
}

impl BuiltModel {
    ///
    /// Scale, spin about the own axis, then translate along the orbit.
    fn placement(&self, time: f64) -> Matrix4x4<f64> {
        let translation = match &self.orbit {
            Some(orbit) => Matrix4x4::translation(orbit.position(time)),
            None => Matrix4x4::identity(),
        };

        translation * Matrix4x4::rotation_y(self.spin_rate * time) * Matrix4x4::scaling(self.scale)
    }
}

///
/// Everything derived once at startup: triangles per model plus the static
/// line work (axes, orbit traces). Frames only transform copies of it.
pub struct RenderSet {
    pub models: Vec<BuiltModel>,
    pub lines: Vec<Line>,
}

impl Scene {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Scene, SceneError> {
        Scene::from_json(&fs::read_to_string(path)?)
    }

    pub fn from_json(json: &str) -> Result<Scene, SceneError> {
        let SceneFile { scene } = serde_json::from_str(json)?;

        scene.validate()?;
        Ok(scene)
    }

    fn validate(&self) -> Result<(), SceneError> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::EmptyImage);
        }

        for model in &self.models {
            match &model.geometry {
                GeometryKind::SierpinskiTetrahedron { level, .. }
                | GeometryKind::SierpinskiPyramid { level, .. } => {
                    if *level > MAX_LEVEL {
                        return Err(SceneError::LevelTooDeep {
                            level: *level,
                            max: MAX_LEVEL,
                        });
                    }
                }
                GeometryKind::Egg { resolution, .. } | GeometryKind::Sphere { resolution, .. } => {
                    if *resolution < 2 {
                        return Err(SceneError::ResolutionTooSmall(*resolution));
                    }
                }
            }

            if let Some(orbit) = &model.orbit {
                if orbit.semi_minor <= 0.0 || orbit.semi_minor > orbit.semi_major {
                    return Err(SceneError::InvalidOrbit {
                        semi_major: orbit.semi_major,
                        semi_minor: orbit.semi_minor,
                    });
                }
            }
        }

        Ok(())
    }

    ///
    /// Tessellate every model once. Frames re-derive nothing.
    pub fn build(&self) -> RenderSet {
        let mut models = Vec::with_capacity(self.models.len());

        for model in &self.models {
            let geometry: Box<dyn Geometry> = match &model.geometry {
                GeometryKind::SierpinskiTetrahedron {
                    level,
                    vertices,
                    colors,
                } => {
                    let vertex =
                        |i: usize| Vertex::new(Vec3::from(vertices[i]), Color::from(colors[i]));

                    Box::new(Sierpinski::new(
                        Tetrahedron::new([vertex(0), vertex(1), vertex(2), vertex(3)]),
                        *level,
                    ))
                }
                GeometryKind::SierpinskiPyramid {
                    level,
                    apex,
                    apex_color,
                    base,
                    base_colors,
                } => {
                    let corner =
                        |i: usize| Vertex::new(Vec3::from(base[i]), Color::from(base_colors[i]));

                    Box::new(Sierpinski::new(
                        Pyramid::new(
                            Vertex::new(Vec3::from(*apex), Color::from(*apex_color)),
                            [corner(0), corner(1), corner(2), corner(3)],
                        ),
                        *level,
                    ))
                }
                GeometryKind::Egg { resolution, seed } => Box::new(Egg::new(*resolution, *seed)),
                GeometryKind::Sphere {
                    resolution,
                    radius,
                    color,
                } => Box::new(Sphere::new(*resolution, *radius, Color::from(*color))),
            };

            let triangles = geometry.triangles();
            log::debug!("tessellated model into {} triangles", triangles.len());

            models.push(BuiltModel {
                triangles,
                scale: model.scale,
                spin_rate: model.spin_rate,
                orbit: model.orbit,
            });
        }

        let mut lines = Vec::new();

        if let Some(axes) = &self.axes {
            let l = axes.length;
            let axis = |a: Vec3<f64>, b: Vec3<f64>, color: Color| {
                Line::new(Vertex::new(a, color), Vertex::new(b, color))
            };

            lines.push(axis(
                Vec3::new(-l, 0.0, 0.0),
                Vec3::new(l, 0.0, 0.0),
                Color::new(1.0, 0.0, 0.0),
            ));
            lines.push(axis(
                Vec3::new(0.0, -l, 0.0),
                Vec3::new(0.0, l, 0.0),
                Color::new(0.0, 1.0, 0.0),
            ));
            lines.push(axis(
                Vec3::new(0.0, 0.0, -l),
                Vec3::new(0.0, 0.0, l),
                Color::new(0.0, 0.0, 1.0),
            ));
        }

        for model in &self.models {
            if let Some(orbit) = &model.orbit {
                let path = orbit.path(ORBIT_SEGMENTS);

                for i in 0..path.len() {
                    let a = path[i];
                    let b = path[(i + 1) % path.len()];

                    lines.push(Line::new(
                        Vertex::new(a, ORBIT_COLOR),
                        Vertex::new(b, ORBIT_COLOR),
                    ));
                }
            }
        }

        RenderSet { models, lines }
    }

    ///
    /// Rasterize one frame at the given time under the camera spin and the
    /// fixed orthographic projection.
    pub fn render(&self, set: &RenderSet, time: f64) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
        let view = Matrix4x4::spin(self.spin_rate * time);
        let projection = self.viewport.projection(self.width, self.height);

        let mut triangles = Vec::new();
        for model in &set.models {
            let placement = view * model.placement(time);

            triangles.extend(model.triangles.iter().map(|triangle| {
                let mut triangle = *triangle;
                triangle.transform(&placement);
                triangle
            }));
        }

        let lines: Vec<Line> = set
            .lines
            .iter()
            .map(|line| {
                let mut line = *line;
                line.transform(&view);
                line
            })
            .collect();

        let mut framebuffer =
            Framebuffer::new(self.width, self.height, Color::from(self.background));
        framebuffer.draw(&triangles, &lines, &projection);

        framebuffer.into_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRAHEDRON: &str = r#"{
        "scene": {
            "width": 400,
            "height": 400,
            "viewport": { "half_extent": 10.0, "depth": 15.0 },
            "spin_rate": 57.29577951308232,
            "axes": { "length": 7.5 },
            "models": [{
                "geometry": {
                    "type": "sierpinski-tetrahedron",
                    "level": 3,
                    "vertices": [[0, 6, 0], [-6, -4, 6], [6, -4, 6], [0, -4, -6]],
                    "colors": [[1, 0, 0], [0, 1, 0], [0, 0, 1], [1, 1, 0]]
                }
            }]
        }
    }"#;

    #[test]
    fn parses_and_builds_the_stock_tetrahedron() {
        let scene = Scene::from_json(TETRAHEDRON).unwrap();
        let set = scene.build();

        assert_eq!(1, set.models.len());
        // 4^3 terminal tetrahedra, four faces each.
        assert_eq!(256, set.models[0].triangles.len());
        // Three axes, no orbits.
        assert_eq!(3, set.lines.len());
    }

    #[test]
    fn rejects_absurd_recursion_levels() {
        let json = TETRAHEDRON.replace(r#""level": 3"#, r#""level": 9"#);

        let err = Scene::from_json(&json).unwrap_err();
        assert!(matches!(err, SceneError::LevelTooDeep { level: 9, .. }));
    }

    #[test]
    fn rejects_degenerate_grids() {
        let json = r#"{
            "scene": {
                "width": 100,
                "height": 100,
                "viewport": { "half_extent": 7.5, "depth": 10.0 },
                "models": [{ "geometry": { "type": "egg", "resolution": 1 } }]
            }
        }"#;

        let err = Scene::from_json(json).unwrap_err();
        assert!(matches!(err, SceneError::ResolutionTooSmall(1)));
    }

    #[test]
    fn rejects_orbits_wider_than_long() {
        let json = r#"{
            "scene": {
                "width": 100,
                "height": 100,
                "viewport": { "half_extent": 12.0, "depth": 20.0 },
                "models": [{
                    "geometry": { "type": "sphere", "resolution": 8, "radius": 1.0, "color": [1, 1, 0] },
                    "orbit": { "semi_major": 5.0, "semi_minor": 8.0, "angular_rate": 1.0 }
                }]
            }
        }"#;

        let err = Scene::from_json(json).unwrap_err();
        assert!(matches!(err, SceneError::InvalidOrbit { .. }));
    }

    #[test]
    fn rejects_empty_images() {
        let json = TETRAHEDRON.replace(r#""width": 400"#, r#""width": 0"#);

        let err = Scene::from_json(&json).unwrap_err();
        assert!(matches!(err, SceneError::EmptyImage));
    }

    #[test]
    fn missing_scene_root_is_a_parse_error() {
        assert!(matches!(
            Scene::from_json("{}").unwrap_err(),
            SceneError::Parse(..)
        ));
    }

    #[test]
    fn orbits_contribute_their_traces() {
        let json = r#"{
            "scene": {
                "width": 100,
                "height": 100,
                "viewport": { "half_extent": 12.0, "depth": 20.0 },
                "models": [{
                    "geometry": { "type": "sphere", "resolution": 8, "radius": 1.0, "color": [0.2, 0.5, 1.0] },
                    "orbit": { "semi_major": 7.0, "semi_minor": 5.0, "angular_rate": 1.0 }
                }]
            }
        }"#;

        let scene = Scene::from_json(json).unwrap();
        let set = scene.build();

        assert_eq!(100, set.lines.len());
    }

    #[test]
    fn renders_a_centered_frame() {
        let json = r#"{
            "scene": {
                "width": 16,
                "height": 16,
                "viewport": { "half_extent": 10.0, "depth": 15.0 },
                "models": [{
                    "geometry": {
                        "type": "sierpinski-tetrahedron",
                        "level": 0,
                        "vertices": [[0, 6, 0], [-6, -4, 6], [6, -4, 6], [0, -4, -6]],
                        "colors": [[1, 0, 0], [0, 1, 0], [0, 0, 1], [1, 1, 0]]
                    }
                }]
            }
        }"#;

        let scene = Scene::from_json(json).unwrap();
        let set = scene.build();
        let image = scene.render(&set, 0.0);

        assert_eq!((16, 16), image.dimensions());
        // The solid sits in the middle of the view volume.
        assert_ne!(image::Rgb([0, 0, 0]), *image.get_pixel(8, 8));
    }
}
