#[macro_use]
extern crate serde_derive;

use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::Context;

use crate::scene::{RenderSet, Scene};

mod color;
mod fractal;
mod geometry;
mod matrix;
mod orbit;
mod raster;
mod scene;
mod transform;
mod vec3;
mod vertex;

const USAGE: &str = "usage: facet <scene.json> <output.png> [--time seconds] [--frames count] [--fps rate]";

#[derive(Debug)]
struct Args {
    scene: PathBuf,
    output: PathBuf,
    time: f64,
    frames: Option<u32>,
    fps: f64,
}

fn value<T, I>(args: &mut I, flag: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| format!("{} expects a value", flag))?
        .parse()
        .map_err(|_| format!("{} expects a number", flag))
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut time = 0.0;
    let mut frames = None;
    let mut fps = 25.0;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--time" => time = value(&mut args, "--time")?,
            "--frames" => frames = Some(value(&mut args, "--frames")?),
            "--fps" => fps = value(&mut args, "--fps")?,
            _ if arg.starts_with("--") => return Err(format!("unknown option {}", arg)),
            _ => positional.push(arg),
        }
    }

    if positional.len() != 2 {
        return Err("expected a scene file and an output image".to_string());
    }

    let output = positional.pop().map(PathBuf::from);
    let scene = positional.pop().map(PathBuf::from);

    Ok(Args {
        scene: scene.ok_or("expected a scene file")?,
        output: output.ok_or("expected an output image")?,
        time,
        frames,
        fps,
    })
}

fn numbered(output: &Path, frame: u32) -> PathBuf {
    let stem = output.file_stem().and_then(OsStr::to_str).unwrap_or("frame");
    let extension = output.extension().and_then(OsStr::to_str).unwrap_or("png");

    output.with_file_name(format!("{}-{:04}.{}", stem, frame, extension))
}

fn save_frame(scene: &Scene, set: &RenderSet, time: f64, path: &Path) -> anyhow::Result<()> {
    let now = Instant::now();

    let image = scene.render(set, time);
    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;

    log::info!(
        "rendered t={:.2}s to {} in {:.3} ms",
        time,
        path.display(),
        now.elapsed().as_secs_f64() * 1.0e3
    );

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!("{}", USAGE);
            process::exit(2);
        }
    };

    let scene = Scene::load(&args.scene)
        .with_context(|| format!("failed to load scene {}", args.scene.display()))?;

    let now = Instant::now();
    let set = scene.build();
    let triangles: usize = set.models.iter().map(|m| m.triangles.len()).sum();

    log::info!(
        "built {} triangles in {:.3} ms",
        triangles,
        now.elapsed().as_secs_f64() * 1.0e3
    );

    match args.frames {
        None => save_frame(&scene, &set, args.time, &args.output)?,
        Some(count) => {
            for frame in 0..count {
                let time = frame as f64 / args.fps;

                save_frame(&scene, &set, time, &numbered(&args.output, frame))?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn two_positionals_with_defaults() {
        let parsed = args(&["scenes/egg.json", "out.png"]).unwrap();

        assert_eq!(PathBuf::from("scenes/egg.json"), parsed.scene);
        assert_eq!(PathBuf::from("out.png"), parsed.output);
        assert_eq!(0.0, parsed.time);
        assert_eq!(None, parsed.frames);
        assert_eq!(25.0, parsed.fps);
    }

    #[test]
    fn frame_sequences_parse() {
        let parsed = args(&["s.json", "o.png", "--frames", "120", "--fps", "30"]).unwrap();

        assert_eq!(Some(120), parsed.frames);
        assert_eq!(30.0, parsed.fps);
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(args(&["s.json", "o.png", "--fast"]).is_err());
        assert!(args(&["s.json"]).is_err());
        assert!(args(&["s.json", "o.png", "--time"]).is_err());
    }

    #[test]
    fn frame_paths_are_numbered() {
        assert_eq!(
            PathBuf::from("out/frame-0042.png"),
            numbered(Path::new("out/frame.png"), 42)
        );
    }
}
