/// bit3d terminal viewer
///
/// Renders a scene description file or one of the built-in demos.
/// Controls:
///   - Mouse drag / WASD / Arrow Keys: Rotate the camera
///   - +/-: Move the camera along Z
///   - R: Reset the camera
///   - Q/ESC: Quit
use std::path::PathBuf;

use anyhow::{Context, Result};
use bit3d_core::{BehindCameraPolicy, Demo, DrawOrder, Scene};
use bit3d_terminal::{AppConfig, TerminalApp};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "bit3d-terminal", about = "Software 3D scenes rendered in the terminal")]
struct Cli {
    /// Scene description file to load instead of a demo
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Built-in demo: faces, particles or cube
    #[arg(long, default_value = "faces")]
    demo: Demo,

    /// Override the camera focal length
    #[arg(long)]
    focal_length: Option<f32>,

    /// Handling of points behind the camera: mirror, flip or clamp
    #[arg(long)]
    behind_camera: Option<BehindCameraPolicy>,

    /// Draw primitives back to front instead of in insertion order
    #[arg(long)]
    depth_sort: bool,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Scene units per terminal column
    #[arg(long, default_value_t = 6.0)]
    zoom: f32,

    /// Enable debug logging (written to stderr)
    #[arg(short, long)]
    verbose: bool,
}

fn load_scene(cli: &Cli) -> Result<Scene> {
    let mut scene = match &cli.scene {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Scene::from_description(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => Scene::demo(cli.demo),
    };

    if let Some(focal_length) = cli.focal_length {
        scene.camera = scene.camera.with_focal_length(focal_length)?;
    }
    if let Some(policy) = cli.behind_camera {
        scene.camera.policy = policy;
    }
    if cli.depth_sort {
        scene.options.draw_order = DrawOrder::DepthSorted;
    }
    Ok(scene)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let scene = load_scene(&cli)?;
    info!(
        primitives = scene.len(),
        focal_length = scene.camera.focal_length(),
        policy = %scene.camera.policy,
        "scene ready"
    );

    let config = AppConfig {
        fps: cli.fps,
        units_per_column: cli.zoom,
        ..AppConfig::default()
    };

    let mut app = TerminalApp::new(scene, config).context("initializing terminal")?;
    app.run().context("running terminal session")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_demo_camera() {
        let cli = Cli::parse_from([
            "bit3d-terminal",
            "--demo",
            "cube",
            "--focal-length",
            "500",
            "--behind-camera",
            "clamp",
        ]);
        let scene = load_scene(&cli).unwrap();
        assert_eq!(scene.len(), 6);
        assert_eq!(scene.camera.focal_length(), 500.0);
        assert_eq!(scene.camera.policy, BehindCameraPolicy::Clamp);
    }

    #[test]
    fn test_cli_rejects_zero_focal_length() {
        let cli = Cli::parse_from(["bit3d-terminal", "--focal-length", "0"]);
        assert!(load_scene(&cli).is_err());
    }

    #[test]
    fn test_bundled_scene_loads() {
        let scene = Scene::from_description(include_str!("../scenes/orbit.scene")).unwrap();
        assert!(!scene.is_empty());
    }
}
