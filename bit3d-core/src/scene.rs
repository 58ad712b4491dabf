//! A scene: one camera, an ordered primitive list and the per-frame pass
use std::f32::consts::TAU;
use std::str::FromStr;

use nalgebra::Point3;
use tracing::{debug, trace};

use crate::color::Color;
use crate::error::{Bit3dError, Result};
use crate::geometry::cube_quads;
use crate::primitive::{Drawable, Face, Line, Particle, Primitive};
use crate::projection::Camera;
use crate::surface::Surface;

/// Order in which a frame draws its primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawOrder {
    /// Insertion order; later primitives paint over earlier ones.
    #[default]
    Insertion,
    /// Farthest first by mean camera-relative depth (painter's algorithm).
    DepthSorted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    /// Painted over the whole surface at the start of every frame. A
    /// translucent color leaves trails of previous frames.
    pub background: Color,
    pub draw_order: DrawOrder,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            background: Color::rgba(30, 30, 30, 0.5),
            draw_order: DrawOrder::Insertion,
        }
    }
}

/// Built-in scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Demo {
    #[default]
    Faces,
    Particles,
    Cube,
}

impl FromStr for Demo {
    type Err = Bit3dError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "faces" => Ok(Self::Faces),
            "particles" => Ok(Self::Particles),
            "cube" => Ok(Self::Cube),
            _ => Err(Bit3dError::InvalidDemo(s.to_string())),
        }
    }
}

/// Owns the camera and primitives for one session.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub camera: Camera,
    pub options: SceneOptions,
    primitives: Vec<Primitive>,
    tick: u64,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    pub fn with_options(mut self, options: SceneOptions) -> Self {
        self.options = options;
        self
    }

    pub fn push(&mut self, primitive: impl Into<Primitive>) {
        self.primitives.push(primitive.into());
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Frames drawn so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Clear the surface, advance every primitive one tick, then draw them.
    pub fn frame(&mut self, surface: &mut dyn Surface) {
        surface.clear(self.options.background);

        for primitive in &mut self.primitives {
            primitive.update();
        }

        self.draw_all(surface);

        trace!(tick = self.tick, primitives = self.primitives.len(), "frame drawn");
        self.tick += 1;
    }

    /// Draw without advancing animation, e.g. to repaint after a drag.
    pub fn redraw(&self, surface: &mut dyn Surface) {
        surface.clear(self.options.background);
        self.draw_all(surface);
    }

    fn draw_all(&self, surface: &mut dyn Surface) {
        match self.options.draw_order {
            DrawOrder::Insertion => {
                for primitive in &self.primitives {
                    primitive.draw(surface, &self.camera);
                }
            }
            DrawOrder::DepthSorted => {
                for index in self.depth_order() {
                    self.primitives[index].draw(surface, &self.camera);
                }
            }
        }
    }

    /// Indices of the primitives, farthest first.
    pub fn depth_order(&self) -> Vec<usize> {
        let depths: Vec<f32> = self
            .primitives
            .iter()
            .map(|primitive| primitive.depth(&self.camera))
            .collect();
        let mut order: Vec<usize> = (0..depths.len()).collect();
        order.sort_by(|a, b| depths[*a].total_cmp(&depths[*b]));
        order
    }

    /// Apply a pointer drag (in degrees) to the camera.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.camera.apply_drag(dx, dy);
    }

    pub fn demo(demo: Demo) -> Self {
        let scene = match demo {
            Demo::Faces => Self::faces_demo(),
            Demo::Particles => Self::particles_demo(48),
            Demo::Cube => Self::cube_demo(120.0),
        };
        debug!(?demo, primitives = scene.len(), "built demo scene");
        scene
    }

    /// Four overlapping quads at different depths, one of them tilted.
    pub fn faces_demo() -> Self {
        let quads = [
            [[-50.0, -50.0, 10.0], [50.0, -50.0, 10.0], [50.0, 50.0, 10.0], [-50.0, 50.0, 10.0]],
            [[-150.0, -150.0, 10.0], [-50.0, -150.0, 10.0], [-50.0, -50.0, 10.0], [-150.0, -50.0, 10.0]],
            [[-50.0, -50.0, 100.0], [50.0, -50.0, 100.0], [50.0, 50.0, 100.0], [-50.0, 50.0, 100.0]],
            [[50.0, 50.0, -100.0], [100.0, 50.0, 10.0], [100.0, 100.0, 10.0], [50.0, 100.0, -100.0]],
        ];

        let mut scene = Self::default();
        for quad in quads {
            scene.push(Face::quad(quad.map(Point3::from)));
        }
        scene
    }

    /// A ring of spinning particles around the Y axis, with axis lines.
    pub fn particles_demo(count: usize) -> Self {
        let palette = [
            Color::RED,
            Color::rgb(255, 165, 0),
            Color::rgb(255, 255, 0),
            Color::rgb(0, 255, 255),
            Color::rgb(255, 0, 255),
        ];

        let mut scene = Self::default();
        scene.push(Line::new([-150.0, 0.0, 0.0], [150.0, 0.0, 0.0]).with_color(Color::RED));
        scene.push(Line::new([0.0, -150.0, 0.0], [0.0, 150.0, 0.0]).with_color(Color::GREEN));
        scene.push(Line::new([0.0, 0.0, -150.0], [0.0, 0.0, 150.0]).with_color(Color::BLUE));

        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU;
            let height = ((i % 7) as f32 - 3.0) * 15.0;
            let position = [120.0 * angle.cos(), height, 120.0 * angle.sin()];
            let color = palette[i % palette.len()];

            let particle = Particle::new(position)
                .with_size(4.0 + (i % 3) as f32 * 2.0)
                .with_spin(5.0 + (i % 4) as f32 * 5.0);
            let particle = if i % 2 == 0 {
                particle.with_color(color)
            } else {
                particle.with_gradient(Color::WHITE, color.with_alpha(0.0))
            };
            scene.push(particle);
        }
        scene
    }

    /// An axis-aligned cube, drawn back to front.
    pub fn cube_demo(size: f32) -> Self {
        let options = SceneOptions {
            draw_order: DrawOrder::DepthSorted,
            ..SceneOptions::default()
        };
        let mut scene = Self::default().with_options(options);
        for quad in cube_quads(size) {
            scene.push(Face::quad(quad).with_fill(Color::rgba(0, 160, 255, 0.35)));
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn clears(surface: &RecordingSurface) -> usize {
        surface
            .commands()
            .iter()
            .filter(|command| matches!(command, DrawCommand::Clear(_)))
            .count()
    }

    #[test]
    fn test_frame_clears_then_draws_in_order() {
        let mut scene = Scene::faces_demo();
        let mut surface = RecordingSurface::new();
        scene.frame(&mut surface);

        let commands = surface.commands();
        assert_eq!(commands[0], DrawCommand::Clear(SceneOptions::default().background));
        assert_eq!(clears(&surface), 1);
        let fills = commands
            .iter()
            .filter(|command| matches!(command, DrawCommand::Fill { .. }))
            .count();
        assert_eq!(fills, 4);
        assert_eq!(surface.save_depth(), 0);
        assert_eq!(scene.tick(), 1);

        // First quad is drawn first: its first corner sits at z = 10.
        let scale = 300.0 / 290.0;
        assert_eq!(
            commands[3],
            DrawCommand::MoveTo {
                x: -50.0 * scale,
                y: -50.0 * scale
            }
        );
    }

    #[test]
    fn test_frame_updates_spinning_particles() {
        let mut scene = Scene::default();
        scene.push(Particle::new([10.0, 0.0, 0.0]).with_spin(900.0));
        let mut surface = RecordingSurface::new();
        scene.frame(&mut surface);

        match &scene.primitives()[0] {
            Primitive::Particle(particle) => {
                assert!(particle.position().x.abs() < 1e-4);
                assert!((particle.position().z - 10.0).abs() < 1e-4);
            }
            other => panic!("expected particle, got {other:?}"),
        }
    }

    #[test]
    fn test_redraw_does_not_animate() {
        let mut scene = Scene::default();
        scene.push(Particle::new([10.0, 0.0, 0.0]).with_spin(900.0));
        let before = scene.primitives().to_vec();
        scene.redraw(&mut RecordingSurface::new());
        assert_eq!(scene.primitives(), before.as_slice());
        assert_eq!(scene.tick(), 0);
    }

    #[test]
    fn test_depth_order_is_farthest_first() {
        let scene = Scene::faces_demo();
        // Quads 0 and 1 share z = 10, quad 2 is at z = 100, quad 3 averages -45.
        assert_eq!(scene.depth_order(), vec![3, 0, 1, 2]);
    }

    #[test]
    fn test_depth_sorted_frame_draws_nearest_last() {
        let mut scene = Scene::faces_demo().with_options(SceneOptions {
            draw_order: DrawOrder::DepthSorted,
            ..SceneOptions::default()
        });
        let mut surface = RecordingSurface::new();
        scene.frame(&mut surface);

        let last_move = surface
            .commands()
            .iter()
            .rev()
            .find_map(|command| match command {
                DrawCommand::MoveTo { x, y } => Some((*x, *y)),
                _ => None,
            })
            .unwrap();
        // Nearest quad starts at (-50, -50, 100), scaled by 300 / 200.
        assert!((last_move.0 + 75.0).abs() < 1e-3);
        assert!((last_move.1 + 75.0).abs() < 1e-3);
    }

    #[test]
    fn test_drag_turns_camera() {
        let mut scene = Scene::faces_demo();
        scene.drag(4.0, 2.0);
        assert_eq!(scene.camera.rotation.x, 2.0);
        assert_eq!(scene.camera.rotation.y, -4.0);
    }

    #[test]
    fn test_demos() {
        assert_eq!(Scene::demo(Demo::Faces).len(), 4);
        assert_eq!(Scene::demo(Demo::Particles).len(), 3 + 48);
        let cube = Scene::demo(Demo::Cube);
        assert_eq!(cube.len(), 6);
        assert_eq!(cube.options.draw_order, DrawOrder::DepthSorted);
        assert_eq!("Cube".parse::<Demo>(), Ok(Demo::Cube));
        assert!("teapot".parse::<Demo>().is_err());
    }
}
