//! Drawable primitives: lines, faces and particles
use std::f32::consts::TAU;

use nalgebra::Point3;

use crate::color::{Color, Paint, RadialGradient};
use crate::error::{Bit3dError, Result};
use crate::geometry::Vertex3d;
use crate::projection::Camera;
use crate::surface::Surface;
use crate::transform::rotate_y;

/// Something a scene can tick and paint.
///
/// `draw` brackets its work in `save`/`restore` so styles never leak into
/// the next primitive.
pub trait Drawable {
    /// Advance per-tick motion. Static primitives keep the default no-op.
    fn update(&mut self) {}

    fn draw(&self, surface: &mut dyn Surface, camera: &Camera);

    /// Mean camera-relative depth of the vertices; larger is closer.
    fn depth(&self, camera: &Camera) -> f32;
}

/// A single stroked segment
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub from: Vertex3d,
    pub to: Vertex3d,
    pub color: Color,
}

impl Line {
    pub fn new(from: impl Into<Vertex3d>, to: impl Into<Vertex3d>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            color: Color::WHITE,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Drawable for Line {
    fn draw(&self, surface: &mut dyn Surface, camera: &Camera) {
        let from = camera.apply_view(&self.from.position);
        let to = camera.apply_view(&self.to.position);

        surface.save();
        surface.begin_path();
        surface.move_to(from.x, from.y);
        surface.line_to(to.x, to.y);
        surface.set_stroke(self.color);
        surface.stroke();
        surface.restore();
    }

    fn depth(&self, camera: &Camera) -> f32 {
        (camera.depth_of(&self.from.position) + camera.depth_of(&self.to.position)) / 2.0
    }
}

/// A closed polygon, filled then stroked, in vertex order
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    vertices: Vec<Vertex3d>,
    pub fill: Color,
    pub stroke: Color,
}

impl Face {
    pub const DEFAULT_FILL: Color = Color::rgba(255, 255, 255, 0.3);

    /// Build a face from at least three vertices.
    pub fn new(vertices: Vec<Vertex3d>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(Bit3dError::DegenerateFace {
                vertices: vertices.len(),
            });
        }
        Ok(Self {
            vertices,
            fill: Self::DEFAULT_FILL,
            stroke: Color::WHITE,
        })
    }

    pub fn quad(corners: [Point3<f32>; 4]) -> Self {
        Self {
            vertices: corners.into_iter().map(Vertex3d::from).collect(),
            fill: Self::DEFAULT_FILL,
            stroke: Color::WHITE,
        }
    }

    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_stroke(mut self, stroke: Color) -> Self {
        self.stroke = stroke;
        self
    }

    pub fn vertices(&self) -> &[Vertex3d] {
        &self.vertices
    }
}

impl Drawable for Face {
    fn draw(&self, surface: &mut dyn Surface, camera: &Camera) {
        surface.save();
        surface.begin_path();
        for (i, vertex) in self.vertices.iter().enumerate() {
            let p = camera.apply_view(&vertex.position);
            if i == 0 {
                surface.move_to(p.x, p.y);
            } else {
                surface.line_to(p.x, p.y);
            }
        }
        surface.close_path();
        surface.set_fill(Paint::Solid(self.fill));
        surface.fill();
        surface.set_stroke(self.stroke);
        surface.stroke();
        surface.restore();
    }

    fn depth(&self, camera: &Camera) -> f32 {
        let total: f32 = self
            .vertices
            .iter()
            .map(|vertex| camera.depth_of(&vertex.position))
            .sum();
        total / self.vertices.len() as f32
    }
}

/// How a particle's disc is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleFill {
    Solid(Color),
    /// `color` at the center fading to `end_color` at the rim.
    Gradient { color: Color, end_color: Color },
}

/// A depth-attenuated disc, optionally spinning about the world Y axis
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub vertex: Vertex3d,
    pub size: f32,
    pub fill: ParticleFill,
    /// Spin speed; each update turns the particle `spin / 10` degrees.
    pub spin: Option<f32>,
}

impl Particle {
    pub const DEFAULT_SIZE: f32 = 5.0;

    pub fn new(position: impl Into<Vertex3d>) -> Self {
        Self {
            vertex: position.into(),
            size: Self::DEFAULT_SIZE,
            fill: ParticleFill::Solid(Color::RED),
            spin: None,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.fill = ParticleFill::Solid(color);
        self
    }

    pub fn with_gradient(mut self, color: Color, end_color: Color) -> Self {
        self.fill = ParticleFill::Gradient { color, end_color };
        self
    }

    pub fn with_spin(mut self, spin: f32) -> Self {
        self.spin = Some(spin);
        self
    }

    pub fn position(&self) -> Point3<f32> {
        self.vertex.position
    }
}

impl Drawable for Particle {
    fn update(&mut self) {
        if let Some(spin) = self.spin {
            let rad = (spin / 10.0).to_radians();
            self.vertex.position = rotate_y(rad, &self.vertex.position);
        }
    }

    fn draw(&self, surface: &mut dyn Surface, camera: &Camera) {
        let m = camera.apply_view(&self.vertex.position);
        let d = m.depth_factor();
        let radius = self.vertex.radius.unwrap_or(self.size) * d;

        let paint = match self.fill {
            ParticleFill::Solid(color) => Paint::Solid(color),
            ParticleFill::Gradient { color, end_color } => Paint::Radial(RadialGradient {
                x: m.x,
                y: m.y,
                radius,
                inner: color,
                outer: end_color,
            }),
        };

        surface.save();
        surface.begin_path();
        surface.arc(m.x, m.y, radius, 0.0, TAU);
        surface.set_fill(paint);
        surface.set_global_alpha(d.clamp(0.0, 1.0));
        surface.fill();
        surface.close_path();
        surface.restore();
    }

    fn depth(&self, camera: &Camera) -> f32 {
        camera.depth_of(&self.vertex.position)
    }
}

/// Every kind of primitive a scene can hold
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line(Line),
    Face(Face),
    Particle(Particle),
}

impl Drawable for Primitive {
    fn update(&mut self) {
        match self {
            Primitive::Line(line) => line.update(),
            Primitive::Face(face) => face.update(),
            Primitive::Particle(particle) => particle.update(),
        }
    }

    fn draw(&self, surface: &mut dyn Surface, camera: &Camera) {
        match self {
            Primitive::Line(line) => line.draw(surface, camera),
            Primitive::Face(face) => face.draw(surface, camera),
            Primitive::Particle(particle) => particle.draw(surface, camera),
        }
    }

    fn depth(&self, camera: &Camera) -> f32 {
        match self {
            Primitive::Line(line) => line.depth(camera),
            Primitive::Face(face) => face.depth(camera),
            Primitive::Particle(particle) => particle.depth(camera),
        }
    }
}

impl From<Line> for Primitive {
    fn from(line: Line) -> Self {
        Primitive::Line(line)
    }
}

impl From<Face> for Primitive {
    fn from(face: Face) -> Self {
        Primitive::Face(face)
    }
}

impl From<Particle> for Primitive {
    fn from(particle: Particle) -> Self {
        Primitive::Particle(particle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface, SurfaceState};

    const EPS: f32 = 1e-3;

    fn unit_square(z: f32) -> Face {
        Face::quad([
            Point3::new(0.0, 0.0, z),
            Point3::new(1.0, 0.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(0.0, 1.0, z),
        ])
    }

    #[test]
    fn test_face_requires_three_vertices() {
        let two = vec![Vertex3d::new(0.0, 0.0, 0.0), Vertex3d::new(1.0, 0.0, 0.0)];
        assert_eq!(Face::new(two), Err(Bit3dError::DegenerateFace { vertices: 2 }));

        let three = vec![
            Vertex3d::new(0.0, 0.0, 0.0),
            Vertex3d::new(1.0, 0.0, 0.0),
            Vertex3d::new(0.0, 1.0, 0.0),
        ];
        assert_eq!(Face::new(three).unwrap().vertices().len(), 3);
    }

    #[test]
    fn test_face_draws_closed_path_in_vertex_order() {
        let camera = Camera::new();
        let mut surface = RecordingSurface::new();
        unit_square(10.0).draw(&mut surface, &camera);

        let commands = surface.take_commands();
        let scale = 300.0 / 290.0;
        assert_eq!(commands[0], DrawCommand::Save);
        assert_eq!(commands[1], DrawCommand::BeginPath);
        assert_eq!(commands[2], DrawCommand::MoveTo { x: 0.0, y: 0.0 });
        match commands[4] {
            DrawCommand::LineTo { x, y } => {
                assert!((x - scale).abs() < EPS);
                assert!((y - scale).abs() < EPS);
            }
            ref other => panic!("expected LineTo, got {other:?}"),
        }
        assert_eq!(commands[6], DrawCommand::ClosePath);
        assert_eq!(
            commands[7],
            DrawCommand::Fill {
                paint: Paint::Solid(Face::DEFAULT_FILL),
                alpha: 1.0
            }
        );
        assert_eq!(
            commands[8],
            DrawCommand::Stroke {
                color: Color::WHITE,
                alpha: 1.0
            }
        );
        assert_eq!(commands[9], DrawCommand::Restore);
        assert_eq!(commands.len(), 10);
    }

    #[test]
    fn test_styles_do_not_leak_between_primitives() {
        let camera = Camera::new();
        let mut surface = RecordingSurface::new();

        unit_square(10.0)
            .with_fill(Color::BLUE)
            .draw(&mut surface, &camera);
        assert_eq!(surface.state(), &SurfaceState::default());

        Particle::new([0.0, 0.0, -100.0])
            .with_color(Color::RED)
            .draw(&mut surface, &camera);
        assert_eq!(surface.state(), &SurfaceState::default());
        assert_eq!(surface.save_depth(), 0);

        // The particle's dimmed alpha stayed inside its own save/restore.
        let fills: Vec<f32> = surface
            .commands()
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Fill { alpha, .. } => Some(*alpha),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 2);
        assert_eq!(fills[0], 1.0);
        assert!((fills[1] - 0.75).abs() < EPS);
    }

    #[test]
    fn test_line_strokes_single_segment() {
        let camera = Camera::new();
        let mut surface = RecordingSurface::new();
        Line::new([0.0, 0.0, 0.0], [50.0, 0.0, 0.0])
            .with_color(Color::RED)
            .draw(&mut surface, &camera);

        assert_eq!(
            surface.commands(),
            &[
                DrawCommand::Save,
                DrawCommand::BeginPath,
                DrawCommand::MoveTo { x: 0.0, y: 0.0 },
                DrawCommand::LineTo { x: 50.0, y: 0.0 },
                DrawCommand::Stroke {
                    color: Color::RED,
                    alpha: 1.0
                },
                DrawCommand::Restore,
            ]
        );
    }

    #[test]
    fn test_particle_depth_attenuation() {
        let camera = Camera::new();
        let mut surface = RecordingSurface::new();
        // Scale 300 / (300 + 300) = 0.5: half the radius, half the alpha.
        Particle::new([20.0, 0.0, -300.0])
            .with_size(8.0)
            .draw(&mut surface, &camera);

        let commands = surface.commands();
        match commands[2] {
            DrawCommand::Arc { x, radius, .. } => {
                assert!((x - 10.0).abs() < EPS);
                assert!((radius - 4.0).abs() < EPS);
            }
            ref other => panic!("expected Arc, got {other:?}"),
        }
        match commands[3] {
            DrawCommand::Fill { alpha, .. } => assert!((alpha - 0.5).abs() < EPS),
            ref other => panic!("expected Fill, got {other:?}"),
        }
    }

    #[test]
    fn test_particle_alpha_is_clamped_near_camera() {
        let camera = Camera::new();
        let mut surface = RecordingSurface::new();
        Particle::new([0.0, 0.0, 150.0]).draw(&mut surface, &camera);

        match surface.commands()[2] {
            DrawCommand::Arc { radius, .. } => assert!((radius - 10.0).abs() < EPS),
            ref other => panic!("expected Arc, got {other:?}"),
        }
        match surface.commands()[3] {
            DrawCommand::Fill { alpha, .. } => assert_eq!(alpha, 1.0),
            ref other => panic!("expected Fill, got {other:?}"),
        }
    }

    #[test]
    fn test_radius_override_replaces_size() {
        let camera = Camera::new();
        let mut surface = RecordingSurface::new();
        Particle::new(Vertex3d::new(0.0, 0.0, 0.0).with_radius(12.0))
            .with_size(3.0)
            .draw(&mut surface, &camera);

        match surface.commands()[2] {
            DrawCommand::Arc { radius, .. } => assert_eq!(radius, 12.0),
            ref other => panic!("expected Arc, got {other:?}"),
        }
    }

    #[test]
    fn test_gradient_is_centered_on_projection() {
        let camera = Camera::new();
        let mut surface = RecordingSurface::new();
        Particle::new([40.0, -20.0, 150.0])
            .with_size(5.0)
            .with_gradient(Color::WHITE, Color::BLUE)
            .draw(&mut surface, &camera);

        match surface.commands()[3] {
            DrawCommand::Fill {
                paint: Paint::Radial(gradient),
                ..
            } => {
                assert!((gradient.x - 80.0).abs() < EPS);
                assert!((gradient.y + 40.0).abs() < EPS);
                assert!((gradient.radius - 10.0).abs() < EPS);
                assert_eq!(gradient.inner, Color::WHITE);
                assert_eq!(gradient.outer, Color::BLUE);
            }
            ref other => panic!("expected radial Fill, got {other:?}"),
        }
    }

    #[test]
    fn test_spinning_particle_completes_a_turn() {
        // spin 10 turns one degree per tick, so 360 ticks is a full turn.
        let start = Point3::new(100.0, 25.0, -40.0);
        let mut particle = Particle::new(start).with_spin(10.0);

        for _ in 0..90 {
            particle.update();
        }
        let quarter = particle.position();
        assert!((quarter.x - 40.0).abs() < 0.05);
        assert!((quarter.z - 100.0).abs() < 0.05);
        assert_eq!(quarter.y, 25.0);

        for _ in 90..360 {
            particle.update();
        }
        assert!((particle.position() - start).norm() < 0.05);
    }

    #[test]
    fn test_static_particle_does_not_move() {
        let mut particle = Particle::new([1.0, 2.0, 3.0]);
        particle.update();
        assert_eq!(particle.position(), Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_primitive_dispatch() {
        let camera = Camera::new();
        let mut primitive = Primitive::from(Particle::new([10.0, 0.0, 0.0]).with_spin(900.0));
        primitive.update();
        // 90 degrees about Y takes +X to +Z.
        assert!((primitive.depth(&camera) - 10.0).abs() < EPS);

        let face = Primitive::from(unit_square(20.0));
        assert!((face.depth(&camera) - 20.0).abs() < EPS);
    }
}
