//! Line-oriented scene description parser
//!
//! ```text
//! # comment
//! camera focal 300 position (0, 0, 0) rotation (0, 0, 0) behind flip
//! background rgba(30, 30, 30, 0.5)
//! face fill rgba(255, 0, 0, 0.4) stroke white (-50, -50, 10) (50, -50, 10) (50, 50, 10)
//! line color red (0, 0, 0) (100, 0, 0)
//! particle (0, 0, 100) size 5 gradient white #00f spin 10
//! ```
//!
//! Attributes may appear in any order after the statement keyword.
use nalgebra::Point3;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, space0, space1},
    combinator::{all_consuming, map, value},
    multi::{many0, separated_list1},
    number::complete::float,
    sequence::{delimited, preceded, separated_pair, terminated, tuple},
    IResult,
};
use tracing::debug;

use crate::color::{parse_color, Color};
use crate::error::{Bit3dError, Result};
use crate::geometry::Vertex3d;
use crate::primitive::{Face, Line, Particle};
use crate::projection::{BehindCameraPolicy, Camera};
use crate::scene::Scene;
use crate::transform::RotationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Camera,
    Face,
    Line,
    Particle,
}

#[derive(Debug, Clone, PartialEq)]
enum Attr {
    Focal(f32),
    Position(Point3<f32>),
    Rotation(Point3<f32>),
    Behind(BehindCameraPolicy),
    Fill(Color),
    Stroke(Color),
    Color(Color),
    Gradient(Color, Color),
    Size(f32),
    Spin(f32),
    Radius(f32),
    Points(Vec<Point3<f32>>),
}

impl Attr {
    fn name(&self) -> &'static str {
        match self {
            Attr::Focal(_) => "focal",
            Attr::Position(_) => "position",
            Attr::Rotation(_) => "rotation",
            Attr::Behind(_) => "behind",
            Attr::Fill(_) => "fill",
            Attr::Stroke(_) => "stroke",
            Attr::Color(_) => "color",
            Attr::Gradient(_, _) => "gradient",
            Attr::Size(_) => "size",
            Attr::Spin(_) => "spin",
            Attr::Radius(_) => "radius",
            Attr::Points(_) => "points",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Statement {
    Background(Color),
    Shape(Keyword, Vec<Attr>),
}

/// Parse a whole scene description.
pub fn parse_scene(input: &str) -> Result<Scene> {
    let mut scene = Scene::default();

    for (index, raw) in input.lines().enumerate() {
        let line = index + 1;
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let statement = match parse_statement(text) {
            Ok((_, statement)) => statement,
            Err(e) => {
                return Err(Bit3dError::Scene {
                    line,
                    message: format!("unrecognized statement: {e}"),
                })
            }
        };

        match statement {
            Statement::Background(color) => scene.options.background = color,
            Statement::Shape(Keyword::Camera, attrs) => {
                scene.camera = build_camera(std::mem::take(&mut scene.camera), attrs, line)?;
            }
            Statement::Shape(Keyword::Face, attrs) => scene.push(build_face(attrs, line)?),
            Statement::Shape(Keyword::Line, attrs) => scene.push(build_line(attrs, line)?),
            Statement::Shape(Keyword::Particle, attrs) => {
                scene.push(build_particle(attrs, line)?)
            }
        }
    }

    debug!(primitives = scene.len(), "parsed scene description");
    Ok(scene)
}

impl Scene {
    /// Build a scene from description text; see [`parse_scene`].
    pub fn from_description(input: &str) -> Result<Scene> {
        parse_scene(input)
    }
}

fn scene_error(line: usize, message: impl Into<String>) -> Bit3dError {
    Bit3dError::Scene {
        line,
        message: message.into(),
    }
}

fn unsupported(keyword: &str, attr: &Attr, line: usize) -> Bit3dError {
    scene_error(line, format!("`{}` is not valid for {keyword}", attr.name()))
}

fn build_camera(mut camera: Camera, attrs: Vec<Attr>, line: usize) -> Result<Camera> {
    for attr in attrs {
        camera = match attr {
            Attr::Focal(focal) => camera
                .with_focal_length(focal)
                .map_err(|e| scene_error(line, e.to_string()))?,
            Attr::Position(p) => camera.with_position(p),
            Attr::Rotation(r) => camera.with_rotation(RotationState::new(r.x, r.y, r.z)),
            Attr::Behind(policy) => camera.with_policy(policy),
            other => return Err(unsupported("camera", &other, line)),
        };
    }
    Ok(camera)
}

fn build_face(attrs: Vec<Attr>, line: usize) -> Result<Face> {
    let mut points = Vec::new();
    let mut fill = None;
    let mut stroke = None;
    for attr in attrs {
        match attr {
            Attr::Points(p) => points.extend(p),
            Attr::Fill(color) => fill = Some(color),
            Attr::Stroke(color) => stroke = Some(color),
            other => return Err(unsupported("face", &other, line)),
        }
    }

    let vertices = points.into_iter().map(Vertex3d::from).collect();
    let mut face = Face::new(vertices).map_err(|e| scene_error(line, e.to_string()))?;
    if let Some(fill) = fill {
        face = face.with_fill(fill);
    }
    if let Some(stroke) = stroke {
        face = face.with_stroke(stroke);
    }
    Ok(face)
}

fn build_line(attrs: Vec<Attr>, line: usize) -> Result<Line> {
    let mut points = Vec::new();
    let mut color = None;
    for attr in attrs {
        match attr {
            Attr::Points(p) => points.extend(p),
            Attr::Color(c) => color = Some(c),
            other => return Err(unsupported("line", &other, line)),
        }
    }

    let [from, to] = <[Point3<f32>; 2]>::try_from(points).map_err(|points| {
        scene_error(line, format!("a line needs 2 points, got {}", points.len()))
    })?;
    let mut segment = Line::new(from, to);
    if let Some(color) = color {
        segment = segment.with_color(color);
    }
    Ok(segment)
}

fn build_particle(attrs: Vec<Attr>, line: usize) -> Result<Particle> {
    let mut points = Vec::new();
    let mut rest = Vec::new();
    for attr in attrs {
        match attr {
            Attr::Points(p) => points.extend(p),
            other => rest.push(other),
        }
    }

    let [position] = <[Point3<f32>; 1]>::try_from(points).map_err(|points| {
        scene_error(line, format!("a particle needs 1 point, got {}", points.len()))
    })?;
    let mut particle = Particle::new(position);

    for attr in rest {
        particle = match attr {
            Attr::Size(size) => particle.with_size(size),
            Attr::Color(color) => particle.with_color(color),
            Attr::Gradient(color, end_color) => particle.with_gradient(color, end_color),
            Attr::Spin(spin) => particle.with_spin(spin),
            Attr::Radius(radius) => {
                particle.vertex = particle.vertex.with_radius(radius);
                particle
            }
            other => return Err(unsupported("particle", &other, line)),
        };
    }
    Ok(particle)
}

fn parse_statement(input: &str) -> IResult<&str, Statement> {
    all_consuming(terminated(
        alt((
            map(
                preceded(tuple((tag("background"), space1)), parse_color),
                Statement::Background,
            ),
            map(
                tuple((keyword, many0(preceded(space1, attribute)))),
                |(keyword, attrs)| Statement::Shape(keyword, attrs),
            ),
        )),
        space0,
    ))(input)
}

fn keyword(input: &str) -> IResult<&str, Keyword> {
    alt((
        value(Keyword::Camera, tag("camera")),
        value(Keyword::Face, tag("face")),
        value(Keyword::Line, tag("line")),
        value(Keyword::Particle, tag("particle")),
    ))(input)
}

fn attribute(input: &str) -> IResult<&str, Attr> {
    alt((
        map(named("focal", float), Attr::Focal),
        map(named("position", point), Attr::Position),
        map(named("rotation", point), Attr::Rotation),
        map(named("behind", policy), Attr::Behind),
        map(named("fill", parse_color), Attr::Fill),
        map(named("stroke", parse_color), Attr::Stroke),
        map(named("color", parse_color), Attr::Color),
        map(
            named("gradient", separated_pair(parse_color, space1, parse_color)),
            |(color, end_color)| Attr::Gradient(color, end_color),
        ),
        map(named("size", float), Attr::Size),
        map(named("spin", float), Attr::Spin),
        map(named("radius", float), Attr::Radius),
        map(separated_list1(space1, point), Attr::Points),
    ))(input)
}

/// `name <value>` with at least one space between.
fn named<'a, O>(
    name: &'static str,
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    preceded(tuple((tag(name), space1)), parser)
}

fn policy(input: &str) -> IResult<&str, BehindCameraPolicy> {
    alt((
        value(BehindCameraPolicy::Mirror, tag("mirror")),
        value(BehindCameraPolicy::Flip, tag("flip")),
        value(BehindCameraPolicy::Clamp, tag("clamp")),
    ))(input)
}

fn comma(input: &str) -> IResult<&str, char> {
    delimited(space0, char(','), space0)(input)
}

/// `(x, y, z)`
fn point(input: &str) -> IResult<&str, Point3<f32>> {
    map(
        delimited(
            terminated(char('('), space0),
            tuple((float, comma, float, comma, float)),
            preceded(space0, char(')')),
        ),
        |(x, _, y, _, z)| Point3::new(x, y, z),
    )(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{ParticleFill, Primitive};

    const DEMO: &str = "
# The tilted quad of the faces demo, plus a particle and an axis.
camera focal 400 position (0, 0, -20) rotation (10, 20, 0) behind clamp
background #000

face fill rgba(255, 0, 0, 0.4) stroke white (50, 50, -100) (100, 50, 10) (100, 100, 10) (50, 100, -100)
line (0, 0, 0) (100, 0, 0) color red
particle (0, 0, 100) size 6 gradient white #00f spin 10
particle (5.5, -1e1, 0) radius 3
";

    #[test]
    fn test_parse_full_description() {
        let scene = parse_scene(DEMO).unwrap();

        assert_eq!(scene.camera.focal_length(), 400.0);
        assert_eq!(scene.camera.position, Point3::new(0.0, 0.0, -20.0));
        assert_eq!(scene.camera.rotation, RotationState::new(10.0, 20.0, 0.0));
        assert_eq!(scene.camera.policy, BehindCameraPolicy::Clamp);
        assert_eq!(scene.options.background, Color::BLACK);
        assert_eq!(scene.len(), 4);

        match &scene.primitives()[0] {
            Primitive::Face(face) => {
                assert_eq!(face.vertices().len(), 4);
                assert_eq!(face.fill, Color::rgba(255, 0, 0, 0.4));
                assert_eq!(face.stroke, Color::WHITE);
                assert_eq!(face.vertices()[0].position, Point3::new(50.0, 50.0, -100.0));
            }
            other => panic!("expected face, got {other:?}"),
        }

        match &scene.primitives()[1] {
            Primitive::Line(line) => {
                assert_eq!(line.color, Color::RED);
                assert_eq!(line.to.position, Point3::new(100.0, 0.0, 0.0));
            }
            other => panic!("expected line, got {other:?}"),
        }

        match &scene.primitives()[2] {
            Primitive::Particle(particle) => {
                assert_eq!(particle.size, 6.0);
                assert_eq!(particle.spin, Some(10.0));
                assert_eq!(
                    particle.fill,
                    ParticleFill::Gradient {
                        color: Color::WHITE,
                        end_color: Color::BLUE
                    }
                );
            }
            other => panic!("expected particle, got {other:?}"),
        }

        match &scene.primitives()[3] {
            Primitive::Particle(particle) => {
                assert_eq!(particle.position(), Point3::new(5.5, -10.0, 0.0));
                assert_eq!(particle.vertex.radius, Some(3.0));
                assert_eq!(particle.size, Particle::DEFAULT_SIZE);
            }
            other => panic!("expected particle, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_without_camera_statement() {
        let scene = Scene::from_description("line (0, 0, 0) (1, 1, 1)\n").unwrap();
        assert_eq!(scene.camera, Camera::default());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_degenerate_face_reports_line() {
        let err = parse_scene("\n\nface (0, 0, 0) (1, 0, 0)").unwrap_err();
        assert_eq!(
            err,
            Bit3dError::Scene {
                line: 3,
                message: "a face needs at least 3 vertices, got 2".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        let bad_focal = parse_scene("camera focal 0").unwrap_err();
        assert!(matches!(bad_focal, Bit3dError::Scene { line: 1, .. }));

        let unknown = parse_scene("sphere (0, 0, 0)").unwrap_err();
        assert!(matches!(unknown, Bit3dError::Scene { line: 1, .. }));

        let misplaced = parse_scene("camera size 4").unwrap_err();
        assert_eq!(
            misplaced.to_string(),
            "scene description line 1: `size` is not valid for camera"
        );

        let three_points = parse_scene("line (0, 0, 0) (1, 0, 0) (2, 0, 0)").unwrap_err();
        assert!(three_points.to_string().contains("a line needs 2 points, got 3"));

        let bad_color = parse_scene("face fill nope (0,0,0) (1,0,0) (0,1,0)").unwrap_err();
        assert!(matches!(bad_color, Bit3dError::Scene { line: 1, .. }));
    }
}
