//! Geometry primitives shared by every drawable
use nalgebra::Point3;

/// A 3D vertex with an optional radius override
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex3d {
    pub position: Point3<f32>,
    /// Replaces the owning particle's `size` when set.
    pub radius: Option<f32>,
}

impl Vertex3d {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            radius: None,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }
}

impl From<Point3<f32>> for Vertex3d {
    fn from(position: Point3<f32>) -> Self {
        Self {
            position,
            radius: None,
        }
    }
}

impl From<[f32; 3]> for Vertex3d {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// The six faces of an axis-aligned cube centered at the origin, each as a
/// quad in counter-clockwise order seen from outside.
pub fn cube_quads(size: f32) -> [[Point3<f32>; 4]; 6] {
    let h = size / 2.0;
    let p = |x: f32, y: f32, z: f32| Point3::new(x * h, y * h, z * h);

    [
        // Front face
        [p(-1.0, -1.0, 1.0), p(1.0, -1.0, 1.0), p(1.0, 1.0, 1.0), p(-1.0, 1.0, 1.0)],
        // Back face
        [p(-1.0, -1.0, -1.0), p(-1.0, 1.0, -1.0), p(1.0, 1.0, -1.0), p(1.0, -1.0, -1.0)],
        // Top face
        [p(-1.0, 1.0, -1.0), p(-1.0, 1.0, 1.0), p(1.0, 1.0, 1.0), p(1.0, 1.0, -1.0)],
        // Bottom face
        [p(-1.0, -1.0, -1.0), p(1.0, -1.0, -1.0), p(1.0, -1.0, 1.0), p(-1.0, -1.0, 1.0)],
        // Right face
        [p(1.0, -1.0, -1.0), p(1.0, 1.0, -1.0), p(1.0, 1.0, 1.0), p(1.0, -1.0, 1.0)],
        // Left face
        [p(-1.0, -1.0, -1.0), p(-1.0, -1.0, 1.0), p(-1.0, 1.0, 1.0), p(-1.0, 1.0, -1.0)],
    ]
}
