//! Axis rotations and the per-axis rotation state
use nalgebra::Point3;

/// Rotation state around three axes (in degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in degrees)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Rotate a point about X, then Y, then Z.
    ///
    /// The order is fixed; swapping it changes what a drag looks like.
    pub fn apply(&self, point: &Point3<f32>) -> Point3<f32> {
        let rotated = rotate_x(self.x.to_radians(), point);
        let rotated = rotate_y(self.y.to_radians(), &rotated);
        rotate_z(self.z.to_radians(), &rotated)
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Rotate `point` about the X axis by `rad` radians.
pub fn rotate_x(rad: f32, point: &Point3<f32>) -> Point3<f32> {
    let (sin, cos) = rad.sin_cos();
    Point3::new(
        point.x,
        point.y * cos + point.z * sin,
        -point.y * sin + point.z * cos,
    )
}

/// Rotate `point` about the Y axis by `rad` radians.
pub fn rotate_y(rad: f32, point: &Point3<f32>) -> Point3<f32> {
    let (sin, cos) = rad.sin_cos();
    Point3::new(
        point.x * cos - point.z * sin,
        point.y,
        point.x * sin + point.z * cos,
    )
}

/// Rotate `point` about the Z axis by `rad` radians.
pub fn rotate_z(rad: f32, point: &Point3<f32>) -> Point3<f32> {
    let (sin, cos) = rad.sin_cos();
    Point3::new(
        point.x * cos + point.y * sin,
        -point.x * sin + point.y * cos,
        point.z,
    )
}
