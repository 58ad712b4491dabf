//! Camera and projection utilities
use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};

use crate::error::{Bit3dError, Result};
use crate::transform::RotationState;

/// Focal length used when a scene does not override it.
pub const DEFAULT_FOCAL_LENGTH: f32 = 300.0;

/// Substituted for a perspective divisor that is exactly zero.
const EPSILON: f32 = 1e-5;

/// What the perspective divide does with points behind the focal plane,
/// where the raw scale comes out negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BehindCameraPolicy {
    /// Keep the negative scale; such points appear mirrored through the center.
    Mirror,
    /// Negate the scale whenever the divisor is negative.
    #[default]
    Flip,
    /// Draw the point unscaled whenever the scale is negative.
    Clamp,
}

impl FromStr for BehindCameraPolicy {
    type Err = Bit3dError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mirror" => Ok(Self::Mirror),
            "flip" => Ok(Self::Flip),
            "clamp" => Ok(Self::Clamp),
            _ => Err(Bit3dError::InvalidPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for BehindCameraPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mirror => "mirror",
            Self::Flip => "flip",
            Self::Clamp => "clamp",
        };
        f.write_str(name)
    }
}

/// A point after the full view pipeline.
///
/// `x` and `y` are screen coordinates, `z` is the camera-relative depth
/// multiplied by the perspective scale and `w` is that depth before the divide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl ProjectedPoint {
    /// Depth attenuation factor `|z / w|`, the magnitude of the perspective
    /// scale. A point on the projection plane (`w == 0`) has a scale of
    /// exactly 1.
    pub fn depth_factor(&self) -> f32 {
        if self.w == 0.0 {
            1.0
        } else {
            (self.z / self.w).abs()
        }
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    /// Orientation in degrees per axis, applied to world points before translation.
    pub rotation: RotationState,
    pub up: Vector3<f32>,
    pub policy: BehindCameraPolicy,
    focal_length: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Point3::origin(),
            rotation: RotationState::zero(),
            up: Vector3::new(0.0, 1.0, 0.0),
            policy: BehindCameraPolicy::default(),
            focal_length: DEFAULT_FOCAL_LENGTH,
        }
    }

    /// Replace the focal length. Only finite, positive values are accepted.
    pub fn with_focal_length(mut self, focal_length: f32) -> Result<Self> {
        if !focal_length.is_finite() || focal_length <= 0.0 {
            return Err(Bit3dError::InvalidFocalLength(focal_length));
        }
        self.focal_length = focal_length;
        Ok(self)
    }

    pub fn with_position(mut self, position: Point3<f32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: RotationState) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_policy(mut self, policy: BehindCameraPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn focal_length(&self) -> f32 {
        self.focal_length
    }

    /// Run a world point through rotate, translate and perspective, in that order.
    pub fn apply_view(&self, point: &Point3<f32>) -> ProjectedPoint {
        let rotated = self.apply_rotate(point);
        let translated = self.apply_translate(&rotated);
        self.perspective(&translated)
    }

    /// Rotate a world point by the camera rotation (X, then Y, then Z).
    pub fn apply_rotate(&self, point: &Point3<f32>) -> Point3<f32> {
        self.rotation.apply(point)
    }

    /// Move a point into camera-relative coordinates.
    ///
    /// Uses the un-rotated camera position regardless of `rotation`.
    pub fn apply_translate(&self, point: &Point3<f32>) -> Point3<f32> {
        Point3::from(point - self.position)
    }

    /// Perspective divide of a camera-relative point.
    pub fn perspective(&self, point: &Point3<f32>) -> ProjectedPoint {
        let focal_distance = non_zero(self.focal_length - self.position.z);
        let denominator = non_zero(focal_distance - point.z);
        let mut scale = focal_distance / denominator;

        match self.policy {
            BehindCameraPolicy::Mirror => {}
            BehindCameraPolicy::Flip => {
                if denominator < 0.0 {
                    scale = -scale;
                }
            }
            BehindCameraPolicy::Clamp => {
                if scale < 0.0 {
                    scale = 1.0;
                }
            }
        }

        ProjectedPoint {
            x: point.x * scale,
            y: point.y * scale,
            z: point.z * scale,
            w: point.z,
        }
    }

    /// Camera-relative depth of a world point, before the perspective divide.
    /// Larger values are closer to the viewer.
    pub fn depth_of(&self, point: &Point3<f32>) -> f32 {
        self.apply_translate(&self.apply_rotate(point)).z
    }

    /// Turn a pointer drag into camera rotation.
    ///
    /// Vertical movement tilts about X, horizontal movement turns about Y with
    /// the sign inverted: dragging right rotates the world, which reads as the
    /// camera turning left.
    pub fn apply_drag(&mut self, dx: f32, dy: f32) {
        self.rotation.rotate(dy, -dx, 0.0);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

fn non_zero(value: f32) -> f32 {
    if value == 0.0 {
        EPSILON
    } else {
        value
    }
}
