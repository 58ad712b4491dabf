//! bit3d core library - camera projection and drawable primitives
//!
//! This library holds everything that does not depend on a concrete drawing
//! backend: axis rotations, the camera view pipeline, the primitive family
//! with its draw contract, the `Surface` trait backends implement, and the
//! scene that drivers tick.

pub mod color;
pub mod description;
pub mod error;
pub mod geometry;
pub mod input;
pub mod primitive;
pub mod projection;
pub mod scene;
pub mod surface;
pub mod transform;

// Re-export commonly used types
pub use color::{Color, Paint, RadialGradient};
pub use description::parse_scene;
pub use error::{Bit3dError, Result};
pub use geometry::Vertex3d;
pub use input::DragTracker;
pub use primitive::{Drawable, Face, Line, Particle, ParticleFill, Primitive};
pub use projection::{BehindCameraPolicy, Camera, ProjectedPoint};
pub use scene::{Demo, DrawOrder, Scene, SceneOptions};
pub use surface::{DrawCommand, RecordingSurface, StateStack, Surface, SurfaceState};
pub use transform::RotationState;
