//! Error type shared by the core crate
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Bit3dError {
    #[error("focal length must be finite and positive, got {0}")]
    InvalidFocalLength(f32),

    #[error("a face needs at least 3 vertices, got {vertices}")]
    DegenerateFace { vertices: usize },

    #[error("invalid color `{0}`")]
    InvalidColor(String),

    #[error("unknown behind-camera policy `{0}` (expected mirror, flip or clamp)")]
    InvalidPolicy(String),

    #[error("unknown demo `{0}` (expected faces, particles or cube)")]
    InvalidDemo(String),

    #[error("scene description line {line}: {message}")]
    Scene { line: usize, message: String },
}

pub type Result<T> = std::result::Result<T, Bit3dError>;
