// Every variant states *where* the render went wrong.
// Drawing errors are layout bugs: we fail fast instead of painting something half-right.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A box with x2 < x1 or y2 < y1 reached a drawing routine.
    #[error("invalid bounding box ({x1}, {y1}, {x2}, {y2})")]
    InvalidBoundingBox { x1: i32, y1: i32, x2: i32, y2: i32 },

    /// A layer was merged onto a buffer of a different size.
    #[error("dimension mismatch: target is {expected:?}, layer is {found:?}")]
    DimensionMismatch { expected: (u32, u32), found: (u32, u32) },

    /// An offset composite would write past the target edge.
    #[error("layer {width}x{height} at ({x}, {y}) does not fit inside the target")]
    LayerOutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    #[error("blur radius must be >= 0, got {0}")]
    BlurRadiusNegative(f32),

    /// NaN or infinite radius (TOML accepts `inf` and `nan`).
    #[error("blur radius must be a finite number, got {0}")]
    BlurRadiusNotFinite(f32),

    #[error("glow intensity must be within [0, 1], got {0}")]
    IntensityOutOfRange(f32),

    #[error("invalid color literal: {0:?}")]
    InvalidColor(String),

    #[error("theme config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("png encode error: {0}")]
    Encode(#[from] image::ImageError),

    /// Creating or updating the preview window failed
    #[error("preview window error: {0}")]
    Window(String),
}

pub type Result<T> = std::result::Result<T, Error>;
