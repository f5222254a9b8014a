use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChlorosError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mask needs to have shape {expected_rows}x{expected_cols}, got {actual_rows}x{actual_cols}")]
    MaskShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("Mask must be binary: found {0} distinct 8-bit values")]
    NonBinaryMask(usize),

    #[error("Expected {expected} measurement labels, got {actual}")]
    LabelCountMismatch { expected: usize, actual: usize },

    #[error("Unknown acquisition protocol: {0}")]
    UnknownProtocol(String),

    #[error("Frame label {0:?} not present in stack")]
    FrameLabelNotFound(String),

    #[error("Stack {axis} axis must be non-empty")]
    EmptyAxis { axis: &'static str },

    #[error("Stack {axis} axis has {expected} slices but {actual} coordinate labels")]
    CoordinateMismatch {
        axis: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid stack manifest: {0}")]
    InvalidManifest(String),

    #[error("Malformed stack manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Figure rendering error: {0}")]
    Render(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChlorosError>;
