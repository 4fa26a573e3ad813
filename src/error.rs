use thiserror::Error;

/// Error types for the lensparams-rs library.
#[derive(Error, Debug)]
pub enum LensParamError {
    /// The family/variant combination is not registered.
    #[error("Unknown {family} model: '{variant}'")]
    UnknownModel { family: String, variant: String },

    /// The flat vector length disagrees with the fixed-mask configuration.
    #[error("Cursor mismatch: layout requires {expected} flat-vector entries, got {actual}")]
    CursorMismatch { expected: usize, actual: usize },

    /// A prior width field is absent for a retained free parameter.
    #[error("Missing sigma field '{field}' for parameter '{param}' (instance {instance})")]
    MissingSigmaField {
        field: String,
        param: String,
        instance: usize,
    },

    /// A free parameter is absent from the keyword mapping being packed.
    #[error("Missing value for free parameter '{param}' (instance {instance})")]
    MissingParameter { param: String, instance: usize },

    /// A list-valued input is shorter than required, or list counts disagree.
    #[error("Length mismatch: {0}")]
    LengthMismatch(String),

    /// A scalar was supplied where an array was expected, or vice versa.
    #[error("Shape mismatch for parameter '{param}': expected {expected}")]
    ShapeMismatch { param: String, expected: String },

    /// A flat vector built under one layout was decoded under another.
    #[error("Layout mismatch: {0}")]
    LayoutMismatch(String),

    /// Invalid input data.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for lensparams-rs operations.
pub type Result<T> = std::result::Result<T, LensParamError>;
