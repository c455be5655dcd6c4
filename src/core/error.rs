use thiserror::Error;

#[derive(Error, Debug)]
pub enum DreamError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid dream input: {0}")]
    Validation(String),

    #[error("Dream not found: {0}")]
    NotFound(String),

    #[error("Dream id already stored: {0}")]
    DuplicateId(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl From<image::ImageError> for DreamError {
    fn from(err: image::ImageError) -> Self {
        DreamError::Render(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DreamError>;
