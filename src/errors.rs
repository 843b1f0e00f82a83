use thiserror::Error;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("Camera initialization error: {0}")]
    InitializationError(String),
    #[error("Capture error: {0}")]
    CaptureError(String),
    #[error("Encoding error: {0}")]
    EncodingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<std::io::Error> for CameraError {
    fn from(e: std::io::Error) -> Self {
        CameraError::IoError(e.to_string())
    }
}

impl From<image::ImageError> for CameraError {
    fn from(e: image::ImageError) -> Self {
        CameraError::EncodingError(e.to_string())
    }
}
