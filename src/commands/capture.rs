use crate::camera::CameraManager;
use crate::errors::CameraError;
use crate::streaming::encode_jpeg;
use crate::types::CameraFrame;
use std::path::PathBuf;
use std::sync::Arc;

/// Result of a successful still capture
#[derive(Debug, Clone, serde::Serialize)]
pub struct CaptureResult {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
}

/// Grab one frame from the camera, opening it first if needed.
pub async fn capture_single_frame(camera: Arc<CameraManager>) -> Result<CameraFrame, CameraError> {
    tokio::task::spawn_blocking(move || {
        camera.init()?;
        camera.read_frame()
    })
    .await
    .map_err(|e| CameraError::CaptureError(format!("Task join error: {}", e)))?
}

/// Encode `frame` as JPEG and overwrite the file at `path`.
pub async fn save_frame_jpeg(
    frame: CameraFrame,
    path: PathBuf,
    jpeg_quality: u8,
) -> Result<CaptureResult, CameraError> {
    log::info!("Saving frame {} to disk: {:?}", frame.id, path);

    let result = tokio::task::spawn_blocking(move || {
        let jpeg = encode_jpeg(&frame, jpeg_quality)?;
        std::fs::write(&path, &jpeg)?;
        Ok::<_, CameraError>(CaptureResult {
            path,
            width: frame.width,
            height: frame.height,
            size_bytes: jpeg.len(),
        })
    })
    .await
    .map_err(|e| CameraError::CaptureError(format!("Task join error: {}", e)))?;

    match &result {
        Ok(saved) => log::info!("Frame saved to {:?} ({} bytes)", saved.path, saved.size_bytes),
        Err(e) => log::error!("Failed to save frame: {}", e),
    }
    result
}

/// Capture one frame and store it at the fixed capture path.
///
/// Errors keep their kind: `InitializationError` when the camera cannot be
/// opened, `CaptureError` when no frame could be read, `EncodingError` or
/// `IoError` when writing the file failed.
pub async fn capture_to_disk(
    camera: Arc<CameraManager>,
    path: PathBuf,
    jpeg_quality: u8,
) -> Result<CaptureResult, CameraError> {
    log::info!("Capturing still frame to {:?}", path);

    let frame = capture_single_frame(camera).await.map_err(|e| {
        log::error!("Failed to capture frame: {}", e);
        e
    })?;

    log::debug!("Captured frame {}x{} ({} bytes)", frame.width, frame.height, frame.size_bytes);
    save_frame_jpeg(frame, path, jpeg_quality).await
}
