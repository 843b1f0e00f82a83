use crate::camera::CameraManager;
use crate::errors::CameraError;
use crate::streaming::FrameProducer;
use std::sync::Arc;

/// Open the camera for streaming. Opening an already open camera is a no-op.
pub async fn start_stream(camera: Arc<CameraManager>) -> Result<(), CameraError> {
    log::info!("Starting camera stream");

    tokio::task::spawn_blocking(move || camera.init())
        .await
        .map_err(|e| CameraError::CaptureError(format!("Task join error: {}", e)))??;

    log::info!("Camera stream started");
    Ok(())
}

/// Release the camera. Stopping a stopped stream succeeds.
pub async fn stop_stream(camera: Arc<CameraManager>) -> Result<(), CameraError> {
    log::info!("Stopping camera stream");

    tokio::task::spawn_blocking(move || camera.release())
        .await
        .map_err(|e| CameraError::CaptureError(format!("Task join error: {}", e)))??;

    log::info!("Camera stream stopped");
    Ok(())
}

/// Make sure the camera is open and attach a frame producer to it.
pub async fn open_feed(
    camera: Arc<CameraManager>,
    jpeg_quality: u8,
) -> Result<FrameProducer, CameraError> {
    let camera_clone = camera.clone();
    let lease = tokio::task::spawn_blocking(move || camera_clone.init())
        .await
        .map_err(|e| CameraError::CaptureError(format!("Task join error: {}", e)))??;

    log::debug!("Opening live feed on camera generation {}", lease.generation());
    Ok(FrameProducer::with_lease(camera, lease, jpeg_quality))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCaptureMode, MockOpener};

    fn camera(mode: MockCaptureMode) -> Arc<CameraManager> {
        let opener = MockOpener::new(mode).with_resolution(16, 16);
        Arc::new(CameraManager::new(Arc::new(opener)))
    }

    #[tokio::test]
    async fn test_start_then_stop() {
        let camera = camera(MockCaptureMode::Success);
        start_stream(camera.clone()).await.unwrap();
        assert!(camera.is_open());
        stop_stream(camera.clone()).await.unwrap();
        assert!(!camera.is_open());
    }

    #[tokio::test]
    async fn test_start_propagates_open_failure() {
        let camera = camera(MockCaptureMode::OpenFailure);
        let err = start_stream(camera.clone()).await.unwrap_err();
        assert!(err.to_string().contains("Could not start camera."));
        assert!(!camera.is_open());
    }

    #[tokio::test]
    async fn test_open_feed_opens_camera() {
        let camera = camera(MockCaptureMode::Success);
        let mut producer = open_feed(camera.clone(), 80).await.unwrap();
        assert!(camera.is_open());
        assert!(producer.next_chunk().is_some());
    }
}
