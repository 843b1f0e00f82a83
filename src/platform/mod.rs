//! Capture device backends
//!
//! The camera manager only talks to devices through [`CaptureDevice`] and opens
//! them through a [`DeviceOpener`], so the native nokhwa backend and the mock
//! backend are interchangeable at runtime.

#[cfg(feature = "native")]
pub mod native;

use crate::config::CameraConfig;
use crate::errors::CameraError;
use crate::testing::{MockCaptureMode, MockOpener};
use crate::types::{CameraBackend, CameraFrame};
use std::sync::Arc;

#[cfg(feature = "native")]
pub use native::{NativeCamera, NativeOpener};

/// An open connection to a video capture device.
pub trait CaptureDevice: Send {
    /// Identifier of the underlying device (index for native cameras).
    fn device_id(&self) -> &str;

    /// Whether the device stream is still open.
    fn is_opened(&self) -> bool;

    /// Block until the next frame is available and return it as RGB8.
    fn read_frame(&mut self) -> Result<CameraFrame, CameraError>;

    /// Close the device stream. Calling this on a closed device is a no-op.
    fn release(&mut self) -> Result<(), CameraError>;
}

/// Factory for [`CaptureDevice`] instances.
pub trait DeviceOpener: Send + Sync {
    fn open(&self) -> Result<Box<dyn CaptureDevice>, CameraError>;
}

/// Build the opener selected by the camera configuration.
pub fn opener_for(config: &CameraConfig) -> Result<Arc<dyn DeviceOpener>, CameraError> {
    match config.backend {
        CameraBackend::Mock => {
            log::info!("Using mock camera backend");
            Ok(Arc::new(MockOpener::new(MockCaptureMode::Success)))
        }
        #[cfg(feature = "native")]
        CameraBackend::Native => Ok(Arc::new(NativeOpener::new(config.device_index))),
        #[cfg(not(feature = "native"))]
        CameraBackend::Native => Err(CameraError::InitializationError(
            "native camera backend requires the `native` feature".to_string(),
        )),
    }
}
