use crate::errors::CameraError;
use crate::platform::{CaptureDevice, DeviceOpener};
use crate::types::CameraFrame;
use nokhwa::{
    pixel_format::RgbFormat,
    utils::{CameraIndex, RequestedFormat, RequestedFormatType},
    CallbackCamera,
};

/// Opens the system camera at a fixed index through nokhwa's native backend.
pub struct NativeOpener {
    device_index: u32,
}

impl NativeOpener {
    pub fn new(device_index: u32) -> Self {
        Self { device_index }
    }
}

impl DeviceOpener for NativeOpener {
    fn open(&self) -> Result<Box<dyn CaptureDevice>, CameraError> {
        let camera = NativeCamera::open(self.device_index)?;
        Ok(Box::new(camera))
    }
}

/// nokhwa-backed capture device
pub struct NativeCamera {
    camera: CallbackCamera,
    device_id: String,
    open: bool,
}

impl NativeCamera {
    pub fn open(device_index: u32) -> Result<Self, CameraError> {
        log::debug!("Opening native camera at index {}", device_index);

        // Whatever the device offers; no format negotiation.
        let requested_format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::None);

        let mut camera =
            CallbackCamera::new(CameraIndex::Index(device_index), requested_format, |_| {})
                .map_err(|e| {
                    CameraError::InitializationError(format!("Failed to initialize camera: {}", e))
                })?;

        camera.open_stream().map_err(|e| {
            CameraError::InitializationError(format!("Failed to start stream: {}", e))
        })?;

        Ok(Self {
            camera,
            device_id: device_index.to_string(),
            open: true,
        })
    }
}

impl CaptureDevice for NativeCamera {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    fn is_opened(&self) -> bool {
        self.open
    }

    fn read_frame(&mut self) -> Result<CameraFrame, CameraError> {
        if !self.open {
            return Err(CameraError::CaptureError("Camera stream is closed".to_string()));
        }

        let buffer = self
            .camera
            .poll_frame()
            .map_err(|e| CameraError::CaptureError(format!("Failed to capture frame: {}", e)))?;

        // Cameras commonly deliver MJPEG or YUYV; normalize to RGB8.
        let rgb = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::CaptureError(format!("Failed to decode frame: {}", e)))?;

        let (width, height) = (rgb.width(), rgb.height());
        Ok(CameraFrame::new(rgb.into_raw(), width, height, self.device_id.clone()))
    }

    fn release(&mut self) -> Result<(), CameraError> {
        if !self.open {
            return Ok(());
        }
        self.open = false;
        self.camera.stop_stream().map_err(|e| {
            CameraError::InitializationError(format!("Failed to stop stream: {}", e))
        })
    }
}

impl Drop for NativeCamera {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("Failed to release camera {} on drop: {}", self.device_id, e);
        }
    }
}
