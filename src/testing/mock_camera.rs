use crate::errors::CameraError;
use crate::platform::{CaptureDevice, DeviceOpener};
use crate::testing::synthetic_data::{synthetic_video_frame, SYNTHETIC_HEIGHT, SYNTHETIC_WIDTH};
use crate::types::CameraFrame;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Behaviour of mock cameras produced by a [`MockOpener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCaptureMode {
    /// Open succeeds and every read returns a synthetic frame
    Success,
    /// Open succeeds, every read fails
    ReadFailure,
    /// Open fails
    OpenFailure,
    /// Open succeeds, the first `n` reads of each device succeed, later reads fail
    FailAfter(u64),
    /// Open succeeds, reads return frames whose buffer is shorter than the
    /// declared dimensions
    CorruptFrame,
}

/// Counters shared by an opener and every device it produced.
#[derive(Debug, Default)]
pub struct MockStats {
    opens: AtomicUsize,
    releases: AtomicUsize,
    reads: AtomicUsize,
}

impl MockStats {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

/// Opener for synthetic cameras. The mode can be changed at any time and
/// applies to devices that are already open.
#[derive(Clone)]
pub struct MockOpener {
    mode: Arc<Mutex<MockCaptureMode>>,
    stats: Arc<MockStats>,
    width: u32,
    height: u32,
    read_delay: Duration,
}

impl MockOpener {
    pub fn new(mode: MockCaptureMode) -> Self {
        Self {
            mode: Arc::new(Mutex::new(mode)),
            stats: Arc::new(MockStats::default()),
            width: SYNTHETIC_WIDTH,
            height: SYNTHETIC_HEIGHT,
            read_delay: Duration::ZERO,
        }
    }

    /// Smaller frames keep encoder-heavy tests fast.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Every read sleeps this long before returning, like a slow device.
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = delay;
        self
    }

    pub fn set_mode(&self, mode: MockCaptureMode) {
        if let Ok(mut current) = self.mode.lock() {
            *current = mode;
        }
    }

    pub fn mode(&self) -> MockCaptureMode {
        current_mode(&self.mode)
    }

    pub fn stats(&self) -> Arc<MockStats> {
        self.stats.clone()
    }
}

fn current_mode(mode: &Mutex<MockCaptureMode>) -> MockCaptureMode {
    mode.lock().map(|m| *m).unwrap_or(MockCaptureMode::OpenFailure)
}

impl DeviceOpener for MockOpener {
    fn open(&self) -> Result<Box<dyn CaptureDevice>, CameraError> {
        if current_mode(&self.mode) == MockCaptureMode::OpenFailure {
            log::debug!("Mock camera refusing to open");
            return Err(CameraError::InitializationError("Could not start camera.".to_string()));
        }

        self.stats.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockCamera {
            mode: self.mode.clone(),
            stats: self.stats.clone(),
            width: self.width,
            height: self.height,
            read_delay: self.read_delay,
            frames_read: 0,
            open: true,
        }))
    }
}

/// Synthetic capture device
pub struct MockCamera {
    mode: Arc<Mutex<MockCaptureMode>>,
    stats: Arc<MockStats>,
    width: u32,
    height: u32,
    read_delay: Duration,
    frames_read: u64,
    open: bool,
}

impl CaptureDevice for MockCamera {
    fn device_id(&self) -> &str {
        "mock"
    }

    fn is_opened(&self) -> bool {
        self.open
    }

    fn read_frame(&mut self) -> Result<CameraFrame, CameraError> {
        if !self.open {
            return Err(CameraError::CaptureError("Camera stream is closed".to_string()));
        }

        if !self.read_delay.is_zero() {
            std::thread::sleep(self.read_delay);
        }

        let mode = current_mode(&self.mode);
        let ok = match mode {
            MockCaptureMode::Success | MockCaptureMode::CorruptFrame => true,
            MockCaptureMode::FailAfter(n) => self.frames_read < n,
            MockCaptureMode::ReadFailure | MockCaptureMode::OpenFailure => false,
        };
        if !ok {
            return Err(CameraError::CaptureError("Mock read failure".to_string()));
        }

        let mut frame = synthetic_video_frame(self.frames_read, self.width, self.height);
        if mode == MockCaptureMode::CorruptFrame {
            frame.data.truncate(frame.data.len() / 2);
        }
        self.frames_read += 1;
        self.stats.reads.fetch_add(1, Ordering::SeqCst);
        Ok(CameraFrame {
            device_id: self.device_id().to_string(),
            ..frame
        })
    }

    fn release(&mut self) -> Result<(), CameraError> {
        if self.open {
            self.open = false;
            self.stats.releases.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_failure_mode() {
        let opener = MockOpener::new(MockCaptureMode::OpenFailure);
        assert!(opener.open().is_err());
        assert_eq!(opener.stats().opens(), 0);
    }

    #[test]
    fn test_fail_after_mode() {
        let opener = MockOpener::new(MockCaptureMode::FailAfter(2)).with_resolution(8, 8);
        let mut device = opener.open().unwrap();
        assert!(device.read_frame().is_ok());
        assert!(device.read_frame().is_ok());
        assert!(device.read_frame().is_err());
        assert_eq!(opener.stats().reads(), 2);
    }

    #[test]
    fn test_mode_change_applies_to_open_device() {
        let opener = MockOpener::new(MockCaptureMode::Success).with_resolution(8, 8);
        let mut device = opener.open().unwrap();
        assert!(device.read_frame().is_ok());
        opener.set_mode(MockCaptureMode::ReadFailure);
        assert_eq!(opener.mode(), MockCaptureMode::ReadFailure);
        assert!(device.read_frame().is_err());
    }

    #[test]
    fn test_corrupt_frame_mode() {
        let opener = MockOpener::new(MockCaptureMode::CorruptFrame).with_resolution(8, 8);
        let mut device = opener.open().unwrap();
        let frame = device.read_frame().unwrap();
        assert_eq!(frame.width, 8);
        assert!(!frame.is_valid());
    }

    #[test]
    fn test_release_counts_once() {
        let opener = MockOpener::new(MockCaptureMode::Success);
        let mut device = opener.open().unwrap();
        device.release().unwrap();
        device.release().unwrap();
        assert_eq!(opener.stats().releases(), 1);
        assert!(device.read_frame().is_err());
    }
}
