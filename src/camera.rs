//! Camera lifecycle management
//!
//! [`CameraManager`] owns the single capture device of the process. It is
//! handed to request handlers through shared application state. Opening and
//! releasing go through one state mutex, so at most one device is ever open.
//! Frame reads hold only the device's own lock, and the open state is
//! published through an atomic, so status checks never wait on a read.

use crate::errors::CameraError;
use crate::platform::{CaptureDevice, DeviceOpener};
use crate::types::CameraFrame;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

/// Proof that a consumer attached to a particular open of the camera.
///
/// Each successful open bumps the generation. A lease taken before a release
/// stays invalid even if the camera is opened again later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraLease {
    generation: u64,
}

impl CameraLease {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

type SharedDevice = Arc<Mutex<Box<dyn CaptureDevice>>>;

struct CameraState {
    device: Option<SharedDevice>,
    generation: u64,
}

/// A device busy with a read is open by definition.
fn device_alive(device: &SharedDevice) -> bool {
    match device.try_lock() {
        Ok(d) => d.is_opened(),
        Err(TryLockError::WouldBlock) => true,
        Err(TryLockError::Poisoned(_)) => false,
    }
}

fn lock_device(device: &SharedDevice) -> Result<MutexGuard<'_, Box<dyn CaptureDevice>>, CameraError> {
    device
        .lock()
        .map_err(|_| CameraError::CaptureError("Camera device lock poisoned".to_string()))
}

pub struct CameraManager {
    opener: Arc<dyn DeviceOpener>,
    state: Mutex<CameraState>,
    /// Generation of the open handle, 0 while closed
    open_generation: AtomicU64,
}

impl CameraManager {
    pub fn new(opener: Arc<dyn DeviceOpener>) -> Self {
        Self {
            opener,
            state: Mutex::new(CameraState {
                device: None,
                generation: 0,
            }),
            open_generation: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, CameraState>, CameraError> {
        self.state
            .lock()
            .map_err(|_| CameraError::CaptureError("Camera lock poisoned".to_string()))
    }

    /// Open the device unless an open handle already exists.
    pub fn init(&self) -> Result<CameraLease, CameraError> {
        let mut state = self.lock()?;

        if let Some(device) = &state.device {
            if device_alive(device) {
                return Ok(CameraLease {
                    generation: state.generation,
                });
            }
        }

        // A handle that closed underneath us counts as absent.
        self.open_generation.store(0, Ordering::SeqCst);
        if let Some(stale) = state.device.take() {
            if let Ok(mut device) = stale.lock() {
                let _ = device.release();
            }
        }

        log::debug!("Initializing camera...");
        let device = self.opener.open().map_err(|e| {
            log::error!("Could not start camera: {}", e);
            e
        })?;

        state.generation += 1;
        state.device = Some(Arc::new(Mutex::new(device)));
        self.open_generation.store(state.generation, Ordering::SeqCst);
        log::debug!("Camera initialized (generation {})", state.generation);

        Ok(CameraLease {
            generation: state.generation,
        })
    }

    /// Close the device if one is open. Safe to call repeatedly.
    ///
    /// The handle is detached immediately; closing waits for a read already
    /// in progress to finish.
    pub fn release(&self) -> Result<(), CameraError> {
        let detached = {
            let mut state = self.lock()?;
            self.open_generation.store(0, Ordering::SeqCst);
            state.device.take()
        };

        match detached {
            Some(device) => {
                let mut device = lock_device(&device)?;
                log::debug!("Releasing camera {}...", device.device_id());
                let result = device.release();
                log::debug!("Camera released.");
                result
            }
            None => {
                log::debug!("Camera already released");
                Ok(())
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.open_generation.load(Ordering::SeqCst) != 0
    }

    /// Lease on the current open handle, `None` if the camera is closed.
    pub fn lease(&self) -> Option<CameraLease> {
        match self.open_generation.load(Ordering::SeqCst) {
            0 => None,
            generation => Some(CameraLease { generation }),
        }
    }

    /// Handle for the current open, `None` when closed or when `lease` is stale.
    fn current_device(&self, lease: Option<CameraLease>) -> Result<Option<SharedDevice>, CameraError> {
        let state = self.lock()?;
        if let Some(lease) = lease {
            if lease.generation != state.generation {
                return Ok(None);
            }
        }
        Ok(state.device.clone())
    }

    /// Read one frame from the open handle.
    pub fn read_frame(&self) -> Result<CameraFrame, CameraError> {
        let device = self
            .current_device(None)?
            .ok_or_else(|| CameraError::CaptureError("Camera is not opened".to_string()))?;

        let mut device = lock_device(&device)?;
        if !device.is_opened() {
            return Err(CameraError::CaptureError("Camera is not opened".to_string()));
        }
        device.read_frame()
    }

    /// Read one frame if `lease` still refers to the open handle.
    ///
    /// Returns `Ok(None)` when the camera was released or reopened since the
    /// lease was taken.
    pub fn read_frame_leased(&self, lease: CameraLease) -> Result<Option<CameraFrame>, CameraError> {
        let Some(device) = self.current_device(Some(lease))? else {
            return Ok(None);
        };

        let mut device = lock_device(&device)?;
        if !device.is_opened() {
            return Ok(None);
        }
        device.read_frame().map(Some)
    }
}

impl Drop for CameraManager {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            log::warn!("Failed to release camera on shutdown: {}", e);
        }
    }
}
