use crate::camera::{CameraLease, CameraManager};
use crate::streaming::mjpeg::{encode_jpeg, multipart_chunk};
use bytes::Bytes;
use futures::Stream;
use std::convert::Infallible;
use std::sync::Arc;

/// Pull-based source of multipart JPEG chunks bound to one camera lease.
///
/// Every pull reads a single frame. The sequence ends for good when the lease
/// goes stale (camera released or reopened), a read fails, or encoding fails.
pub struct FrameProducer {
    camera: Arc<CameraManager>,
    lease: CameraLease,
    jpeg_quality: u8,
    frames_sent: u64,
    finished: bool,
}

impl FrameProducer {
    /// Attach to the currently open camera. `None` if nothing is open.
    pub fn attach(camera: Arc<CameraManager>, jpeg_quality: u8) -> Option<Self> {
        let lease = camera.lease()?;
        Some(Self::with_lease(camera, lease, jpeg_quality))
    }

    pub fn with_lease(camera: Arc<CameraManager>, lease: CameraLease, jpeg_quality: u8) -> Self {
        log::debug!("Frame producer attached to camera generation {}", lease.generation());
        Self {
            camera,
            lease,
            jpeg_quality,
            frames_sent: 0,
            finished: false,
        }
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Produce the next chunk; blocks on the device read.
    pub fn next_chunk(&mut self) -> Option<Bytes> {
        if self.finished {
            return None;
        }

        let chunk = match self.camera.read_frame_leased(self.lease) {
            Ok(Some(frame)) => match encode_jpeg(&frame, self.jpeg_quality) {
                Ok(jpeg) => Some(multipart_chunk(&jpeg)),
                Err(e) => {
                    log::error!("Failed to encode frame to JPEG: {}", e);
                    None
                }
            },
            Ok(None) => {
                log::debug!("Camera is not opened or has been released.");
                None
            }
            Err(e) => {
                log::error!("Failed to read frame from camera: {}", e);
                None
            }
        };

        match chunk {
            Some(chunk) => {
                self.frames_sent += 1;
                Some(chunk)
            }
            None => {
                self.finished = true;
                log::debug!("Frame producer finished after {} frames", self.frames_sent);
                None
            }
        }
    }

    /// Async body stream; each pull runs on the blocking pool. Dropping the
    /// stream (client disconnect) stops further reads.
    pub fn into_stream(self) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
        futures::stream::unfold(self, |mut producer| async move {
            let pulled = tokio::task::spawn_blocking(move || {
                let chunk = producer.next_chunk();
                (producer, chunk)
            })
            .await;

            match pulled {
                Ok((producer, Some(chunk))) => Some((Ok(chunk), producer)),
                Ok((_, None)) => None,
                Err(e) => {
                    log::error!("Frame producer task failed: {}", e);
                    None
                }
            }
        })
    }
}

impl Iterator for FrameProducer {
    type Item = Bytes;

    fn next(&mut self) -> Option<Bytes> {
        self.next_chunk()
    }
}
