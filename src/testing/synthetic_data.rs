//! Synthetic frame data for offline runs and tests

use crate::types::CameraFrame;

/// Default mock resolution, matching a typical VGA webcam
pub const SYNTHETIC_WIDTH: u32 = 640;
pub const SYNTHETIC_HEIGHT: u32 = 480;

/// Create a synthetic RGB8 frame whose gradient shifts with `frame_number`.
pub fn synthetic_video_frame(frame_number: u64, width: u32, height: u32) -> CameraFrame {
    let mut data = vec![0u8; (width * height * 3) as usize];

    let base = (frame_number % 256) as u8;
    for y in 0..height {
        for x in 0..width {
            let idx = ((y * width + x) * 3) as usize;
            data[idx] = base.wrapping_add((x % 256) as u8);
            data[idx + 1] = base.wrapping_add((y % 256) as u8);
            data[idx + 2] = base.wrapping_add(((x + y) % 256) as u8);
        }
    }

    CameraFrame::new(data, width, height, "synthetic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_video_frame_correct_size() {
        let frame = synthetic_video_frame(0, 320, 240);
        assert_eq!(frame.width, 320);
        assert_eq!(frame.height, 240);
        assert_eq!(frame.data.len(), 320 * 240 * 3);
        assert!(frame.is_valid());
    }

    #[test]
    fn test_synthetic_video_frames_differ() {
        let frame0 = synthetic_video_frame(0, 32, 24);
        let frame1 = synthetic_video_frame(1, 32, 24);
        assert_ne!(frame0.data[0], frame1.data[0]);
    }
}
