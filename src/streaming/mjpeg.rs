//! Motion JPEG framing
//!
//! Browsers render `multipart/x-mixed-replace` bodies natively: each part
//! replaces the previous image, so `<img src="/video_feed/">` is all the client
//! needs.

use crate::errors::CameraError;
use crate::types::CameraFrame;
use bytes::{BufMut, Bytes, BytesMut};
use image::codecs::jpeg::JpegEncoder;

/// Boundary marker between multipart parts
pub const MJPEG_BOUNDARY: &str = "frame";

/// Content type of the live feed response
pub const MJPEG_CONTENT_TYPE: &str = "multipart/x-mixed-replace; boundary=frame";

/// Encode an RGB8 frame as JPEG at the given quality (1-100).
pub fn encode_jpeg(frame: &CameraFrame, quality: u8) -> Result<Vec<u8>, CameraError> {
    let img = image::RgbImage::from_vec(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| {
            CameraError::EncodingError("Failed to create image from frame data".to_string())
        })?;

    let mut jpeg = Vec::with_capacity(frame.data.len() / 8);
    let encoder = JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100));
    image::DynamicImage::ImageRgb8(img).write_with_encoder(encoder)?;

    Ok(jpeg)
}

/// Wrap JPEG bytes as one multipart part:
/// `--frame\r\nContent-Type: image/jpeg\r\n\r\n<jpeg>\r\n`
pub fn multipart_chunk(jpeg: &[u8]) -> Bytes {
    let header = format!("--{}\r\nContent-Type: image/jpeg\r\n\r\n", MJPEG_BOUNDARY);

    let mut chunk = BytesMut::with_capacity(header.len() + jpeg.len() + 2);
    chunk.put_slice(header.as_bytes());
    chunk.put_slice(jpeg);
    chunk.put_slice(b"\r\n");
    chunk.freeze()
}
