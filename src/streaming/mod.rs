pub mod mjpeg;
pub mod producer;

pub use mjpeg::{encode_jpeg, multipart_chunk, MJPEG_BOUNDARY, MJPEG_CONTENT_TYPE};
pub use producer::FrameProducer;
