//! Testing utilities for camfeed
//!
//! A synthetic camera backend so the server and its tests run without
//! capture hardware.

pub mod mock_camera;
pub mod synthetic_data;

pub use mock_camera::{MockCamera, MockCaptureMode, MockOpener, MockStats};
pub use synthetic_data::synthetic_video_frame;
