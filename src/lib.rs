//! camfeed: browser-controlled webcam streaming
//!
//! A small HTTP front-end around one capture device. A browser can start and
//! stop the camera, watch a live MJPEG feed and save a still frame to disk.
//!
//! # Features
//! - Lazily opened, idempotently released camera owned by application state
//! - Pull-based MJPEG producer bound to a lease on the open camera
//! - Per-browser streaming flag kept in cookie sessions
//! - Native capture through nokhwa, or a synthetic mock camera
//!
//! # Usage
//! ```rust,no_run
//! use camfeed::{opener_for, AppState, CameraManager, CamfeedConfig};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), camfeed::CameraError> {
//! let config = CamfeedConfig::load_from_file(CamfeedConfig::default_path())?;
//! let camera = Arc::new(CameraManager::new(opener_for(&config.camera)?));
//! camfeed::web::serve(AppState::new(camera, config)).await
//! # }
//! ```
pub mod camera;
pub mod commands;
pub mod config;
pub mod errors;
pub mod platform;
pub mod streaming;
pub mod testing;
pub mod types;
pub mod web;

pub use camera::{CameraLease, CameraManager};
pub use config::CamfeedConfig;
pub use errors::CameraError;
pub use platform::{opener_for, CaptureDevice, DeviceOpener};
pub use streaming::FrameProducer;
pub use types::{CameraBackend, CameraFrame};
pub use web::{router, AppState};

/// Initialize logging for the server
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "camfeed=debug");
    }
    let _ = env_logger::try_init();
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod lib_tests {
    use super::*;

    #[test]
    fn test_crate_name() {
        assert_eq!(NAME, "camfeed");
        assert!(!VERSION.is_empty());
    }
}
