#[cfg(test)]
mod error_tests {
    use camfeed::errors::CameraError;
    use std::error::Error;

    #[test]
    fn test_camera_error_display() {
        let error = CameraError::InitializationError("Could not start camera.".to_string());
        assert_eq!(
            error.to_string(),
            "Camera initialization error: Could not start camera."
        );

        let error = CameraError::CaptureError("Display test".to_string());
        assert_eq!(format!("{}", error), "Capture error: Display test");
    }

    #[test]
    fn test_camera_error_debug_format() {
        let error = CameraError::EncodingError("Debug test".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("EncodingError"));
        assert!(debug_str.contains("Debug test"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let error: CameraError = io.into();
        assert!(matches!(error, CameraError::IoError(_)));
        assert!(error.to_string().contains("read-only"));
    }

    #[test]
    fn test_all_error_variants() {
        let errors = vec![
            CameraError::InitializationError("Init error".to_string()),
            CameraError::CaptureError("Capture error".to_string()),
            CameraError::EncodingError("Encoding error".to_string()),
            CameraError::IoError("IO error".to_string()),
            CameraError::ConfigError("Config error".to_string()),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
            assert!(error.source().is_none());

            // Errors cross spawn_blocking boundaries
            let boxed: Box<dyn Error + Send + Sync> = Box::new(error);
            assert!(!boxed.to_string().is_empty());
        }
    }
}
