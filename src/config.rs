//! Configuration management for camfeed
//!
//! Settings come from a TOML file with three sections: `[server]` for the
//! listening socket, `[camera]` for device selection and `[storage]` for the
//! still-capture target. A missing file means defaults.

use crate::errors::CameraError;
use crate::types::CameraBackend;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CamfeedConfig {
    pub server: ServerConfig,
    pub camera: CameraConfig,
    pub storage: StorageConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

/// Capture device selection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// System camera index, 0 is the first webcam
    pub device_index: u32,
    pub backend: CameraBackend,
}

/// Where still captures go and how they are encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Fixed capture target, overwritten on every capture
    pub capture_path: PathBuf,
    /// JPEG quality (1-100) for both the live feed and captures
    pub jpeg_quality: u8,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            backend: CameraBackend::Native,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            capture_path: PathBuf::from("captured_frame.jpg"),
            jpeg_quality: 95,
        }
    }
}

impl CamfeedConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CameraError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| CameraError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let config: CamfeedConfig = toml::from_str(&contents)
            .map_err(|e| CameraError::ConfigError(format!("Failed to parse config file: {}", e)))?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CameraError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    CameraError::ConfigError(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| CameraError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| CameraError::ConfigError(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        PathBuf::from("camfeed.toml")
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), CameraError> {
        if self.server.port == 0 {
            return Err(CameraError::ConfigError("Port must be non-zero".to_string()));
        }
        if self.server.bind_address.trim().is_empty() {
            return Err(CameraError::ConfigError("Bind address is empty".to_string()));
        }
        if self.storage.jpeg_quality == 0 || self.storage.jpeg_quality > 100 {
            return Err(CameraError::ConfigError(
                "JPEG quality must be between 1 and 100".to_string(),
            ));
        }
        if self.storage.capture_path.as_os_str().is_empty() {
            return Err(CameraError::ConfigError("Capture path is empty".to_string()));
        }
        Ok(())
    }

    /// `host:port` string for the listener
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}
