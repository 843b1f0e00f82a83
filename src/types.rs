use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single decoded frame from a capture device.
///
/// `data` holds tightly packed RGB8 pixels, `width * height * 3` bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraFrame {
    pub id: String,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub size_bytes: usize,
}

impl CameraFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, device_id: String) -> Self {
        let size_bytes = data.len();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            data,
            width,
            height,
            format: "RGB8".to_string(),
            device_id,
            timestamp: Utc::now(),
            size_bytes,
        }
    }

    /// True when the buffer length matches the declared RGB8 dimensions.
    pub fn is_valid(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.data.len() == (self.width as usize) * (self.height as usize) * 3
    }
}

/// Which capture backend the camera manager opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CameraBackend {
    #[default]
    Native,
    Mock,
}

impl CameraBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraBackend::Native => "native",
            CameraBackend::Mock => "mock",
        }
    }
}

impl std::str::FromStr for CameraBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(CameraBackend::Native),
            "mock" => Ok(CameraBackend::Mock),
            other => Err(format!("Unknown camera backend: {}", other)),
        }
    }
}
