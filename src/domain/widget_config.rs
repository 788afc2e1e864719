use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    pub endpoint_url: String,
    /// Zero disables the client-side timeout.
    pub request_timeout_secs: u64,
    pub download_dir: PathBuf,
    pub download_delay_ms: u64,
}

impl WidgetConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        if self.request_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.request_timeout_secs))
        }
    }

    pub fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms)
    }
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "http://127.0.0.1:8000/upload_file".to_string(),
            request_timeout_secs: 120,
            download_dir: PathBuf::from("."),
            download_delay_ms: 600,
        }
    }
}
