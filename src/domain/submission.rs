use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";
pub const SUCCESS_MESSAGE: &str = "CSV processed successfully!";
pub const DOWNLOAD_FILE_NAME: &str = "updated.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
    Success,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Error => write!(f, "error"),
            Severity::Success => write!(f, "success"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub text: String,
    pub severity: Severity,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Info)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Error)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(text, Severity::Success)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Message(StatusMessage),
    DownloadableFile(Vec<u8>),
}

/// Raw answer of the processing service, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ServiceReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|value| value.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false)
    }
}

/// JSON body the service sends instead of a file.
///
/// Known statuses are `"error"`, `"success"` and `"no_change"`; only `"error"`
/// is rendered as an error. Both fields accept any JSON value so an odd payload
/// still reaches the user instead of failing to parse.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatusPayload {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
}

impl ServiceStatusPayload {
    pub fn severity(&self) -> Severity {
        match &self.status {
            Some(Value::String(status)) if status == "error" => Severity::Error,
            _ => Severity::Info,
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().and_then(Value::as_str)
    }

    /// Strings are shown as-is, `null` or a missing field as empty text.
    pub fn message_text(&self) -> String {
        match &self.message {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}
