use std::fmt;
use std::path::Path;

use crate::domain::error::{AppError, Result};

/// A file handed over by the picker or the drop zone, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Reads a candidate from disk. The file name is the final path component.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|value| value.to_string_lossy().to_string())
            .ok_or_else(|| {
                AppError::ValidationError(format!("Not a file path: {}", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await?;
        Ok(Self { name, bytes })
    }
}

/// A candidate that passed [`crate::application::use_cases::validation::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedFile(FileCandidate);

impl AcceptedFile {
    pub(crate) fn new(candidate: FileCandidate) -> Self {
        Self(candidate)
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0.bytes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionReason {
    Missing,
    NotCsv { name: String },
}

impl RejectionReason {
    pub const USER_MESSAGE: &'static str = "Please upload a valid .csv file";
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::Missing => write!(f, "no file selected"),
            RejectionReason::NotCsv { name } => write!(f, "{} is not a .csv file", name),
        }
    }
}

/// What the user has picked and typed so far. Lives for the whole session.
#[derive(Debug, Clone, Default)]
pub struct PendingSelection {
    pub file: Option<AcceptedFile>,
    pub source_column: String,
    pub dest_column: String,
}

impl PendingSelection {
    pub fn source_column(&self) -> &str {
        self.source_column.trim()
    }

    pub fn dest_column(&self) -> &str {
        self.dest_column.trim()
    }
}

/// One multipart POST to the processing service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub file_name: String,
    pub file_bytes: Vec<u8>,
    /// Sent as the `columns` field.
    pub source_column: String,
    /// Sent as the `new_columns` field.
    pub dest_column: String,
}

impl UploadRequest {
    pub fn new(file: &AcceptedFile, source_column: &str, dest_column: &str) -> Self {
        Self {
            file_name: file.name().to_string(),
            file_bytes: file.bytes().to_vec(),
            source_column: source_column.to_string(),
            dest_column: dest_column.to_string(),
        }
    }
}
