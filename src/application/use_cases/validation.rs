use crate::domain::error::{AppError, Result};
use crate::domain::upload::{AcceptedFile, FileCandidate, RejectionReason};

pub const MISSING_COLUMNS_MESSAGE: &str = "Please enter both column names.";

const CSV_EXTENSION: &str = ".csv";

/// Accepts a candidate iff it exists and its trimmed, lower-cased name ends in `.csv`.
pub fn validate(
    candidate: Option<FileCandidate>,
) -> std::result::Result<AcceptedFile, RejectionReason> {
    let candidate = candidate.ok_or(RejectionReason::Missing)?;
    if !candidate
        .name
        .trim()
        .to_lowercase()
        .ends_with(CSV_EXTENSION)
    {
        return Err(RejectionReason::NotCsv {
            name: candidate.name,
        });
    }
    Ok(AcceptedFile::new(candidate))
}

/// Returns both column names trimmed, or a validation error if either is blank.
pub fn validate_columns(source: &str, dest: &str) -> Result<(String, String)> {
    let source = source.trim();
    let dest = dest.trim();
    if source.is_empty() || dest.is_empty() {
        return Err(AppError::ValidationError(MISSING_COLUMNS_MESSAGE.to_string()));
    }
    Ok((source.to_string(), dest.to_string()))
}
