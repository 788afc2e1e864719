use std::sync::Arc;
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::submission::{
    ServiceReply, ServiceStatusPayload, StatusMessage, SubmissionResult,
};
use crate::domain::upload::{AcceptedFile, UploadRequest};
use crate::infrastructure::http_client::ProcessingClient;

pub struct TransferUseCase {
    client: Arc<dyn ProcessingClient + Send + Sync>,
}

impl TransferUseCase {
    pub fn new(client: Arc<dyn ProcessingClient + Send + Sync>) -> Self {
        Self { client }
    }

    pub async fn submit(
        &self,
        file: &AcceptedFile,
        source_column: &str,
        dest_column: &str,
    ) -> Result<SubmissionResult> {
        let request = UploadRequest::new(file, source_column, dest_column);
        let reply = self.client.upload(&request).await?;
        interpret_reply(reply)
    }
}

/// JSON bodies win over the HTTP status; otherwise non-2xx fails and 2xx is the file.
pub fn interpret_reply(reply: ServiceReply) -> Result<SubmissionResult> {
    if reply.is_json() {
        let payload: ServiceStatusPayload = serde_json::from_slice(&reply.body).map_err(|e| {
            AppError::ParseError(format!("Invalid JSON from processing service: {}", e))
        })?;
        debug!(
            http_status = reply.status,
            service_status = payload.status().unwrap_or("-"),
            "Processing service sent a status message"
        );
        return Ok(SubmissionResult::Message(StatusMessage::new(
            payload.message_text(),
            payload.severity(),
        )));
    }

    if !reply.is_success() {
        return Err(AppError::ProcessingFailed {
            status: reply.status,
        });
    }

    Ok(SubmissionResult::DownloadableFile(reply.body))
}
