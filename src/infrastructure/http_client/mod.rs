use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Instant;
use tracing::{info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::submission::ServiceReply;
use crate::domain::upload::UploadRequest;
use crate::domain::widget_config::WidgetConfig;

pub const FILE_FIELD: &str = "file";
pub const SOURCE_COLUMN_FIELD: &str = "columns";
pub const DEST_COLUMN_FIELD: &str = "new_columns";

/// The processing service as seen from the widget: one POST, one reply.
#[async_trait]
pub trait ProcessingClient {
    async fn upload(&self, request: &UploadRequest) -> Result<ServiceReply>;
}

pub struct ReqwestProcessingClient {
    client: reqwest::Client,
    endpoint: String,
}

impl ReqwestProcessingClient {
    pub fn new(config: &WidgetConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            endpoint: config.endpoint_url.trim().to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn build_form(request: &UploadRequest) -> Result<Form> {
    let part = Part::bytes(request.file_bytes.clone())
        .file_name(request.file_name.clone())
        .mime_str("text/csv")
        .map_err(|e| AppError::TransportError(format!("Invalid file part: {}", e)))?;

    Ok(Form::new()
        .part(FILE_FIELD, part)
        .text(SOURCE_COLUMN_FIELD, request.source_column.clone())
        .text(DEST_COLUMN_FIELD, request.dest_column.clone()))
}

#[async_trait]
impl ProcessingClient for ReqwestProcessingClient {
    async fn upload(&self, request: &UploadRequest) -> Result<ServiceReply> {
        let form = build_form(request)?;
        info!(
            endpoint = %self.endpoint,
            file = %request.file_name,
            bytes = request.file_bytes.len(),
            "Uploading CSV for processing"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, endpoint = %self.endpoint, "Upload request failed");
                AppError::TransportError(format!("Request failed: {}", e))
            })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = response.bytes().await.map_err(|e| {
            warn!(error = %e, status, "Failed to read processing response body");
            AppError::TransportError(format!("Failed to read response body: {}", e))
        })?;

        info!(
            status,
            content_type = content_type.as_deref().unwrap_or("-"),
            body_len = body.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Processing service replied"
        );

        Ok(ServiceReply {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}
