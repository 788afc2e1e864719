use std::sync::Arc;

use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::{TransferUseCase, UploadWidget};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::downloads::DirectoryDownloads;
use crate::infrastructure::http_client::ReqwestProcessingClient;
use crate::interfaces::console::{run_console, ConsoleView, HELP};

pub async fn run() -> Result<()> {
    let _ = dotenvy::dotenv();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config = ConfigService::new().load().map_err(|err| {
        error!(error = %err, "Failed to load widget config");
        err
    })?;
    info!(
        endpoint = %config.endpoint_url,
        download_dir = %config.download_dir.display(),
        "Upload widget starting"
    );

    println!("{}", HELP);
    let client = Arc::new(ReqwestProcessingClient::new(&config)?);
    let downloads = Arc::new(DirectoryDownloads::new(config.download_dir.clone()));
    let mut widget = UploadWidget::new(
        TransferUseCase::new(client),
        downloads,
        ConsoleView::stdout(),
        config.download_delay(),
    );

    run_console(&mut widget, BufReader::new(tokio::io::stdin()))
        .await
        .map_err(AppError::from)
}
