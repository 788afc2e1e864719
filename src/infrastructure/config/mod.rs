use std::path::PathBuf;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::widget_config::WidgetConfig;

pub const CONFIG_FILE_NAME: &str = "csv-upload.toml";
pub const CONFIG_PATH_VAR: &str = "CSV_UPLOAD_CONFIG";
pub const ENV_PREFIX: &str = "CSV_UPLOAD_";

pub struct ConfigService {
    config_path: PathBuf,
}

impl ConfigService {
    pub fn new() -> Self {
        let config_path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE_NAME));
        Self { config_path }
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Defaults, then the TOML file if present, then `CSV_UPLOAD_*` variables.
    pub fn figment(&self) -> Figment {
        Figment::from(Serialized::defaults(WidgetConfig::default()))
            .merge(Toml::file(&self.config_path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load(&self) -> Result<WidgetConfig> {
        let config: WidgetConfig = self
            .figment()
            .extract()
            .map_err(|err| AppError::ConfigError(err.to_string()))?;
        check_endpoint(&config.endpoint_url)?;
        debug!(
            endpoint = %config.endpoint_url,
            config_path = %self.config_path.display(),
            "Widget config loaded"
        );
        Ok(config)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn check_endpoint(endpoint: &str) -> Result<()> {
    let url = url::Url::parse(endpoint.trim()).map_err(|err| {
        AppError::ConfigError(format!("Invalid endpoint URL {:?}: {}", endpoint, err))
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::ConfigError(format!(
            "Unsupported endpoint scheme {:?}",
            other
        ))),
    }
}
