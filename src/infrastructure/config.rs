use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::DeletePolicy;

pub const DEFAULT_CONFIG_FILE: &str = "custman.toml";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UiConfig {
    pub delete_policy: DeletePolicy,
    pub clear_form_on_submit: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub file: PathBuf,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig { base_url: "http://localhost:3333".to_string(), timeout_secs: 30 },
            ui: UiConfig { delete_policy: DeletePolicy::OptimisticAlways, clear_form_on_submit: false },
            logging: LoggingConfig { level: "info".to_string(), file: PathBuf::from("custman.log") },
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Builds the configuration from defaults, the TOML file, `CUSTMAN_*`
    /// environment variables and command-line overrides, in that order.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        Self::load_with_env(options, |key| env::var(key).ok())
    }

    fn load_with_env<F>(options: LoadOptions, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match options.config_path {
            Some(path) if !path.exists() => return Err(ConfigError::MissingConfigFile(path)),
            Some(path) => config.apply_patch(read_patch(&path)?),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    config.apply_patch(read_patch(path)?);
                }
            }
        }

        config.apply_env_overrides(lookup)?;
        config.apply_overrides(options.overrides);
        config.api.base_url = config.api.base_url.trim().to_string();
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(api) = patch.api {
            if let Some(base_url) = api.base_url {
                self.api.base_url = base_url;
            }
            if let Some(timeout_secs) = api.timeout_secs {
                self.api.timeout_secs = timeout_secs;
            }
        }

        if let Some(ui) = patch.ui {
            if let Some(delete_policy) = ui.delete_policy {
                self.ui.delete_policy = delete_policy;
            }
            if let Some(clear_form_on_submit) = ui.clear_form_on_submit {
                self.ui.clear_form_on_submit = clear_form_on_submit;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(file) = logging.file {
                self.logging.file = file;
            }
        }
    }

    fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CUSTMAN_API_URL") {
            self.api.base_url = url;
        }
        if let Some(value) = lookup("CUSTMAN_TIMEOUT_SECS") {
            self.api.timeout_secs = value.trim().parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "CUSTMAN_TIMEOUT_SECS".to_string(),
                value: value.clone(),
            })?;
        }
        if let Some(level) = lookup("CUSTMAN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(value) = lookup("CUSTMAN_DELETE_POLICY") {
            self.ui.delete_policy = value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "CUSTMAN_DELETE_POLICY".to_string(),
                value: value.clone(),
            })?;
        }
        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(api_url) = overrides.api_url {
            self.api.base_url = api_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api.base_url.as_str();
        if url.is_empty() {
            return Err(ConfigError::Validation("api.base_url must not be empty".to_string()));
        }
        if url.trim() != url {
            return Err(ConfigError::Validation(format!(
                "api.base_url `{url}` must not have surrounding whitespace"
            )));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "api.base_url `{url}` must start with http:// or https://"
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Validation("api.timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str(&contents).map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    api: Option<ApiPatch>,
    ui: Option<UiPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ApiPatch {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct UiPatch {
    delete_policy: Option<DeletePolicy>,
    clear_form_on_submit: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingPatch {
    level: Option<String>,
    file: Option<PathBuf>,
}
