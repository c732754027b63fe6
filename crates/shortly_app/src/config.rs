use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shortly_engine::{ShortenSettings, DEFAULT_ENDPOINT};
use shortly_logging::shortly_info;
use thiserror::Error;

use crate::cli::Cli;

pub const CONFIG_FILENAME: &str = "shortly.ron";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint: String,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout_secs: None,
            request_timeout_secs: None,
        }
    }
}

impl AppConfig {
    pub fn shorten_settings(&self) -> ShortenSettings {
        ShortenSettings {
            endpoint: self.endpoint.clone(),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            ..ShortenSettings::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shortly")
}

/// Loads the config file and applies command-line overrides. An explicit
/// `--config` must exist; the default location is optional.
pub fn resolve(cli: &Cli, data_dir: &Path) -> Result<AppConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load(path)?,
        None => load_optional(&data_dir.join(CONFIG_FILENAME))?,
    };
    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    Ok(config)
}

fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    shortly_info!("Loaded config from {:?}", path);
    Ok(config)
}

fn load_optional(path: &Path) -> Result<AppConfig, ConfigError> {
    match load(path) {
        Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            Ok(AppConfig::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["shortly"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn missing_default_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = resolve(&cli(&[]), temp.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.shorten_settings().request_timeout, None);
    }

    #[test]
    fn reads_partial_file_from_data_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILENAME),
            "(request_timeout_secs: Some(15))",
        )
        .unwrap();

        let config = resolve(&cli(&[]), temp.path()).unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(
            config.shorten_settings().request_timeout,
            Some(Duration::from_secs(15))
        );
    }

    #[test]
    fn cli_endpoint_overrides_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.ron");
        fs::write(&path, "(endpoint: \"https://file.example/api\")").unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        let config = resolve(
            &cli(&["--config", path_arg.as_str(), "--endpoint", "https://cli.example/api"]),
            temp.path(),
        )
        .unwrap();
        assert_eq!(config.endpoint, "https://cli.example/api");
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.ron");
        let path_arg = path.to_string_lossy().into_owned();

        let err = resolve(&cli(&["--config", path_arg.as_str()]), temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CONFIG_FILENAME), "(endpoint: 42)").unwrap();

        let err = resolve(&cli(&[]), temp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
