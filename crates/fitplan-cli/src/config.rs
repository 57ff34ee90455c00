//! Configuration file management for fitplan.
//!
//! Provides a TOML-based config file at `~/.config/fitplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use fitplan_core::model::GeminiConfig;
use fitplan_core::model::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const MODEL_ENV: &str = "FITPLAN_MODEL";

pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8501;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub provider: ProviderSection,
    #[serde(default)]
    pub server: ServerSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProviderSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Startup configuration problems. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "no model API key found; set GOOGLE_API_KEY (or add it to .env) or run `fitplan init --api-key <KEY>`"
    )]
    MissingApiKey,

    #[error("GOOGLE_API_KEY is set but empty")]
    EmptyApiKey,

    #[error("failed to read config file at {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config file at {path}: {source}")]
    InvalidFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the fitplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/fitplan` or `~/.config/fitplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("fitplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("fitplan")
}

/// Return the path to the fitplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load the config file.
///
/// A missing file is `Ok(None)`; a file that cannot be read or does not
/// parse is an error.
pub fn load_config() -> Result<Option<ConfigFile>, ConfigError> {
    let path = config_path();
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => return Err(ConfigError::Unreadable { path, source }),
    };
    toml::from_str(&contents)
        .map(Some)
        .map_err(|source| ConfigError::InvalidFile { path, source })
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    // The file may hold the API key.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values read from the environment, split out so resolution is testable.
#[derive(Debug, Default)]
pub struct EnvValues {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl EnvValues {
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok(),
            model: std::env::var(MODEL_ENV).ok(),
        }
    }
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct FitplanConfig {
    pub gemini: GeminiConfig,
    pub bind: String,
    pub port: u16,
}

impl FitplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `GOOGLE_API_KEY` env > `provider.api_key` > error
    /// - Model: `cli_model` > `FITPLAN_MODEL` env > `provider.model` > `gemini-1.5-flash-latest`
    pub fn resolve(cli_model: Option<&str>) -> Result<Self, ConfigError> {
        let file = load_config()?;
        Self::resolve_with(cli_model, EnvValues::from_env(), file)
    }

    pub fn resolve_with(
        cli_model: Option<&str>,
        env: EnvValues,
        file: Option<ConfigFile>,
    ) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();

        let api_key = match env.api_key {
            Some(key) if key.trim().is_empty() => return Err(ConfigError::EmptyApiKey),
            Some(key) => key,
            None => file
                .provider
                .api_key
                .filter(|k| !k.trim().is_empty())
                .ok_or(ConfigError::MissingApiKey)?,
        };

        let model = cli_model
            .map(str::to_owned)
            .or(env.model)
            .or(file.provider.model)
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned());

        let gemini = GeminiConfig {
            api_key,
            model,
            base_url: file
                .provider
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            timeout: file
                .provider
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_TIMEOUT),
        };

        Ok(Self {
            gemini,
            bind: file.server.bind.unwrap_or_else(|| DEFAULT_BIND.to_owned()),
            port: file.server.port.unwrap_or(DEFAULT_PORT),
        })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
