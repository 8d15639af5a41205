//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.smokeland/config.toml` unless `--config` points
//! elsewhere. If the default file is missing on first run, a commented-out
//! default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct SmokelandConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneralConfig {
    pub bot_name: Option<String>,
    pub skip_login: Option<bool>,
    pub upload_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiConfig {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_ENDPOINT: &str =
    "https://smokeland-304959215088.us-central1.run.app/api/query";
pub const DEFAULT_BOT_NAME: &str = "Smokeland Bot";
pub const DEFAULT_UPLOAD_DELAY_MS: u64 = 1500;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub endpoint: String,
    pub bot_name: String,
    pub skip_login: bool,
    pub upload_delay: Duration,
    /// `None` waits on a request indefinitely.
    pub request_timeout: Option<Duration>,
}

/// Values given on the command line. `None`/`false` means "not specified".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub skip_login: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.smokeland/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".smokeland").join("config.toml"))
}

/// Load config from `explicit` if given, otherwise from [`config_path`].
///
/// A missing default file is generated and treated as empty. A missing
/// explicit file is an error, since the user asked for it by name.
pub fn load_config(explicit: Option<&Path>) -> Result<SmokelandConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(SmokelandConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(SmokelandConfig::default());
    }

    read_config(&path)
}

fn read_config(path: &Path) -> Result<SmokelandConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SmokelandConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Smokeland Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# bot_name = "Smokeland Bot"        # Or set SMOKELAND_BOT_NAME
# skip_login = false                # Start directly in the chat window
# upload_delay_ms = 1500            # Simulated image upload delay

# [api]
# endpoint = "https://smokeland-304959215088.us-central1.run.app/api/query"
#                                   # Or set SMOKELAND_ENDPOINT / --endpoint
# timeout_secs = 60                 # Unset = wait forever
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &SmokelandConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &SmokelandConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Endpoint: CLI → env → config → default
    let endpoint = cli
        .endpoint
        .clone()
        .or_else(|| env("SMOKELAND_ENDPOINT"))
        .or_else(|| config.api.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    // Bot name: env → config → default
    let bot_name = env("SMOKELAND_BOT_NAME")
        .or_else(|| config.general.bot_name.clone())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BOT_NAME.to_string());

    let skip_login = cli.skip_login || config.general.skip_login.unwrap_or(false);

    let upload_delay = Duration::from_millis(
        config
            .general
            .upload_delay_ms
            .unwrap_or(DEFAULT_UPLOAD_DELAY_MS),
    );

    // A zero timeout would fail every request, so treat it as unset.
    let request_timeout = config
        .api
        .timeout_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);

    ResolvedConfig {
        endpoint,
        bot_name,
        skip_login,
        upload_delay,
        request_timeout,
    }
}
