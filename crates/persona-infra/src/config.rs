//! Credential and settings loading.
//!
//! Credentials come from the process environment (after an optional `.env`
//! file). Settings come from `config.toml`, falling back to defaults when the
//! file is missing or malformed.

use std::fmt;
use std::path::{Path, PathBuf};

use secrecy::SecretString;

use persona_types::config::{ELEVENLABS_API_KEY, GROQ_API_KEY, OPENAI_API_KEY, Settings};
use persona_types::error::ConfigError;

/// Environment variable overriding the settings directory.
pub const CONFIG_DIR_ENV: &str = "PERSONA_CONFIG_DIR";

/// API keys required at startup.
///
/// Debug output is redacted; the values are only reachable through
/// [`secrecy::ExposeSecret`].
#[derive(Clone)]
pub struct Credentials {
    pub elevenlabs_api_key: SecretString,
    pub openai_api_key: SecretString,
    pub groq_api_key: SecretString,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("elevenlabs_api_key", &"[REDACTED]")
            .field("openai_api_key", &"[REDACTED]")
            .field("groq_api_key", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through `lookup`, checking keys in
    /// [`REQUIRED_CREDENTIALS`](persona_types::config::REQUIRED_CREDENTIALS) order.
    ///
    /// An empty value counts as missing. The first missing key is reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |key: &'static str| -> Result<SecretString, ConfigError> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map(SecretString::from)
                .ok_or(ConfigError::MissingCredential(key))
        };

        Ok(Self {
            elevenlabs_api_key: fetch(ELEVENLABS_API_KEY)?,
            openai_api_key: fetch(OPENAI_API_KEY)?,
            groq_api_key: fetch(GROQ_API_KEY)?,
        })
    }
}

/// Load a `.env` file from the working directory, if one exists.
///
/// Returns the path that was loaded.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!("Loaded environment from {}", path.display());
            Some(path)
        }
        Err(err) if err.not_found() => None,
        Err(err) => {
            tracing::warn!("Failed to load .env: {err}");
            None
        }
    }
}

/// Resolve the settings directory.
///
/// Priority: `PERSONA_CONFIG_DIR`, then `~/.persona`, then `.persona` relative
/// to the working directory.
pub fn resolve_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".persona"))
        .unwrap_or_else(|| PathBuf::from(".persona"))
}

/// Default settings file location inside [`resolve_config_dir`].
pub fn default_settings_path() -> PathBuf {
    resolve_config_dir().join("config.toml")
}

/// Load settings from `path`.
///
/// - Missing file: defaults.
/// - Unreadable or malformed file: logs a warning and returns defaults.
pub async fn load_settings(path: &Path) -> Settings {
    match try_load_settings(path).await {
        Ok(Some(settings)) => settings,
        Ok(None) => {
            tracing::debug!("No settings found at {}, using defaults", path.display());
            Settings::default()
        }
        Err(err) => {
            tracing::warn!("{err}, using defaults");
            Settings::default()
        }
    }
}

/// Load settings from `path`, surfacing read and parse failures.
///
/// Returns `Ok(None)` when the file does not exist.
pub async fn try_load_settings(path: &Path) -> Result<Option<Settings>, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    toml::from_str::<Settings>(&content)
        .map(Some)
        .map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        })
}
