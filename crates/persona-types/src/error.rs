use thiserror::Error;

/// Errors raised while loading credentials and settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingCredential(&'static str),

    #[error("failed to read settings file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("failed to parse settings file '{path}': {message}")]
    Parse { path: String, message: String },
}

/// Errors from the text-to-speech voice directory.
#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("voice directory request failed: {0}")]
    Transport(String),

    #[error("voice directory rejected the API key")]
    AuthenticationFailed,

    #[error("voice directory returned status {status}")]
    Status { status: u16 },

    #[error("failed to decode voice directory response: {0}")]
    Deserialization(String),
}
