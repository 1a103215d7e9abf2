//! ElevenLabs voice directory client.
//!
//! Implements [`VoiceDirectory`] by listing the voices registered under the
//! account that owns the API key.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use persona_core::voice::VoiceDirectory;
use persona_types::error::VoiceError;
use persona_types::voice::{VoiceEntry, VoiceList};

/// Header carrying the ElevenLabs API key.
const API_KEY_HEADER: &str = "xi-api-key";

/// HTTP client for the voice listing endpoint.
///
/// Does NOT derive Debug to keep the API key out of logs.
pub struct ElevenLabsVoiceDirectory {
    http: reqwest::Client,
    url: String,
    api_key: SecretString,
}

impl ElevenLabsVoiceDirectory {
    /// Create a client for the listing endpoint at `url`.
    pub fn new(url: impl Into<String>, api_key: SecretString) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("persona/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            http,
            url: url.into(),
            api_key,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl VoiceDirectory for ElevenLabsVoiceDirectory {
    async fn list_voices(&self) -> Result<Vec<VoiceEntry>, VoiceError> {
        debug!(url = %self.url, "Fetching voice directory");

        let response = self
            .http
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| VoiceError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(VoiceError::AuthenticationFailed);
        }
        if !status.is_success() {
            return Err(VoiceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| VoiceError::Transport(e.to_string()))?;

        let list: VoiceList =
            serde_json::from_str(&body).map_err(|e| VoiceError::Deserialization(e.to_string()))?;

        Ok(list.voices)
    }
}
