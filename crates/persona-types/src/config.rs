//! Settings types for Persona.
//!
//! `Settings` represents the optional `config.toml`. Every field has a
//! default, so an empty or missing file yields a working configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::llm::Backend;

/// Environment variable holding the text-to-speech service key.
pub const ELEVENLABS_API_KEY: &str = "ELEVENLABS_API_KEY";

/// Environment variable holding the general OpenAI key.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Environment variable holding the Groq inference key.
pub const GROQ_API_KEY: &str = "GROQ_API_KEY";

/// Every credential that must be present at startup, in check order.
pub const REQUIRED_CREDENTIALS: [&str; 3] = [ELEVENLABS_API_KEY, OPENAI_API_KEY, GROQ_API_KEY];

/// Top-level settings, loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Which inference backend the agent talks to.
    #[serde(default)]
    pub backend: Backend,

    /// Model override. `None` uses the backend's default model.
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Directory holding one `<Character>.txt` prompt per character.
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,

    /// Voice listing endpoint of the text-to-speech directory.
    #[serde(default = "default_voice_directory_url")]
    pub voice_directory_url: String,
}

fn default_temperature() -> f64 {
    0.75
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_prompts_dir() -> PathBuf {
    PathBuf::from("prompts")
}

fn default_voice_directory_url() -> String {
    "https://api.elevenlabs.io/v1/voices".to_string()
}

impl Settings {
    /// The model to request: the explicit override, else the backend default.
    pub fn effective_model(&self) -> String {
        self.model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.backend.default_model().to_string())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            model: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            prompts_dir: default_prompts_dir(),
            voice_directory_url: default_voice_directory_url(),
        }
    }
}
