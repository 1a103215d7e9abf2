//! Voice directory records and the per-session character voice.

use serde::{Deserialize, Serialize};

use crate::character::Character;

/// A voice as listed by the text-to-speech voice directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceEntry {
    pub name: String,
    pub voice_id: String,
}

/// Body of the directory's voice listing endpoint.
///
/// Entries carry many more fields than we read; unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoiceList {
    #[serde(default)]
    pub voices: Vec<VoiceEntry>,
}

/// A character loaded for a session: its prompt text and, once resolved,
/// its synthesized-speech identifier.
///
/// Immutable after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterVoice {
    character: Character,
    prompt: String,
    voice_id: Option<String>,
}

impl CharacterVoice {
    pub fn new(character: Character, prompt: impl Into<String>) -> Self {
        Self {
            character,
            prompt: prompt.into(),
            voice_id: None,
        }
    }

    /// Attach a resolved voice identifier.
    pub fn with_voice_id(self, voice_id: Option<String>) -> Self {
        Self { voice_id, ..self }
    }

    pub fn character(&self) -> Character {
        self.character
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn voice_id(&self) -> Option<&str> {
        self.voice_id.as_deref()
    }
}
