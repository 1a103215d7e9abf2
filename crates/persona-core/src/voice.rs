//! Voice directory port and identifier resolution.
//!
//! The directory itself (an HTTP service) lives behind [`VoiceDirectory`];
//! this module only matches names against what it returns.

use std::future::Future;

use tracing::{debug, info};

use persona_types::character::Character;
use persona_types::error::VoiceError;
use persona_types::voice::VoiceEntry;

/// A catalog of synthesized voices.
///
/// Implementations live in persona-infra (e.g., `ElevenLabsVoiceDirectory`).
pub trait VoiceDirectory: Send + Sync {
    /// Fetch every voice the directory knows about.
    fn list_voices(&self) -> impl Future<Output = Result<Vec<VoiceEntry>, VoiceError>> + Send;
}

/// Map a canonical character name (e.g. `George_Carlin`) to the name used
/// in the directory.
///
/// Matching is exact; unknown or differently-cased names map to nothing.
pub fn directory_name_for(name: &str) -> Option<&'static str> {
    Character::ALL
        .iter()
        .find(|c| c.name() == name)
        .map(|c| c.directory_name())
}

/// Find the identifier of the voice registered under `name`.
pub fn find_voice_id(voices: &[VoiceEntry], name: &str) -> Option<String> {
    let directory_name = directory_name_for(name)?;
    voices
        .iter()
        .find(|v| v.name == directory_name)
        .map(|v| v.voice_id.clone())
}

/// Look up the voice identifier for `name`.
///
/// Returns `Ok(None)` when the directory has no matching voice; transport
/// and authentication failures are errors. No retry is attempted.
#[tracing::instrument(name = "resolve_voice_id", skip(directory))]
pub async fn resolve_voice_id<D: VoiceDirectory>(
    directory: &D,
    name: &str,
) -> Result<Option<String>, VoiceError> {
    let voices = directory.list_voices().await?;
    debug!(count = voices.len(), "Voice directory listing received");

    let voice_id = find_voice_id(&voices, name);
    match &voice_id {
        Some(id) => info!(voice_id = %id, "Voice resolved"),
        None => info!("No matching voice in directory"),
    }
    Ok(voice_id)
}
