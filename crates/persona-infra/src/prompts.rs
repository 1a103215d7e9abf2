//! Character prompt loading.
//!
//! Each character has one `<Name>.txt` file in the prompts directory. A
//! missing file is not fatal: the session continues with an empty character
//! prompt.

use std::path::{Path, PathBuf};

use tracing::warn;

use persona_types::character::Character;
use persona_types::voice::CharacterVoice;

/// Path of `character`'s prompt file inside `prompts_dir`.
pub fn prompt_path(prompts_dir: &Path, character: Character) -> PathBuf {
    prompts_dir.join(character.prompt_file_name())
}

/// Read `character`'s prompt text, or an empty string if the file is absent
/// or unreadable.
pub async fn load_character_prompt(prompts_dir: &Path, character: Character) -> String {
    let path = prompt_path(prompts_dir, character);
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) => {
            warn!("Failed to read prompt file {}: {err}, using empty prompt", path.display());
            String::new()
        }
    }
}

/// Load `character` with its prompt text. The voice identifier is left
/// unresolved.
pub async fn load_character_voice(prompts_dir: &Path, character: Character) -> CharacterVoice {
    let prompt = load_character_prompt(prompts_dir, character).await;
    CharacterVoice::new(character, prompt)
}
