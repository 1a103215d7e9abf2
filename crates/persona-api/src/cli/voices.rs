//! `persona voices`, `persona voice <name>`, and `persona audio`.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use persona_core::voice::resolve_voice_id;
use persona_infra::config::Credentials;
use persona_infra::voice::ElevenLabsVoiceDirectory;
use persona_types::audio::AudioCaptureConfig;
use persona_types::character::Character;
use persona_types::config::Settings;

/// List every supported character with its known voice ID.
pub fn list_voices(json: bool) -> anyhow::Result<()> {
    if json {
        let entries: Vec<_> = Character::ALL
            .iter()
            .map(|c| {
                serde_json::json!({
                    "name": c.name(),
                    "prompt_file": c.prompt_file_name(),
                    "voice_id": c.known_voice_id(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Character").fg(Color::White),
        Cell::new("Prompt file").fg(Color::White),
        Cell::new("Voice ID").fg(Color::White),
    ]);

    for (i, character) in Character::ALL.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).fg(Color::DarkGrey),
            Cell::new(character.display_name()).fg(Color::Cyan),
            Cell::new(character.prompt_file_name()),
            Cell::new(character.known_voice_id()).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Resolve one character's voice ID through the voice directory.
pub async fn lookup_voice(
    settings: &Settings,
    credentials: &Credentials,
    character: Character,
    json: bool,
) -> anyhow::Result<()> {
    let name = character.name();
    let directory = ElevenLabsVoiceDirectory::new(
        settings.voice_directory_url.clone(),
        credentials.elevenlabs_api_key.clone(),
    );
    let voice_id = resolve_voice_id(&directory, name).await?;

    if json {
        let out = serde_json::json!({ "name": name, "voice_id": voice_id });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match voice_id {
        Some(id) => println!(
            "  {} {}: {}",
            style("*").cyan().bold(),
            style(character.display_name()).bold(),
            style(id).yellow()
        ),
        None => println!(
            "  {} No matching voice found for {}",
            style("i").blue().bold(),
            style(character.display_name()).bold()
        ),
    }
    Ok(())
}

/// Print the audio capture parameters.
pub fn show_audio(json: bool) -> anyhow::Result<()> {
    let audio = AudioCaptureConfig::default();

    if json {
        let out = serde_json::json!({
            "bits_per_sample": audio.format.bits_per_sample(),
            "channels": audio.channels,
            "sample_rate": audio.sample_rate,
            "chunk_size": audio.chunk_size,
            "silence_threshold": audio.silence_threshold,
            "silence_duration_ms": audio.silence_duration.as_millis() as u64,
            "pre_speech_buffer_ms": audio.pre_speech_buffer.as_millis() as u64,
            "silence_chunks": audio.silence_chunks(),
            "pre_speech_chunks": audio.pre_speech_chunks(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    let rows = [
        ("Format", format!("{}-bit PCM", audio.format.bits_per_sample())),
        ("Channels", audio.channels.to_string()),
        ("Sample rate", format!("{} Hz", audio.sample_rate)),
        ("Chunk size", format!("{} samples", audio.chunk_size)),
        ("Silence threshold", audio.silence_threshold.to_string()),
        (
            "Silence duration",
            format!(
                "{:.1}s ({} chunks)",
                audio.silence_duration.as_secs_f64(),
                audio.silence_chunks()
            ),
        ),
        (
            "Pre-speech buffer",
            format!(
                "{:.1}s ({} chunks)",
                audio.pre_speech_buffer.as_secs_f64(),
                audio.pre_speech_chunks()
            ),
        ),
    ];

    println!();
    println!("  {}", style("Audio capture").bold());
    println!();
    for (label, value) in rows {
        println!("  {} {}", style(format!("{label:<18}")).dim(), value);
    }
    println!();
    Ok(())
}
