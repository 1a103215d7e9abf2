//! Chat session setup and the read-query/print-response loop.
//!
//! Setup picks the character, reads optional guidance, resolves the voice
//! ID, and builds the agent. The loop then sends each query and prints the
//! reply until EOF or `/exit`.

use std::time::{Duration, Instant};

use console::style;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use persona_core::agent::Agent;
use persona_core::agent::prompt::SystemPromptBuilder;
use persona_core::voice::resolve_voice_id;
use persona_infra::config::Credentials;
use persona_infra::llm::create_provider;
use persona_infra::prompts::load_character_voice;
use persona_infra::voice::ElevenLabsVoiceDirectory;
use persona_types::character::Character;
use persona_types::chat::AgentConfig;
use persona_types::config::Settings;
use persona_types::llm::{LlmError, Usage};

use crate::cli::ChatArgs;
use crate::cli::menu;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer;

/// Label shown for replies when no character is selected.
const ASSISTANT_NAME: &str = "Assistant";

/// Set up a session from `args` and run the chat loop.
pub async fn run_chat(
    args: ChatArgs,
    settings: &Settings,
    credentials: &Credentials,
) -> anyhow::Result<()> {
    let mut settings = settings.clone();
    if let Some(backend) = args.backend {
        settings.backend = backend;
    }
    if args.model.is_some() {
        settings.model = args.model.clone();
    }
    let settings = &settings;
    let backend = settings.backend;
    let model = settings.effective_model();

    let (speaker, system_prompt, voice_id) = if args.assistant {
        (ASSISTANT_NAME.to_string(), SystemPromptBuilder::assistant(), None)
    } else {
        let character = match args.character {
            Some(character) => character,
            None => menu::pick_character()?,
        };
        let guidance = match args.guidance {
            Some(guidance) => guidance,
            None => menu::prompt_guidance()?,
        };

        let voice = load_character_voice(&settings.prompts_dir, character).await;
        let voice = if args.no_voice_lookup {
            voice
        } else {
            let voice_id = lookup_voice_id(settings, credentials, character).await;
            voice.with_voice_id(voice_id)
        };

        let system_prompt = SystemPromptBuilder::build(voice.prompt(), &guidance);
        (
            character.display_name(),
            system_prompt,
            voice.voice_id().map(str::to_string),
        )
    };

    info!(%backend, %model, speaker = %speaker, "Starting chat session");

    let provider = create_provider(backend, credentials, &model);
    let config = AgentConfig {
        model: model.clone(),
        temperature: settings.temperature,
        max_tokens: settings.max_tokens,
    };
    let agent = Agent::new(provider, config, system_prompt);

    print_welcome_banner(&speaker, &model, &backend.to_string(), voice_id.as_deref());

    run_chat_loop(agent, &speaker, !args.no_stream).await
}

/// Resolve `character`'s voice ID, reporting the outcome on the console.
///
/// Directory failures are reported and yield `None`; the session continues
/// without a voice.
async fn lookup_voice_id(
    settings: &Settings,
    credentials: &Credentials,
    character: Character,
) -> Option<String> {
    let directory = ElevenLabsVoiceDirectory::new(
        settings.voice_directory_url.clone(),
        credentials.elevenlabs_api_key.clone(),
    );

    let spinner = spinner("looking up voice...");
    let result = resolve_voice_id(&directory, character.name()).await;
    spinner.finish_and_clear();

    match result {
        Ok(Some(voice_id)) => {
            println!("  {} Voice ID: {}", style("*").cyan().bold(), style(&voice_id).yellow());
            Some(voice_id)
        }
        Ok(None) => {
            println!(
                "  {} No matching voice found for {}",
                style("i").blue().bold(),
                character.name()
            );
            None
        }
        Err(e) => {
            warn!(error = %e, "Voice lookup failed");
            eprintln!("  {} Voice lookup failed: {e}", style("!").yellow().bold());
            None
        }
    }
}

/// Run the interactive loop until EOF or `/exit`.
pub async fn run_chat_loop(mut agent: Agent, speaker: &str, stream: bool) -> anyhow::Result<()> {
    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep chatting.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => commands::print_help(),
                ChatCommand::History => commands::print_history(agent.memory().snapshot(), speaker),
                ChatCommand::Clear => chat_input.clear(),
                ChatCommand::Exit => {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }
                ChatCommand::Unknown(name) => println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(name).dim()
                ),
            }
            continue;
        }

        let start = Instant::now();
        let result = if stream {
            stream_turn(&mut agent, &text, speaker).await
        } else {
            complete_turn(&mut agent, &text, speaker).await
        };

        match result {
            Ok(usage) => {
                renderer::print_stats_footer(usage.as_ref(), start.elapsed(), &agent.config().model);
                println!();
            }
            Err(e) => {
                eprintln!("\n  {} LLM error: {e}", style("!").red().bold());
                eprintln!("  {}", style("Type a message to retry, /exit to quit.").dim());
            }
        }
    }

    chat_input.flush();
    Ok(())
}

/// Send one query in streaming mode, printing fragments as they arrive.
async fn stream_turn(agent: &mut Agent, text: &str, speaker: &str) -> Result<Option<Usage>, LlmError> {
    let spinner = spinner("thinking...");
    let mut chat_stream = agent.chat_stream(text);
    let mut started = false;

    while let Some(fragment) = chat_stream.next().await {
        let fragment = match fragment {
            Ok(fragment) => fragment,
            Err(e) => {
                spinner.finish_and_clear();
                if started {
                    println!();
                }
                return Err(e);
            }
        };
        if !started {
            spinner.finish_and_clear();
            renderer::print_speaker(speaker);
            started = true;
        }
        renderer::print_streaming_token(&fragment);
    }

    if !started {
        spinner.finish_and_clear();
        renderer::print_speaker(speaker);
    }
    println!();
    Ok(chat_stream.usage().cloned())
}

/// Send one query and print the complete reply.
async fn complete_turn(agent: &mut Agent, text: &str, speaker: &str) -> Result<Option<Usage>, LlmError> {
    let spinner = spinner("thinking...");
    let result = agent.chat(text).await;
    spinner.finish_and_clear();

    let reply = result?;
    renderer::print_speaker(speaker);
    println!("{reply}");
    Ok(None)
}

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
