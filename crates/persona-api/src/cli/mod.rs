//! CLI command definitions for the `persona` binary.
//!
//! Uses clap derive macros for argument parsing. Running `persona` with no
//! subcommand starts a chat session.

pub mod chat;
pub mod menu;
pub mod voices;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use persona_types::character::Character;
use persona_types::llm::Backend;

/// Chat with characters from film, TV, games, and stand-up.
#[derive(Parser)]
#[command(name = "persona", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Only log errors. Chat output and command results are still printed.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Settings file (defaults to `$PERSONA_CONFIG_DIR/config.toml`).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Default tracing filter for the verbosity flags. `RUST_LOG` overrides it.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,persona=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session (the default).
    Chat(ChatArgs),

    /// List the supported characters and their known voice IDs.
    Voices,

    /// Look up a character's voice ID in the voice directory.
    Voice {
        /// Character name, e.g. `George_Carlin` or "George Carlin".
        character: Character,
    },

    /// Show the audio capture parameters.
    Audio,
}

#[derive(Args, Default)]
pub struct ChatArgs {
    /// Character to talk to. Skips the selection menu.
    #[arg(long, short)]
    pub character: Option<Character>,

    /// Extra instructions appended to the character prompt. Skips the
    /// guidance prompt.
    #[arg(long, short)]
    pub guidance: Option<String>,

    /// Talk to the plain voice assistant instead of a character.
    #[arg(long, conflicts_with_all = ["character", "guidance"])]
    pub assistant: bool,

    /// Don't query the voice directory for the character's voice ID.
    #[arg(long)]
    pub no_voice_lookup: bool,

    /// Wait for the complete response instead of streaming it.
    #[arg(long)]
    pub no_stream: bool,

    /// Inference backend (overrides the settings file).
    #[arg(long)]
    pub backend: Option<Backend>,

    /// Model name (overrides the settings file).
    #[arg(long)]
    pub model: Option<String>,
}
