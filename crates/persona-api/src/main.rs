//! Persona CLI entry point.
//!
//! Binary name: `persona`
//!
//! Loads credentials and settings, then dispatches to the chat session or
//! one of the informational commands.

mod cli;

use clap::Parser;

use persona_infra::config::{self, Credentials};
use persona_observe::tracing_setup;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_setup::init_tracing(cli.log_filter(), cli.otel)
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    tracing_setup::shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    config::load_dotenv();

    // Every command needs the full credential set; nothing else is touched
    // until it is present.
    let credentials = Credentials::from_env()?;

    let settings_path = cli.config.clone().unwrap_or_else(config::default_settings_path);
    let settings = config::load_settings(&settings_path).await;
    tracing::debug!(
        path = %settings_path.display(),
        backend = %settings.backend,
        model = %settings.effective_model(),
        "Settings loaded"
    );

    match cli.command.unwrap_or_else(|| Commands::Chat(Default::default())) {
        Commands::Chat(args) => {
            cli::chat::loop_runner::run_chat(args, &settings, &credentials).await?;
        }
        Commands::Voices => cli::voices::list_voices(cli.json)?,
        Commands::Voice { character } => {
            cli::voices::lookup_voice(&settings, &credentials, character, cli.json).await?;
        }
        Commands::Audio => cli::voices::show_audio(cli.json)?,
    }

    Ok(())
}
