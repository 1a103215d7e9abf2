//! Infrastructure layer for Persona.
//!
//! Contains implementations of the ports defined in `persona-core`: the
//! OpenAI-compatible chat provider and the ElevenLabs voice directory. Also
//! loads credentials from the environment, settings from `config.toml`, and
//! character prompts from the prompts directory.

pub mod config;
pub mod llm;
pub mod prompts;
pub mod voice;
