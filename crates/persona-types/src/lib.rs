//! Shared domain types for Persona.
//!
//! Characters, conversation turns, LLM request/stream shapes, voice directory
//! records, audio-capture constants, settings, and the error enums shared by
//! the other crates.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod audio;
pub mod character;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod voice;
