//! Business logic and port definitions for Persona.
//!
//! This crate defines the "ports" (provider traits) that the infrastructure
//! layer implements, plus the agent itself. It depends only on
//! `persona-types` -- never on `persona-infra` or any network/IO crate.

pub mod agent;
pub mod character;
pub mod llm;
pub mod voice;
