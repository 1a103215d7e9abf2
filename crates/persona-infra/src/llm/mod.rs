//! LLM provider implementations.
//!
//! Contains the OpenAI-compatible implementation of the [`LlmProvider`]
//! trait defined in `persona-core`, and a factory ([`create_provider`]) that
//! picks the right backend and credential.
//!
//! [`LlmProvider`]: persona_core::llm::provider::LlmProvider

pub mod openai_compat;

use persona_core::llm::box_provider::BoxLlmProvider;
use persona_types::llm::Backend;

use crate::config::Credentials;

use self::openai_compat::OpenAiCompatibleProvider;

/// Create a [`BoxLlmProvider`] for `backend`, using its credential from
/// `credentials`.
pub fn create_provider(backend: Backend, credentials: &Credentials, model: &str) -> BoxLlmProvider {
    tracing::debug!(%backend, model, "Creating LLM provider");
    match backend {
        Backend::Groq => BoxLlmProvider::new(OpenAiCompatibleProvider::groq(
            credentials.groq_api_key.clone(),
            model,
        )),
        Backend::OpenAi => BoxLlmProvider::new(OpenAiCompatibleProvider::openai(
            credentials.openai_api_key.clone(),
            model,
        )),
    }
}
