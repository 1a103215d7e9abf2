//! The conversational agent.
//!
//! `Agent` owns one conversation: an immutable system prompt, an append-only
//! memory, and the provider that answers. Every request carries the system
//! prompt, the full replayed memory, and the new user message.

use tracing::{Instrument, debug, info_span};

use persona_types::chat::AgentConfig;
use persona_types::llm::{CompletionRequest, LlmError, Message};

use crate::llm::box_provider::BoxLlmProvider;

use super::memory::ConversationMemory;
use super::stream::ChatStream;

/// A single-conversation chat agent.
///
/// `chat` and `chat_stream` take `&mut self`, so turns are serialized by
/// construction.
pub struct Agent {
    provider: BoxLlmProvider,
    config: AgentConfig,
    system_prompt: String,
    memory: ConversationMemory,
}

impl Agent {
    /// Create an agent with an empty memory.
    pub fn new(provider: BoxLlmProvider, config: AgentConfig, system_prompt: String) -> Self {
        Self {
            provider,
            config,
            system_prompt,
            memory: ConversationMemory::new(),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Send `query` and wait for the complete response.
    ///
    /// On success the `(query, response)` turn is appended to memory and the
    /// response text is returned unchanged. On failure memory is untouched.
    pub async fn chat(&mut self, query: &str) -> Result<String, LlmError> {
        let request = self.build_request(query, false);

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.history_len = self.memory.len(),
            gen_ai.request.stream = false,
        );

        let response = self.provider.complete(&request).instrument(span).await?;
        debug!(
            stop_reason = %response.stop_reason,
            output_tokens = response.usage.output_tokens,
            "Turn complete"
        );

        self.memory.append(query, response.content.clone());
        Ok(response.content)
    }

    /// Send `query` in streaming mode.
    ///
    /// The returned stream yields text fragments as they arrive. The turn is
    /// recorded only once the stream has been drained to its end.
    pub fn chat_stream(&mut self, query: &str) -> ChatStream<'_> {
        let request = self.build_request(query, true);

        let span = info_span!(
            "gen_ai.stream",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.history_len = self.memory.len(),
            gen_ai.request.stream = true,
        );

        let inner = self.provider.stream(request);
        ChatStream::new(inner, &mut self.memory, query.to_string(), span)
    }

    fn build_request(&self, query: &str, stream: bool) -> CompletionRequest {
        let mut messages = self.memory.to_messages();
        messages.push(Message::user(query));

        CompletionRequest {
            model: self.config.model.clone(),
            messages,
            system: Some(self.system_prompt.clone()),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            stream,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::future::Future;
    use std::sync::{Arc, Mutex};

    use futures_util::StreamExt;
    use persona_types::chat::Turn;
    use persona_types::llm::{CompletionResponse, MessageRole, StopReason, StreamEvent, Usage};

    use crate::llm::provider::{EventStream, LlmProvider};

    /// Provider that replays a fixed script and records every request.
    #[derive(Clone)]
    struct ScriptedProvider {
        fragments: Vec<String>,
        fail: bool,
        requests: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    impl ScriptedProvider {
        fn ok(fragments: &[&str]) -> Self {
            Self {
                fragments: fragments.iter().map(|s| s.to_string()).collect(),
                fail: false,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::ok(&[])
            }
        }
    }

    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn complete(
            &self,
            request: &CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
            self.requests.lock().unwrap().push(request.clone());
            let fail = self.fail;
            let content = self.fragments.concat();
            async move {
                if fail {
                    return Err(LlmError::AuthenticationFailed);
                }
                Ok(CompletionResponse {
                    id: "resp-1".to_string(),
                    content,
                    model: "scripted-model".to_string(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                })
            }
        }

        fn stream(&self, request: CompletionRequest) -> EventStream {
            self.requests.lock().unwrap().push(request);
            let fail = self.fail;
            let fragments = self.fragments.clone();
            Box::pin(async_stream::stream! {
                yield Ok(StreamEvent::Connected);
                if fail {
                    yield Err(LlmError::Stream("connection reset".to_string()));
                } else {
                    for text in fragments {
                        yield Ok(StreamEvent::TextDelta { text });
                    }
                    yield Ok(StreamEvent::MessageDelta { stop_reason: StopReason::EndTurn });
                    yield Ok(StreamEvent::Usage(Usage { input_tokens: 12, output_tokens: 3 }));
                    yield Ok(StreamEvent::Done);
                }
            })
        }
    }

    fn test_agent(provider: ScriptedProvider) -> Agent {
        Agent::new(
            BoxLlmProvider::new(provider),
            AgentConfig {
                model: "llama-3.1-70b-versatile".to_string(),
                temperature: 0.75,
                max_tokens: 1024,
            },
            "You are George.".to_string(),
        )
    }

    #[tokio::test]
    async fn test_chat_returns_response_and_records_turn() {
        let provider = ScriptedProvider::ok(&["Hello", ", ", "human."]);
        let mut agent = test_agent(provider);

        let response = agent.chat("Hi").await.unwrap();

        assert_eq!(response, "Hello, human.");
        assert_eq!(
            agent.memory().snapshot().last(),
            Some(&Turn::new("Hi", "Hello, human."))
        );
    }

    #[tokio::test]
    async fn test_chat_request_shape() {
        let provider = ScriptedProvider::ok(&["ok"]);
        let requests = provider.requests.clone();
        let mut agent = test_agent(provider);

        agent.chat("first").await.unwrap();
        agent.chat("second").await.unwrap();

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 2);

        let first = &requests[0];
        assert_eq!(first.system.as_deref(), Some("You are George."));
        assert_eq!(first.model, "llama-3.1-70b-versatile");
        assert_eq!(first.temperature, Some(0.75));
        assert!(!first.stream);
        assert_eq!(first.messages, vec![Message::user("first")]);

        let second = &requests[1];
        assert_eq!(second.messages.len(), 3);
        assert_eq!(second.messages[0], Message::user("first"));
        assert_eq!(second.messages[1], Message::assistant("ok"));
        assert_eq!(second.messages[2].role, MessageRole::User);
        assert_eq!(second.messages[2].content, "second");
    }

    #[tokio::test]
    async fn test_chat_failure_leaves_memory_untouched() {
        let mut agent = test_agent(ScriptedProvider::failing());

        let result = agent.chat("Hi").await;

        assert!(matches!(result, Err(LlmError::AuthenticationFailed)));
        assert!(agent.memory().is_empty());
    }

    #[tokio::test]
    async fn test_stream_fragments_match_recorded_output() {
        let mut agent = test_agent(ScriptedProvider::ok(&["Hmm", ", well", "..."]));

        let mut stream = agent.chat_stream("What now?");
        let mut fragments = Vec::new();
        while let Some(fragment) = stream.next().await {
            fragments.push(fragment.unwrap());
        }
        assert!(stream.is_committed());
        assert_eq!(stream.usage().map(|u| u.output_tokens), Some(3));
        drop(stream);

        assert_eq!(fragments, vec!["Hmm", ", well", "..."]);
        let turns = agent.memory().snapshot();
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].input, "What now?");
        assert_eq!(turns[0].output, fragments.concat());
    }

    #[tokio::test]
    async fn test_stream_history_grows_per_drained_turn() {
        let provider = ScriptedProvider::ok(&["a", "b"]);
        let requests = provider.requests.clone();
        let mut agent = test_agent(provider);

        let _ = agent.chat_stream("one").collect::<Vec<_>>().await;
        let _ = agent.chat_stream("two").collect::<Vec<_>>().await;

        let requests = requests.lock().unwrap();
        assert!(requests[0].stream);
        // Only the new user message: empty history.
        assert_eq!(requests[0].messages.len(), 1);
        // Exactly one prior turn plus the new message.
        assert_eq!(requests[1].messages.len(), 3);
        assert_eq!(requests[1].messages[1], Message::assistant("ab"));
    }

    #[tokio::test]
    async fn test_partially_consumed_stream_does_not_commit() {
        let mut agent = test_agent(ScriptedProvider::ok(&["one", "two", "three"]));

        {
            let mut stream = agent.chat_stream("Hi");
            let first = stream.next().await.unwrap().unwrap();
            assert_eq!(first, "one");
            assert!(!stream.is_committed());
        }

        assert!(agent.memory().is_empty());
    }

    #[tokio::test]
    async fn test_stream_error_is_yielded_once_without_commit() {
        let mut agent = test_agent(ScriptedProvider::failing());

        let items: Vec<_> = agent.chat_stream("Hi").collect().await;

        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(LlmError::Stream(_))));
        assert!(agent.memory().is_empty());
    }

    #[tokio::test]
    async fn test_drained_stream_stays_terminated() {
        let mut agent = test_agent(ScriptedProvider::ok(&["x"]));

        let mut stream = agent.chat_stream("Hi");
        while stream.next().await.is_some() {}
        assert!(stream.next().await.is_none());
        drop(stream);

        assert_eq!(agent.memory().len(), 1);
    }
}
