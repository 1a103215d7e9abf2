//! Agent: system prompt + conversation memory + LLM provider.

pub mod engine;
pub mod memory;
pub mod prompt;
pub mod stream;

pub use engine::Agent;
pub use memory::ConversationMemory;
pub use stream::ChatStream;
