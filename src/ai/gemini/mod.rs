pub mod chat;
pub mod client;
pub mod http;
pub mod model;
pub mod stream;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use chat::{ChatReplyStream, ChatSession};
pub use client::{GeminiClient, GeminiClientConfig};
pub use model::{GenerativeModel, Prompt, PromptPart, Reply, RequestOptions};
pub use stream::ReplyStream;
pub use types::{Content, GenerationConfig, Part, Role, SafetySetting, Tool};
