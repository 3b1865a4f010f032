//! Generative-language integration
//!
//! Wraps Google's Gemini `generateContent` REST API: request parameters, persona,
//! streaming and multi-turn chat.

pub mod gemini;
pub mod mime;

pub use gemini::{GeminiClient, GeminiClientConfig, Prompt, PromptPart, Reply, RequestOptions};
