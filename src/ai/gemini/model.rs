//! Model handles, prompts and reply normalization.

use super::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
    SafetySetting, Tool,
};
use crate::ai::mime::detect_mime;
use crate::{Error, Result};
use base64::Engine as _;
use serde_json::Value;

/// One fragment of a mixed prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptPart {
    Text(String),
    /// Raw bytes; the MIME type is sniffed from the content.
    Bytes(Vec<u8>),
    /// Raw bytes with an explicit MIME type.
    Blob { mime_type: String, data: Vec<u8> },
    /// Structured part forwarded to the API verbatim (function responses, file
    /// references, ...).
    Json(Value),
}

impl PromptPart {
    fn into_part(self) -> Part {
        match self {
            PromptPart::Text(text) => Part::Text { text },
            PromptPart::Bytes(data) => {
                let mime_type = detect_mime(&data).to_string();
                inline_part(mime_type, &data)
            }
            PromptPart::Blob { mime_type, data } => inline_part(mime_type, &data),
            PromptPart::Json(value) => Part::Other(value),
        }
    }
}

fn inline_part(mime_type: String, data: &[u8]) -> Part {
    Part::InlineData {
        inline_data: InlineData {
            mime_type,
            data: base64::engine::general_purpose::STANDARD.encode(data),
        },
    }
}

impl From<&str> for PromptPart {
    fn from(text: &str) -> Self {
        PromptPart::Text(text.to_string())
    }
}

impl From<String> for PromptPart {
    fn from(text: String) -> Self {
        PromptPart::Text(text)
    }
}

impl From<Vec<u8>> for PromptPart {
    fn from(data: Vec<u8>) -> Self {
        PromptPart::Bytes(data)
    }
}

impl From<Value> for PromptPart {
    fn from(value: Value) -> Self {
        PromptPart::Json(value)
    }
}

/// Input to a generation call: plain text or an ordered list of parts. Either way
/// it becomes a single user turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    Text(String),
    Parts(Vec<PromptPart>),
}

impl Prompt {
    pub fn into_content(self) -> Content {
        let parts = match self {
            Prompt::Text(text) => vec![Part::Text { text }],
            Prompt::Parts(parts) => parts.into_iter().map(PromptPart::into_part).collect(),
        };
        Content::user(parts)
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Prompt::Text(text.to_string())
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Prompt::Text(text)
    }
}

impl From<&String> for Prompt {
    fn from(text: &String) -> Self {
        Prompt::Text(text.clone())
    }
}

impl From<Vec<PromptPart>> for Prompt {
    fn from(parts: Vec<PromptPart>) -> Self {
        Prompt::Parts(parts)
    }
}

/// Normalized result of a non-streaming call.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Concatenated text of the first candidate. Empty when the service returned no
    /// candidate content.
    Text(String),
    /// First part of the first candidate when that candidate carries no text.
    Fragment(Part),
}

impl Reply {
    /// Fold a raw response into a reply. A prompt rejected by safety feedback is an
    /// error rather than an empty reply.
    pub fn from_response(response: &GenerateContentResponse) -> Result<Self> {
        if let Some(reason) = response.block_reason() {
            return Err(Error::Blocked(reason.to_string()));
        }

        if let Some(usage) = &response.usage_metadata {
            tracing::debug!(
                "Gemini usage: prompt={} candidates={} total={}",
                usage.prompt_token_count,
                usage.candidates_token_count,
                usage.total_token_count
            );
        }

        let Some(content) = response.first_content() else {
            return Ok(Reply::Text(String::new()));
        };

        if let Some(text) = content.text() {
            return Ok(Reply::Text(text));
        }

        Ok(match content.parts.first() {
            Some(part) => Reply::Fragment(part.clone()),
            None => Reply::Text(String::new()),
        })
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Reply::Text(text) => Some(text),
            Reply::Fragment(_) => None,
        }
    }

    /// True when the model produced nothing: no candidate content or only empty text.
    pub fn is_empty(&self) -> bool {
        matches!(self, Reply::Text(text) if text.is_empty())
    }
}

impl std::fmt::Display for Reply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reply::Text(text) => f.write_str(text),
            Reply::Fragment(part) => {
                let json = serde_json::to_string(part).map_err(|_| std::fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Replaces the model's default generation config for this call.
    pub generation_config: Option<GenerationConfig>,
    pub tools: Vec<Tool>,
}

impl RequestOptions {
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }
}

/// An immutable model handle: model name, default sampling parameters, safety
/// settings and persona. Overrides produce a new handle.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerativeModel {
    name: String,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
    system_instruction: Option<String>,
}

impl GenerativeModel {
    /// `name` may carry the `models/` prefix; it is stripped.
    pub fn new(
        name: &str,
        generation_config: GenerationConfig,
        safety_settings: Vec<SafetySetting>,
        system_instruction: Option<String>,
    ) -> Self {
        Self {
            name: name.strip_prefix("models/").unwrap_or(name).to_string(),
            generation_config,
            safety_settings,
            system_instruction,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generation_config(&self) -> &GenerationConfig {
        &self.generation_config
    }

    pub fn system_instruction(&self) -> Option<&str> {
        self.system_instruction.as_deref()
    }

    /// A copy of this handle whose persona is replaced by `instruction`.
    pub fn with_system_instruction(&self, instruction: impl Into<String>) -> Self {
        Self {
            system_instruction: Some(instruction.into()),
            ..self.clone()
        }
    }

    pub fn build_request(
        &self,
        contents: Vec<Content>,
        options: RequestOptions,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            contents,
            system_instruction: self.system_instruction.as_deref().map(Content::instruction),
            generation_config: options
                .generation_config
                .unwrap_or_else(|| self.generation_config.clone()),
            safety_settings: self.safety_settings.clone(),
            tools: options.tools,
        }
    }
}
