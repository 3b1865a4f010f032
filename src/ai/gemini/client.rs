//! Convenience wrapper over the Gemini REST API.
//!
//! Holds the default model handle (name, sampling parameters, safety settings,
//! persona) and an optional chat session. Every service failure is logged and
//! returned as an [`Error`]; nothing is swallowed.

use super::chat::{ChatReplyStream, ChatSession};
use super::http::GeminiHttpClient;
use super::model::{GenerativeModel, Prompt, Reply, RequestOptions};
use super::stream::{self, ReplyStream};
use super::types::{Content, GenerationConfig, SafetySetting};
use crate::config::{self, DEFAULT_MODEL};
use crate::{Error, Result};

/// Construction parameters for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    pub model_name: String,
    pub generation_config: GenerationConfig,
    pub system_instruction: Option<String>,
    pub safety_settings: Vec<SafetySetting>,
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            generation_config: GenerationConfig::new(0.9, 8192, 1.0, 32),
            system_instruction: None,
            safety_settings: Vec::new(),
        }
    }
}

impl GeminiClientConfig {
    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.generation_config.temperature = Some(temperature);
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

pub struct GeminiClient {
    http: GeminiHttpClient,
    model: GenerativeModel,
    chat: Option<ChatSession>,
}

impl GeminiClient {
    /// Create a client. Without an explicit `api_key` the key is read from
    /// `GOOGLE_API_KEY`; if neither is available this fails before any request is
    /// made.
    pub fn new(api_key: Option<String>, config: GeminiClientConfig) -> Result<Self> {
        Self::new_with_client(api_key, config, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: Option<String>,
        config: GeminiClientConfig,
        client: reqwest::Client,
    ) -> Result<Self> {
        let api_key = config::resolve_api_key(api_key)?;

        let model = GenerativeModel::new(
            &config.model_name,
            config.generation_config,
            config.safety_settings,
            config.system_instruction,
        );

        Ok(Self {
            http: GeminiHttpClient::new_with_client(api_key, client),
            model,
            chat: None,
        })
    }

    /// Point the client at another endpoint (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.http = self.http.with_base_url(base_url.into());
        self
    }

    pub fn model(&self) -> &GenerativeModel {
        &self.model
    }

    /// Generate a reply with the client's default persona.
    pub async fn generate_response(
        &self,
        prompt: impl Into<Prompt>,
        options: RequestOptions,
    ) -> Result<Reply> {
        Self::generate(&self.http, &self.model, prompt.into(), options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to generate response: {}", e);
                e
            })
    }

    /// Streaming variant of [`generate_response`](Self::generate_response).
    pub async fn generate_response_stream(
        &self,
        prompt: impl Into<Prompt>,
        options: RequestOptions,
    ) -> Result<ReplyStream> {
        Self::generate_stream(&self.http, &self.model, prompt.into(), options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to start streaming response: {}", e);
                e
            })
    }

    /// Generate a reply whose persona is `instruction` for this call only.
    ///
    /// A fresh model handle carries the instruction; the client's own persona and any
    /// open chat session are untouched.
    pub async fn generate_response_instructed(
        &self,
        prompt: impl Into<Prompt>,
        instruction: &str,
        options: RequestOptions,
    ) -> Result<Reply> {
        let instructed = self.model.with_system_instruction(instruction);
        Self::generate(&self.http, &instructed, prompt.into(), options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to generate instructed response: {}", e);
                e
            })
    }

    /// Streaming variant of
    /// [`generate_response_instructed`](Self::generate_response_instructed).
    pub async fn generate_response_instructed_stream(
        &self,
        prompt: impl Into<Prompt>,
        instruction: &str,
        options: RequestOptions,
    ) -> Result<ReplyStream> {
        let instructed = self.model.with_system_instruction(instruction);
        Self::generate_stream(&self.http, &instructed, prompt.into(), options)
            .await
            .map_err(|e| {
                tracing::error!("Failed to start instructed streaming response: {}", e);
                e
            })
    }

    /// Open a chat session, replacing any previous one.
    pub fn start_chat(&mut self, history: Option<Vec<Content>>) {
        self.chat = Some(ChatSession::new(
            self.model.clone(),
            history.unwrap_or_default(),
        ));
        tracing::info!("Chat session started with model: {}", self.model.name());
    }

    pub fn chat_session(&self) -> Option<&ChatSession> {
        self.chat.as_ref()
    }

    /// Send a message into the open chat session.
    ///
    /// Fails with [`Error::NoChatSession`] when [`start_chat`](Self::start_chat) was
    /// not called first.
    pub async fn send_chat_message(&mut self, message: impl Into<Prompt>) -> Result<Reply> {
        let session = self.chat.as_mut().ok_or(Error::NoChatSession)?;
        let message = message.into().into_content();

        let request = session
            .model()
            .build_request(session.contents_with(&message), RequestOptions::default());

        let outcome = match self
            .http
            .generate_content(session.model().name(), &request)
            .await
        {
            Ok(response) => Reply::from_response(&response).map(|reply| (reply, response)),
            Err(e) => Err(e),
        };
        let (reply, response) = outcome.map_err(|e| {
            tracing::error!("Failed to send chat message: {}", e);
            e
        })?;

        if reply.is_empty() {
            tracing::warn!("Gemini returned an empty chat reply; turn not recorded");
        } else if let Some(mut content) = response.into_first_content() {
            content.role = Some(super::types::Role::Model);
            session.record(message, content);
        }

        Ok(reply)
    }

    /// Streaming variant of [`send_chat_message`](Self::send_chat_message). The
    /// turn is recorded once the returned stream has been drained, unless the model
    /// streamed no text.
    pub async fn send_chat_message_stream(
        &mut self,
        message: impl Into<Prompt>,
    ) -> Result<ChatReplyStream<'_>> {
        let session = self.chat.as_mut().ok_or(Error::NoChatSession)?;
        let message = message.into().into_content();

        let request = session
            .model()
            .build_request(session.contents_with(&message), RequestOptions::default());

        let response = self
            .http
            .stream_generate_content(session.model().name(), &request)
            .await
            .map_err(|e| {
                tracing::error!("Failed to send streaming chat message: {}", e);
                e
            })?;

        Ok(session.stream_reply(message, stream::text_chunks(response)))
    }

    async fn generate(
        http: &GeminiHttpClient,
        model: &GenerativeModel,
        prompt: Prompt,
        options: RequestOptions,
    ) -> Result<Reply> {
        let request = model.build_request(vec![prompt.into_content()], options);
        let response = http.generate_content(model.name(), &request).await?;
        Reply::from_response(&response)
    }

    async fn generate_stream(
        http: &GeminiHttpClient,
        model: &GenerativeModel,
        prompt: Prompt,
        options: RequestOptions,
    ) -> Result<ReplyStream> {
        let request = model.build_request(vec![prompt.into_content()], options);
        let response = http.stream_generate_content(model.name(), &request).await?;
        Ok(stream::text_chunks(response))
    }
}
