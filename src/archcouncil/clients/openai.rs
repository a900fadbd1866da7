//! The `OpenAIClient` struct implements `ClientWrapper` for OpenAI's Chat API,
//! capturing both the assistant response and the token usage of each call.
//!
//! # Example
//!
//! ```rust,no_run
//! use archcouncil::clients::openai::{OpenAIClient, Model};
//! use archcouncil::client_wrapper::{ClientWrapper, Message, Role};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     let secret_key = std::env::var("OPENAI_API_KEY")?;
//!     let client = OpenAIClient::new_with_model_enum(&secret_key, Model::GPT41Mini);
//!
//!     let resp = client
//!         .send_message(&[
//!             Message { role: Role::System, content: "You are an assistant.".into() },
//!             Message { role: Role::User, content: "Hello!".into() },
//!         ])
//!         .await?;
//!     println!("Assistant: {}", resp.content);
//!
//!     if let Some(usage) = client.get_last_usage() {
//!         println!("Tokens: {}", usage.total_tokens);
//!     }
//!     Ok(())
//! }
//! ```
use std::sync::Mutex;

use async_trait::async_trait;
use openai_rust::chat;
use openai_rust2 as openai_rust;

use crate::archcouncil::client_wrapper::{ClientError, ClientWrapper, Message, Role, TokenUsage};
use crate::archcouncil::clients::common::{get_shared_http_client, send_and_track};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Model identifiers commonly used for the council.
///
/// Any other identifier can be passed as a string through
/// [`OpenAIClient::new_with_model_string`].
#[derive(Clone, Copy, Debug)]
pub enum Model {
    /// `gpt-4o`
    GPT4o,
    /// `gpt-4o-mini`
    GPT4oMini,
    /// `gpt-4.1`
    GPT41,
    /// `gpt-4.1-mini`
    GPT41Mini,
    /// `gpt-4.1-nano`
    GPT41Nano,
    /// `o3-mini`
    O3Mini,
}

/// Convert a [`Model`] variant into the string identifier expected by the REST API.
pub fn model_to_string(model: Model) -> String {
    match model {
        Model::GPT4o => "gpt-4o".to_string(),
        Model::GPT4oMini => "gpt-4o-mini".to_string(),
        Model::GPT41 => "gpt-4.1".to_string(),
        Model::GPT41Mini => "gpt-4.1-mini".to_string(),
        Model::GPT41Nano => "gpt-4.1-nano".to_string(),
        Model::O3Mini => "o3-mini".to_string(),
    }
}

/// Client wrapper for OpenAI's Chat Completions API.
pub struct OpenAIClient {
    /// Underlying SDK client pointing at the REST endpoint.
    client: openai_rust::Client,
    /// Model name that will be injected into each request.
    model: String,
    /// Storage for the token usage returned by the most recent request.
    token_usage: Mutex<Option<TokenUsage>>,
}

impl OpenAIClient {
    /// Construct a new client using the provided API key and [`Model`] variant.
    pub fn new_with_model_enum(secret_key: &str, model: Model) -> Self {
        Self::new_with_model_string(secret_key, &model_to_string(model))
    }

    /// Construct a new client using the provided API key and explicit model name.
    pub fn new_with_model_string(secret_key: &str, model_name: &str) -> Self {
        OpenAIClient {
            client: openai_rust::Client::new_with_client(
                secret_key,
                get_shared_http_client().clone(),
            ),
            model: model_name.to_string(),
            token_usage: Mutex::new(None),
        }
    }

    /// Construct a client targeting a custom OpenAI compatible base URL.
    pub fn new_with_base_url(secret_key: &str, model_name: &str, base_url: &str) -> Self {
        OpenAIClient {
            client: openai_rust::Client::new_with_client_and_base_url(
                secret_key,
                get_shared_http_client().clone(),
                base_url,
            ),
            model: model_name.to_string(),
            token_usage: Mutex::new(None),
        }
    }
}

fn to_openai_message(msg: &Message) -> chat::Message {
    chat::Message {
        role: match msg.role {
            Role::System => "system".to_owned(),
            Role::User => "user".to_owned(),
            Role::Assistant => "assistant".to_owned(),
        },
        content: msg.content.clone(),
    }
}

#[async_trait]
impl ClientWrapper for OpenAIClient {
    async fn send_message(&self, messages: &[Message]) -> Result<Message, ClientError> {
        let formatted_messages: Vec<chat::Message> =
            messages.iter().map(to_openai_message).collect();

        let content = send_and_track(
            &self.client,
            &self.model,
            formatted_messages,
            Some(CHAT_COMPLETIONS_PATH.to_string()),
            &self.token_usage,
        )
        .await
        .map_err(|err| {
            log::error!("OpenAIClient::send_message(...): {}", err);
            err
        })?;

        Ok(Message {
            role: Role::Assistant,
            content,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn usage_slot(&self) -> Option<&Mutex<Option<TokenUsage>>> {
        Some(&self.token_usage)
    }
}
