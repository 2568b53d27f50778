pub mod fallback;

use log::{ info, warn };
use std::sync::Arc;

use crate::config::prompt::GRANTS_SYSTEM_PROMPT;
use crate::config::secret::ApiKeyCache;
use crate::llm::chat::{ ChatClient, CompletionRequest };
use self::fallback::fallback_response;

/// Where a reply came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    Generated(String),
    Fallback(String),
}

impl ReplyOutcome {
    #[cfg(test)]
    pub fn text(&self) -> &str {
        match self {
            ReplyOutcome::Generated(text) | ReplyOutcome::Fallback(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ReplyOutcome::Generated(text) | ReplyOutcome::Fallback(text) => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, ReplyOutcome::Fallback(_))
    }
}

pub struct GrantsAgent {
    chat_client: Arc<dyn ChatClient>,
    api_key: ApiKeyCache,
    system_prompt: String,
}

impl GrantsAgent {
    pub fn new(chat_client: Arc<dyn ChatClient>, api_key: ApiKeyCache) -> Self {
        info!(
            "Chat client configured: Model={}, BaseURL={}, KeyParameter={}",
            chat_client.get_model(),
            chat_client.get_base_url(),
            api_key.parameter_name()
        );
        Self {
            chat_client,
            api_key,
            system_prompt: GRANTS_SYSTEM_PROMPT.to_string(),
        }
    }

    /// Asks the chat API for a reply. Never fails: any error degrades to the canned responder.
    pub async fn generate_reply(&self, user_message: &str) -> ReplyOutcome {
        let api_key = match self.api_key.get().await {
            Ok(key) => key,
            Err(e) => {
                warn!("Could not resolve API key, using fallback reply: {}", e);
                return ReplyOutcome::Fallback(fallback_response(user_message).to_string());
            }
        };

        let request = CompletionRequest {
            system: self.system_prompt.clone(),
            prompt: user_message.to_string(),
        };

        match self.chat_client.complete(api_key, &request).await {
            Ok(completion) => ReplyOutcome::Generated(completion.response),
            Err(e) => {
                warn!("Chat completion failed, using fallback reply: {}", e);
                ReplyOutcome::Fallback(fallback_response(user_message).to_string())
            }
        }
    }
}
