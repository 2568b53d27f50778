pub mod anthropic;

use async_trait::async_trait;
use std::sync::Arc;
use super::LlmConfig;
use self::anthropic::AnthropicChatClient;
use crate::error::LlmError;

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
}

#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Sends `request` as a single user turn, authenticating with `api_key`.
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, LlmError>;

    fn get_model(&self) -> String;
    fn get_base_url(&self) -> String;
}

pub fn new_client(config: &LlmConfig) -> Result<Arc<dyn ChatClient>, LlmError> {
    let client = AnthropicChatClient::from_config(config)?;
    Ok(Arc::new(client))
}
