use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE } };
use serde::{ Deserialize, Serialize };
use std::time::Duration;

use super::{ ChatClient, CompletionRequest, CompletionResponse };
use crate::error::LlmError;
use crate::llm::LlmConfig;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize, Debug)]
struct AnthropicMessage {
    role: String,
    content: String,
}

#[derive(Serialize, Debug)]
struct AnthropicMessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage>,
}

#[derive(Deserialize, Debug)]
struct AnthropicMessagesResponse {
    #[serde(default)]
    content: Vec<AnthropicContent>,
}

#[derive(Deserialize, Debug)]
struct AnthropicContent {
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicChatClient {
    pub fn new(
        model: String,
        base_url: String,
        max_tokens: u32,
        timeout: Option<Duration>
    ) -> Result<Self, LlmError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));

        let mut builder = HttpClient::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            model,
            base_url,
            max_tokens,
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Self::new(
            config.completion_model.clone(),
            config.base_url.clone(),
            config.max_tokens,
            config.timeout_secs.map(Duration::from_secs)
        )
    }

    fn messages_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/messages") {
            return base.to_string();
        }
        if base.ends_with("/v1") {
            return format!("{}/messages", base);
        }
        format!("{}/v1/messages", base)
    }
}

fn first_text(response: AnthropicMessagesResponse) -> Result<String, LlmError> {
    response.content
        .into_iter()
        .next()
        .and_then(|c| c.text)
        .filter(|t| !t.is_empty())
        .ok_or(LlmError::EmptyResponse)
}

#[async_trait]
impl ChatClient for AnthropicChatClient {
    async fn complete(
        &self,
        api_key: &str,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, LlmError> {
        let key_header = HeaderValue::from_str(api_key.trim())
            .map_err(|e| LlmError::InvalidApiKey(e.to_string()))?;

        let body = AnthropicMessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: &request.system,
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
        };

        let url = self.messages_url();
        debug!("Sending completion request to {} (model {})", url, self.model);
        let resp = self.http
            .post(&url)
            .header("x-api-key", key_header)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status { status: status.as_u16(), body });
        }

        let text = resp.text().await?;
        let parsed: AnthropicMessagesResponse = serde_json::from_str(&text)
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(CompletionResponse { response: first_text(parsed)? })
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }

    fn get_base_url(&self) -> String {
        self.base_url.clone()
    }
}
