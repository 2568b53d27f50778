use axum::http::{ Method, StatusCode };
use chrono::{ DateTime, SecondsFormat, Utc };
use log::{ error, info };
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::agent::GrantsAgent;
use crate::error::HandlerError;
use crate::history::{ clamp_ttl_days, store_message, HistoryStore, DEFAULT_TTL_DAYS };
use crate::models::chat::{ ChatRequest, ChatResponse, ErrorBody, Sender };

pub const MESSAGE_REQUIRED: &str = "Message is required";

/// Status plus serialized JSON body. Headers are added by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: String::new() }
    }

    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(e) => Self::error(StatusCode::INTERNAL_SERVER_ERROR, format!("Internal server error: {}", e)),
        }
    }

    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        let body = serde_json::to_string(&ErrorBody { error: message.into() })
            .unwrap_or_else(|_| String::from("{}"));
        Self { status, body }
    }

    #[cfg(test)]
    pub fn error_body(&self) -> Option<ErrorBody> {
        serde_json::from_str(&self.body).ok()
    }
}

/// ISO-8601 UTC with microseconds, e.g. `2024-05-01T12:00:00.123456Z`.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub struct ChatHandler {
    history: Arc<dyn HistoryStore>,
    agent: GrantsAgent,
    ttl_days: i64,
}

impl ChatHandler {
    pub fn new(history: Arc<dyn HistoryStore>, agent: GrantsAgent) -> Self {
        Self { history, agent, ttl_days: DEFAULT_TTL_DAYS }
    }

    /// Expiry horizon for stored turns, clamped to 1..=30 days.
    pub fn with_ttl_days(mut self, ttl_days: i64) -> Self {
        self.ttl_days = clamp_ttl_days(ttl_days);
        self
    }

    pub async fn handle(&self, method: &Method, body: Option<&[u8]>) -> ApiResponse {
        if method == Method::OPTIONS {
            return ApiResponse::empty(StatusCode::OK);
        }

        let request = ChatRequest::from_body(body);
        let Some(user_message) = request.message() else {
            return ApiResponse::error(StatusCode::BAD_REQUEST, MESSAGE_REQUIRED);
        };

        match self.exchange(user_message, request.conversation_id()).await {
            Ok(response) => ApiResponse::json(StatusCode::OK, &response),
            Err(e) => {
                error!("Error: {}", e);
                ApiResponse::error(StatusCode::INTERNAL_SERVER_ERROR, format!("Internal server error: {}", e))
            }
        }
    }

    async fn exchange(
        &self,
        user_message: &str,
        conversation_id: Option<&str>
    ) -> Result<ChatResponse, HandlerError> {
        let conversation_id = conversation_id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let user_time = Utc::now();
        store_message(
            self.history.as_ref(),
            &conversation_id,
            Sender::User,
            user_message,
            &format_timestamp(user_time),
            self.ttl_days
        ).await?;

        let outcome = self.agent.generate_reply(user_message).await;
        info!(
            "Reply for conversation {} ({})",
            conversation_id,
            if outcome.is_fallback() { "fallback" } else { "generated" }
        );
        let reply = outcome.into_text();

        // Clamp so the reply never sorts before the user turn if the clock stepped back.
        let reply_time = format_timestamp(Utc::now().max(user_time));
        store_message(
            self.history.as_ref(),
            &conversation_id,
            Sender::Assistant,
            &reply,
            &reply_time,
            self.ttl_days
        ).await?;

        Ok(ChatResponse {
            message: reply,
            conversation_id,
            timestamp: reply_time,
        })
    }
}
