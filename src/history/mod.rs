mod dynamodb;
mod memory;

pub use dynamodb::DynamoDbHistoryStore;
pub use memory::InMemoryHistoryStore;

use async_trait::async_trait;
use aws_config::SdkConfig;
use chrono::{ Duration, Utc };
use log::{ error, info };
use std::error::Error;
use std::sync::Arc;
use uuid::Uuid;
use crate::cli::Args;
use crate::error::StoreError;
use crate::models::chat::{ ConversationTurn, Sender };

pub const DEFAULT_TTL_DAYS: i64 = 30;
pub const MAX_TTL_DAYS: i64 = 30;

/// Keeps an expiry horizon between one day and `MAX_TTL_DAYS`.
pub fn clamp_ttl_days(ttl_days: i64) -> i64 {
    ttl_days.clamp(1, MAX_TTL_DAYS)
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn put_turn(&self, turn: &ConversationTurn) -> Result<(), StoreError>;
}

/// Writes one turn with a fresh message id and an expiry `ttl_days` from now (clamped to 1..=30).
pub async fn store_message(
    store: &dyn HistoryStore,
    conversation_id: &str,
    sender: Sender,
    message: &str,
    timestamp: &str,
    ttl_days: i64
) -> Result<ConversationTurn, StoreError> {
    let turn = ConversationTurn {
        conversation_id: conversation_id.to_string(),
        timestamp: timestamp.to_string(),
        sender,
        message: message.to_string(),
        message_id: Uuid::new_v4().to_string(),
        expiry_time: (Utc::now() + Duration::days(clamp_ttl_days(ttl_days))).timestamp(),
    };

    if let Err(e) = store.put_turn(&turn).await {
        error!("Error storing {} message for conversation {}: {}", sender, conversation_id, e);
        return Err(e);
    }
    Ok(turn)
}

pub fn create_history_store(
    args: &Args,
    aws_config: Option<&SdkConfig>
) -> Result<Arc<dyn HistoryStore>, Box<dyn Error + Send + Sync>> {
    match args.history_type.to_lowercase().as_str() {
        "dynamodb" => {
            let sdk_config = aws_config.ok_or("AWS configuration is required for the dynamodb history store")?;
            let store = DynamoDbHistoryStore::new(
                aws_sdk_dynamodb::Client::new(sdk_config),
                args.conversations_table.clone()
            );
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(InMemoryHistoryStore::new())),
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported history store type: {}", args.history_type)
                    )
                )
            ),
    }
}

pub fn initialize_history_store(
    args: &Args,
    aws_config: Option<&SdkConfig>
) -> Result<Arc<dyn HistoryStore>, Box<dyn Error + Send + Sync>> {
    info!("Conversation turns will be stored in: {} ({})", args.history_type, args.conversations_table);
    create_history_store(args, aws_config)
}
