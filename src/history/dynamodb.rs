use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use log::debug;
use std::collections::HashMap;
use crate::error::StoreError;
use crate::history::HistoryStore;
use crate::models::chat::ConversationTurn;

/// Table layout: partition key `conversationId`, sort key `timestamp`, TTL attribute `expiryTime`.
pub struct DynamoDbHistoryStore {
    client: Client,
    table_name: String,
}

impl DynamoDbHistoryStore {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }
}

pub(crate) fn turn_to_item(turn: &ConversationTurn) -> HashMap<String, AttributeValue> {
    HashMap::from([
        ("conversationId".to_string(), AttributeValue::S(turn.conversation_id.clone())),
        ("timestamp".to_string(), AttributeValue::S(turn.timestamp.clone())),
        ("sender".to_string(), AttributeValue::S(turn.sender.as_str().to_string())),
        ("message".to_string(), AttributeValue::S(turn.message.clone())),
        ("messageId".to_string(), AttributeValue::S(turn.message_id.clone())),
        ("expiryTime".to_string(), AttributeValue::N(turn.expiry_time.to_string())),
    ])
}

#[async_trait]
impl HistoryStore for DynamoDbHistoryStore {
    async fn put_turn(&self, turn: &ConversationTurn) -> Result<(), StoreError> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(turn_to_item(turn)))
            .send()
            .await
            .map_err(|e| StoreError::Write {
                table: self.table_name.clone(),
                message: aws_sdk_dynamodb::error::DisplayErrorContext(&e).to_string(),
            })?;

        debug!(
            "Stored {} turn {} for conversation {}",
            turn.sender,
            turn.message_id,
            turn.conversation_id
        );
        Ok(())
    }
}
