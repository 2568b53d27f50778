use async_trait::async_trait;
use std::sync::Mutex;
use crate::error::StoreError;
use crate::history::HistoryStore;
use crate::models::chat::ConversationTurn;

/// Keeps turns in process memory. Nothing expires.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    turns: Mutex<Vec<ConversationTurn>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.turns.lock().map(|turns| turns.clone()).unwrap_or_default()
    }

    pub fn conversation(&self, conversation_id: &str) -> Vec<ConversationTurn> {
        let mut turns: Vec<ConversationTurn> = self
            .turns()
            .into_iter()
            .filter(|t| t.conversation_id == conversation_id)
            .collect();
        turns.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        turns
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn put_turn(&self, turn: &ConversationTurn) -> Result<(), StoreError> {
        let mut turns = self.turns.lock().map_err(|e| StoreError::Write {
            table: "memory".to_string(),
            message: e.to_string(),
        })?;
        // Same key overwrites, like a PutItem.
        turns.retain(|t| !(t.conversation_id == turn.conversation_id && t.timestamp == turn.timestamp));
        turns.push(turn.clone());
        Ok(())
    }
}
