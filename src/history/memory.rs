use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::history::MessageStore;
use crate::models::chat::Message;

/// Process-local log, lost on restart.
#[derive(Default)]
pub struct MemoryMessageStore {
    messages: Mutex<Vec<Message>>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything appended so far, in insertion order.
    pub async fn messages(&self) -> Vec<Message> {
        self.messages.lock().await.clone()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn insert(&self, message: &Message) -> Result<(), StoreError> {
        self.messages.lock().await.push(message.clone());
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
