use async_trait::async_trait;
use crate::models::chat::Message;
use crate::history::MessageStore;
use crate::error::StoreError;
use redis::{ Client, AsyncCommands };
use redis::aio::MultiplexedConnection;
use serde::{ Serialize, Deserialize };
use std::time::Duration;

#[derive(Serialize, Deserialize)]
struct StoredMessage {
    turn_id: String,
    role: String,
    content: String,
    timestamp: i64,
}

impl From<&Message> for StoredMessage {
    fn from(message: &Message) -> Self {
        Self {
            turn_id: message.turn_id.to_string(),
            role: message.role.as_str().to_string(),
            content: message.text.clone(),
            timestamp: message.created_at.timestamp(),
        }
    }
}

pub struct RedisMessageStore {
    conn: MultiplexedConnection,
    key_prefix: String,
}

impl RedisMessageStore {
    pub async fn connect(
        uri: &str,
        key_prefix: &str,
        timeout: Duration
    ) -> Result<Self, StoreError> {
        let client = Client::open(uri)?;
        let probe = async {
            let mut conn = client.get_multiplexed_async_connection().await?;
            let _: String = redis::cmd("PING").query_async(&mut conn).await?;
            Ok::<_, redis::RedisError>(conn)
        };
        let conn = tokio::time::timeout(timeout, probe)
            .await
            .map_err(|_| StoreError::ConnectTimeout(timeout))??;

        Ok(Self {
            conn,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn key_for(&self, sender: &str) -> String {
        format!("{}{}", self.key_prefix, sender)
    }
}

#[async_trait]
impl MessageStore for RedisMessageStore {
    async fn insert(&self, message: &Message) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let key = self.key_for(&message.sender);
        let json_msg = serde_json::to_string(&StoredMessage::from(message))?;
        let _: i64 = conn.rpush(&key, &json_msg).await?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;
    use uuid::Uuid;

    #[test]
    fn stored_entry_keeps_role_and_text() {
        let message = Message::new(Uuid::new_v4(), "+1555", Role::Assistant, "hi");
        let json = serde_json::to_value(StoredMessage::from(&message)).unwrap();
        assert_eq!(json["role"], "assistant");
        assert_eq!(json["content"], "hi");
        assert_eq!(json["turn_id"], message.turn_id.to_string());
    }
}
