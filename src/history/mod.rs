mod memory;
mod mongo;
mod redis;

pub use memory::MemoryMessageStore;

use async_trait::async_trait;
use log::{ info, warn };
use std::sync::Arc;
use crate::cli::Args;
use crate::error::StoreError;
use crate::models::chat::Message;

/// Append-only sink for the conversation log.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn insert(&self, message: &Message) -> Result<(), StoreError>;

    fn kind(&self) -> &'static str;
}

pub async fn create_message_store(
    uri: &str,
    args: &Args
) -> Result<Arc<dyn MessageStore>, StoreError> {
    let (scheme, _) = uri
        .split_once("://")
        .ok_or_else(|| StoreError::MalformedUri("missing scheme".to_string()))?;

    match scheme.to_lowercase().as_str() {
        "mongodb" | "mongodb+srv" => {
            let store = mongo::MongoMessageStore::connect(
                uri,
                &args.mongo_database,
                &args.mongo_collection,
                args.store_connect_timeout()
            ).await?;
            Ok(Arc::new(store))
        }
        "redis" | "rediss" => {
            let store = redis::RedisMessageStore::connect(
                uri,
                &args.history_redis_prefix,
                args.store_connect_timeout()
            ).await?;
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(MemoryMessageStore::new())),
        other => Err(StoreError::UnsupportedScheme(other.to_string())),
    }
}

/// Opens the conversation log if one is configured. Never fails: an absent or
/// unusable store disables logging for the lifetime of the process.
pub async fn initialize_message_store(args: &Args) -> Option<Arc<dyn MessageStore>> {
    let Some(uri) = args.store_uri() else {
        warn!("MONGO_URI not set; conversation logging disabled");
        return None;
    };

    match create_message_store(uri, args).await {
        Ok(store) => {
            info!("Conversation log connected ({})", store.kind());
            Some(store)
        }
        Err(e) => {
            warn!("Message store connection failed: {}; conversation logging disabled", e);
            None
        }
    }
}
