use async_trait::async_trait;
use mongodb::bson::{ doc, DateTime as BsonDateTime, Document };
use mongodb::options::ClientOptions;
use mongodb::{ Client, Collection };
use std::time::Duration;

use crate::error::StoreError;
use crate::history::MessageStore;
use crate::models::chat::Message;

pub struct MongoMessageStore {
    collection: Collection<Document>,
}

impl MongoMessageStore {
    /// Connects and pings the deployment so an unreachable server is caught at startup.
    pub async fn connect(
        uri: &str,
        database: &str,
        collection: &str,
        timeout: Duration
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);

        let client = Client::with_options(options)?;
        client.database("admin").run_command(doc! { "ping": 1 }).await?;

        Ok(Self {
            collection: client.database(database).collection::<Document>(collection),
        })
    }
}

fn to_document(message: &Message) -> Document {
    doc! {
        "user": message.sender.as_str(),
        "role": message.role.as_str(),
        "message": message.text.as_str(),
        "turn_id": message.turn_id.to_string(),
        "created_at": BsonDateTime::from_millis(message.created_at.timestamp_millis()),
    }
}

#[async_trait]
impl MessageStore for MongoMessageStore {
    async fn insert(&self, message: &Message) -> Result<(), StoreError> {
        self.collection.insert_one(to_document(message)).await?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "mongodb"
    }
}
