use crate::cli::Args;
use crate::error::{ CompletionError, ConfigError };
use crate::history::{ initialize_message_store, MessageStore };
use crate::llm::CompletionRequest;
use crate::llm::chat::{ ChatClient, new_client as new_chat_client };
use crate::models::chat::{ Message, Role, Turn };
use crate::models::twiml::FormattedReply;

use log::{ info, warn, error };
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Reply sent whenever the completion service cannot produce one.
pub const FALLBACK_REPLY: &str = "Sorry, I ran into an issue. Please try again later.";

/// Runs one webhook turn: log inbound, generate reply, log outbound, format.
///
/// Only the reply generation can change what the caller sees; store failures
/// are logged and swallowed.
#[derive(Clone)]
pub struct TurnHandler {
    store: Option<Arc<dyn MessageStore>>,
    chat_client: Arc<dyn ChatClient>,
    completion_timeout: Duration,
}

impl TurnHandler {
    pub fn new(
        store: Option<Arc<dyn MessageStore>>,
        chat_client: Arc<dyn ChatClient>,
        completion_timeout: Duration
    ) -> Self {
        Self {
            store,
            chat_client,
            completion_timeout,
        }
    }

    /// Builds the process-wide handler. The completion credential is required;
    /// the message store is optional.
    pub async fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let chat_client = new_chat_client(args)?;
        info!("Chat model: {}", chat_client.get_model());
        let store = initialize_message_store(args).await;
        Ok(Self::new(store, chat_client, args.completion_timeout()))
    }

    pub fn logging_enabled(&self) -> bool {
        self.store.is_some()
    }

    pub async fn handle(&self, sender: &str, inbound_text: &str) -> FormattedReply {
        let turn = self.process(sender, inbound_text).await;
        FormattedReply::new(&turn.outbound_text)
    }

    pub async fn process(&self, sender: &str, inbound_text: &str) -> Turn {
        let turn_id = Uuid::new_v4();
        let inbound_text = inbound_text.trim();
        info!("Incoming message from {}: {}", sender, inbound_text);

        self.log_message(Message::new(turn_id, sender, Role::User, inbound_text)).await;

        let outbound_text = self.generate_reply(inbound_text).await;

        self.log_message(Message::new(turn_id, sender, Role::Assistant, &outbound_text)).await;

        info!("Replied to {}: {}", sender, outbound_text);
        Turn {
            id: turn_id,
            sender: sender.to_string(),
            inbound_text: inbound_text.to_string(),
            outbound_text,
        }
    }

    async fn log_message(&self, message: Message) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(e) = store.insert(&message).await {
            warn!("Failed to write {} message to {}: {}", message.role, store.kind(), e);
        }
    }

    async fn generate_reply(&self, inbound_text: &str) -> String {
        let request = CompletionRequest::for_user_text(inbound_text);
        let result = tokio::time::timeout(self.completion_timeout, self.chat_client.complete(&request))
            .await
            .unwrap_or(Err(CompletionError::Timeout(self.completion_timeout)));

        match result {
            Ok(resp) => resp.response.trim().to_string(),
            Err(e) => {
                error!("Error generating reply: {}", e);
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
