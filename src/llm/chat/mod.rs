pub mod groq;

use async_trait::async_trait;
use std::sync::Arc;

use super::{ CompletionRequest, CompletionResponse };
use crate::cli::Args;
use crate::error::{ CompletionError, ConfigError };
use self::groq::GroqChatClient;

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest
    ) -> Result<CompletionResponse, CompletionError>;

    fn get_model(&self) -> String;
}

/// Builds the completion client. A missing credential is fatal.
pub fn new_client(args: &Args) -> Result<Arc<dyn ChatClient>, ConfigError> {
    let client = GroqChatClient::from_args(args)?;
    Ok(Arc::new(client))
}
