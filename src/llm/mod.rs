pub mod chat;

use serde::Deserialize;

/// Instruction sent ahead of every user turn.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Sampling temperature used for every reply.
pub const TEMPERATURE: f32 = 0.6;

/// A single-turn completion: fixed system instruction plus the user's text.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn for_user_text(user_text: &str) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            user: user_text.to_string(),
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CompletionResponse {
    pub response: String,
}
