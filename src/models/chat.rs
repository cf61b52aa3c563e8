use chrono::{ DateTime, Utc };
use serde::{ Serialize, Deserialize };
use std::fmt;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logged half of a turn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub turn_id: Uuid,
    pub sender: String,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(turn_id: Uuid, sender: &str, role: Role, text: &str) -> Self {
        Self {
            turn_id,
            sender: sender.to_string(),
            role,
            text: text.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Turn {
    pub id: Uuid,
    pub sender: String,
    pub inbound_text: String,
    pub outbound_text: String,
}
