pub mod chat;
pub mod twiml;
