use std::time::Duration;
use thiserror::Error;

/// Fatal problems found while starting the process.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} not found in environment variables")]
    MissingApiKey(&'static str),

    #[error("Invalid API key format: {0}")]
    InvalidApiKey(String),

    #[error("Invalid server address '{addr}': {source}")]
    InvalidServerAddr {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("TLS setup failed: {0}")]
    Tls(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Failed to serialize message: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Malformed store URI: {0}")]
    MalformedUri(String),

    #[error("Unsupported store scheme: {0}")]
    UnsupportedScheme(String),

    #[error("Store did not answer within {0:?}")]
    ConnectTimeout(Duration),
}

#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Groq request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Groq API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed Groq response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("No response from Groq API")]
    NoChoices,

    #[error("Groq response had no message content")]
    NoContent,

    #[error("Completion timed out after {0:?}")]
    Timeout(Duration),
}

impl CompletionError {
    /// Failures worth another attempt: transport problems, rate limiting and server errors.
    pub fn is_transient(&self) -> bool {
        match self {
            CompletionError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            CompletionError::Status { status, .. } => {
                *status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn status(code: StatusCode) -> CompletionError {
        CompletionError::Status { status: code, body: String::new() }
    }

    #[test]
    fn rate_limits_and_server_errors_are_transient() {
        assert!(status(StatusCode::TOO_MANY_REQUESTS).is_transient());
        assert!(status(StatusCode::BAD_GATEWAY).is_transient());
        assert!(!status(StatusCode::UNAUTHORIZED).is_transient());
        assert!(!CompletionError::NoChoices.is_transient());
        assert!(!CompletionError::Timeout(Duration::from_secs(1)).is_transient());
    }

    #[test]
    fn missing_key_names_the_variable() {
        let msg = ConfigError::MissingApiKey("GROQ_API_KEY").to_string();
        assert!(msg.contains("GROQ_API_KEY"));
    }
}
