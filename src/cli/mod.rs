use clap::Parser;
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Completion Provider Args ---
    /// API key for the Groq chat completion API. Required.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    pub groq_api_key: Option<String>,

    /// Model name for chat completion (e.g., llama-3.1-8b-instant)
    #[arg(long, env = "GROQ_MODEL", default_value = "llama-3.1-8b-instant")]
    pub groq_model: String,

    /// Base URL of the OpenAI-compatible Groq API
    #[arg(long, env = "GROQ_BASE_URL", default_value = "https://api.groq.com/openai/v1")]
    pub groq_base_url: String,

    /// Upper bound in seconds for a single reply generation, retries included.
    #[arg(long, env = "COMPLETION_TIMEOUT_SECS", default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    pub completion_timeout_secs: u64,

    /// Extra attempts on transient completion failures (429, 5xx, transport). 0 disables retry.
    #[arg(long, env = "COMPLETION_MAX_RETRIES", default_value = "0")]
    pub completion_max_retries: u32,

    /// Linear backoff unit in milliseconds between completion retries (at most 60000).
    #[arg(long, env = "COMPLETION_RETRY_BACKOFF_MS", default_value = "500", value_parser = clap::value_parser!(u64).range(0..=60_000))]
    pub completion_retry_backoff_ms: u64,

    // --- Message Store Args ---
    /// Connection string for the conversation log. Despite the variable name any supported
    /// scheme is accepted: mongodb://, mongodb+srv://, redis://, rediss:// or memory://.
    /// Logging is disabled when unset, unsupported or unreachable.
    #[arg(long, env = "MONGO_URI")]
    pub mongo_uri: Option<String>,

    /// Database holding the conversation log (Mongo only).
    #[arg(long, env = "MONGO_DATABASE", default_value = "chatbot_db")]
    pub mongo_database: String,

    /// Collection holding the conversation log (Mongo only).
    #[arg(long, env = "MONGO_COLLECTION", default_value = "messages")]
    pub mongo_collection: String,

    /// Prefix for Redis history keys.
    #[arg(long, env = "HISTORY_REDIS_PREFIX", default_value = "history:")]
    pub history_redis_prefix: String,

    /// Seconds allowed for the startup connectivity check of the message store.
    #[arg(long, env = "STORE_CONNECT_TIMEOUT_SECS", default_value = "5")]
    pub store_connect_timeout_secs: u64,

    // --- General App Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "0.0.0.0:8000")]
    pub server_addr: String,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl Args {
    /// The completion credential, trimmed. Missing or blank is a startup error.
    pub fn groq_api_key(&self) -> Result<String, ConfigError> {
        match self.groq_api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => Err(ConfigError::MissingApiKey("GROQ_API_KEY")),
        }
    }

    /// Store connection string, `None` when unset or blank.
    pub fn store_uri(&self) -> Option<&str> {
        self.mongo_uri
            .as_deref()
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
    }

    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    pub fn store_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.store_connect_timeout_secs)
    }

    /// TLS paths when HTTPS serving is enabled and both files are given.
    pub fn tls_paths(&self) -> Option<(&str, &str)> {
        if !self.enable_tls {
            return None;
        }
        match (self.tls_cert_path.as_deref(), self.tls_key_path.as_deref()) {
            (Some(cert), Some(key)) => Some((cert, key)),
            _ => None,
        }
    }
}
