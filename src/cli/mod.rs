use clap::Parser;
use crate::config::prompt::{ DEFAULT_MAX_TOKENS, DEFAULT_MODEL };
use crate::history::{ DEFAULT_TTL_DAYS, MAX_TTL_DAYS };
use crate::llm::DEFAULT_ANTHROPIC_BASE_URL;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- History Store Args ---
    /// History store type (dynamodb, memory)
    #[arg(long, env = "HISTORY_TYPE", default_value = "dynamodb")]
    pub history_type: String,

    /// DynamoDB table holding conversation turns.
    #[arg(long, env = "CONVERSATIONS_TABLE", default_value = "GrantsConversations")]
    pub conversations_table: String,

    /// Days a stored turn is kept before the table's TTL may delete it (1 to 30).
    #[arg(
        long,
        env = "CONVERSATION_TTL_DAYS",
        default_value_t = DEFAULT_TTL_DAYS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TTL_DAYS)
    )]
    pub conversation_ttl_days: i64,

    // --- Chat LLM Provider Args ---
    /// SSM parameter (SecureString) holding the Anthropic API key.
    #[arg(long, env = "ANTHROPIC_API_KEY_PARAM", default_value = "/prod/anthropic-api-key")]
    pub api_key_parameter: String,

    /// Static API key. When set, the SSM parameter is not read.
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Base URL for the Anthropic API
    #[arg(long, env = "CHAT_BASE_URL", default_value = DEFAULT_ANTHROPIC_BASE_URL)]
    pub chat_base_url: String,

    /// Model name for chat completion (e.g., claude-3-5-sonnet-20241022)
    #[arg(long, env = "CHAT_MODEL", default_value = DEFAULT_MODEL)]
    pub chat_model: String,

    /// Maximum tokens generated per reply.
    #[arg(long, env = "CHAT_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub chat_max_tokens: u32,

    /// Optional request timeout for the chat API, in seconds.
    #[arg(long, env = "CHAT_TIMEOUT_SECS")]
    pub chat_timeout_secs: Option<u64>,

    // --- General App Args ---
    /// Host address and port for the local server. Ignored when running inside Lambda.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,
}
