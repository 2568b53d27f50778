pub mod chat;

use crate::cli::Args;

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub completion_model: String,
    pub max_tokens: u32,
    pub timeout_secs: Option<u64>,
}

impl From<&Args> for LlmConfig {
    fn from(args: &Args) -> Self {
        Self {
            base_url: args.chat_base_url.clone(),
            completion_model: args.chat_model.clone(),
            max_tokens: args.chat_max_tokens,
            timeout_secs: args.chat_timeout_secs.filter(|s| *s > 0),
        }
    }
}
