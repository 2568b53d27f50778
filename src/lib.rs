pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod handler;
pub mod history;
pub mod llm;
pub mod models;
pub mod server;

use agent::GrantsAgent;
use aws_config::BehaviorVersion;
use cli::Args;
use config::secret::{ ApiKeyCache, SecretStore, SsmSecretStore, StaticSecretStore };
use handler::ChatHandler;
use history::initialize_history_store;
use llm::LlmConfig;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("History Store Type: {}", args.history_type);
    info!("Conversations Table: {}", args.conversations_table);
    info!("Conversation TTL (days): {}", args.conversation_ttl_days);
    info!("API Key Parameter: {}", args.api_key_parameter);
    info!("Static API Key: {}", if args.chat_api_key.is_empty() { "not set" } else { "set" });
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat Max Tokens: {}", args.chat_max_tokens);
    info!("Lambda Runtime: {}", server::running_in_lambda());
    if !server::running_in_lambda() {
        info!("Server Address: {}", args.server_addr);
    }
    info!("-------------------------");

    let needs_aws = args.history_type.eq_ignore_ascii_case("dynamodb") || args.chat_api_key.is_empty();
    let aws_config = if needs_aws {
        Some(aws_config::load_defaults(BehaviorVersion::latest()).await)
    } else {
        None
    };

    let history = initialize_history_store(&args, aws_config.as_ref())?;

    let secrets: Arc<dyn SecretStore> = match &aws_config {
        Some(sdk_config) if args.chat_api_key.is_empty() =>
            Arc::new(SsmSecretStore::new(aws_sdk_ssm::Client::new(sdk_config))),
        _ => Arc::new(StaticSecretStore::new(args.chat_api_key.clone())),
    };
    let api_key = ApiKeyCache::new(secrets, args.api_key_parameter.clone());

    let chat_client = llm::chat::new_client(&LlmConfig::from(&args))?;
    let agent = GrantsAgent::new(chat_client, api_key);
    let handler = Arc::new(ChatHandler::new(history, agent).with_ttl_days(args.conversation_ttl_days));

    let server = Server::new(args.server_addr.clone(), handler);
    server.run().await?;

    Ok(())
}
