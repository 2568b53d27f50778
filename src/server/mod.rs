pub mod api;

use crate::handler::ChatHandler;
use std::error::Error;
use std::sync::Arc;
use log::info;

const LAMBDA_RUNTIME_API_ENV: &str = "AWS_LAMBDA_RUNTIME_API";

pub fn running_in_lambda() -> bool {
    std::env::var_os(LAMBDA_RUNTIME_API_ENV).is_some()
}

pub struct Server {
    addr: String,
    handler: Arc<ChatHandler>,
}

impl Server {
    pub fn new(addr: String, handler: Arc<ChatHandler>) -> Self {
        Self { addr, handler }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        if running_in_lambda() {
            self.start_lambda().await
        } else {
            self.start_http_server().await
        }
    }

    async fn start_lambda(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        info!("Running as a Lambda function");
        lambda_http::run(api::router(self.handler.clone())).await
    }

    async fn start_http_server(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await
            .map_err(|e| format!("Failed to bind HTTP server to {}: {}. Try a different port.", self.addr, e))?;
        info!("HTTP server listening on: http://{}", self.addr);
        axum::serve(listener, api::router(self.handler.clone()).into_make_service()).await?;
        Ok(())
    }
}
