use crate::handler::{ ApiResponse, ChatHandler };
use std::sync::Arc;
use axum::{
    Router,
    body::Bytes,
    extract::{ State, rejection::BytesRejection },
    response::{ IntoResponse, Response },
    http::{
        HeaderValue,
        Method,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS,
            ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
            CONTENT_TYPE,
        },
    },
};
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use log::{ debug, warn };

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";
pub const ALLOW_METHODS: &str = "OPTIONS,POST";

/// Every path and method goes to the chat handler; CORS and content-type headers are set on all responses.
pub fn router(handler: Arc<ChatHandler>) -> Router {
    let headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN)))
        .layer(SetResponseHeaderLayer::overriding(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS)))
        .layer(SetResponseHeaderLayer::overriding(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS)))
        .layer(SetResponseHeaderLayer::overriding(CONTENT_TYPE, HeaderValue::from_static("application/json")));

    Router::new()
        .fallback(chat_handler)
        .layer(headers)
        .with_state(handler)
}

async fn chat_handler(
    State(handler): State<Arc<ChatHandler>>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!("Rejected {} request body: {}", method, rejection.body_text());
            let response = ApiResponse::error(rejection.status(), rejection.body_text());
            return (response.status, response.body).into_response();
        }
    };
    debug!("{} request with {} byte body", method, body.len());
    let body = if body.is_empty() { None } else { Some(body.as_ref()) };
    let response = handler.handle(&method, body).await;
    (response.status, response.body).into_response()
}
