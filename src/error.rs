use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::{json, Value};
use thiserror::Error;

/// Failures talking to the completion provider.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpstreamError {
    #[error("API Error: {status}{}", detail_suffix(.message))]
    HttpStatus { status: u16, message: String },
    #[error("the provider did not answer before the deadline")]
    Timeout,
    #[error("connection error: {0}")]
    ConnectionFailed(String),
    #[error("could not decode provider response: {0}")]
    Decode(String),
}

fn detail_suffix(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(" - {}", message)
    }
}

impl UpstreamError {
    /// Builds an `HttpStatus` error from a failed response body.
    pub fn from_status(status: u16, body: &str) -> Self {
        UpstreamError::HttpStatus {
            status,
            message: provider_message(body),
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::ConnectionFailed(err.to_string())
        }
    }
}

/// Pulls the human readable message out of a provider error envelope,
/// falling back to the raw body.
pub fn provider_message(body: &str) -> String {
    let trimmed = body.trim();
    serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .or_else(|| value.get("error").and_then(Value::as_str))
                .or_else(|| value.get("message").and_then(Value::as_str))
                .map(str::to_owned)
        })
        .unwrap_or_else(|| trimmed.to_string())
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("provider API key is not configured")]
    MissingApiKey,
    #[error("prompt must not be empty")]
    EmptyPrompt,
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("internal server error: {0}")]
    Internal(String),
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::EmptyPrompt => StatusCode::BAD_REQUEST,
            GatewayError::Upstream(UpstreamError::HttpStatus { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            GatewayError::Upstream(UpstreamError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Upstream(UpstreamError::ConnectionFailed(_)) => StatusCode::BAD_GATEWAY,
            GatewayError::Upstream(UpstreamError::Decode(_)) | GatewayError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
