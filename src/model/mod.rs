//! Client for the upstream chat completions provider.

pub mod relay;

use anyhow::Result;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use tokio::time::timeout;

use crate::config::UpstreamConfig;
use crate::error::{GatewayError, UpstreamError};
use crate::web::models::CompletionRequest;

/// Raw provider output, one item per network read. Ends after the first `Err`.
pub type ChunkStream = BoxStream<'static, Result<Bytes, UpstreamError>>;

pub enum Completion {
    /// Decoded JSON body of a non-streaming call.
    Buffered(Value),
    /// Lazily opened streaming call; nothing is sent until first polled.
    Stream(ChunkStream),
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Completion::Buffered(body) => f.debug_tuple("Buffered").field(body).finish(),
            Completion::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

pub struct UpstreamClient {
    client: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        info!("Upstream client ready for {}", config.api_url);
        Ok(Self { client, config })
    }

    pub fn has_api_key(&self) -> bool {
        self.config.has_api_key()
    }

    /// Makes exactly one provider call. Failures are reported, never retried.
    pub async fn invoke(&self, request: CompletionRequest) -> Result<Completion, GatewayError> {
        let builder = self.request_builder(&request)?;
        if request.streaming {
            Ok(Completion::Stream(self.open_stream(builder)))
        } else {
            self.buffered(builder).await.map(Completion::Buffered).map_err(Into::into)
        }
    }

    fn request_builder(&self, request: &CompletionRequest) -> Result<RequestBuilder, GatewayError> {
        let api_key = self.config.api_key.as_deref().ok_or(GatewayError::MissingApiKey)?;

        debug!(
            "Preparing {} request for model {} with {} messages",
            if request.streaming { "streaming" } else { "buffered" },
            request.model,
            request.messages.len()
        );

        let mut builder = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .json(request);
        if let Some(referer) = &self.config.referer {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.title {
            builder = builder.header("X-Title", title);
        }
        Ok(builder)
    }

    async fn buffered(&self, builder: RequestBuilder) -> Result<Value, UpstreamError> {
        let response = builder.timeout(self.config.buffered_timeout).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Provider answered {} to buffered request", status);
            return Err(UpstreamError::from_status(status.as_u16(), &body));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    /// The deadline covers the wait for response headers and each wait for
    /// the next body chunk; a steadily flowing stream is never cut off.
    fn open_stream(&self, builder: RequestBuilder) -> ChunkStream {
        let deadline = self.config.stream_timeout;

        let stream = async_stream::stream! {
            let response = match timeout(deadline, builder.send()).await {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    yield Err(UpstreamError::from(e));
                    return;
                }
                Err(_) => {
                    yield Err(UpstreamError::Timeout);
                    return;
                }
            };

            let status = response.status();
            if !status.is_success() {
                warn!("Provider answered {} to streaming request", status);
                let body = timeout(deadline, response.text())
                    .await
                    .ok()
                    .and_then(|text| text.ok())
                    .unwrap_or_default();
                yield Err(UpstreamError::from_status(status.as_u16(), &body));
                return;
            }

            let mut body = response.bytes_stream();
            loop {
                match timeout(deadline, body.next()).await {
                    Ok(Some(Ok(chunk))) => yield Ok(chunk),
                    Ok(Some(Err(e))) => {
                        yield Err(UpstreamError::from(e));
                        return;
                    }
                    Ok(None) => return,
                    Err(_) => {
                        yield Err(UpstreamError::Timeout);
                        return;
                    }
                }
            }
        };

        stream.boxed()
    }
}
