use bytes::Bytes;
use futures_util::stream::Stream;
use futures_util::StreamExt;
use log::{debug, warn};
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use uuid::Uuid;

use crate::error::UpstreamError;

/// Pause after every forwarded chunk so text appears to be typed out.
pub const PACING: Duration = Duration::from_millis(1);

/// In-band failure frame, framed like a provider SSE event.
pub fn error_chunk(message: &str) -> Bytes {
    Bytes::from(format!("data: {}\n\n", json!({ "error": message })))
}

/// Forwards provider chunks unchanged and in order, pausing after each one.
///
/// The first upstream error becomes a single terminal error chunk, so the
/// returned stream itself never fails. Dropping it drops `upstream` and with
/// it the provider connection.
pub fn relay<S>(
    request_id: Uuid,
    upstream: S,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static
where
    S: Stream<Item = Result<Bytes, UpstreamError>> + Send + Unpin + 'static,
{
    async_stream::stream! {
        let mut upstream = upstream;
        let mut forwarded = 0usize;

        while let Some(item) = upstream.next().await {
            match item {
                Ok(chunk) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    forwarded += 1;
                    yield Ok(chunk);
                    tokio::time::sleep(PACING).await;
                }
                Err(e) => {
                    warn!("[{}] stream ended with error after {} chunks: {}", request_id, forwarded, e);
                    yield Ok(error_chunk(&e.to_string()));
                    return;
                }
            }
        }

        debug!("[{}] stream finished after {} chunks", request_id, forwarded);
    }
}
