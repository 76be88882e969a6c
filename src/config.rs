use log::{info, warn};
use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";
pub const DEFAULT_ASSISTANT_NAME: &str = "Orzion Pro";
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:8888";

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 2000;
pub const HISTORY_WINDOW: usize = 20;

const BUFFERED_TIMEOUT: Duration = Duration::from_secs(30);
const STREAM_TIMEOUT: Duration = Duration::from_secs(60);

/// Everything the upstream client needs, captured once at startup.
#[derive(Clone)]
pub struct UpstreamConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub referer: Option<String>,
    pub title: Option<String>,
    pub buffered_timeout: Duration,
    pub stream_timeout: Duration,
}

impl UpstreamConfig {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            referer: None,
            title: None,
            buffered_timeout: BUFFERED_TIMEOUT,
            stream_timeout: STREAM_TIMEOUT,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

// Hand-written so the key never ends up in a log line.
impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("referer", &self.referer)
            .field("title", &self.title)
            .field("buffered_timeout", &self.buffered_timeout)
            .field("stream_timeout", &self.stream_timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub assistant_name: String,
    /// Browser origins allowed to call the API.
    pub cors_origins: Vec<String>,
    pub upstream: UpstreamConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let api_url = env::var("OPENROUTER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut upstream = UpstreamConfig::new(api_url, env::var("OPENROUTER_API_KEY").ok());
        upstream.referer = non_empty_var("OPENROUTER_REFERER");
        upstream.title = non_empty_var("OPENROUTER_TITLE");

        if upstream.has_api_key() {
            info!("Provider API key configured, forwarding to {}", upstream.api_url);
        } else {
            warn!("OPENROUTER_API_KEY is not set; chat completions will be refused");
        }

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(5000);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            assistant_name: non_empty_var("ASSISTANT_NAME")
                .unwrap_or_else(|| DEFAULT_ASSISTANT_NAME.to_string()),
            cors_origins: parse_origins(
                &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            upstream,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Comma separated origins; trailing slashes are dropped since browsers never send them.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
