use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_MODEL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "system")]
    System,
}

impl Role {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            "system" => Some(Role::System),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A history entry as the client sends it. Roles are kept as raw strings so
/// unknown ones can be dropped instead of rejecting the whole request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

#[cfg(test)]
impl HistoryEntry {
    pub fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
    pub model_name: Option<String>,
    pub stream: Option<bool>,
    pub username: Option<String>,
    #[serde(default, alias = "history")]
    pub chat_history: Option<Vec<HistoryEntry>>,
}

impl ChatRequest {
    pub fn model_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn stream(&self) -> bool {
        self.stream.unwrap_or(true)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.chat_history.as_deref().unwrap_or_default()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

/// Body sent to the provider's chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(rename = "stream")]
    pub streaming: bool,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub struct SettingsUpdate {
    pub username: String,
    pub theme: Option<String>,
    pub personality: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveChatRequest {
    pub username: String,
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
}

#[derive(Debug, Deserialize)]
pub struct RenameChatRequest {
    pub username: String,
    pub chat_id: String,
    pub new_title: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteChatRequest {
    pub username: String,
    pub chat_id: String,
}
