use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::personality::DEFAULT_PERSONALITY;
use crate::web::models::HistoryEntry;

pub const DEFAULT_THEME: &str = "light";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSettings {
    pub username: String,
    pub theme: String,
    pub personality: String,
}

impl UserSettings {
    pub fn defaults(username: &str) -> Self {
        Self {
            username: username.to_string(),
            theme: DEFAULT_THEME.to_string(),
            personality: DEFAULT_PERSONALITY.to_string(),
        }
    }
}

/// Per-user preferences kept outside the gateway core.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Stored settings for `username`, `None` if the user never saved any.
    async fn settings(&self, username: &str) -> Result<Option<UserSettings>>;

    /// Applies the given fields, starting from defaults for unknown users.
    async fn update(
        &self,
        username: &str,
        theme: Option<&str>,
        personality: Option<&str>,
    ) -> Result<UserSettings>;

    async fn personality(&self, username: &str) -> Result<Option<String>> {
        Ok(self.settings(username).await?.map(|s| s.personality))
    }
}

#[derive(Default)]
pub struct MemorySettings {
    users: RwLock<HashMap<String, UserSettings>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn settings(&self, username: &str) -> Result<Option<UserSettings>> {
        let users = self
            .users
            .read()
            .map_err(|e| anyhow::anyhow!("settings lock poisoned: {}", e))?;
        Ok(users.get(username).cloned())
    }

    async fn update(
        &self,
        username: &str,
        theme: Option<&str>,
        personality: Option<&str>,
    ) -> Result<UserSettings> {
        let mut users = self
            .users
            .write()
            .map_err(|e| anyhow::anyhow!("settings lock poisoned: {}", e))?;
        let entry = users
            .entry(username.to_string())
            .or_insert_with(|| UserSettings::defaults(username));
        if let Some(theme) = theme {
            entry.theme = theme.to_string();
        }
        if let Some(personality) = personality {
            entry.personality = personality.to_string();
        }
        Ok(entry.clone())
    }
}

/// A saved conversation as the client last sent it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedChat {
    pub id: String,
    pub title: String,
    pub messages: Vec<HistoryEntry>,
}

/// Chat transcripts keyed by (username, chat id).
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Inserts or replaces the chat; a replaced chat moves to the front of `list`.
    async fn save(&self, username: &str, chat: SavedChat) -> Result<()>;

    /// The user's chats, most recently saved first.
    async fn list(&self, username: &str) -> Result<Vec<SavedChat>>;

    /// Returns `false` when no such chat exists.
    async fn rename(&self, username: &str, chat_id: &str, title: &str) -> Result<bool>;

    async fn delete(&self, username: &str, chat_id: &str) -> Result<bool>;
}

#[derive(Default)]
struct ChatTable {
    next_seq: u64,
    chats: HashMap<(String, String), (u64, SavedChat)>,
}

#[derive(Default)]
pub struct MemoryChats {
    table: RwLock<ChatTable>,
}

impl MemoryChats {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, ChatTable>> {
        self.table
            .write()
            .map_err(|e| anyhow::anyhow!("chat store lock poisoned: {}", e))
    }
}

fn key(username: &str, chat_id: &str) -> (String, String) {
    (username.to_string(), chat_id.to_string())
}

#[async_trait]
impl ChatStore for MemoryChats {
    async fn save(&self, username: &str, chat: SavedChat) -> Result<()> {
        let mut table = self.write()?;
        table.next_seq += 1;
        let seq = table.next_seq;
        table.chats.insert(key(username, &chat.id), (seq, chat));
        Ok(())
    }

    async fn list(&self, username: &str) -> Result<Vec<SavedChat>> {
        let table = self
            .table
            .read()
            .map_err(|e| anyhow::anyhow!("chat store lock poisoned: {}", e))?;
        let mut chats: Vec<&(u64, SavedChat)> = table
            .chats
            .iter()
            .filter(|(key, _)| key.0 == username)
            .map(|(_, entry)| entry)
            .collect();
        chats.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(chats.into_iter().map(|(_, chat)| chat.clone()).collect())
    }

    async fn rename(&self, username: &str, chat_id: &str, title: &str) -> Result<bool> {
        let mut table = self.write()?;
        Ok(match table.chats.get_mut(&key(username, chat_id)) {
            Some((_, chat)) => {
                chat.title = title.to_string();
                true
            }
            None => false,
        })
    }

    async fn delete(&self, username: &str, chat_id: &str) -> Result<bool> {
        let mut table = self.write()?;
        Ok(table.chats.remove(&key(username, chat_id)).is_some())
    }
}
