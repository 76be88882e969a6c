use crate::web::models::{HistoryEntry, Message, Role};

/// Keeps the most recent `limit` user/assistant messages, oldest first.
///
/// Entries with any other role (including `system`) are dropped before the
/// window is applied, so they never count against `limit`.
pub fn window(history: &[HistoryEntry], limit: usize) -> Vec<Message> {
    let eligible: Vec<Message> = history
        .iter()
        .filter_map(|entry| match Role::parse(&entry.role) {
            Some(role @ (Role::User | Role::Assistant)) => {
                Some(Message::new(role, entry.content.clone()))
            }
            _ => None,
        })
        .collect();

    let skip = eligible.len().saturating_sub(limit);
    eligible.into_iter().skip(skip).collect()
}
