use crate::config::{HISTORY_WINDOW, MAX_TOKENS, TEMPERATURE};
use crate::error::GatewayError;
use crate::history;
use crate::web::models::{CompletionRequest, HistoryEntry, Message, Role};

/// Builds the provider request: system prompt, windowed history, then the new
/// user turn. Pure; identical inputs give identical requests.
pub fn compose(
    personality_prompt: &str,
    history: &[HistoryEntry],
    prompt: &str,
    model_name: &str,
    streaming: bool,
) -> Result<CompletionRequest, GatewayError> {
    if prompt.trim().is_empty() {
        return Err(GatewayError::EmptyPrompt);
    }

    let recent = history::window(history, HISTORY_WINDOW);
    let mut messages = Vec::with_capacity(recent.len() + 2);
    messages.push(Message::new(Role::System, personality_prompt));
    messages.extend(recent);
    messages.push(Message::new(Role::User, prompt));

    Ok(CompletionRequest {
        model: model_name.to_string(),
        messages,
        streaming,
        temperature: TEMPERATURE,
        max_tokens: MAX_TOKENS,
    })
}
