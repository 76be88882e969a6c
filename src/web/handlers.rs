use actix_web::{web, HttpResponse, Responder};
use log::{debug, error, info, warn};
use serde_json::json;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::compose::compose;
use crate::error::GatewayError;
use crate::model::relay::relay;
use crate::model::Completion;
use crate::personality::{self, Personality, BASE_PROMPT};
use crate::settings::{SavedChat, SettingsStore, UserSettings};
use crate::web::models::{
    ChatRequest, DeleteChatRequest, RenameChatRequest, SaveChatRequest, SettingsUpdate,
};
use crate::AppState;

// Health check endpoint
pub async fn health_check(data: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "api_key_configured": data.upstream.has_api_key(),
    }))
}

fn personality_listing() -> BTreeMap<&'static str, &'static Personality> {
    personality::catalog().iter().map(|p| (p.key, p)).collect()
}

pub async fn personalities() -> impl Responder {
    HttpResponse::Ok().json(personality_listing())
}

fn bad_request(message: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(json!({ "error": message }))
}

fn store_failure(context: &str, e: anyhow::Error) -> HttpResponse {
    error!("{}: {}", context, e);
    HttpResponse::InternalServerError().json(json!({ "error": context }))
}

/// Stored settings, or defaults when the user has none or the store fails.
pub async fn user_settings(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let username = path.into_inner();
    let settings = match data.settings.settings(&username).await {
        Ok(Some(settings)) => settings,
        Ok(None) => UserSettings::defaults(&username),
        Err(e) => {
            warn!("Settings lookup for {} failed, returning defaults: {}", username, e);
            UserSettings::defaults(&username)
        }
    };
    HttpResponse::Ok().json(json!({
        "settings": settings,
        "personalities": personality_listing(),
    }))
}

pub async fn update_settings(
    data: web::Data<AppState>,
    req: web::Json<SettingsUpdate>,
) -> impl Responder {
    let username = req.username.trim();
    if username.is_empty() {
        return bad_request("username is required");
    }
    if let Some(key) = &req.personality {
        if personality::lookup(key).is_none() {
            return bad_request(&format!("unknown personality '{}'", key));
        }
    }
    let theme = req.theme.as_deref().map(str::trim).filter(|t| !t.is_empty());

    match data
        .settings
        .update(username, theme, req.personality.as_deref())
        .await
    {
        Ok(saved) => {
            info!("Settings for {} updated (theme: {}, personality: {})", username, saved.theme, saved.personality);
            HttpResponse::Ok().json(json!({ "message": "settings updated", "settings": saved }))
        }
        Err(e) => store_failure("could not store settings", e),
    }
}

/// Lists saved chats; a failing store yields an empty list.
pub async fn chat_history(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let username = path.into_inner();
    let chats = data.chats.list(&username).await.unwrap_or_else(|e| {
        error!("Failed to load chat history for {}: {}", username, e);
        Vec::new()
    });
    HttpResponse::Ok().json(json!({ "chat_histories": chats }))
}

pub async fn save_chat(
    data: web::Data<AppState>,
    req: web::Json<SaveChatRequest>,
) -> impl Responder {
    let req = req.into_inner();
    let username = req.username.trim();
    if username.is_empty() || req.id.trim().is_empty() {
        return bad_request("username and id are required");
    }

    let chat = SavedChat {
        id: req.id.clone(),
        title: req.title,
        messages: req.messages,
    };
    match data.chats.save(username, chat).await {
        Ok(()) => {
            debug!("Saved chat {} for {}", req.id, username);
            HttpResponse::Ok().json(json!({ "message": "chat saved" }))
        }
        Err(e) => store_failure("could not save chat", e),
    }
}

pub async fn rename_chat(
    data: web::Data<AppState>,
    req: web::Json<RenameChatRequest>,
) -> impl Responder {
    if req.username.is_empty() || req.chat_id.is_empty() || req.new_title.trim().is_empty() {
        return bad_request("username, chat_id and new_title are required");
    }
    match data.chats.rename(&req.username, &req.chat_id, req.new_title.trim()).await {
        Ok(true) => HttpResponse::Ok().json(json!({ "message": "chat renamed" })),
        Ok(false) => HttpResponse::NotFound().json(json!({ "error": "chat not found" })),
        Err(e) => store_failure("could not rename chat", e),
    }
}

pub async fn delete_chat(
    data: web::Data<AppState>,
    req: web::Json<DeleteChatRequest>,
) -> impl Responder {
    if req.username.is_empty() || req.chat_id.is_empty() {
        return bad_request("username and chat_id are required");
    }
    match data.chats.delete(&req.username, &req.chat_id).await {
        Ok(true) => HttpResponse::Ok().json(json!({ "message": "chat deleted" })),
        Ok(false) => HttpResponse::NotFound().json(json!({ "error": "chat not found" })),
        Err(e) => store_failure("could not delete chat", e),
    }
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    req: web::Json<ChatRequest>,
) -> Result<HttpResponse, GatewayError> {
    let request_id = Uuid::new_v4();

    if !data.upstream.has_api_key() {
        error!("[{}] Refusing chat request: provider API key is not configured", request_id);
        return Err(GatewayError::MissingApiKey);
    }

    let system_prompt =
        personality_prompt(data.settings.as_ref(), req.username(), &data.assistant_name).await;

    let request = compose(
        &system_prompt,
        req.history(),
        &req.prompt,
        req.model_name(),
        req.stream(),
    )?;

    info!(
        "[{}] Chat request for model {} (stream: {}, messages: {})",
        request_id,
        request.model,
        request.streaming,
        request.messages.len()
    );
    debug!("[{}] Prompt: {}", request_id, req.prompt);

    match data.upstream.invoke(request).await {
        Ok(Completion::Buffered(body)) => Ok(HttpResponse::Ok().json(body)),
        Ok(Completion::Stream(chunks)) => Ok(HttpResponse::Ok()
            .content_type("text/plain")
            .streaming(relay(request_id, chunks))),
        Err(e) => {
            error!("[{}] Chat completion failed: {}", request_id, e);
            Err(e)
        }
    }
}

/// System prompt for `username`. Lookup failures are logged and absorbed;
/// the caller always gets a usable prompt. Without a stored preference
/// (no username, unknown user, failed lookup) the base identity prompt is
/// used rather than the "professional" template.
async fn personality_prompt(
    settings: &dyn SettingsStore,
    username: Option<&str>,
    assistant_name: &str,
) -> String {
    let template = match username {
        None => BASE_PROMPT,
        Some(user) => match settings.personality(user).await {
            Ok(Some(key)) => personality::resolve(&key),
            Ok(None) => BASE_PROMPT,
            Err(e) => {
                warn!("Personality lookup for {} failed, using default: {}", user, e);
                BASE_PROMPT
            }
        },
    };
    personality::render(template, assistant_name)
}
