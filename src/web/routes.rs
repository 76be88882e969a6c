use actix_cors::Cors;
use actix_web::web;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/chat", web::post().to(handlers::chat))
            .route("/personalities", web::get().to(handlers::personalities))
            .route("/user-settings/{username}", web::get().to(handlers::user_settings))
            .route("/update-settings", web::post().to(handlers::update_settings))
            .route("/chat-history/{username}", web::get().to(handlers::chat_history))
            .route("/save-chat", web::post().to(handlers::save_chat))
            .route("/rename-chat", web::post().to(handlers::rename_chat))
            .route("/delete-chat", web::post().to(handlers::delete_chat))
    )
    .route("/health", web::get().to(handlers::health_check));
}

/// CORS policy for the browser front end: listed origins only, any method and header.
pub fn cors(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
