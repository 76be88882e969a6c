mod compose;
mod config;
mod error;
mod history;
mod model;
mod personality;
mod settings;
mod web;

use actix_web::{App, HttpServer, web::Data};
use dotenv::dotenv;
use log::{info, error};
use std::sync::Arc;

use config::GatewayConfig;
use model::UpstreamClient;
use settings::{ChatStore, MemoryChats, MemorySettings, SettingsStore};
use web::routes;

// App state structure
pub struct AppState {
    pub assistant_name: String,
    pub upstream: UpstreamClient,
    pub settings: Arc<dyn SettingsStore>,
    pub chats: Arc<dyn ChatStore>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting chat gateway");

    let config = GatewayConfig::from_env();

    let upstream = match UpstreamClient::new(config.upstream.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build upstream HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let app_state = Data::new(AppState {
        assistant_name: config.assistant_name.clone(),
        upstream,
        settings: Arc::new(MemorySettings::new()),
        chats: Arc::new(MemoryChats::new()),
    });

    info!("Listening on {}:{}", config.host, config.port);
    info!("CORS origins: {}", config.cors_origins.join(", "));

    let cors_origins = config.cors_origins.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors(&cors_origins))
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
