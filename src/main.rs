// src/main.rs
// HTTP entry point: nearby users, top-picks refresh, chat notifications and form submissions

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;

use pairent_lib::{
    api::{create_api_routes, AppState},
    config::AppConfig,
    db,
    index::{GeoIndex, PgGeoIndex},
    inquiries::PgInquiryStore,
    notifications::{LogPushSender, MessageNotifier, PushSender},
    profiles::{PgProfileStore, ProfileStore},
    top_picks::TopPicksService,
};

// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    info!("Starting pairent API server...");
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!(
        "Search tiers: {:?}m, early stop above {} candidates, deadline {:?}",
        config.search.radius_tiers_m(),
        config.search.early_stop_threshold(),
        config.search.deadline()
    );

    let pool = db::connect(&config)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&pool).await?;

    let profiles: Arc<dyn ProfileStore> = Arc::new(PgProfileStore::new(pool.clone()));
    let index: Arc<dyn GeoIndex> = Arc::new(PgGeoIndex::new(pool.clone()));
    let sender: Arc<dyn PushSender> = Arc::new(LogPushSender);

    let app_state = Arc::new(AppState {
        top_picks: Arc::new(TopPicksService::new(
            profiles.clone(),
            index,
            config.search.clone(),
        )),
        inquiries: Arc::new(PgInquiryStore::new(pool.clone())),
        messages: Arc::new(MessageNotifier::new(profiles, sender)),
    });

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(create_api_routes(app_state));

    let addr: SocketAddr = format!("{}:{}", config.listen_addr, config.listen_port)
        .parse()
        .context("Invalid LISTEN_ADDR/LISTEN_PORT")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    info!("Server shutting down");
    Ok(())
}
