// src/bin/remind_incomplete_profiles.rs
// Weekly job: nudge owners of incomplete profiles, then fill in any missing top picks.
use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;
use std::time::Instant;

use pairent_lib::{
    config::AppConfig,
    db,
    index::{GeoIndex, PgGeoIndex},
    notifications::{LogPushSender, ProfileReminder, PushSender},
    profiles::{PgProfileStore, ProfileStore},
    top_picks::TopPicksService,
};

const PENDING_TOP_PICKS_LIMIT: usize = 500;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let start = Instant::now();
    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let pool = db::connect(&config)
        .await
        .context("Failed to connect to database")?;

    let profiles: Arc<dyn ProfileStore> = Arc::new(PgProfileStore::new(pool.clone()));
    let index: Arc<dyn GeoIndex> = Arc::new(PgGeoIndex::new(pool.clone()));
    let sender: Arc<dyn PushSender> = Arc::new(LogPushSender);

    let stats = ProfileReminder::new(profiles.clone(), sender)
        .run()
        .await
        .context("Reminder run failed")?;
    info!("Reminder stats: {:?}", stats);

    let refreshed = TopPicksService::new(profiles, index, config.search.clone())
        .refresh_pending(PENDING_TOP_PICKS_LIMIT)
        .await
        .context("Pending top picks refresh failed")?;
    info!(
        "Refreshed top picks for {} profiles. Job finished in {:.2?}",
        refreshed,
        start.elapsed()
    );
    Ok(())
}
