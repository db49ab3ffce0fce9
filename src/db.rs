// src/db.rs

use anyhow::{Context, Result};
use bb8::Pool;
use bb8_postgres::PostgresConnectionManager;
use log::info;
use std::time::Duration;
use tokio_postgres::{Config, NoTls};

use crate::config::AppConfig;

pub type PgPool = Pool<PostgresConnectionManager<NoTls>>;

/// Builds the PostgreSQL connection config from the application config.
fn build_pg_config(app_config: &AppConfig) -> Config {
    let mut config = Config::new();
    info!(
        "DB Config: Host={}, Port={}, DB={}, User={}",
        app_config.postgres_host,
        app_config.postgres_port,
        app_config.postgres_db,
        app_config.postgres_user
    );
    config
        .host(&app_config.postgres_host)
        .port(app_config.postgres_port)
        .dbname(&app_config.postgres_db)
        .user(&app_config.postgres_user)
        .password(&app_config.postgres_password);
    config.application_name("pairent");
    config.connect_timeout(Duration::from_secs(10));
    config
}

/// Initializes the database connection pool and checks it with a test query.
pub async fn connect(app_config: &AppConfig) -> Result<PgPool> {
    let config = build_pg_config(app_config);
    info!("Connecting to PostgreSQL database...");
    let manager = PostgresConnectionManager::new(config, NoTls);

    let pool = Pool::builder()
        .max_size(app_config.db_pool_max_size)
        .min_idle(Some(2))
        .idle_timeout(Some(Duration::from_secs(180)))
        .connection_timeout(Duration::from_secs(15))
        .build(manager)
        .await
        .context("Failed to build database connection pool")?;

    let conn = pool
        .get()
        .await
        .context("Failed to get test connection from pool")?;
    conn.query_one("SELECT 1", &[])
        .await
        .context("Test query 'SELECT 1' failed")?;
    drop(conn);
    info!("Database connection pool initialized successfully.");
    Ok(pool)
}

/// Connects a small pool from a connection string, for tests and one-off tools.
pub async fn connect_url(database_url: &str) -> Result<PgPool> {
    let config: Config = database_url
        .parse()
        .context("Failed to parse database URL")?;
    let manager = PostgresConnectionManager::new(config, NoTls);
    Pool::builder()
        .max_size(4)
        .build(manager)
        .await
        .context("Failed to build database connection pool")
}

/// Creates the tables this service relies on if they do not exist yet.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    let conn = pool
        .get()
        .await
        .context("Failed to get DB connection for migrations")?;
    conn.batch_execute(include_str!("../migrations/0001_init.sql"))
        .await
        .context("Failed to apply schema migration")?;
    info!("Schema is up to date.");
    Ok(())
}
