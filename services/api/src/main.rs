use anyhow::Result;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

mod config;
mod cookies;
mod error;
mod init_data;
mod jwt;
mod models;
mod repositories;
mod routes;
mod state;
mod telegram;

use common::database;
use common::error::DatabaseError;

use crate::{
    config::AppConfig,
    jwt::{TokenConfig, TokenService},
    repositories::EventRepository,
    state::AppState,
    telegram::TelegramClient,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting calendar API service");

    let config = AppConfig::from_env();
    if config.bot_token.is_none() || config.group_id.is_none() {
        warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_GROUP_ID not set; sign-in and membership checks will fail");
    }

    // Initialize database connection pool
    let db_config = database::DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(DatabaseError::Migration)?;

    // Initialize the token service and Telegram client
    let token_config = TokenConfig::from_env()?;
    let token_service = TokenService::new(&token_config);
    let telegram = TelegramClient::new(config.bot_token.clone(), config.group_id.clone())?;
    let event_repository = EventRepository::new(pool.clone());

    info!("Calendar API service initialized successfully");

    let app_state = AppState {
        db_pool: pool,
        config: config.clone(),
        token_service,
        telegram,
        event_repository,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Calendar API listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
