//! Application state shared across handlers

use sqlx::PgPool;

use crate::{
    config::AppConfig, jwt::TokenService, repositories::EventRepository, telegram::TelegramClient,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: AppConfig,
    pub token_service: TokenService,
    pub telegram: TelegramClient,
    pub event_repository: EventRepository,
}
