//! Service configuration loaded from environment variables

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Telegram bot token used for init-data validation and the Bot API
    pub bot_token: Option<String>,
    /// Chat id of the group whose admins may manage events
    pub group_id: Option<String>,
    /// Whether auth cookies carry the Secure attribute
    pub secure_cookies: bool,
    /// Maximum accepted age of a sign-in payload, in seconds
    pub init_data_max_age: u64,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDR`: listen address (default: 0.0.0.0:3000)
    /// - `TELEGRAM_BOT_TOKEN`: bot token; sign-in fails per request when unset
    /// - `TELEGRAM_GROUP_ID`: reference group for membership checks
    /// - `APP_ENV`: cookies are marked Secure when set to "production"
    /// - `INIT_DATA_MAX_AGE`: init-data freshness window in seconds (default: 86400)
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|s| !s.is_empty());

        let group_id = std::env::var("TELEGRAM_GROUP_ID")
            .ok()
            .filter(|s| !s.is_empty());

        let secure_cookies = std::env::var("APP_ENV")
            .map(|v| v == "production")
            .unwrap_or(false);

        let init_data_max_age = std::env::var("INIT_DATA_MAX_AGE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86_400);

        AppConfig {
            bind_addr,
            bot_token,
            group_id,
            secure_cookies,
            init_data_max_age,
        }
    }
}
