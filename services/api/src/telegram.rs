//! Telegram Bot API client for group membership checks
//!
//! The membership check is the one outbound dependency of the auth flow. It
//! fails closed on privilege: missing configuration, unknown users, upstream
//! errors, and non-admin statuses all map to "not admin".

use anyhow::Result;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Base URL of the Telegram Bot API
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Request timeout for Bot API calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for membership lookups
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot token or group id not configured
    #[error("Telegram bot token or group id not configured")]
    MissingConfig,

    /// Upstream request or decode failure
    #[error("Telegram API request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Envelope of a `getChatMember` response
#[derive(Debug, Deserialize)]
pub struct ChatMemberResponse {
    pub ok: bool,
    pub result: Option<ChatMember>,
    pub description: Option<String>,
}

/// The membership record inside a successful response
#[derive(Debug, Deserialize)]
pub struct ChatMember {
    pub status: String,
}

/// Whether a chat-member status carries admin rights in the group.
pub fn is_admin_status(status: &str) -> bool {
    matches!(status, "creator" | "administrator")
}

/// Client for the Telegram Bot API, scoped to one reference group
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    api_base: String,
    bot_token: Option<String>,
    group_id: Option<String>,
}

impl TelegramClient {
    /// Initialize a new Telegram client
    pub fn new(bot_token: Option<String>, group_id: Option<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(TelegramClient {
            http,
            api_base: TELEGRAM_API_BASE.to_string(),
            bot_token,
            group_id,
        })
    }

    /// Replace the Bot API base URL, e.g. to point at a local stub server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Look up a user's membership record in the reference group
    pub async fn chat_member(&self, user_id: i64) -> Result<ChatMemberResponse, TelegramError> {
        let (bot_token, group_id) = match (&self.bot_token, &self.group_id) {
            (Some(token), Some(group)) => (token, group),
            _ => return Err(TelegramError::MissingConfig),
        };

        let url = format!("{}/bot{}/getChatMember", self.api_base, bot_token);
        let user_id = user_id.to_string();

        let response = self
            .http
            .get(&url)
            .query(&[("chat_id", group_id.as_str()), ("user_id", user_id.as_str())])
            .send()
            .await?;

        Ok(response.json::<ChatMemberResponse>().await?)
    }

    /// Check whether a user holds admin status in the reference group.
    ///
    /// Any lookup failure is absorbed into `false`.
    pub async fn check_is_admin(&self, user_id: i64) -> bool {
        match self.chat_member(user_id).await {
            Ok(response) if response.ok => response
                .result
                .map(|member| is_admin_status(&member.status))
                .unwrap_or(false),
            Ok(_) => false,
            Err(e) => {
                warn!("Membership lookup failed for user {}: {}", user_id, e);
                false
            }
        }
    }
}

/// Spawn a local server answering every request with a fixed body, and
/// return its base URL.
#[cfg(test)]
pub(crate) async fn spawn_bot_api_stub(body: &'static str) -> String {
    let app = axum::Router::new().fallback(move || async move { body });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_client(api_base: String) -> TelegramClient {
        TelegramClient::new(Some("123:abc".to_string()), Some("-100200300".to_string()))
            .unwrap()
            .with_api_base(api_base)
    }

    #[test]
    fn test_admin_status_mapping() {
        assert!(is_admin_status("creator"));
        assert!(is_admin_status("administrator"));

        assert!(!is_admin_status("member"));
        assert!(!is_admin_status("restricted"));
        assert!(!is_admin_status("left"));
        assert!(!is_admin_status("kicked"));
        assert!(!is_admin_status(""));
        assert!(!is_admin_status("Administrator"));
    }

    #[test]
    fn test_chat_member_response_decoding() {
        let ok: ChatMemberResponse = serde_json::from_str(
            r#"{"ok":true,"result":{"status":"administrator","user":{"id":42,"first_name":"A"}}}"#,
        )
        .unwrap();
        assert!(ok.ok);
        assert_eq!(ok.result.unwrap().status, "administrator");

        let err: ChatMemberResponse =
            serde_json::from_str(r#"{"ok":false,"description":"Bad Request: user not found"}"#)
                .unwrap();
        assert!(!err.ok);
        assert!(err.result.is_none());
        assert_eq!(
            err.description.as_deref(),
            Some("Bad Request: user not found")
        );
    }

    #[tokio::test]
    async fn test_missing_config_is_an_explicit_error() {
        let client = TelegramClient::new(None, None).unwrap();
        assert!(matches!(
            client.chat_member(42).await,
            Err(TelegramError::MissingConfig)
        ));
    }

    #[tokio::test]
    async fn test_check_is_admin_fails_closed_without_config() {
        let client = TelegramClient::new(Some("123:abc".to_string()), None).unwrap();
        assert!(!client.check_is_admin(42).await);
    }

    #[tokio::test]
    async fn test_check_is_admin_accepts_admin_statuses_over_http() {
        let base = spawn_bot_api_stub(r#"{"ok":true,"result":{"status":"creator"}}"#).await;
        assert!(stub_client(base).check_is_admin(42).await);

        let base = spawn_bot_api_stub(r#"{"ok":true,"result":{"status":"administrator"}}"#).await;
        assert!(stub_client(base).check_is_admin(42).await);
    }

    #[tokio::test]
    async fn test_check_is_admin_rejects_plain_member_over_http() {
        let base = spawn_bot_api_stub(r#"{"ok":true,"result":{"status":"member"}}"#).await;
        assert!(!stub_client(base).check_is_admin(42).await);
    }

    #[tokio::test]
    async fn test_check_is_admin_fails_closed_on_api_error_over_http() {
        let base =
            spawn_bot_api_stub(r#"{"ok":false,"description":"Bad Request: user not found"}"#).await;
        let client = stub_client(base);

        assert!(!client.check_is_admin(42).await);

        let response = client.chat_member(42).await.unwrap();
        assert!(!response.ok);
        assert_eq!(
            response.description.as_deref(),
            Some("Bad Request: user not found")
        );
    }

    #[tokio::test]
    async fn test_check_is_admin_fails_closed_on_undecodable_body() {
        let base = spawn_bot_api_stub("not json at all").await;
        assert!(!stub_client(base).check_is_admin(42).await);
    }
}
