//! Telegram Mini App init-data validation
//!
//! Implements the web-app signed-payload scheme: the init data is a
//! url-encoded query string whose `hash` field is
//! HMAC-SHA256(secret, data-check-string), where the secret is
//! HMAC-SHA256 of the bot token keyed with the literal `WebAppData` and the
//! data-check string is every other decoded `key=value` pair sorted by key
//! and joined with newlines. A payload is additionally rejected once its
//! `auth_date` falls outside the freshness window.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Validation failure for an init-data payload
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InitDataError {
    #[error("init data is missing the hash field")]
    MissingHash,

    #[error("init data signature is invalid")]
    BadSignature,

    #[error("init data is missing a valid auth_date")]
    MissingAuthDate,

    #[error("init data is older than the allowed window")]
    Expired,
}

/// The user object embedded in validated init data
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InitDataUser {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

fn decoded_pairs(init_data: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(init_data.as_bytes())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

fn derive_secret(bot_token: &str) -> hmac::digest::Output<HmacSha256> {
    let mut mac =
        HmacSha256::new_from_slice(b"WebAppData").expect("HMAC accepts any key length");
    mac.update(bot_token.as_bytes());
    mac.finalize().into_bytes()
}

/// Validate an init-data payload against the bot token, using the current
/// wall-clock time for the freshness check.
pub fn validate(init_data: &str, bot_token: &str, max_age_secs: u64) -> Result<(), InitDataError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    validate_at(init_data, bot_token, max_age_secs, now)
}

/// Validate an init-data payload at a caller-supplied point in time.
pub fn validate_at(
    init_data: &str,
    bot_token: &str,
    max_age_secs: u64,
    now_unix: u64,
) -> Result<(), InitDataError> {
    let mut pairs = decoded_pairs(init_data);

    let hash_pos = pairs
        .iter()
        .position(|(key, _)| key == "hash")
        .ok_or(InitDataError::MissingHash)?;
    let (_, hash_hex) = pairs.remove(hash_pos);
    let expected = hex::decode(&hash_hex).map_err(|_| InitDataError::BadSignature)?;

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    let data_check_string = pairs
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n");

    let secret = derive_secret(bot_token);
    let mut mac =
        HmacSha256::new_from_slice(&secret).expect("HMAC accepts any key length");
    mac.update(data_check_string.as_bytes());
    mac.verify_slice(&expected)
        .map_err(|_| InitDataError::BadSignature)?;

    let auth_date: u64 = pairs
        .iter()
        .find(|(key, _)| key == "auth_date")
        .and_then(|(_, value)| value.parse().ok())
        .ok_or(InitDataError::MissingAuthDate)?;

    if now_unix.saturating_sub(auth_date) > max_age_secs {
        return Err(InitDataError::Expired);
    }

    Ok(())
}

/// Extract the embedded `user` object from an init-data payload.
///
/// Intended for payloads that already passed [`validate`]; returns `None`
/// when the field is absent or malformed.
pub fn parse_user(init_data: &str) -> Option<InitDataUser> {
    decoded_pairs(init_data)
        .into_iter()
        .find(|(key, _)| key == "user")
        .and_then(|(_, value)| serde_json::from_str(&value).ok())
}

/// Builders producing correctly signed payloads, shared by unit tests.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    fn sign(pairs: &[(&str, &str)], bot_token: &str) -> String {
        let mut sorted = pairs.to_vec();
        sorted.sort_by_key(|(key, _)| *key);
        let data_check_string = sorted
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n");

        let secret = derive_secret(bot_token);
        let mut mac = HmacSha256::new_from_slice(&secret).unwrap();
        mac.update(data_check_string.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    pub(crate) fn build_init_data(pairs: &[(&str, &str)], bot_token: &str) -> String {
        let hash = sign(pairs, bot_token);
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in pairs {
            serializer.append_pair(key, value);
        }
        serializer.append_pair("hash", &hash);
        serializer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::build_init_data;
    use super::*;

    const BOT_TOKEN: &str = "1234567890:test-bot-token";
    const USER_JSON: &str =
        r#"{"id":42,"first_name":"Ada","last_name":"Lovelace","username":"ada","language_code":"en"}"#;

    fn now_unix() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[test]
    fn test_valid_init_data_passes() {
        let now = now_unix();
        let auth_date = now.to_string();
        let init_data = build_init_data(
            &[("auth_date", auth_date.as_str()), ("user", USER_JSON)],
            BOT_TOKEN,
        );

        assert_eq!(validate_at(&init_data, BOT_TOKEN, 86_400, now), Ok(()));
        assert_eq!(validate(&init_data, BOT_TOKEN, 86_400), Ok(()));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let auth_date = now_unix().to_string();
        let init_data = build_init_data(
            &[("auth_date", auth_date.as_str()), ("user", USER_JSON)],
            BOT_TOKEN,
        );
        let tampered = init_data.replace("Ada", "Eve");

        assert_eq!(
            validate_at(&tampered, BOT_TOKEN, 86_400, now_unix()),
            Err(InitDataError::BadSignature)
        );
    }

    #[test]
    fn test_wrong_bot_token_is_rejected() {
        let auth_date = now_unix().to_string();
        let init_data = build_init_data(
            &[("auth_date", auth_date.as_str()), ("user", USER_JSON)],
            BOT_TOKEN,
        );

        assert_eq!(
            validate_at(&init_data, "1234567890:another-token", 86_400, now_unix()),
            Err(InitDataError::BadSignature)
        );
    }

    #[test]
    fn test_missing_hash_is_rejected() {
        assert_eq!(
            validate_at("auth_date=1700000000&user=%7B%7D", BOT_TOKEN, 86_400, now_unix()),
            Err(InitDataError::MissingHash)
        );
    }

    #[test]
    fn test_stale_auth_date_is_rejected() {
        let now = now_unix();
        let stale = (now - 100_000).to_string();
        let init_data = build_init_data(
            &[("auth_date", stale.as_str()), ("user", USER_JSON)],
            BOT_TOKEN,
        );

        assert_eq!(
            validate_at(&init_data, BOT_TOKEN, 86_400, now),
            Err(InitDataError::Expired)
        );
    }

    #[test]
    fn test_auth_date_exactly_at_window_edge_passes() {
        let now = now_unix();
        let edge = (now - 86_400).to_string();
        let init_data = build_init_data(
            &[("auth_date", edge.as_str()), ("user", USER_JSON)],
            BOT_TOKEN,
        );

        assert_eq!(validate_at(&init_data, BOT_TOKEN, 86_400, now), Ok(()));
    }

    #[test]
    fn test_missing_auth_date_is_rejected() {
        let init_data = build_init_data(&[("user", USER_JSON)], BOT_TOKEN);

        assert_eq!(
            validate_at(&init_data, BOT_TOKEN, 86_400, now_unix()),
            Err(InitDataError::MissingAuthDate)
        );
    }

    #[test]
    fn test_parse_user() {
        let auth_date = now_unix().to_string();
        let init_data = build_init_data(
            &[("auth_date", auth_date.as_str()), ("user", USER_JSON)],
            BOT_TOKEN,
        );

        let user = parse_user(&init_data).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name.as_deref(), Some("Lovelace"));
        assert_eq!(user.username.as_deref(), Some("ada"));
        assert_eq!(user.language_code.as_deref(), Some("en"));
    }

    #[test]
    fn test_parse_user_optional_fields_default_to_none() {
        let init_data = build_init_data(
            &[("user", r#"{"id":7,"first_name":"Bob"}"#)],
            BOT_TOKEN,
        );

        let user = parse_user(&init_data).unwrap();
        assert_eq!(user.id, 7);
        assert!(user.last_name.is_none());
        assert!(user.username.is_none());
        assert!(user.language_code.is_none());
    }

    #[test]
    fn test_parse_user_absent_or_malformed() {
        assert!(parse_user("auth_date=1700000000&hash=00").is_none());
        assert!(parse_user("user=not-json&hash=00").is_none());
    }
}
