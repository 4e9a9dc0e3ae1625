//! API models for request and response payloads

use chrono::{DateTime, NaiveDate, Utc};
use common::calendar;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;
use crate::init_data::InitDataUser;

/// A stored calendar event
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub registerable: bool,
    pub register_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated event ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub registerable: bool,
    pub register_url: Option<String>,
}

/// Request for event creation
///
/// Required fields default to empty strings so that an absent field reports
/// a 400 from the write-boundary validation instead of a deserialize
/// rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub registerable: Option<bool>,
    #[serde(default)]
    pub register_url: Option<String>,
}

impl CreateEventRequest {
    /// Apply the write-boundary invariants and produce an insertable event.
    pub fn validate(&self) -> Result<NewEvent, ApiError> {
        if self.title.is_empty()
            || self.description.is_empty()
            || self.location.is_empty()
            || self.date.is_empty()
            || self.start_time.is_empty()
        {
            return Err(ApiError::MissingInput("Missing required fields".to_string()));
        }

        let date = calendar::parse_day(&self.date).ok_or_else(|| {
            ApiError::Unprocessable("Invalid date format. Use YYYY-MM-DD.".to_string())
        })?;

        let start_time = calendar::apply_time(date, &self.start_time).ok_or_else(|| {
            ApiError::Unprocessable("Invalid startTime. Use HH:MM format (24h).".to_string())
        })?;

        let end_time = match self.end_time.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => {
                let end = calendar::apply_time(date, raw).ok_or_else(|| {
                    ApiError::Unprocessable("Invalid endTime. Use HH:MM format (24h).".to_string())
                })?;
                if end <= start_time {
                    return Err(ApiError::Unprocessable(
                        "endTime must be later than startTime.".to_string(),
                    ));
                }
                Some(end)
            }
            None => None,
        };

        let registerable = self.registerable.unwrap_or(false);
        let register_url = self
            .register_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        if registerable && register_url.is_none() {
            return Err(ApiError::Unprocessable(
                "registerUrl is required for registerable events.".to_string(),
            ));
        }

        Ok(NewEvent {
            title: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            date,
            start_time,
            end_time,
            registerable,
            register_url,
        })
    }
}

/// Public-facing authenticated user profile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: i64,
    pub first_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    pub is_admin: bool,
}

impl AuthUser {
    /// Profile echoed at sign-in, built from the validated init data.
    pub fn from_init_data(user: InitDataUser, is_admin: bool) -> Self {
        AuthUser {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            language_code: user.language_code,
            is_admin,
        }
    }

    /// Profile reconstructed from a token claim. Name fields live client-side
    /// and are not carried in the claim.
    pub fn from_user_id(user_id: i64, is_admin: bool) -> Self {
        AuthUser {
            id: user_id,
            first_name: String::new(),
            last_name: None,
            username: None,
            language_code: None,
            is_admin,
        }
    }
}

/// Request for sign-in
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(rename = "initData", default)]
    pub init_data: String,
}

/// Response for sign-in
#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SignInResponse {
    pub fn ok(user: AuthUser) -> Self {
        SignInResponse {
            success: true,
            user: Some(user),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        SignInResponse {
            success: false,
            user: None,
            error: Some(error.into()),
        }
    }
}

/// Response for session check/refresh
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
}

impl CheckResponse {
    pub fn authenticated(user: AuthUser) -> Self {
        CheckResponse {
            authenticated: true,
            user: Some(user),
        }
    }

    pub fn anonymous() -> Self {
        CheckResponse {
            authenticated: false,
            user: None,
        }
    }
}

/// Query for the admin check endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCheckQuery {
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// Response for the admin check endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCheckResponse {
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query for event listing; exactly one of the two modes must be used
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// Query for event deletion
#[derive(Debug, Deserialize)]
pub struct DeleteEventQuery {
    #[serde(default)]
    pub id: Option<Uuid>,
}

/// Response for event listing
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}
