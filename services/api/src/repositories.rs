//! Event repository for database operations

use chrono::NaiveDate;
use common::error::DatabaseResult;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Event, NewEvent};

const EVENT_COLUMNS: &str = "id, title, description, location, date, start_time, end_time, \
                             registerable, register_url, created_at";

/// Event repository for database operations
#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    /// Create a new event repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Events on a single calendar day, ordered by ascending start time
    pub async fn find_by_day(&self, day: NaiveDate) -> DatabaseResult<Vec<Event>> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE date = $1 ORDER BY start_time ASC"
        );
        let events = sqlx::query_as::<_, Event>(&query)
            .bind(day)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// Events in an inclusive day range, ordered by day then start time
    pub async fn find_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DatabaseResult<Vec<Event>> {
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE date >= $1 AND date <= $2 \
             ORDER BY date ASC, start_time ASC"
        );
        let events = sqlx::query_as::<_, Event>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// Insert a validated event and return the stored record
    pub async fn create(&self, event: &NewEvent) -> DatabaseResult<Event> {
        let query = format!(
            "INSERT INTO events (title, description, location, date, start_time, end_time, \
             registerable, register_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {EVENT_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Event>(&query)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.date)
            .bind(event.start_time)
            .bind(event.end_time)
            .bind(event.registerable)
            .bind(&event.register_url)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    /// Find an event by id
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Event>> {
        let query = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    /// Delete an event by id; returns whether a row was removed
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
