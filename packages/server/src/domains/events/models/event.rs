use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{EventId, UserId};

/// Event model - SQL persistence layer
///
/// `tickets_issued` is only ever incremented, and only by the ticket
/// issuance path (`Ticket::try_issue`). Organizer edits never touch it.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub organization: String,
    pub starts_at: DateTime<Utc>,
    pub capacity: i32,
    pub tickets_issued: i32,
    pub image_url: Option<String>,
    pub organizer_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating an event (organizer input)
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub organization: String,
    pub starts_at: DateTime<Utc>,
    pub capacity: i32,
    pub image_url: Option<String>,
}

/// Fields for editing an event (organizer input)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub organization: String,
    pub starts_at: DateTime<Utc>,
    pub capacity: i32,
    pub image_url: Option<String>,
}

/// Listing filters (all optional, combined with AND)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub sort: EventSort,
}

/// Sort order for event listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSort {
    #[default]
    Date,
    Title,
    Location,
    Capacity,
}

impl EventSort {
    fn order_clause(self) -> &'static str {
        match self {
            EventSort::Date => "starts_at ASC",
            EventSort::Title => "title ASC",
            EventSort::Location => "location ASC",
            EventSort::Capacity => "capacity DESC",
        }
    }
}

/// Per-organizer dashboard counts
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct OrganizerSummary {
    pub total_events: i64,
    pub upcoming_events: i64,
    pub total_attendees: i64,
}

impl Event {
    pub fn is_full(&self) -> bool {
        self.tickets_issued >= self.capacity
    }

    pub fn available_tickets(&self) -> i32 {
        self.capacity - self.tickets_issued
    }

    /// Find event by ID
    pub async fn find_by_id(id: EventId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// List upcoming events with optional category/search filters.
    ///
    /// Search matches title, description, and location (case-insensitive).
    pub async fn list_upcoming(filter: &EventFilter, pool: &PgPool) -> Result<Vec<Self>> {
        let sql = format!(
            "SELECT * FROM events
             WHERE starts_at >= now()
               AND ($1::text IS NULL OR category = $1)
               AND ($2::text IS NULL
                    OR title ILIKE '%' || $2 || '%'
                    OR description ILIKE '%' || $2 || '%'
                    OR location ILIKE '%' || $2 || '%')
             ORDER BY {}",
            filter.sort.order_clause()
        );

        sqlx::query_as::<_, Self>(&sql)
            .bind(&filter.category)
            .bind(&filter.search)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Distinct categories across all events (for the filter bar)
    pub async fn categories(pool: &PgPool) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT category FROM events ORDER BY category")
                .fetch_all(pool)
                .await?;

        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    /// Events owned by an organizer, newest first
    pub async fn list_by_organizer(organizer_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM events WHERE organizer_id = $1 ORDER BY created_at DESC",
        )
        .bind(organizer_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert new event
    pub async fn insert(new: &NewEvent, organizer_id: UserId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO events (
                title, description, location, category, organization,
                starts_at, capacity, image_url, organizer_id
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.location)
        .bind(&new.category)
        .bind(&new.organization)
        .bind(new.starts_at)
        .bind(new.capacity)
        .bind(&new.image_url)
        .bind(organizer_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Update an event owned by `organizer_id`. Returns `None` if the event
    /// does not exist or belongs to someone else.
    ///
    /// Capacity cannot drop below `tickets_issued`; the table CHECK rejects
    /// such an update and the error surfaces to the caller.
    pub async fn update_owned(
        id: EventId,
        organizer_id: UserId,
        update: &UpdateEvent,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE events
             SET title = $3, description = $4, location = $5, category = $6,
                 organization = $7, starts_at = $8, capacity = $9,
                 image_url = $10, updated_at = now()
             WHERE id = $1 AND organizer_id = $2
             RETURNING *",
        )
        .bind(id)
        .bind(organizer_id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.location)
        .bind(&update.category)
        .bind(&update.organization)
        .bind(update.starts_at)
        .bind(update.capacity)
        .bind(&update.image_url)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Delete an event owned by `organizer_id`. Returns whether a row was
    /// deleted.
    pub async fn delete_owned(id: EventId, organizer_id: UserId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1 AND organizer_id = $2")
            .bind(id)
            .bind(organizer_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete any event (admin moderation)
    pub async fn delete_any(id: EventId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Dashboard counts for an organizer's events
    pub async fn organizer_summary(organizer_id: UserId, pool: &PgPool) -> Result<OrganizerSummary> {
        sqlx::query_as::<_, OrganizerSummary>(
            "SELECT
                count(*) AS total_events,
                count(*) FILTER (WHERE starts_at >= now()) AS upcoming_events,
                coalesce(sum(tickets_issued), 0)::bigint AS total_attendees
             FROM events
             WHERE organizer_id = $1",
        )
        .bind(organizer_id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }
}
