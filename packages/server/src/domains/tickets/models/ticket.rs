use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{EventId, TicketId, UserId};

/// Ticket model - SQL persistence layer
///
/// A ticket is created exactly once per successful claim and is immutable
/// afterwards except for `used_at` (set once by redemption).
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Ticket {
    pub id: TicketId,
    pub event_id: EventId,
    pub user_id: UserId,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

/// Outcome of the atomic issue operation. `try_issue` distinguishes the
/// three conflict cases so the claim workflow can map each to its own error.
#[derive(Debug)]
pub enum IssueOutcome {
    Issued(Ticket),
    /// The conditional increment matched no row: the event is at capacity.
    CapacityExceeded,
    /// `tickets_event_id_user_id_key` fired: the user already holds a ticket.
    DuplicateClaim,
    /// `tickets_code_key` fired: the candidate code is taken.
    CodeCollision,
}

/// A ticket joined with its event, for "my tickets" listings
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct TicketWithEvent {
    pub id: TicketId,
    pub event_id: EventId,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub event_title: String,
    pub event_location: String,
    pub event_starts_at: DateTime<Utc>,
}

/// A ticket joined with its holder, for organizer attendee lists
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct AttendeeRow {
    pub ticket_id: TicketId,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub user_id: UserId,
    pub full_name: String,
    pub email: String,
}

impl Ticket {
    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    /// Atomically insert a ticket and increment the event's counter.
    ///
    /// The insert and the conditional increment run in one transaction, so
    /// the check-then-act cannot be interleaved by a concurrent claim on the
    /// same event. The increment only matches while `tickets_issued <
    /// capacity`; zero rows affected means the event filled up and the
    /// insert is rolled back. Unique violations are mapped to conflict
    /// outcomes instead of errors.
    pub async fn try_issue(
        event_id: EventId,
        user_id: UserId,
        code: &str,
        pool: &PgPool,
    ) -> Result<IssueOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let inserted = sqlx::query_as::<_, Self>(
            "INSERT INTO tickets (event_id, user_id, code)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(event_id)
        .bind(user_id)
        .bind(code)
        .fetch_one(&mut *tx)
        .await;

        let ticket = match inserted {
            Ok(ticket) => ticket,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                let outcome = match db_err.constraint() {
                    Some("tickets_code_key") => IssueOutcome::CodeCollision,
                    _ => IssueOutcome::DuplicateClaim,
                };
                tx.rollback().await?;
                return Ok(outcome);
            }
            Err(e) => return Err(e),
        };

        let updated = sqlx::query(
            "UPDATE events
             SET tickets_issued = tickets_issued + 1, updated_at = now()
             WHERE id = $1 AND tickets_issued < capacity",
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(IssueOutcome::CapacityExceeded);
        }

        tx.commit().await?;

        Ok(IssueOutcome::Issued(ticket))
    }

    /// Find ticket by ID
    pub async fn find_by_id(id: TicketId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find a user's ticket for an event, if any
    pub async fn find_by_event_and_user(
        event_id: EventId,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT * FROM tickets WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find ticket by code, case-insensitively
    pub async fn find_by_code(code: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM tickets WHERE upper(code) = upper($1)")
            .bind(code)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// All tickets held by a user, newest first, with event details
    pub async fn list_for_user(user_id: UserId, pool: &PgPool) -> Result<Vec<TicketWithEvent>> {
        sqlx::query_as::<_, TicketWithEvent>(
            "SELECT t.id, t.event_id, t.code, t.issued_at, t.used_at,
                    e.title AS event_title,
                    e.location AS event_location,
                    e.starts_at AS event_starts_at
             FROM tickets t
             JOIN events e ON e.id = t.event_id
             WHERE t.user_id = $1
             ORDER BY t.issued_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Attendee list for an event, in claim order
    pub async fn attendees(event_id: EventId, pool: &PgPool) -> Result<Vec<AttendeeRow>> {
        sqlx::query_as::<_, AttendeeRow>(
            "SELECT t.id AS ticket_id, t.code, t.issued_at, t.used_at,
                    u.id AS user_id, u.full_name, u.email
             FROM tickets t
             JOIN users u ON u.id = t.user_id
             WHERE t.event_id = $1
             ORDER BY t.issued_at ASC",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Set `used_at` if it isn't already set. Returns the updated ticket,
    /// or `None` if the ticket was already redeemed (or no longer exists) -
    /// concurrent scans of the same code redeem exactly once.
    pub async fn mark_used(id: TicketId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE tickets
             SET used_at = now()
             WHERE id = $1 AND used_at IS NULL
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
