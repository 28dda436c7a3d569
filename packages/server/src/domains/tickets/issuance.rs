//! The ticket claim workflow.
//!
//! A claim either commits a ticket and increments the event counter as one
//! atomic unit, or rejects with a typed error and no side effects. The
//! service itself is stateless; all shared state lives in Postgres and is
//! disciplined by the constraints in the tickets/events schema plus the
//! conditional increment in [`Ticket::try_issue`].

use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use crate::common::{EventId, UserId};
use crate::domains::events::Event;

use super::code::generate_code;
use super::models::ticket::{IssueOutcome, Ticket};

/// Bound on code regeneration per claim. With a 36^8 code space this is
/// practically unreachable, but collisions are handled, not assumed away.
const MAX_CODE_ATTEMPTS: u32 = 5;

/// Why a claim was rejected.
///
/// Every rejection is a distinct outcome the caller can branch on: "sold
/// out" and "you already have a ticket" are different messages to the user.
#[derive(Debug, Error)]
pub enum ClaimError {
    /// Bad reference - not retryable.
    #[error("Event not found")]
    EventNotFound,

    /// The event is at capacity - not retryable.
    #[error("Event is full")]
    EventFull,

    /// The user already holds a ticket for this event - not retryable.
    #[error("User already has a ticket for this event")]
    AlreadyClaimed,

    /// Ran out of code generation attempts. Practically unreachable.
    #[error("Could not generate a unique ticket code")]
    CodeGenerationExhausted,

    /// Transient store failure. The whole claim is safe for the caller to
    /// retry: a failed attempt leaves no partial state behind.
    #[error("Store unavailable: {0}")]
    Store(#[from] sqlx::Error),
}

/// Claim a ticket for `user_id` on `event_id`.
///
/// Capacity is checked before duplicate ownership, so rejections are
/// deterministic: re-claiming a sold-out event reports `EventFull` even for
/// an existing ticket holder. The pre-checks reject early without touching
/// the store; under a race the constraints and the conditional increment
/// inside [`Ticket::try_issue`] are what actually hold the invariants.
pub async fn claim_ticket(
    event_id: EventId,
    user_id: UserId,
    pool: &PgPool,
) -> Result<Ticket, ClaimError> {
    let event = Event::find_by_id(event_id, pool)
        .await
        .map_err(into_store_error)?
        .ok_or(ClaimError::EventNotFound)?;

    if event.is_full() {
        return Err(ClaimError::EventFull);
    }

    if Ticket::find_by_event_and_user(event_id, user_id, pool)
        .await?
        .is_some()
    {
        return Err(ClaimError::AlreadyClaimed);
    }

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = generate_code();

        match Ticket::try_issue(event_id, user_id, &code, pool).await? {
            IssueOutcome::Issued(ticket) => {
                info!(
                    event_id = %event_id,
                    user_id = %user_id,
                    ticket_id = %ticket.id,
                    "Ticket issued"
                );
                return Ok(ticket);
            }
            IssueOutcome::CapacityExceeded => return Err(ClaimError::EventFull),
            IssueOutcome::DuplicateClaim => return Err(ClaimError::AlreadyClaimed),
            IssueOutcome::CodeCollision => {
                warn!(event_id = %event_id, attempt, "Ticket code collision, regenerating");
            }
        }
    }

    Err(ClaimError::CodeGenerationExhausted)
}

/// Model methods return `anyhow::Error`; claims only ever see store
/// failures through them.
fn into_store_error(err: anyhow::Error) -> ClaimError {
    match err.downcast::<sqlx::Error>() {
        Ok(sqlx_err) => ClaimError::Store(sqlx_err),
        Err(other) => ClaimError::Store(sqlx::Error::Protocol(other.to_string())),
    }
}
