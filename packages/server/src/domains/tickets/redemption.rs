//! Ticket redemption (check-in).
//!
//! Separate from issuance: redemption marks an issued ticket as used, once.
//! Only the event's organizer (or an admin) may redeem, since codes are
//! read off tickets at the door.

use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use crate::common::UserId;
use crate::domains::events::Event;

use super::models::ticket::Ticket;

#[derive(Debug, Error)]
pub enum RedeemError {
    #[error("No ticket matches that code")]
    TicketNotFound,

    #[error("Only the event organizer can redeem tickets")]
    NotAuthorized,

    #[error("Ticket has already been used")]
    AlreadyUsed,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Redeem a ticket by code. Codes compare case-insensitively.
///
/// The `used_at` write is a conditional update, so two staff scanning the
/// same code concurrently redeem it exactly once.
pub async fn redeem_ticket(
    code: &str,
    redeemer_id: UserId,
    redeemer_is_admin: bool,
    pool: &PgPool,
) -> Result<Ticket, RedeemError> {
    let ticket = Ticket::find_by_code(code, pool)
        .await?
        .ok_or(RedeemError::TicketNotFound)?;

    let event = Event::find_by_id(ticket.event_id, pool)
        .await?
        .ok_or(RedeemError::TicketNotFound)?;

    if event.organizer_id != redeemer_id && !redeemer_is_admin {
        return Err(RedeemError::NotAuthorized);
    }

    if ticket.is_used() {
        return Err(RedeemError::AlreadyUsed);
    }

    let redeemed = Ticket::mark_used(ticket.id, pool)
        .await?
        // Lost a race with another scan between the read and the update.
        .ok_or(RedeemError::AlreadyUsed)?;

    info!(ticket_id = %redeemed.id, event_id = %event.id, "Ticket redeemed");

    Ok(redeemed)
}
