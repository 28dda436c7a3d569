//! Ticket endpoints: claiming, the user's own tickets, organizer attendee
//! lists, and check-in redemption.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::common::{EventId, TicketId};
use crate::domains::events::Event;
use crate::domains::tickets::{
    claim_ticket, redeem_ticket, AttendeeRow, Ticket, TicketWithEvent,
};
use crate::server::app::AppState;
use crate::server::error::AppError;
use crate::server::middleware::AuthUser;

use super::events::{require_auth, require_organizer};

/// POST /events/:id/claim - claim a first-come-first-served ticket
pub async fn claim_ticket_handler(
    Extension(state): Extension<AppState>,
    Path(event_id): Path<EventId>,
    auth: Option<Extension<AuthUser>>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let user = require_auth(auth)?;

    let ticket = claim_ticket(event_id, user.user_id, &state.db_pool).await?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

/// GET /tickets - the caller's tickets, newest first
pub async fn list_my_tickets(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<TicketWithEvent>>, AppError> {
    let user = require_auth(auth)?;
    let tickets = Ticket::list_for_user(user.user_id, &state.db_pool).await?;
    Ok(Json(tickets))
}

/// GET /tickets/:id - a single ticket, owner only
pub async fn get_ticket(
    Extension(state): Extension<AppState>,
    Path(id): Path<TicketId>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<Ticket>, AppError> {
    let user = require_auth(auth)?;

    let ticket = Ticket::find_by_id(id, &state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Ticket"))?;

    // Don't reveal other users' tickets exist
    if ticket.user_id != user.user_id {
        return Err(AppError::not_found("Ticket"));
    }

    Ok(Json(ticket))
}

/// GET /events/:id/attendees - issued tickets with holder details, in claim
/// order (event organizer or admin)
pub async fn list_attendees(
    Extension(state): Extension<AppState>,
    Path(event_id): Path<EventId>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<AttendeeRow>>, AppError> {
    let user = require_organizer(auth)?;

    let event = Event::find_by_id(event_id, &state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;

    if event.organizer_id != user.user_id && !user.is_admin() {
        return Err(AppError::not_found("Event"));
    }

    let attendees = Ticket::attendees(event_id, &state.db_pool).await?;
    Ok(Json(attendees))
}

#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub code: String,
}

/// POST /tickets/redeem - mark a ticket used at check-in (event organizer
/// or admin)
pub async fn redeem_ticket_handler(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(request): Json<RedeemRequest>,
) -> Result<Json<Ticket>, AppError> {
    let user = require_organizer(auth)?;

    let ticket = redeem_ticket(
        &request.code,
        user.user_id,
        user.is_admin(),
        &state.db_pool,
    )
    .await?;

    Ok(Json(ticket))
}
