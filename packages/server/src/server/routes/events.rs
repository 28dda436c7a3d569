//! Event discovery and organizer CRUD endpoints.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};

use crate::common::EventId;
use crate::domains::events::models::event::OrganizerSummary;
use crate::domains::events::{Event, EventFilter, NewEvent, UpdateEvent};
use crate::server::app::AppState;
use crate::server::error::AppError;
use crate::server::middleware::AuthUser;

/// Pull the authenticated user out of request extensions, or reject.
pub fn require_auth(auth: Option<Extension<AuthUser>>) -> Result<AuthUser, AppError> {
    auth.map(|Extension(user)| user)
        .ok_or_else(|| AppError::unauthorized("Authentication required"))
}

/// As `require_auth`, but the user must also hold the organizer role.
pub fn require_organizer(auth: Option<Extension<AuthUser>>) -> Result<AuthUser, AppError> {
    let user = require_auth(auth)?;
    if !user.can_organize() {
        return Err(AppError::forbidden("Organizer access required"));
    }
    Ok(user)
}

/// GET /events - upcoming events with optional filters
pub async fn list_events(
    Extension(state): Extension<AppState>,
    Query(filter): Query<EventFilter>,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = Event::list_upcoming(&filter, &state.db_pool).await?;
    Ok(Json(events))
}

/// GET /events/categories - distinct categories for the filter bar
pub async fn list_categories(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let categories = Event::categories(&state.db_pool).await?;
    Ok(Json(categories))
}

/// GET /events/:id
pub async fn get_event(
    Extension(state): Extension<AppState>,
    Path(id): Path<EventId>,
) -> Result<Json<Event>, AppError> {
    let event = Event::find_by_id(id, &state.db_pool)
        .await?
        .ok_or_else(|| AppError::not_found("Event"))?;

    Ok(Json(event))
}

/// POST /events - create an event (organizer)
pub async fn create_event(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
    Json(new): Json<NewEvent>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let user = require_organizer(auth)?;
    validate_event_fields(&new.title, &new.location, &new.category, new.capacity)?;

    let event = Event::insert(&new, user.user_id, &state.db_pool).await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /events/:id - edit an owned event (organizer)
pub async fn update_event(
    Extension(state): Extension<AppState>,
    Path(id): Path<EventId>,
    auth: Option<Extension<AuthUser>>,
    Json(update): Json<UpdateEvent>,
) -> Result<Json<Event>, AppError> {
    let user = require_organizer(auth)?;
    validate_event_fields(
        &update.title,
        &update.location,
        &update.category,
        update.capacity,
    )?;

    match Event::update_owned(id, user.user_id, &update, &state.db_pool).await {
        Ok(Some(event)) => Ok(Json(event)),
        Ok(None) => Err(AppError::not_found("Event")),
        Err(err) => {
            // The events CHECK rejects a capacity below tickets_issued
            if let Some(sqlx::Error::Database(db_err)) = err.downcast_ref::<sqlx::Error>() {
                if db_err.is_check_violation() {
                    return Err(AppError::validation(
                        "Capacity cannot be less than tickets already issued",
                    ));
                }
            }
            Err(err.into())
        }
    }
}

/// DELETE /events/:id - delete an owned event; admins may delete any event
pub async fn delete_event(
    Extension(state): Extension<AppState>,
    Path(id): Path<EventId>,
    auth: Option<Extension<AuthUser>>,
) -> Result<StatusCode, AppError> {
    let user = require_organizer(auth)?;

    let deleted = if user.is_admin() {
        Event::delete_any(id, &state.db_pool).await?
    } else {
        Event::delete_owned(id, user.user_id, &state.db_pool).await?
    };

    if !deleted {
        return Err(AppError::not_found("Event"));
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /organizer/events - the caller's own events
pub async fn list_my_events(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<Vec<Event>>, AppError> {
    let user = require_organizer(auth)?;
    let events = Event::list_by_organizer(user.user_id, &state.db_pool).await?;
    Ok(Json(events))
}

/// GET /organizer/summary - dashboard counts
pub async fn organizer_summary(
    Extension(state): Extension<AppState>,
    auth: Option<Extension<AuthUser>>,
) -> Result<Json<OrganizerSummary>, AppError> {
    let user = require_organizer(auth)?;
    let summary = Event::organizer_summary(user.user_id, &state.db_pool).await?;
    Ok(Json(summary))
}

fn validate_event_fields(
    title: &str,
    location: &str,
    category: &str,
    capacity: i32,
) -> Result<(), AppError> {
    if title.trim().is_empty() || title.len() > 200 {
        return Err(AppError::validation("Title must be 1-200 characters"));
    }
    if location.trim().is_empty() || location.len() > 200 {
        return Err(AppError::validation("Location must be 1-200 characters"));
    }
    if category.trim().is_empty() || category.len() > 100 {
        return Err(AppError::validation("Category must be 1-100 characters"));
    }
    if !(1..=10_000).contains(&capacity) {
        return Err(AppError::validation("Capacity must be between 1 and 10000"));
    }
    Ok(())
}
