//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.
//! Emails get a UUID suffix so tests sharing the database never collide.

use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use server_core::common::{EventId, UserId};
use server_core::domains::events::{Event, NewEvent};
use server_core::domains::users::{User, UserRole};

/// Create a test user with the given role
pub async fn create_test_user(pool: &PgPool, name: &str, role: UserRole) -> Result<UserId> {
    let email = format!("{}-{}@campus.test", name.to_lowercase(), Uuid::new_v4());
    let user = User::insert(name, &email, role, pool).await?;
    Ok(user.id)
}

/// Create a student
pub async fn create_test_student(pool: &PgPool, name: &str) -> Result<UserId> {
    create_test_user(pool, name, UserRole::Student).await
}

/// Create an organizer
pub async fn create_test_organizer(pool: &PgPool, name: &str) -> Result<UserId> {
    create_test_user(pool, name, UserRole::Organizer).await
}

/// Create an upcoming test event with the given capacity
pub async fn create_test_event(
    pool: &PgPool,
    organizer_id: UserId,
    title: &str,
    capacity: i32,
) -> Result<EventId> {
    create_test_event_in_category(pool, organizer_id, title, "General", capacity).await
}

/// Create an upcoming test event in a specific category
pub async fn create_test_event_in_category(
    pool: &PgPool,
    organizer_id: UserId,
    title: &str,
    category: &str,
    capacity: i32,
) -> Result<EventId> {
    let new = NewEvent {
        title: title.to_string(),
        description: format!("{title} - description"),
        location: "Student Union".to_string(),
        category: category.to_string(),
        organization: "Test Org".to_string(),
        starts_at: Utc::now() + Duration::days(7),
        capacity,
        image_url: None,
    };

    let event = Event::insert(&new, organizer_id, pool).await?;
    Ok(event.id)
}

/// Create an event that already happened (should not appear in listings)
pub async fn create_past_event(
    pool: &PgPool,
    organizer_id: UserId,
    title: &str,
    category: &str,
) -> Result<EventId> {
    let new = NewEvent {
        title: title.to_string(),
        description: format!("{title} - description"),
        location: "Old Auditorium".to_string(),
        category: category.to_string(),
        organization: "Test Org".to_string(),
        starts_at: Utc::now() - Duration::days(7),
        capacity: 100,
        image_url: None,
    };

    let event = Event::insert(&new, organizer_id, pool).await?;
    Ok(event.id)
}
