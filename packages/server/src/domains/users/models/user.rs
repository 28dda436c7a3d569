use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::UserId;

/// Campus role. Admins moderate everything; organizers run events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Organizer,
    Admin,
}

impl UserRole {
    /// Admins carry organizer privileges as well.
    pub fn can_organize(self) -> bool {
        matches!(self, UserRole::Organizer | UserRole::Admin)
    }

    pub fn is_admin(self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

/// User model - SQL persistence layer
///
/// Credentials and sessions belong to the external identity provider; this
/// row is the profile the API needs for ownership and authorization checks.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl User {
    /// Find user by ID
    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert new user
    pub async fn insert(
        full_name: &str,
        email: &str,
        role: UserRole,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (full_name, email, role)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(full_name)
        .bind(email)
        .bind(role)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

}
