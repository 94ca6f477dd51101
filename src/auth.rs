//! Session-cookie authentication: resolves the `session_id` cookie to the
//! requesting user. Expired sessions are deleted on sight.

use actix_web::HttpRequest;
use chrono::{DateTime, Utc};
use log::info;
use sqlx::{FromRow, MySqlPool};

use crate::errors::ApiError;
use crate::models::user::Role;

/// The authenticated principal handlers work with.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub role: Role,
}

#[derive(Debug, FromRow)]
struct SessionRow {
    user_id: String,
    role: Role,
    expires_at: DateTime<Utc>,
}

pub async fn authenticate(req: &HttpRequest, pool: &MySqlPool) -> Result<AuthedUser, ApiError> {
    let session_id = match req.cookie("session_id") {
        Some(cookie) => cookie.value().to_string(),
        None => return Err(ApiError::Unauthorized("Missing session cookie".into())),
    };

    let row = sqlx::query_as::<_, SessionRow>(
        "SELECT s.user_id, u.role, s.expires_at
         FROM sessions s
         JOIN users u ON u.id = s.user_id
         WHERE s.id = ?",
    )
    .bind(&session_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Err(ApiError::Unauthorized("Invalid session".into()));
    };

    if row.expires_at < Utc::now() {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(&session_id)
            .execute(pool)
            .await?;
        info!("Session expired for user {}", row.user_id);
        return Err(ApiError::Unauthorized("Session expired".into()));
    }

    Ok(AuthedUser {
        id: row.user_id,
        role: row.role,
    })
}
