use actix_web::cookie::Cookie;
use actix_web::{web, HttpRequest, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use log::info;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::auth_models::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest};
use crate::errors::ApiError;
use crate::models::session::Session;
use crate::models::user::{Role, User};
use crate::routes::users::user_models::UserResponse;

/// Replaces any previous session for the user and returns the new session id.
async fn create_session(
    pool: &MySqlPool,
    user_id: &str,
    remember_me: bool,
) -> Result<String, ApiError> {
    let session = Session {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        expires_at: if remember_me {
            Utc::now() + Duration::days(10)
        } else {
            Utc::now() + Duration::minutes(30)
        },
        is_persistent: remember_me,
    };

    sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(&session.user_id)
        .execute(pool)
        .await?;
    sqlx::query(
        "INSERT INTO sessions (id, user_id, expires_at, is_persistent) VALUES (?, ?, ?, ?)",
    )
    .bind(&session.id)
    .bind(&session.user_id)
    .bind(session.expires_at)
    .bind(session.is_persistent)
    .execute(pool)
    .await?;

    Ok(session.id)
}

fn session_cookie(session_id: String) -> Cookie<'static> {
    Cookie::build("session_id", session_id)
        .path("/")
        .http_only(true)
        .finish()
}

pub async fn register(
    pool: web::Data<MySqlPool>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let name = body.name.trim();
    let email = body.email.trim().to_lowercase();
    info!("Received registration request for {}", email);

    if name.is_empty() {
        return Err(ApiError::BadRequest("Name must not be empty".into()));
    }
    if !email.contains('@') {
        return Err(ApiError::BadRequest("Invalid email address".into()));
    }
    if body.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".into(),
        ));
    }

    let existing: Option<(String,)> =
        sqlx::query_as("SELECT id FROM users WHERE email = ?")
            .bind(&email)
            .fetch_optional(pool.get_ref())
            .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let password_hash = hash(&body.password, DEFAULT_COST)?;
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        email,
        password_hash,
        role: Role::User,
        avatar: None,
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, avatar, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role)
    .bind(&user.avatar)
    .bind(user.created_at)
    .execute(pool.get_ref())
    .await
    .map_err(|e| ApiError::conflict_on_duplicate(e, "Email already registered"))?;

    let session_id = create_session(pool.get_ref(), &user.id, false).await?;
    info!("User {} registered successfully", user.id);
    Ok(HttpResponse::Created()
        .cookie(session_cookie(session_id))
        .json(AuthResponse {
            user: UserResponse::from(user),
        }))
}

pub async fn login(
    pool: web::Data<MySqlPool>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let email = body.email.trim().to_lowercase();
    info!("Received login request for {}", email);

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash, role, avatar, created_at
         FROM users WHERE email = ?",
    )
    .bind(&email)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".into()))?;

    let valid = verify(&body.password, &user.password_hash)?;
    if !valid {
        info!("Invalid password for {}", email);
        return Err(ApiError::Unauthorized("Invalid credentials".into()));
    }

    let session_id = create_session(pool.get_ref(), &user.id, body.remember_me).await?;
    info!("User {} logged in successfully", user.id);
    Ok(HttpResponse::Ok()
        .cookie(session_cookie(session_id))
        .json(AuthResponse {
            user: UserResponse::from(user),
        }))
}

pub async fn logout(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let session_id = match req.cookie("session_id") {
        Some(cookie) => cookie.value().to_string(),
        None => {
            return Err(ApiError::BadRequest("Session ID does not exist".into()));
        }
    };

    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(&session_id)
        .execute(pool.get_ref())
        .await?;

    info!("Logout successful for session {}", session_id);
    Ok(HttpResponse::Ok().json(LogoutResponse {
        success: true,
        message: "Logout successful".into(),
    }))
}
