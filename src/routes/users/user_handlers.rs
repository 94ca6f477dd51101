use actix_web::{web, HttpRequest, HttpResponse};
use log::info;
use sqlx::MySqlPool;

use super::user_models::{UpdateProfileRequest, UserResponse};
use crate::auth::authenticate;
use crate::errors::ApiError;
use crate::models::user::User;

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, avatar, created_at";

async fn fetch_user(pool: &MySqlPool, id: &str) -> Result<User, ApiError> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("User with ID {id} not found")))
}

pub async fn list_users(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    authenticate(&req, pool.get_ref()).await?;
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY name ASC"
    ))
    .fetch_all(pool.get_ref())
    .await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(users))
}

pub async fn get_me(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let user = fetch_user(pool.get_ref(), &user.id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub async fn update_me(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    body: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    let authed = authenticate(&req, pool.get_ref()).await?;
    let mut user = fetch_user(pool.get_ref(), &authed.id).await?;

    if let Some(name) = &body.name {
        if name.trim().is_empty() {
            return Err(ApiError::BadRequest("Name must not be empty".into()));
        }
        user.name = name.trim().to_string();
    }
    if let Some(avatar) = &body.avatar {
        user.avatar = avatar.clone();
    }

    sqlx::query("UPDATE users SET name = ?, avatar = ? WHERE id = ?")
        .bind(&user.name)
        .bind(&user.avatar)
        .bind(&user.id)
        .execute(pool.get_ref())
        .await?;

    info!("User {} updated their profile", user.id);
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub async fn get_user(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    authenticate(&req, pool.get_ref()).await?;
    let user = fetch_user(pool.get_ref(), &path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
