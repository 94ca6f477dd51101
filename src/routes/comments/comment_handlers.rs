use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::info;
use serde_json::json;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::comment_models::{CommentResponse, CreateCommentRequest};
use crate::auth::authenticate;
use crate::errors::ApiError;
use crate::models::comment::{Comment, CommentDetail};
use crate::policy;
use crate::routes::tasks::task_handlers::fetch_task;

pub(crate) const COMMENT_DETAIL_QUERY: &str = "\
    SELECT c.id, c.content, c.task_id, c.author_id, c.created_at,
           u.name AS author_name, u.email AS author_email, u.avatar AS author_avatar
    FROM comments c
    JOIN users u ON u.id = c.author_id";

pub async fn create_comment(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let task = fetch_task(pool.get_ref(), &path.into_inner()).await?;

    if !policy::can_view(user.role, &user.id, &task.creator_id, task.assignee_id.as_deref()) {
        return Err(ApiError::Forbidden("You cannot view this task".into()));
    }
    let content = body.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("Comment must not be empty".into()));
    }

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO comments (id, content, task_id, author_id, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(content)
    .bind(&task.id)
    .bind(&user.id)
    .bind(Utc::now())
    .execute(pool.get_ref())
    .await?;

    let detail = sqlx::query_as::<_, CommentDetail>(&format!(
        "{COMMENT_DETAIL_QUERY} WHERE c.id = ?"
    ))
    .bind(&id)
    .fetch_one(pool.get_ref())
    .await?;

    info!("User {} commented on task {}", user.id, task.id);
    Ok(HttpResponse::Created().json(CommentResponse::from(detail)))
}

pub async fn list_comments(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let task = fetch_task(pool.get_ref(), &path.into_inner()).await?;

    if !policy::can_view(user.role, &user.id, &task.creator_id, task.assignee_id.as_deref()) {
        return Err(ApiError::Forbidden("You cannot view this task".into()));
    }

    let comments = sqlx::query_as::<_, CommentDetail>(&format!(
        "{COMMENT_DETAIL_QUERY} WHERE c.task_id = ? ORDER BY c.created_at DESC"
    ))
    .bind(&task.id)
    .fetch_all(pool.get_ref())
    .await?;

    let comments: Vec<CommentResponse> =
        comments.into_iter().map(CommentResponse::from).collect();
    Ok(HttpResponse::Ok().json(comments))
}

pub async fn delete_comment(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let id = path.into_inner();

    let comment = sqlx::query_as::<_, Comment>(
        "SELECT id, content, task_id, author_id, created_at FROM comments WHERE id = ?",
    )
    .bind(&id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Comment with ID {id} not found")))?;

    if comment.author_id != user.id {
        return Err(ApiError::Forbidden(
            "You can only delete your own comments".into(),
        ));
    }

    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(&comment.id)
        .execute(pool.get_ref())
        .await?;

    info!("User {} deleted comment {}", user.id, comment.id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Comment deleted successfully" })))
}
