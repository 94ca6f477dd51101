use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::info;
use serde_json::json;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::task_models::{
    validate_title, CreateTaskRequest, TaskDetailResponse, TaskResponse, UpdateTaskRequest,
};
use crate::auth::authenticate;
use crate::errors::ApiError;
use crate::filters::TaskFilters;
use crate::models::comment::CommentDetail;
use crate::models::task::{Task, TaskDetail, TaskPriority, TaskStatus};
use crate::ordering;
use crate::policy;
use crate::routes::comments::comment_handlers::COMMENT_DETAIL_QUERY;
use crate::routes::comments::comment_models::CommentResponse;
use crate::stats::TaskStats;

const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, \
     creator_id, assignee_id, category_id, created_at, updated_at";

pub(crate) const TASK_DETAIL_QUERY: &str = "\
    SELECT t.id, t.title, t.description, t.status, t.priority, t.due_date,
           t.creator_id, t.assignee_id, t.category_id, t.created_at, t.updated_at,
           creator.name AS creator_name,
           creator.email AS creator_email,
           creator.avatar AS creator_avatar,
           assignee.name AS assignee_name,
           assignee.email AS assignee_email,
           assignee.avatar AS assignee_avatar,
           cat.name AS category_name,
           cat.color AS category_color,
           (SELECT COUNT(*) FROM comments cm WHERE cm.task_id = t.id) AS comment_count
    FROM tasks t
    JOIN users creator ON creator.id = t.creator_id
    LEFT JOIN users assignee ON assignee.id = t.assignee_id
    LEFT JOIN categories cat ON cat.id = t.category_id";

pub(crate) async fn fetch_task(pool: &MySqlPool, id: &str) -> Result<Task, ApiError> {
    sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task with ID {id} not found")))
}

async fn fetch_task_detail(pool: &MySqlPool, id: &str) -> Result<TaskDetail, ApiError> {
    sqlx::query_as::<_, TaskDetail>(&format!("{TASK_DETAIL_QUERY} WHERE t.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task with ID {id} not found")))
}

pub async fn list_tasks(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    query: web::Query<TaskFilters>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;

    // One snapshot per request; visibility, filters, and ranking are applied
    // to it in memory against a single `now`.
    let rows = sqlx::query_as::<_, TaskDetail>(TASK_DETAIL_QUERY)
        .fetch_all(pool.get_ref())
        .await?;
    let now = Utc::now();
    let mut tasks: Vec<TaskDetail> = rows
        .into_iter()
        .filter(|t| policy::can_view(user.role, &user.id, &t.creator_id, t.assignee_id.as_deref()))
        .filter(|t| query.matches(t))
        .collect();
    ordering::sort_tasks(&mut tasks, now);

    info!("Listing {} tasks for user {}", tasks.len(), user.id);
    let tasks: Vec<TaskResponse> = tasks.into_iter().map(TaskResponse::from).collect();
    Ok(HttpResponse::Ok().json(tasks))
}

pub async fn get_stats(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let tasks = sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks"))
        .fetch_all(pool.get_ref())
        .await?;
    let scoped = tasks
        .iter()
        .filter(|t| policy::can_view(user.role, &user.id, &t.creator_id, t.assignee_id.as_deref()));
    let stats = TaskStats::collect(scoped, Utc::now());
    Ok(HttpResponse::Ok().json(stats))
}

pub async fn get_task(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let detail = fetch_task_detail(pool.get_ref(), &path.into_inner()).await?;

    if !policy::can_view(user.role, &user.id, &detail.creator_id, detail.assignee_id.as_deref()) {
        return Err(ApiError::Forbidden("You cannot view this task".into()));
    }

    let comments = sqlx::query_as::<_, CommentDetail>(&format!(
        "{COMMENT_DETAIL_QUERY} WHERE c.task_id = ? ORDER BY c.created_at DESC"
    ))
    .bind(&detail.id)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(TaskDetailResponse {
        task: TaskResponse::from(detail),
        comments: comments.into_iter().map(CommentResponse::from).collect(),
    }))
}

pub async fn create_task(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    body: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;

    let title = body.title.trim();
    validate_title(title)?;

    let now = Utc::now();
    let id = Uuid::new_v4().to_string();
    sqlx::query(
        "INSERT INTO tasks (id, title, description, status, priority, due_date,
                            creator_id, assignee_id, category_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(title)
    .bind(&body.description)
    .bind(body.status.unwrap_or(TaskStatus::Todo))
    .bind(body.priority.unwrap_or(TaskPriority::Medium))
    .bind(body.due_date)
    .bind(&user.id)
    .bind(&body.assignee_id)
    .bind(&body.category_id)
    .bind(now)
    .bind(now)
    .execute(pool.get_ref())
    .await?;

    let detail = fetch_task_detail(pool.get_ref(), &id).await?;
    info!("User {} created task {}", user.id, id);
    Ok(HttpResponse::Created().json(TaskResponse::from(detail)))
}

pub async fn update_task(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;

    // Not-found is checked before any authorization decision.
    let mut task = fetch_task(pool.get_ref(), &path.into_inner()).await?;

    if !policy::can_update(user.role, &user.id, &task) {
        return Err(ApiError::Forbidden("You cannot modify this task".into()));
    }
    if let Some(Some(new_assignee)) = &body.assignee_id {
        if !policy::can_assign(user.role, &user.id, new_assignee) {
            return Err(ApiError::Forbidden(
                "You can only assign tasks to yourself".into(),
            ));
        }
    }
    if let Some(title) = &body.title {
        validate_title(title)?;
    }

    body.apply(&mut task);
    task.updated_at = Utc::now();

    sqlx::query(
        "UPDATE tasks
         SET title = ?, description = ?, status = ?, priority = ?, due_date = ?,
             assignee_id = ?, category_id = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&task.title)
    .bind(&task.description)
    .bind(task.status)
    .bind(task.priority)
    .bind(task.due_date)
    .bind(&task.assignee_id)
    .bind(&task.category_id)
    .bind(task.updated_at)
    .bind(&task.id)
    .execute(pool.get_ref())
    .await?;

    let detail = fetch_task_detail(pool.get_ref(), &task.id).await?;
    info!("User {} updated task {}", user.id, task.id);
    Ok(HttpResponse::Ok().json(TaskResponse::from(detail)))
}

pub async fn delete_task(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let task = fetch_task(pool.get_ref(), &path.into_inner()).await?;

    if !policy::can_delete(user.role, &user.id, &task) {
        return Err(ApiError::Forbidden(
            "Only the creator or an admin can delete a task".into(),
        ));
    }

    sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(&task.id)
        .execute(pool.get_ref())
        .await?;

    info!("User {} deleted task {}", user.id, task.id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Task deleted successfully" })))
}
