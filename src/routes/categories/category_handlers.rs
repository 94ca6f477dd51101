use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::info;
use serde_json::json;
use sqlx::MySqlPool;
use uuid::Uuid;

use super::category_models::{
    CategoryDetailResponse, CategoryResponse, CategoryRow, CreateCategoryRequest,
    UpdateCategoryRequest,
};
use crate::auth::authenticate;
use crate::errors::ApiError;
use crate::models::category::Category;
use crate::models::task::TaskDetail;
use crate::ordering;
use crate::policy;
use crate::routes::tasks::task_handlers::TASK_DETAIL_QUERY;
use crate::routes::tasks::task_models::TaskResponse;

const DEFAULT_COLOR: &str = "#3B82F6";

const CATEGORY_ROW_QUERY: &str = "\
    SELECT c.id, c.name, c.color, c.created_at,
           (SELECT COUNT(*) FROM tasks t WHERE t.category_id = c.id) AS task_count
    FROM categories c";

async fn fetch_category(pool: &MySqlPool, id: &str) -> Result<CategoryRow, ApiError> {
    sqlx::query_as::<_, CategoryRow>(&format!("{CATEGORY_ROW_QUERY} WHERE c.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Category with ID {id} not found")))
}

async fn name_taken(pool: &MySqlPool, name: &str) -> Result<bool, ApiError> {
    let existing: Option<(String,)> =
        sqlx::query_as("SELECT id FROM categories WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await?;
    Ok(existing.is_some())
}

pub async fn list_categories(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    authenticate(&req, pool.get_ref()).await?;
    let rows = sqlx::query_as::<_, CategoryRow>(&format!(
        "{CATEGORY_ROW_QUERY} ORDER BY c.name ASC"
    ))
    .fetch_all(pool.get_ref())
    .await?;
    let categories: Vec<CategoryResponse> =
        rows.into_iter().map(CategoryResponse::from).collect();
    Ok(HttpResponse::Ok().json(categories))
}

pub async fn create_category(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    body: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;

    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Name must not be empty".into()));
    }
    if name_taken(pool.get_ref(), name).await? {
        return Err(ApiError::Conflict(
            "Category with this name already exists".into(),
        ));
    }

    let category = Category {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        color: body
            .color
            .as_deref()
            .unwrap_or(DEFAULT_COLOR)
            .to_string(),
        created_at: Utc::now(),
    };
    sqlx::query("INSERT INTO categories (id, name, color, created_at) VALUES (?, ?, ?, ?)")
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.color)
        .bind(category.created_at)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            ApiError::conflict_on_duplicate(e, "Category with this name already exists")
        })?;

    let row = fetch_category(pool.get_ref(), &category.id).await?;
    info!("User {} created category {}", user.id, category.id);
    Ok(HttpResponse::Created().json(CategoryResponse::from(row)))
}

pub async fn get_category(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let row = fetch_category(pool.get_ref(), &path.into_inner()).await?;

    // Linked tasks are reported within the requester's visibility scope, in
    // the same rank order as the main listing.
    let rows = sqlx::query_as::<_, TaskDetail>(&format!(
        "{TASK_DETAIL_QUERY} WHERE t.category_id = ?"
    ))
    .bind(&row.id)
    .fetch_all(pool.get_ref())
    .await?;

    let mut tasks: Vec<TaskDetail> = rows
        .into_iter()
        .filter(|t| policy::can_view(user.role, &user.id, &t.creator_id, t.assignee_id.as_deref()))
        .collect();
    ordering::sort_tasks(&mut tasks, Utc::now());

    Ok(HttpResponse::Ok().json(CategoryDetailResponse {
        category: CategoryResponse::from(row),
        tasks: tasks.into_iter().map(TaskResponse::from).collect(),
    }))
}

pub async fn update_category(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<UpdateCategoryRequest>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let mut row = fetch_category(pool.get_ref(), &path.into_inner()).await?;

    if let Some(name) = &body.name {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::BadRequest("Name must not be empty".into()));
        }
        if name != row.name && name_taken(pool.get_ref(), name).await? {
            return Err(ApiError::Conflict(
                "Category with this name already exists".into(),
            ));
        }
        row.name = name.to_string();
    }
    if let Some(color) = &body.color {
        row.color = color.clone();
    }

    sqlx::query("UPDATE categories SET name = ?, color = ? WHERE id = ?")
        .bind(&row.name)
        .bind(&row.color)
        .bind(&row.id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            ApiError::conflict_on_duplicate(e, "Category with this name already exists")
        })?;

    info!("User {} updated category {}", user.id, row.id);
    Ok(HttpResponse::Ok().json(CategoryResponse::from(row)))
}

pub async fn delete_category(
    pool: web::Data<MySqlPool>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let user = authenticate(&req, pool.get_ref()).await?;
    let row = fetch_category(pool.get_ref(), &path.into_inner()).await?;

    // tasks.category_id falls back to NULL via the FK.
    sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(&row.id)
        .execute(pool.get_ref())
        .await?;

    info!("User {} deleted category {}", user.id, row.id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Category deleted successfully" })))
}
