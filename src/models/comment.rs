use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub task_id: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

/// Comment row joined with its author, as returned to clients.
#[derive(Debug, Clone, FromRow)]
pub struct CommentDetail {
    pub id: String,
    pub content: String,
    pub task_id: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub author_name: String,
    pub author_email: String,
    pub author_avatar: Option<String>,
}
