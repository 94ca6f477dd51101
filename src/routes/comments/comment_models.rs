use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::comment::CommentDetail;
use crate::routes::tasks::task_models::UserSummary;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub content: String,
    pub task_id: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
    pub author: UserSummary,
}

impl From<CommentDetail> for CommentResponse {
    fn from(detail: CommentDetail) -> Self {
        CommentResponse {
            id: detail.id,
            content: detail.content,
            task_id: detail.task_id,
            author_id: detail.author_id.clone(),
            created_at: detail.created_at,
            author: UserSummary {
                id: detail.author_id,
                name: detail.author_name,
                email: detail.author_email,
                avatar: detail.author_avatar,
            },
        }
    }
}
