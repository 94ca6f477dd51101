use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::ApiError;
use crate::models::task::{Task, TaskDetail, TaskPriority, TaskStatus};
use crate::routes::comments::comment_models::CommentResponse;

/// Deserializer for clearable patch fields. A present field always lands in
/// the outer `Some`, so explicit JSON `null` becomes `Some(None)` (clear)
/// while an absent field stays `None` (keep) via `#[serde(default)]`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title must not be empty".into()));
    }
    if title.len() > 200 {
        return Err(ApiError::BadRequest(
            "Title is limited to 200 characters".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub creator_id: String,
    pub assignee_id: Option<String>,
    pub category_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub creator: UserSummary,
    pub assignee: Option<UserSummary>,
    pub category: Option<CategorySummary>,
    pub comment_count: i64,
}

impl From<TaskDetail> for TaskResponse {
    fn from(detail: TaskDetail) -> Self {
        let creator = UserSummary {
            id: detail.creator_id.clone(),
            name: detail.creator_name,
            email: detail.creator_email,
            avatar: detail.creator_avatar,
        };
        let assignee = match (
            detail.assignee_id.clone(),
            detail.assignee_name,
            detail.assignee_email,
        ) {
            (Some(id), Some(name), Some(email)) => Some(UserSummary {
                id,
                name,
                email,
                avatar: detail.assignee_avatar,
            }),
            _ => None,
        };
        let category = match (
            detail.category_id.clone(),
            detail.category_name,
            detail.category_color,
        ) {
            (Some(id), Some(name), Some(color)) => Some(CategorySummary { id, name, color }),
            _ => None,
        };
        TaskResponse {
            id: detail.id,
            title: detail.title,
            description: detail.description,
            status: detail.status,
            priority: detail.priority,
            due_date: detail.due_date,
            creator_id: detail.creator_id,
            assignee_id: detail.assignee_id,
            category_id: detail.category_id,
            created_at: detail.created_at,
            updated_at: detail.updated_at,
            creator,
            assignee,
            category,
            comment_count: detail.comment_count,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetailResponse {
    #[serde(flatten)]
    pub task: TaskResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub assignee_id: Option<String>,
    pub category_id: Option<String>,
}

/// Partial update. The double `Option` on clearable fields separates "field
/// absent, keep the current value" from "explicit null, clear it".
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(deserialize_with = "double_option")]
    pub assignee_id: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub category_id: Option<Option<String>>,
}

impl UpdateTaskRequest {
    pub fn apply(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(assignee_id) = &self.assignee_id {
            task.assignee_id = assignee_id.clone();
        }
        if let Some(category_id) = &self.category_id {
            task.category_id = category_id.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::fixtures;

    #[test]
    fn absent_fields_keep_current_values() {
        let mut task = fixtures::task("t1", "u1");
        task.description = Some("keep me".to_string());
        task.due_date = Some(fixtures::base_time());

        let patch = UpdateTaskRequest {
            title: Some("renamed".to_string()),
            ..UpdateTaskRequest::default()
        };
        patch.apply(&mut task);

        assert_eq!(task.title, "renamed");
        assert_eq!(task.description.as_deref(), Some("keep me"));
        assert_eq!(task.due_date, Some(fixtures::base_time()));
    }

    #[test]
    fn explicit_null_clears_the_field() {
        let mut task = fixtures::task("t1", "u1");
        task.due_date = Some(fixtures::base_time());
        task.assignee_id = Some("u2".to_string());

        let patch = UpdateTaskRequest {
            due_date: Some(None),
            assignee_id: Some(None),
            ..UpdateTaskRequest::default()
        };
        patch.apply(&mut task);

        assert_eq!(task.due_date, None);
        assert_eq!(task.assignee_id, None);
    }

    #[test]
    fn json_null_deserializes_as_clear() {
        let patch: UpdateTaskRequest =
            serde_json::from_str(r#"{"dueDate": null, "title": "x"}"#).unwrap();
        assert_eq!(patch.due_date, Some(None));
        assert_eq!(patch.title.as_deref(), Some("x"));
        assert_eq!(patch.assignee_id, None);
    }

    #[test]
    fn every_clearable_field_distinguishes_null_from_absent() {
        let patch: UpdateTaskRequest = serde_json::from_str(
            r#"{"description": null, "assigneeId": null, "categoryId": null}"#,
        )
        .unwrap();
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.assignee_id, Some(None));
        assert_eq!(patch.category_id, Some(None));
        assert_eq!(patch.due_date, None);

        let patch: UpdateTaskRequest =
            serde_json::from_str(r#"{"assigneeId": "u2", "dueDate": "2026-03-01T12:00:00Z"}"#)
                .unwrap();
        assert_eq!(patch.assignee_id, Some(Some("u2".to_string())));
        assert_eq!(patch.due_date, Some(Some(fixtures::base_time())));
        assert_eq!(patch.description, None);
    }

    #[test]
    fn null_patch_clears_after_apply() {
        let mut task = fixtures::task("t1", "u1");
        task.assignee_id = Some("u2".to_string());
        task.description = Some("old".to_string());

        let patch: UpdateTaskRequest =
            serde_json::from_str(r#"{"assigneeId": null, "description": null}"#).unwrap();
        patch.apply(&mut task);

        assert_eq!(task.assignee_id, None);
        assert_eq!(task.description, None);
    }

    #[test]
    fn title_validation_enforces_bounds() {
        assert!(validate_title("ship the release").is_ok());
        assert!(matches!(
            validate_title("   "),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            validate_title(&"x".repeat(201)),
            Err(ApiError::BadRequest(_))
        ));
        assert!(validate_title(&"x".repeat(200)).is_ok());
    }

    #[test]
    fn status_and_priority_use_wire_names() {
        let patch: UpdateTaskRequest =
            serde_json::from_str(r#"{"status": "IN_PROGRESS", "priority": "HIGH"}"#).unwrap();
        assert_eq!(patch.status, Some(TaskStatus::InProgress));
        assert_eq!(patch.priority, Some(TaskPriority::High));
    }
}
