use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::user::{Role, User};
use crate::routes::tasks::task_models::double_option;

/// Public view of a user. `password_hash` never leaves the handler layer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            avatar: user.avatar,
            created_at: user.created_at,
        }
    }
}

/// Profile patch. `avatar` distinguishes "absent" from an explicit null so the
/// client can clear it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub avatar: Option<Option<String>>,
}
