//! Authorization rules: who may read, modify, and delete which tasks.
//!
//! Admins see and touch everything. Everyone else is scoped to tasks they
//! created or are assigned to, and may never hand a task to a third party.

use crate::models::task::Task;
use crate::models::user::Role;

/// Read scope: admins see all tasks, users only what they created or were
/// assigned.
pub fn can_view(role: Role, user_id: &str, creator_id: &str, assignee_id: Option<&str>) -> bool {
    match role {
        Role::Admin => true,
        Role::User => creator_id == user_id || assignee_id == Some(user_id),
    }
}

/// Update is open to the admin, the creator, and the current assignee.
pub fn can_update(role: Role, user_id: &str, task: &Task) -> bool {
    match role {
        Role::Admin => true,
        Role::User => {
            task.creator_id == user_id || task.assignee_id.as_deref() == Some(user_id)
        }
    }
}

/// A non-admin may only assign a task to themselves. Clearing the assignee is
/// not an assignment and is always allowed for anyone who can update.
pub fn can_assign(role: Role, user_id: &str, new_assignee_id: &str) -> bool {
    match role {
        Role::Admin => true,
        Role::User => new_assignee_id == user_id,
    }
}

/// Delete is restricted to the admin and the creator; the assignee alone may
/// not delete.
pub fn can_delete(role: Role, user_id: &str, task: &Task) -> bool {
    match role {
        Role::Admin => true,
        Role::User => task.creator_id == user_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::fixtures;

    #[test]
    fn admin_sees_every_task() {
        assert!(can_view(Role::Admin, "admin", "someone", None));
        assert!(can_view(Role::Admin, "admin", "someone", Some("other")));
    }

    #[test]
    fn user_sees_created_and_assigned_tasks_only() {
        assert!(can_view(Role::User, "u1", "u1", None));
        assert!(can_view(Role::User, "u1", "other", Some("u1")));
        assert!(!can_view(Role::User, "u1", "other", None));
        assert!(!can_view(Role::User, "u1", "other", Some("third")));
    }

    #[test]
    fn creator_and_assignee_may_update() {
        let mut task = fixtures::task("t1", "u1");
        task.assignee_id = Some("u2".to_string());

        assert!(can_update(Role::User, "u1", &task));
        assert!(can_update(Role::User, "u2", &task));
        assert!(can_update(Role::Admin, "admin", &task));
        assert!(!can_update(Role::User, "u3", &task));
    }

    #[test]
    fn non_admin_cannot_reassign_to_third_party() {
        assert!(!can_assign(Role::User, "u1", "u2"));
        assert!(can_assign(Role::User, "u1", "u1"));
        assert!(can_assign(Role::Admin, "admin", "u2"));
    }

    #[test]
    fn assignee_alone_may_not_delete() {
        let mut task = fixtures::task("t1", "u1");
        task.assignee_id = Some("u2".to_string());

        assert!(can_delete(Role::User, "u1", &task));
        assert!(!can_delete(Role::User, "u2", &task));
    }

    #[test]
    fn admin_may_delete_tasks_created_by_others() {
        let task = fixtures::task("t1", "u1");
        assert!(can_delete(Role::Admin, "admin", &task));
    }
}
