//! Optional listing filters: equality criteria plus free-text search.
//!
//! Filters only ever narrow a listing. Visibility is decided by
//! `policy::can_view` first; a search hit on an out-of-scope task must never
//! surface it.

use serde::Deserialize;

use crate::models::task::{TaskDetail, TaskPriority, TaskStatus};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFilters {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category_id: Option<String>,
    pub assignee_id: Option<String>,
    pub search: Option<String>,
}

impl TaskFilters {
    /// Whether a task passes every supplied criterion. Search matches a
    /// case-insensitive substring of the title or the description.
    pub fn matches(&self, task: &TaskDetail) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(category_id) = &self.category_id {
            if task.category_id.as_deref() != Some(category_id.as_str()) {
                return false;
            }
        }
        if let Some(assignee_id) = &self.assignee_id {
            if task.assignee_id.as_deref() != Some(assignee_id.as_str()) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !needle.is_empty() {
                let in_title = task.title.to_lowercase().contains(&needle);
                let in_description = task
                    .description
                    .as_deref()
                    .map(|d| d.to_lowercase().contains(&needle))
                    .unwrap_or(false);
                if !in_title && !in_description {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::fixtures;
    use crate::models::user::Role;
    use crate::policy;

    fn select<'a>(
        tasks: &'a [TaskDetail],
        role: Role,
        user_id: &str,
        filters: &TaskFilters,
    ) -> Vec<&'a TaskDetail> {
        tasks
            .iter()
            .filter(|t| policy::can_view(role, user_id, &t.creator_id, t.assignee_id.as_deref()))
            .filter(|t| filters.matches(t))
            .collect()
    }

    #[test]
    fn equality_filters_narrow_the_listing() {
        let mut a = fixtures::detail("a", "u1");
        a.status = TaskStatus::Done;
        let mut b = fixtures::detail("b", "u1");
        b.priority = TaskPriority::High;
        b.category_id = Some("cat1".to_string());

        let filters = TaskFilters {
            status: Some(TaskStatus::Done),
            ..TaskFilters::default()
        };
        assert!(filters.matches(&a));
        assert!(!filters.matches(&b));

        let filters = TaskFilters {
            priority: Some(TaskPriority::High),
            category_id: Some("cat1".to_string()),
            ..TaskFilters::default()
        };
        assert!(filters.matches(&b));
        assert!(!filters.matches(&a));
    }

    #[test]
    fn assignee_filter_never_matches_unassigned_tasks() {
        let unassigned = fixtures::detail("a", "u1");
        let mut assigned = fixtures::detail("b", "u1");
        assigned.assignee_id = Some("u2".to_string());

        let filters = TaskFilters {
            assignee_id: Some("u2".to_string()),
            ..TaskFilters::default()
        };
        assert!(filters.matches(&assigned));
        assert!(!filters.matches(&unassigned));
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let mut task = fixtures::detail("a", "u1");
        task.title = "Fix login redirect".to_string();
        task.description = Some("Session cookie is dropped on HTTPS".to_string());

        for needle in ["LOGIN", "login", "https", "cookie"] {
            let filters = TaskFilters {
                search: Some(needle.to_string()),
                ..TaskFilters::default()
            };
            assert!(filters.matches(&task), "search {needle:?} should match");
        }

        let filters = TaskFilters {
            search: Some("kubernetes".to_string()),
            ..TaskFilters::default()
        };
        assert!(!filters.matches(&task));
    }

    #[test]
    fn non_admin_listing_is_a_subset_of_own_tasks() {
        let mut tasks = vec![
            fixtures::detail("mine", "u1"),
            fixtures::detail("other", "u2"),
            fixtures::detail("assigned", "u2"),
        ];
        tasks[2].assignee_id = Some("u1".to_string());

        let visible = select(&tasks, Role::User, "u1", &TaskFilters::default());
        let ids: Vec<&str> = visible.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["mine", "assigned"]);
        for t in visible {
            assert!(
                t.creator_id == "u1" || t.assignee_id.as_deref() == Some("u1"),
                "task {} leaked outside the visibility scope",
                t.id
            );
        }
    }

    #[test]
    fn admin_listing_covers_the_whole_set() {
        let tasks = vec![
            fixtures::detail("a", "u1"),
            fixtures::detail("b", "u2"),
            fixtures::detail("c", "u3"),
        ];
        let visible = select(&tasks, Role::Admin, "admin", &TaskFilters::default());
        assert_eq!(visible.len(), tasks.len());
    }

    #[test]
    fn search_never_widens_visibility() {
        let mut foreign = fixtures::detail("foreign", "u2");
        foreign.title = "secret launch plan".to_string();
        let mut own = fixtures::detail("own", "u1");
        own.title = "my launch checklist".to_string();
        let tasks = vec![foreign, own];

        let filters = TaskFilters {
            search: Some("launch".to_string()),
            ..TaskFilters::default()
        };
        let visible = select(&tasks, Role::User, "u1", &filters);
        let ids: Vec<&str> = visible.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["own"]);
    }

    #[test]
    fn creator_or_assignee_visibility_scenario() {
        // u1 created A; B is created by someone else and assigned to a third
        // user, so u1 must not see it.
        let a = fixtures::detail("a", "u1");
        let mut b = fixtures::detail("b", "u2");
        b.assignee_id = Some("other".to_string());
        let tasks = vec![a, b];

        let visible = select(&tasks, Role::User, "u1", &TaskFilters::default());
        let ids: Vec<&str> = visible.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a"]);
    }
}
