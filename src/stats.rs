//! Aggregate task counters for the dashboard, computed over the requester's
//! visibility scope. Overdue is a cross-cutting count and never includes DONE.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::task::{Task, TaskStatus};
use crate::ordering::is_overdue;

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: u64,
    pub todo: u64,
    pub in_progress: u64,
    pub done: u64,
    pub overdue: u64,
}

impl TaskStats {
    pub fn collect<'a, I>(tasks: I, now: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut stats = TaskStats::default();
        for task in tasks {
            stats.total += 1;
            match task.status {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Done => stats.done += 1,
            }
            if is_overdue(task.status, task.due_date, now) {
                stats.overdue += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::fixtures;
    use crate::models::user::Role;
    use crate::policy;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        fixtures::base_time()
    }

    #[test]
    fn statuses_partition_the_total() {
        let mut tasks = vec![
            fixtures::task("a", "u1"),
            fixtures::task("b", "u1"),
            fixtures::task("c", "u1"),
            fixtures::task("d", "u1"),
        ];
        tasks[1].status = TaskStatus::InProgress;
        tasks[2].status = TaskStatus::Done;
        tasks[3].status = TaskStatus::Done;

        let stats = TaskStats::collect(&tasks, now());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.todo + stats.in_progress + stats.done, stats.total);
        assert_eq!(stats.done, 2);
    }

    #[test]
    fn overdue_counts_past_due_tasks_but_never_done_ones() {
        let mut tasks = vec![
            fixtures::task("late", "u1"),
            fixtures::task("closed", "u1"),
            fixtures::task("future", "u1"),
        ];
        tasks[0].due_date = Some(now() - Duration::days(1));
        tasks[1].due_date = Some(now() - Duration::days(1));
        tasks[1].status = TaskStatus::Done;
        tasks[2].due_date = Some(now() + Duration::days(1));

        let stats = TaskStats::collect(&tasks, now());
        assert_eq!(stats.overdue, 1);
    }

    #[test]
    fn non_admin_stats_are_scoped_to_creator_or_assignee() {
        let mut tasks = vec![
            fixtures::task("mine", "u1"),
            fixtures::task("assigned", "u2"),
            fixtures::task("foreign", "u2"),
        ];
        tasks[1].assignee_id = Some("u1".to_string());

        let scoped: Vec<&Task> = tasks
            .iter()
            .filter(|t| policy::can_view(Role::User, "u1", &t.creator_id, t.assignee_id.as_deref()))
            .collect();
        let stats = TaskStats::collect(scoped, now());
        assert_eq!(stats.total, 2);

        let all: Vec<&Task> = tasks
            .iter()
            .filter(|t| {
                policy::can_view(Role::Admin, "admin", &t.creator_id, t.assignee_id.as_deref())
            })
            .collect();
        assert_eq!(TaskStats::collect(all, now()).total, 3);
    }
}
