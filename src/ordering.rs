//! Task ranking: overdue work first, then dated work, then the backlog.
//!
//! The comparator is a strict total order. Ties across every key fall back to
//! the storage order because the sort is stable.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::models::task::{TaskDetail, TaskPriority, TaskStatus};

/// Fixed sort rank: HIGH before MEDIUM before LOW.
pub fn priority_rank(priority: TaskPriority) -> u8 {
    match priority {
        TaskPriority::High => 0,
        TaskPriority::Medium => 1,
        TaskPriority::Low => 2,
    }
}

/// A task is overdue when its due date has passed and it is not DONE.
/// Computed per request, never persisted.
pub fn is_overdue(
    status: TaskStatus,
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    match due_date {
        Some(due) => status != TaskStatus::Done && due < now,
        None => false,
    }
}

/// Composite sort key for one task, evaluated against a single `now` so the
/// whole listing ranks against the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankKey {
    Overdue { rank: u8, due: DateTime<Utc> },
    Scheduled { rank: u8, due: DateTime<Utc> },
    Unscheduled { rank: u8, created: DateTime<Utc> },
}

impl RankKey {
    pub fn new(
        status: TaskStatus,
        priority: TaskPriority,
        due_date: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        let rank = priority_rank(priority);
        match due_date {
            Some(due) if is_overdue(status, due_date, now) => RankKey::Overdue { rank, due },
            Some(due) => RankKey::Scheduled { rank, due },
            None => RankKey::Unscheduled {
                rank,
                created: created_at,
            },
        }
    }

    fn group(&self) -> u8 {
        match self {
            RankKey::Overdue { .. } => 0,
            RankKey::Scheduled { .. } => 1,
            RankKey::Unscheduled { .. } => 2,
        }
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            // Overdue: higher priority first, then most overdue first.
            (
                RankKey::Overdue { rank: a, due: x },
                RankKey::Overdue { rank: b, due: y },
            ) => a.cmp(b).then_with(|| x.cmp(y)),
            // Dated: higher priority first, then earliest due date first.
            (
                RankKey::Scheduled { rank: a, due: x },
                RankKey::Scheduled { rank: b, due: y },
            ) => a.cmp(b).then_with(|| x.cmp(y)),
            // Backlog: higher priority first, then newest first.
            (
                RankKey::Unscheduled { rank: a, created: x },
                RankKey::Unscheduled { rank: b, created: y },
            ) => a.cmp(b).then_with(|| y.cmp(x)),
            _ => self.group().cmp(&other.group()),
        }
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Stable sort of a fetched snapshot by `RankKey`.
pub fn sort_tasks(tasks: &mut [TaskDetail], now: DateTime<Utc>) {
    tasks.sort_by_key(|t| RankKey::new(t.status, t.priority, t.due_date, t.created_at, now));
}
