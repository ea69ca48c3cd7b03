use chrono::NaiveDate;
use serde::Serialize;

use crate::grouped::GroupedTasks;
use crate::task::{TaskPriority, TaskStatus};

/// Aggregated board figures for the summary page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSummary {
    pub todo: usize,
    pub in_progress: usize,
    pub await_feedback: usize,
    pub done: usize,
    pub total: usize,
    /// Urgent tasks that are not done yet.
    pub urgent: usize,
    /// Earliest due date among unfinished urgent tasks.
    pub upcoming_deadline: Option<NaiveDate>,
}

impl BoardSummary {
    pub fn from_grouped(grouped: &GroupedTasks) -> Self {
        let mut urgent = 0;
        let mut upcoming_deadline: Option<NaiveDate> = None;
        for task in grouped.iter() {
            if task.status == TaskStatus::Done || task.priority != TaskPriority::Urgent {
                continue;
            }
            urgent += 1;
            upcoming_deadline = match upcoming_deadline {
                Some(earliest) if earliest <= task.due_date => Some(earliest),
                _ => Some(task.due_date),
            };
        }

        Self {
            todo: grouped.todo.len(),
            in_progress: grouped.in_progress.len(),
            await_feedback: grouped.await_feedback.len(),
            done: grouped.done.len(),
            total: grouped.total(),
            urgent,
            upcoming_deadline,
        }
    }
}

/// Time-of-day greeting for the summary header.
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Task, TaskDraft};
    use chrono::Utc;

    fn task(id: &str, status: TaskStatus, priority: TaskPriority, due: &str) -> Task {
        let mut t = TaskDraft::new(id, due.parse().unwrap())
            .with_status(status)
            .into_task(id.to_string(), Utc::now());
        t.priority = priority;
        t
    }

    #[test]
    fn test_counts_and_urgent() {
        let grouped = GroupedTasks::group(vec![
            task("a", TaskStatus::Todo, TaskPriority::Urgent, "2025-06-10"),
            task("b", TaskStatus::InProgress, TaskPriority::Urgent, "2025-06-02"),
            task("c", TaskStatus::Done, TaskPriority::Urgent, "2025-05-01"),
            task("d", TaskStatus::Todo, TaskPriority::Low, "2025-07-01"),
        ]);
        let summary = BoardSummary::from_grouped(&grouped);
        assert_eq!(summary.todo, 2);
        assert_eq!(summary.done, 1);
        assert_eq!(summary.total, 4);
        // Done tasks do not count as urgent work or deadlines
        assert_eq!(summary.urgent, 2);
        assert_eq!(
            summary.upcoming_deadline,
            Some("2025-06-02".parse().unwrap())
        );
    }

    #[test]
    fn test_no_urgent_means_no_deadline() {
        let grouped = GroupedTasks::group(vec![task(
            "a",
            TaskStatus::Todo,
            TaskPriority::Low,
            "2025-06-10",
        )]);
        let summary = BoardSummary::from_grouped(&grouped);
        assert_eq!(summary.urgent, 0);
        assert_eq!(summary.upcoming_deadline, None);
    }

    #[test]
    fn test_greeting() {
        assert_eq!(greeting(8), "Good morning");
        assert_eq!(greeting(12), "Good afternoon");
        assert_eq!(greeting(19), "Good evening");
    }
}
