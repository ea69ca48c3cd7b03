use serde::Serialize;

use crate::task::{Task, TaskId, TaskStatus};

/// Client-side projection of the task collection into the four board columns,
/// each sorted ascending by position. Derived, never persisted; recomputed
/// from scratch on every store emission.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupedTasks {
    pub todo: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub await_feedback: Vec<Task>,
    pub done: Vec<Task>,
}

impl GroupedTasks {
    /// Partition tasks by status and sort each column by position.
    ///
    /// The sort is stable, so tasks with equal (or missing, defaulted)
    /// positions keep the order they arrived in. No task is ever dropped:
    /// every input task lands in exactly one column.
    pub fn group(tasks: Vec<Task>) -> Self {
        let mut grouped = Self::default();
        for task in tasks {
            grouped.column_mut(task.status).push(task);
        }
        for status in TaskStatus::ORDER {
            grouped
                .column_mut(status)
                .sort_by_key(|task| task.position);
        }
        grouped
    }

    pub fn column(&self, status: TaskStatus) -> &Vec<Task> {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::AwaitFeedback => &self.await_feedback,
            TaskStatus::Done => &self.done,
        }
    }

    pub fn column_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::Todo => &mut self.todo,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::AwaitFeedback => &mut self.await_feedback,
            TaskStatus::Done => &mut self.done,
        }
    }

    pub fn total(&self) -> usize {
        TaskStatus::ORDER
            .iter()
            .map(|&status| self.column(status).len())
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.todo
            .iter()
            .chain(self.in_progress.iter())
            .chain(self.await_feedback.iter())
            .chain(self.done.iter())
    }

    /// Number of columns that contain the given task id. Exactly one for any
    /// task on the board; used to check grouping completeness.
    pub fn occurrences(&self, id: &TaskId) -> usize {
        self.iter().filter(|task| &task.id == id).count()
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        self.iter().find(|task| &task.id == id)
    }

    /// True when the column's positions are exactly 0..n-1 in order.
    pub fn is_dense(&self, status: TaskStatus) -> bool {
        self.column(status)
            .iter()
            .enumerate()
            .all(|(index, task)| task.position == index as i32)
    }
}
