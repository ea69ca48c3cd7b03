use chrono::NaiveDate;

use crate::field_update::FieldUpdate;
use crate::task::{Subtask, Task, TaskPriority, TaskStatus};

/// Partial update against a stored task. Unset fields leave the stored value
/// untouched, matching the document store's patch semantics.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
    pub category: Option<String>,
    pub assigned_to: Option<Vec<String>>,
    pub subtasks: Option<Vec<Subtask>>,
    pub status: Option<TaskStatus>,
    pub position: Option<i32>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn position(position: i32) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Position plus status in one patch, the drag-and-drop write shape.
    pub fn placement(status: TaskStatus, position: i32) -> Self {
        Self {
            status: Some(status),
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn subtasks(subtasks: Vec<Subtask>) -> Self {
        Self {
            subtasks: Some(subtasks),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && !self.description.is_change()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.category.is_none()
            && self.assigned_to.is_none()
            && self.subtasks.is_none()
            && self.status.is_none()
            && self.position.is_none()
    }

    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        self.description.apply_to(&mut task.description);
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(category) = self.category {
            task.category = category;
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(subtasks) = self.subtasks {
            task.subtasks = subtasks;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(position) = self.position {
            task.position = position;
        }
    }
}
