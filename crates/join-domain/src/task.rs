use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Opaque document id assigned by the store on creation.
pub type TaskId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Urgent,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    AwaitFeedback,
    Done,
}

impl TaskStatus {
    /// Column order on the board. Menu-driven moves may only step between
    /// neighbours in this order; drag and drop is exempt.
    pub const ORDER: [TaskStatus; 4] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::AwaitFeedback,
        TaskStatus::Done,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::AwaitFeedback => "Await Feedback",
            TaskStatus::Done => "Done",
        }
    }

    fn index(&self) -> usize {
        Self::ORDER
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    /// Next status in board order, if any.
    pub fn forward(&self) -> Option<TaskStatus> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    /// Previous status in board order, if any.
    pub fn backward(&self) -> Option<TaskStatus> {
        self.index().checked_sub(1).map(|i| Self::ORDER[i])
    }

    /// True when `other` is one step away in board order.
    pub fn is_adjacent(&self, other: TaskStatus) -> bool {
        self.forward() == Some(other) || self.backward() == Some(other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub title: String,
    pub completed: bool,
}

impl Subtask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }
}

/// A persisted task document. Field names and status values match the stored
/// document 1:1 (`dueDate`, `assignedTo`, `createdAt`, kebab-case statuses).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    pub category: String,
    /// Denormalized copy of assignee display names. Referenced contacts may
    /// be renamed or deleted out from under us; lookups must tolerate that.
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub status: TaskStatus,
    #[serde(default)]
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn completed_subtask_count(&self) -> usize {
        self.subtasks.iter().filter(|st| st.completed).count()
    }

    /// Subtask completion as a whole percentage, 0 when there are none.
    pub fn subtask_progress(&self) -> u8 {
        if self.subtasks.is_empty() {
            return 0;
        }
        let completed = self.completed_subtask_count() as f64;
        let total = self.subtasks.len() as f64;
        (completed / total * 100.0).round() as u8
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// A task before the store has assigned it an id and creation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub priority: TaskPriority,
    pub category: String,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    pub status: TaskStatus,
    #[serde(default)]
    pub position: i32,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date,
            priority: TaskPriority::Medium,
            category: "User Story".to_string(),
            assigned_to: Vec::new(),
            subtasks: Vec::new(),
            status: TaskStatus::Todo,
            position: 0,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    /// Promote the draft into a persisted task once the store has assigned
    /// identity and creation time.
    pub fn into_task(self, id: TaskId, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            due_date: self.due_date,
            priority: self.priority,
            category: self.category,
            assigned_to: self.assigned_to,
            subtasks: self.subtasks,
            status: self.status,
            position: self.position,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
    }

    #[test]
    fn test_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::AwaitFeedback).unwrap(),
            "\"await-feedback\""
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>("\"in-progress\"").unwrap(),
            TaskStatus::InProgress
        );
    }

    #[test]
    fn test_status_adjacency() {
        assert_eq!(TaskStatus::Todo.forward(), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::Todo.backward(), None);
        assert_eq!(TaskStatus::Done.forward(), None);
        assert_eq!(TaskStatus::Done.backward(), Some(TaskStatus::AwaitFeedback));

        assert!(TaskStatus::Todo.is_adjacent(TaskStatus::InProgress));
        assert!(!TaskStatus::Todo.is_adjacent(TaskStatus::AwaitFeedback));
        assert!(!TaskStatus::Todo.is_adjacent(TaskStatus::Done));
        assert!(TaskStatus::Done.is_adjacent(TaskStatus::AwaitFeedback));
    }

    #[test]
    fn test_subtask_progress_empty() {
        let task = draft("Empty").into_task("t1".to_string(), Utc::now());
        assert_eq!(task.subtask_progress(), 0);
    }

    #[test]
    fn test_subtask_progress_rounds() {
        let mut task = draft("Thirds").into_task("t1".to_string(), Utc::now());
        task.subtasks = vec![
            Subtask {
                title: "a".into(),
                completed: true,
            },
            Subtask::new("b"),
            Subtask::new("c"),
        ];
        assert_eq!(task.subtask_progress(), 33);

        task.subtasks.push(Subtask {
            title: "d".into(),
            completed: true,
        });
        assert_eq!(task.subtask_progress(), 50);
        assert_eq!(task.completed_subtask_count(), 2);
    }

    #[test]
    fn test_task_document_field_names() {
        let task = draft("Write docs").into_task("abc".to_string(), Utc::now());
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "2025-06-01");
        assert!(json.get("assignedTo").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["status"], "todo");
    }
}
