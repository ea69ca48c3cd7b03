use chrono::NaiveDate;
use join_core::{JoinError, JoinResult};
use join_domain::{FieldUpdate, Subtask, Task, TaskDraft, TaskPatch, TaskPriority, TaskStatus};

/// Per-field validation flags. Validation never raises; callers read the
/// flags, block the action, and highlight the offending inputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationFlags {
    pub title_missing: bool,
    pub due_date_invalid: bool,
    pub category_missing: bool,
}

impl ValidationFlags {
    pub fn is_valid(&self) -> bool {
        !self.title_missing && !self.due_date_invalid && !self.category_missing
    }
}

/// Editable working copy of a task's fields, used by both the add-task
/// dialog and the editor overlay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<TaskPriority>,
    pub category: String,
    pub assigned_to: Vec<String>,
    pub subtasks: Vec<Subtask>,
}

impl TaskForm {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: Some(task.due_date),
            priority: Some(task.priority),
            category: task.category.clone(),
            assigned_to: task.assigned_to.clone(),
            subtasks: task.subtasks.clone(),
        }
    }

    /// Missing title, empty category, and a due date that is absent or in
    /// the past are all local failures; nothing invalid ever reaches the
    /// store.
    pub fn validate(&self, today: NaiveDate) -> ValidationFlags {
        ValidationFlags {
            title_missing: self.title.trim().is_empty(),
            due_date_invalid: self.due_date.map_or(true, |d| d < today),
            category_missing: self.category.trim().is_empty(),
        }
    }

    /// Build the creation draft for a validated form.
    pub fn into_draft(
        self,
        status: TaskStatus,
        position: i32,
        today: NaiveDate,
    ) -> JoinResult<TaskDraft> {
        let flags = self.validate(today);
        if !flags.is_valid() {
            return Err(JoinError::Validation(format!(
                "invalid task form: {flags:?}"
            )));
        }
        let due_date = self
            .due_date
            .ok_or_else(|| JoinError::Validation("missing due date".to_string()))?;
        Ok(TaskDraft {
            title: self.title.trim().to_string(),
            description: if self.description.trim().is_empty() {
                None
            } else {
                Some(self.description)
            },
            due_date,
            priority: self.priority.unwrap_or(TaskPriority::Medium),
            category: self.category,
            assigned_to: self.assigned_to,
            subtasks: self.subtasks,
            status,
            position,
        })
    }

    /// Build the save patch for a validated edit of an existing task.
    pub fn as_patch(&self, today: NaiveDate) -> JoinResult<TaskPatch> {
        let flags = self.validate(today);
        if !flags.is_valid() {
            return Err(JoinError::Validation(format!(
                "invalid task form: {flags:?}"
            )));
        }
        Ok(TaskPatch {
            title: Some(self.title.trim().to_string()),
            description: if self.description.trim().is_empty() {
                FieldUpdate::Clear
            } else {
                FieldUpdate::Set(self.description.clone())
            },
            due_date: self.due_date,
            priority: self.priority,
            category: Some(self.category.clone()),
            assigned_to: Some(self.assigned_to.clone()),
            subtasks: Some(self.subtasks.clone()),
            status: None,
            position: None,
        })
    }
}

/// Editor overlay state for one task: the form plus subtask bookkeeping.
///
/// Subtasks have no identity of their own; they are addressed by index into
/// the parent's sequence. Deleting one therefore shifts every later index,
/// and the tracked edit index has to move with it or edit state would
/// silently point at the wrong subtask.
#[derive(Debug, Clone, Default)]
pub struct TaskEditor {
    pub form: TaskForm,
    editing_subtask: Option<usize>,
    pub new_subtask_title: String,
}

impl TaskEditor {
    pub fn for_task(task: &Task) -> Self {
        Self {
            form: TaskForm::from_task(task),
            editing_subtask: None,
            new_subtask_title: String::new(),
        }
    }

    pub fn editing_subtask(&self) -> Option<usize> {
        self.editing_subtask
    }

    pub fn add_subtask(&mut self) {
        let title = self.new_subtask_title.trim();
        if title.is_empty() {
            return;
        }
        self.form.subtasks.push(Subtask::new(title));
        self.new_subtask_title.clear();
    }

    /// Remove a subtask, keeping the edit index pointed at the same subtask:
    /// deleting below it decrements the index, deleting the edited one
    /// clears edit mode.
    pub fn remove_subtask(&mut self, index: usize) {
        if index >= self.form.subtasks.len() {
            return;
        }
        self.form.subtasks.remove(index);
        if let Some(editing) = self.editing_subtask {
            if editing == index {
                self.editing_subtask = None;
            } else if editing > index {
                self.editing_subtask = Some(editing - 1);
            }
        }
    }

    pub fn start_subtask_edit(&mut self, index: usize) {
        if index < self.form.subtasks.len() {
            self.editing_subtask = Some(index);
        }
    }

    /// Finish editing. A title edited down to whitespace removes the
    /// subtask entirely.
    pub fn save_subtask_edit(&mut self) {
        if let Some(index) = self.editing_subtask.take() {
            if let Some(subtask) = self.form.subtasks.get_mut(index) {
                let trimmed = subtask.title.trim().to_string();
                if trimmed.is_empty() {
                    self.form.subtasks.remove(index);
                } else {
                    subtask.title = trimmed;
                }
            }
        }
    }

    pub fn cancel_subtask_edit(&mut self) {
        self.editing_subtask = None;
    }

    /// Flip a subtask's completed flag on the working copy. Returns the
    /// patch that must be persisted immediately so the visible and stored
    /// states cannot drift apart.
    pub fn toggle_subtask(&mut self, index: usize) -> Option<TaskPatch> {
        let subtask = self.form.subtasks.get_mut(index)?;
        subtask.completed = !subtask.completed;
        Some(TaskPatch::subtasks(self.form.subtasks.clone()))
    }
}
