use join_domain::contact::{color_for, find_by_name, initials};
use join_domain::{Contact, Task, TaskStatus};

/// Character budgets for list display. Display-only; the underlying task is
/// never mutated.
const TITLE_BUDGET: usize = 25;
const DESCRIPTION_BUDGET: usize = 50;

const CATEGORY_TECHNICAL: &str = "Technical Task";
const CATEGORY_COLOR_TECHNICAL: &str = "#1FD7C1";
const CATEGORY_COLOR_DEFAULT: &str = "#0038FF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Backward,
    Forward,
}

/// A single-step status move offered by the card's context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusMove {
    pub status: TaskStatus,
    pub direction: MoveDirection,
}

/// Assignee avatar data resolved against the current contact list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeBadge {
    pub name: String,
    pub initials: String,
    pub color: &'static str,
    /// False when the contact was renamed or deleted since assignment.
    pub known: bool,
}

/// Read-only presentation of one task card. Holds no cross-task state;
/// every user intent goes back through the coordinator.
pub struct CardView<'a> {
    task: &'a Task,
}

impl<'a> CardView<'a> {
    pub fn new(task: &'a Task) -> Self {
        Self { task }
    }

    pub fn progress(&self) -> u8 {
        self.task.subtask_progress()
    }

    pub fn completed_count(&self) -> usize {
        self.task.completed_subtask_count()
    }

    pub fn subtask_count(&self) -> usize {
        self.task.subtasks.len()
    }

    pub fn display_title(&self) -> String {
        truncate(&self.task.title, TITLE_BUDGET)
    }

    pub fn display_description(&self) -> String {
        truncate(self.task.description.as_deref().unwrap_or(""), DESCRIPTION_BUDGET)
    }

    pub fn status_label(&self) -> &'static str {
        self.task.status.label()
    }

    pub fn category_color(&self) -> &'static str {
        if self.task.category == CATEGORY_TECHNICAL {
            CATEGORY_COLOR_TECHNICAL
        } else {
            CATEGORY_COLOR_DEFAULT
        }
    }

    /// Menu moves are restricted to single steps in board order; drag and
    /// drop is the only way to skip columns.
    pub fn available_moves(&self) -> Vec<StatusMove> {
        let mut moves = Vec::new();
        if let Some(status) = self.task.status.backward() {
            moves.push(StatusMove {
                status,
                direction: MoveDirection::Backward,
            });
        }
        if let Some(status) = self.task.status.forward() {
            moves.push(StatusMove {
                status,
                direction: MoveDirection::Forward,
            });
        }
        moves
    }

    /// Avatar badges for the assignee list. Assignments are denormalized
    /// name copies, so a contact may since have been renamed or deleted;
    /// such entries render with fallback color and empty-name-safe initials.
    pub fn assignee_badges(&self, contacts: &[Contact]) -> Vec<AssigneeBadge> {
        self.task
            .assigned_to
            .iter()
            .map(|name| AssigneeBadge {
                name: name.clone(),
                initials: initials(name),
                color: color_for(name, contacts),
                known: find_by_name(name, contacts).is_some(),
            })
            .collect()
    }
}

fn truncate(text: &str, budget: usize) -> String {
    if text.chars().count() > budget {
        let mut out: String = text.chars().take(budget).collect();
        out.push('…');
        out
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use join_domain::{Subtask, TaskDraft};

    fn task(title: &str, status: TaskStatus) -> Task {
        TaskDraft::new(title, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .with_status(status)
            .into_task("t1".to_string(), Utc::now())
    }

    #[test]
    fn test_progress_via_view() {
        let mut t = task("Progress", TaskStatus::Todo);
        t.subtasks = vec![
            Subtask {
                title: "done one".into(),
                completed: true,
            },
            Subtask::new("open one"),
            Subtask::new("open two"),
        ];
        let view = CardView::new(&t);
        assert_eq!(view.progress(), 33);
        assert_eq!(view.completed_count(), 1);
        assert_eq!(view.subtask_count(), 3);
    }

    #[test]
    fn test_title_truncation() {
        let t = task("A very long task title that keeps going", TaskStatus::Todo);
        let shown = CardView::new(&t).display_title();
        assert_eq!(shown.chars().count(), TITLE_BUDGET + 1);
        assert!(shown.ends_with('…'));
        // Underlying task untouched
        assert_eq!(t.title, "A very long task title that keeps going");
    }

    #[test]
    fn test_short_title_untouched() {
        let t = task("Short", TaskStatus::Todo);
        assert_eq!(CardView::new(&t).display_title(), "Short");
    }

    #[test]
    fn test_menu_moves_are_adjacent_only() {
        let todo = task("a", TaskStatus::Todo);
        let moves = CardView::new(&todo).available_moves();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].status, TaskStatus::InProgress);
        assert_eq!(moves[0].direction, MoveDirection::Forward);

        let done = task("b", TaskStatus::Done);
        let moves = CardView::new(&done).available_moves();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].status, TaskStatus::AwaitFeedback);
        assert_eq!(moves[0].direction, MoveDirection::Backward);

        let middle = task("c", TaskStatus::InProgress);
        assert_eq!(CardView::new(&middle).available_moves().len(), 2);
    }

    #[test]
    fn test_category_color() {
        let mut t = task("a", TaskStatus::Todo);
        assert_eq!(CardView::new(&t).category_color(), CATEGORY_COLOR_DEFAULT);
        t.category = "Technical Task".to_string();
        assert_eq!(CardView::new(&t).category_color(), CATEGORY_COLOR_TECHNICAL);
    }

    #[test]
    fn test_badges_tolerate_missing_contacts() {
        let mut t = task("a", TaskStatus::Todo);
        t.assigned_to = vec!["Ada Lovelace".to_string(), "Deleted Person".to_string()];
        let contacts = vec![Contact {
            id: "c1".into(),
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            phone: None,
        }];
        let badges = CardView::new(&t).assignee_badges(&contacts);
        assert_eq!(badges.len(), 2);
        assert!(badges[0].known);
        assert_eq!(badges[0].initials, "AL");
        assert!(!badges[1].known);
        assert_eq!(badges[1].initials, "DP");
    }
}
