use std::sync::Arc;

use chrono::NaiveDate;
use join_core::{JoinError, JoinResult};
use join_domain::{
    BoardFilter, GroupedTasks, StatusFilter, Task, TaskId, TaskPatch, TaskStatus,
};
use join_store::TaskStore;

use crate::editor::TaskForm;
use crate::overlay::{ActiveOverlay, OverlayRegion};

/// Owns the grouped board state and every cross-task invariant: column
/// grouping, intra-column position density, and the optimistic-update
/// contract with the store.
///
/// Mutating operations change the in-memory columns synchronously first
/// (no await between reading and writing a column), then issue the
/// persistence calls. Those calls race independently; the subscription is
/// the serializing source of truth and the next emission supersedes
/// whatever the local state says.
pub struct BoardCoordinator {
    store: Arc<dyn TaskStore>,
    all_tasks: Vec<Task>,
    board: GroupedTasks,
    filter: BoardFilter,
    overlay: ActiveOverlay,
}

impl BoardCoordinator {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self {
            store,
            all_tasks: Vec::new(),
            board: GroupedTasks::default(),
            filter: BoardFilter::default(),
            overlay: ActiveOverlay::default(),
        }
    }

    /// Populate from the store's current contents before the first
    /// subscription emission arrives.
    pub async fn load_initial(&mut self) -> JoinResult<()> {
        let tasks = self.store.tasks().await?;
        self.on_store_update(tasks);
        Ok(())
    }

    /// Apply a subscription emission. Each emission carries the entire
    /// collection and replaces all previous state, superseding any
    /// optimistic local mutation still in flight.
    pub fn on_store_update(&mut self, tasks: Vec<Task>) {
        self.all_tasks = tasks.clone();
        self.board = GroupedTasks::group(tasks);

        // A task deleted by another client closes its open editor or menu.
        let stale = match &self.overlay {
            ActiveOverlay::TaskEditor(id) | ActiveOverlay::CardMenu(id) => {
                self.board.find(id).is_none()
            }
            _ => false,
        };
        if stale {
            tracing::debug!("closing overlay for task removed remotely");
            self.overlay = ActiveOverlay::None;
        }
    }

    /// The grouped projection before search/status filtering.
    pub fn board(&self) -> &GroupedTasks {
        &self.board
    }

    pub fn all_tasks(&self) -> &[Task] {
        &self.all_tasks
    }

    /// Filtered view for rendering. Pure function of the board and the
    /// current filter; applying the same filter twice yields the same view.
    pub fn visible_tasks(&self) -> GroupedTasks {
        self.filter.apply(&self.board)
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.set_term(term);
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    /// Drag within one column: array move (remove then reinsert), then
    /// renormalize to 0..n-1 and persist every changed position. Persisting
    /// the whole column rather than a minimal diff is deliberate.
    pub async fn reorder_within_column(
        &mut self,
        column: TaskStatus,
        from_index: usize,
        to_index: usize,
    ) -> JoinResult<()> {
        let changed = {
            let tasks = self.board.column_mut(column);
            if from_index >= tasks.len() {
                return Err(JoinError::Validation(format!(
                    "drag index {from_index} out of range for {} column",
                    column.label()
                )));
            }
            let to_index = to_index.min(tasks.len() - 1);
            let task = tasks.remove(from_index);
            tasks.insert(to_index, task);
            renormalize(tasks)
        };
        self.rebuild_all_tasks();

        self.persist_positions(&changed).await
    }

    /// Drag across columns: remove from the source, insert into the
    /// destination, restamp the moved task's status, then renormalize and
    /// persist both columns plus the status change. The moved task is in
    /// exactly one column at every point.
    pub async fn move_between_columns(
        &mut self,
        from_column: TaskStatus,
        to_column: TaskStatus,
        from_index: usize,
        to_index: usize,
    ) -> JoinResult<()> {
        if from_column == to_column {
            return self.reorder_within_column(from_column, from_index, to_index).await;
        }

        let (moved_id, moved_position, mut changed) = {
            let source = self.board.column_mut(from_column);
            if from_index >= source.len() {
                return Err(JoinError::Validation(format!(
                    "drag index {from_index} out of range for {} column",
                    from_column.label()
                )));
            }
            let mut task = source.remove(from_index);
            task.status = to_column;
            let mut changed = renormalize(source);

            let destination = self.board.column_mut(to_column);
            let to_index = to_index.min(destination.len());
            let moved_id = task.id.clone();
            destination.insert(to_index, task);
            changed.extend(renormalize(destination));

            let moved_position = to_index as i32;
            // The moved task's write carries status and position together;
            // drop it from the position-only batch.
            changed.retain(|(id, _)| id != &moved_id);
            (moved_id, moved_position, changed)
        };
        self.rebuild_all_tasks();

        let mut first_error = None;
        if let Err(e) = self
            .store
            .update(&moved_id, TaskPatch::placement(to_column, moved_position))
            .await
        {
            tracing::warn!(task_id = %moved_id, "failed to persist move: {}", e);
            first_error = Some(e);
        }
        match self.persist_positions(&changed).await {
            Ok(()) => {}
            Err(e) => {
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Menu-driven status change. Unlike drag, menu moves may only step to
    /// an adjacent status in board order. The task is appended to the end
    /// of the destination column.
    pub async fn set_status(&mut self, id: &TaskId, new_status: TaskStatus) -> JoinResult<()> {
        let task = self
            .board
            .find(id)
            .ok_or_else(|| JoinError::NotFound(format!("task {id}")))?;
        let current = task.status;
        if current == new_status {
            return Ok(());
        }
        if !current.is_adjacent(new_status) {
            return Err(JoinError::Validation(format!(
                "menu moves are single-step: {} -> {} is not allowed",
                current.label(),
                new_status.label()
            )));
        }

        let from_index = self
            .board
            .column(current)
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| JoinError::Internal(format!("task {id} missing from its column")))?;
        let changed = {
            let source = self.board.column_mut(current);
            let mut task = source.remove(from_index);
            task.status = new_status;
            let mut changed = renormalize(source);

            let destination = self.board.column_mut(new_status);
            destination.push(task);
            changed.extend(renormalize(destination));
            changed.retain(|(task_id, _)| task_id != id);
            changed
        };
        self.rebuild_all_tasks();

        let mut first_error = None;
        // Status goes through the dedicated hot path; the landing position
        // follows as its own write.
        if let Err(e) = self.store.update_status(id, new_status).await {
            tracing::warn!(task_id = %id, "failed to persist status change: {}", e);
            first_error = Some(e);
        }
        let landing = (self.board.column(new_status).len() as i32) - 1;
        if let Err(e) = self.store.update(id, TaskPatch::position(landing)).await {
            tracing::warn!(task_id = %id, "failed to persist landing position: {}", e);
            first_error = first_error.or(Some(e));
        }
        match self.persist_positions(&changed).await {
            Ok(()) => {}
            Err(e) => first_error = first_error.or(Some(e)),
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Create a task from the add-task dialog, placed at the end of the
    /// target column. No optimistic mutation: the subscription emission
    /// brings the new task in with its store-assigned id.
    pub async fn create_task_from_form(
        &mut self,
        column: TaskStatus,
        form: TaskForm,
        today: NaiveDate,
    ) -> JoinResult<TaskId> {
        let position = self.board.column(column).len() as i32;
        let draft = form.into_draft(column, position, today)?;
        let id = self.store.create(draft).await?;
        self.overlay.close_if_outside(&OverlayRegion::Outside);
        Ok(id)
    }

    /// Save an overlay edit. Relies on the subscription to reconcile.
    pub async fn update_task(&mut self, id: &TaskId, patch: TaskPatch) -> JoinResult<()> {
        match self.store.update(id, patch).await {
            Ok(()) => Ok(()),
            Err(e @ JoinError::NotFound(_)) => {
                // Deleted under us by another client; the editor closes and
                // the caller reports "task no longer exists".
                if self.overlay.editor_task() == Some(id) {
                    self.overlay = ActiveOverlay::None;
                }
                Err(e)
            }
            Err(e) => {
                tracing::warn!(task_id = %id, "failed to persist task update: {}", e);
                Err(e)
            }
        }
    }

    pub async fn delete_task(&mut self, id: &TaskId) -> JoinResult<()> {
        self.store.delete(id).await?;
        if self.overlay.editor_task() == Some(id) || self.overlay == ActiveOverlay::CardMenu(id.clone())
        {
            self.overlay = ActiveOverlay::None;
        }
        Ok(())
    }

    // --- overlay command surface ---

    pub fn overlay(&self) -> &ActiveOverlay {
        &self.overlay
    }

    pub fn open_editor(&mut self, id: &TaskId) -> JoinResult<()> {
        if self.board.find(id).is_none() {
            return Err(JoinError::NotFound(format!("task {id}")));
        }
        self.overlay = ActiveOverlay::TaskEditor(id.clone());
        Ok(())
    }

    pub fn open_add_task(&mut self, column: TaskStatus) {
        self.overlay = ActiveOverlay::AddTask(column);
    }

    pub fn toggle_card_menu(&mut self, id: TaskId) {
        self.overlay.toggle_menu(id);
    }

    pub fn close_overlay(&mut self) {
        self.overlay = ActiveOverlay::None;
    }

    /// Route any pointer interaction through here; whatever overlay does
    /// not own the interacted region closes.
    pub fn interact(&mut self, region: OverlayRegion) {
        self.overlay.close_if_outside(&region);
    }

    // --- internals ---

    fn rebuild_all_tasks(&mut self) {
        self.all_tasks = self.board.iter().cloned().collect();
    }

    /// Persist a batch of position writes. Failures are logged and the
    /// first one is reported; local state stays as-is and the next store
    /// emission corrects any divergence.
    async fn persist_positions(&self, changed: &[(TaskId, i32)]) -> JoinResult<()> {
        let mut first_error = None;
        for (id, position) in changed {
            if let Err(e) = self.store.update(id, TaskPatch::position(*position)).await {
                tracing::warn!(task_id = %id, position, "failed to persist position: {}", e);
                first_error = first_error.or(Some(e));
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Restamp a column's positions to 0..n-1 in display order, returning the
/// (id, position) pairs that actually changed.
fn renormalize(column: &mut [Task]) -> Vec<(TaskId, i32)> {
    let mut changed = Vec::new();
    for (index, task) in column.iter_mut().enumerate() {
        let position = index as i32;
        if task.position != position {
            task.position = position;
            changed.push((task.id.clone(), position));
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use join_domain::TaskDraft;
    use join_store::MemoryStore;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    async fn seeded_coordinator(
        seeds: &[(&str, TaskStatus)],
    ) -> (BoardCoordinator, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        for (title, status) in seeds {
            let position = 0; // store order is irrelevant; grouping sorts
            store
                .create(
                    TaskDraft::new(*title, date())
                        .with_status(*status)
                        .with_position(position),
                )
                .await
                .unwrap();
        }
        let mut coordinator = BoardCoordinator::new(store.clone());
        coordinator.load_initial().await.unwrap();
        (coordinator, store)
    }

    fn id_of(coordinator: &BoardCoordinator, title: &str) -> TaskId {
        coordinator
            .all_tasks()
            .iter()
            .find(|t| t.title == title)
            .map(|t| t.id.clone())
            .unwrap()
    }

    #[tokio::test]
    async fn test_reorder_renormalizes_and_persists() {
        let (mut coordinator, store) = seeded_coordinator(&[
            ("a", TaskStatus::Todo),
            ("b", TaskStatus::Todo),
            ("c", TaskStatus::Todo),
        ])
        .await;

        coordinator
            .reorder_within_column(TaskStatus::Todo, 0, 2)
            .await
            .unwrap();

        assert!(coordinator.board().is_dense(TaskStatus::Todo));
        let titles: Vec<&str> = coordinator
            .board()
            .todo
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles.last(), Some(&"a"));

        // Store sees the same dense ordering
        let persisted = GroupedTasks::group(store.tasks().await.unwrap());
        assert!(persisted.is_dense(TaskStatus::Todo));
        let persisted_titles: Vec<&str> =
            persisted.todo.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(persisted_titles, titles);
    }

    #[tokio::test]
    async fn test_reorder_out_of_range_is_validation_error() {
        let (mut coordinator, _store) = seeded_coordinator(&[("a", TaskStatus::Todo)]).await;
        let err = coordinator
            .reorder_within_column(TaskStatus::Todo, 5, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, JoinError::Validation(_)));
    }

    #[tokio::test]
    async fn test_move_between_columns_keeps_task_in_exactly_one_column() {
        let (mut coordinator, store) = seeded_coordinator(&[
            ("a", TaskStatus::Todo),
            ("b", TaskStatus::Todo),
            ("c", TaskStatus::InProgress),
        ])
        .await;
        let moved = id_of(&coordinator, "a");

        coordinator
            .move_between_columns(TaskStatus::Todo, TaskStatus::InProgress, 0, 1)
            .await
            .unwrap();

        let board = coordinator.board();
        assert_eq!(board.occurrences(&moved), 1);
        assert_eq!(board.find(&moved).unwrap().status, TaskStatus::InProgress);
        assert_eq!(board.find(&moved).unwrap().position, 1);
        assert!(board.is_dense(TaskStatus::Todo));
        assert!(board.is_dense(TaskStatus::InProgress));

        // Persisted state converges to the same shape
        let persisted = GroupedTasks::group(store.tasks().await.unwrap());
        assert_eq!(persisted.occurrences(&moved), 1);
        assert!(persisted.is_dense(TaskStatus::Todo));
        assert!(persisted.is_dense(TaskStatus::InProgress));
    }

    #[tokio::test]
    async fn test_drag_may_skip_columns() {
        let (mut coordinator, _store) = seeded_coordinator(&[("a", TaskStatus::Todo)]).await;
        coordinator
            .move_between_columns(TaskStatus::Todo, TaskStatus::Done, 0, 0)
            .await
            .unwrap();
        assert_eq!(coordinator.board().done.len(), 1);
    }

    #[tokio::test]
    async fn test_menu_move_rejects_non_adjacent_status() {
        let (mut coordinator, _store) = seeded_coordinator(&[("a", TaskStatus::Todo)]).await;
        let id = id_of(&coordinator, "a");

        let err = coordinator
            .set_status(&id, TaskStatus::AwaitFeedback)
            .await
            .unwrap_err();
        assert!(matches!(err, JoinError::Validation(_)));
        let err = coordinator.set_status(&id, TaskStatus::Done).await.unwrap_err();
        assert!(matches!(err, JoinError::Validation(_)));

        coordinator.set_status(&id, TaskStatus::InProgress).await.unwrap();
        assert_eq!(
            coordinator.board().find(&id).unwrap().status,
            TaskStatus::InProgress
        );
    }

    #[tokio::test]
    async fn test_menu_move_from_done_only_backward() {
        let (mut coordinator, _store) = seeded_coordinator(&[("a", TaskStatus::Done)]).await;
        let id = id_of(&coordinator, "a");

        let err = coordinator
            .set_status(&id, TaskStatus::InProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, JoinError::Validation(_)));

        coordinator
            .set_status(&id, TaskStatus::AwaitFeedback)
            .await
            .unwrap();
        assert_eq!(coordinator.board().await_feedback.len(), 1);
    }

    #[tokio::test]
    async fn test_set_status_missing_task() {
        let (mut coordinator, _store) = seeded_coordinator(&[]).await;
        let err = coordinator
            .set_status(&"ghost".to_string(), TaskStatus::Todo)
            .await
            .unwrap_err();
        assert!(matches!(err, JoinError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_store_emission_supersedes_local_state() {
        let (mut coordinator, store) = seeded_coordinator(&[("a", TaskStatus::Todo)]).await;
        let id = id_of(&coordinator, "a");
        let mut rx = store.subscribe();

        // Another client moves the task; the emission replaces our state
        store.update_status(&id, TaskStatus::Done).await.unwrap();
        let emission = rx.recv().await.unwrap();
        coordinator.on_store_update(emission);

        assert!(coordinator.board().todo.is_empty());
        assert_eq!(coordinator.board().done.len(), 1);
    }

    #[tokio::test]
    async fn test_remote_delete_closes_open_editor() {
        let (mut coordinator, store) = seeded_coordinator(&[("a", TaskStatus::Todo)]).await;
        let id = id_of(&coordinator, "a");
        coordinator.open_editor(&id).unwrap();
        assert!(coordinator.overlay().is_open());

        store.delete(&id).await.unwrap();
        coordinator.on_store_update(store.tasks().await.unwrap());
        assert!(!coordinator.overlay().is_open());
    }

    #[tokio::test]
    async fn test_create_from_form_lands_at_column_end() {
        let (mut coordinator, store) =
            seeded_coordinator(&[("existing", TaskStatus::Todo)]).await;
        let form = TaskForm {
            title: "Write docs".to_string(),
            due_date: Some(date()),
            category: "User Story".to_string(),
            ..TaskForm::default()
        };
        let id = coordinator
            .create_task_from_form(TaskStatus::Todo, form, date())
            .await
            .unwrap();

        coordinator.on_store_update(store.tasks().await.unwrap());
        let created = coordinator.board().find(&id).unwrap();
        assert_eq!(created.position, 1);
        assert_eq!(created.status, TaskStatus::Todo);
    }

    #[tokio::test]
    async fn test_search_filter_idempotent_and_clearable() {
        let (mut coordinator, _store) = seeded_coordinator(&[
            ("Write docs", TaskStatus::Todo),
            ("Review PR", TaskStatus::Todo),
        ])
        .await;

        coordinator.set_search_term("docs");
        let once = coordinator.visible_tasks();
        let twice = coordinator.visible_tasks();
        assert_eq!(once, twice);
        assert_eq!(once.total(), 1);

        coordinator.set_search_term("");
        assert_eq!(coordinator.visible_tasks().total(), 2);
    }

    #[tokio::test]
    async fn test_update_task_not_found_closes_editor() {
        let (mut coordinator, store) = seeded_coordinator(&[("a", TaskStatus::Todo)]).await;
        let id = id_of(&coordinator, "a");
        coordinator.open_editor(&id).unwrap();

        // Deleted by another client while the editor is open; our local
        // board still lists it until the next emission
        store.delete(&id).await.unwrap();
        let err = coordinator
            .update_task(&id, TaskPatch::position(0))
            .await
            .unwrap_err();
        assert!(matches!(err, JoinError::NotFound(_)));
        assert!(!coordinator.overlay().is_open());
    }

    #[test]
    fn test_renormalize_reports_only_changes() {
        let mut column: Vec<Task> = [("a", 0), ("b", 5), ("c", 2)]
            .iter()
            .map(|(id, position)| {
                TaskDraft::new(*id, date())
                    .with_position(*position)
                    .into_task(id.to_string(), Utc::now())
            })
            .collect();
        let changed = renormalize(&mut column);
        assert_eq!(changed, vec![("b".to_string(), 1)]);
        assert!(column
            .iter()
            .enumerate()
            .all(|(i, t)| t.position == i as i32));
    }
}
