use async_trait::async_trait;
use join_core::JoinResult;
use join_domain::{Contact, Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
use tokio::sync::broadcast;

/// Client for the remote `tasks` collection. The sole point of contact with
/// the persistence layer; holds no business logic and caches nothing (the
/// board coordinator is the cache).
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Live subscription to the task collection.
    ///
    /// Every change, local or remote, emits the **entire** current
    /// collection; there are no incremental diffs. Each emission replaces
    /// all previously received state. The subscription lives until the
    /// receiver is dropped.
    fn subscribe(&self) -> broadcast::Receiver<Vec<Task>>;

    /// Current collection contents, for initial population before the first
    /// emission arrives.
    async fn tasks(&self) -> JoinResult<Vec<Task>>;

    /// Create a task; the store assigns the id and creation timestamp.
    /// Callers must not assume success until the call resolves.
    async fn create(&self, draft: TaskDraft) -> JoinResult<TaskId>;

    /// Partial patch. Fails with `NotFound` when the id no longer exists.
    async fn update(&self, id: &str, patch: TaskPatch) -> JoinResult<()>;

    /// Single-field status write, kept distinct from `update` because it is
    /// the drag-and-drop hot path.
    async fn update_status(&self, id: &str, status: TaskStatus) -> JoinResult<()> {
        self.update(id, TaskPatch::status(status)).await
    }

    /// Idempotent delete: removing an absent id is Ok.
    async fn delete(&self, id: &str) -> JoinResult<()>;
}

/// Read-only client for the remote `contacts` collection. The board core
/// resolves assignee names through this and never writes to it.
#[async_trait]
pub trait ContactStore: Send + Sync {
    fn subscribe_contacts(&self) -> broadcast::Receiver<Vec<Contact>>;

    async fn contacts(&self) -> JoinResult<Vec<Contact>>;
}
