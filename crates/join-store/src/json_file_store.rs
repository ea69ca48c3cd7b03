use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use join_core::{JoinError, JoinResult};
use join_domain::{Contact, Task, TaskDraft, TaskId, TaskPatch};
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

use crate::atomic::AtomicWriter;
use crate::envelope::{BoardDocument, BoardEnvelope};
use crate::traits::{ContactStore, TaskStore};

const CHANNEL_CAPACITY: usize = 16;

/// File-backed document store. Every mutation is a read-modify-write of the
/// whole board file, written atomically, followed by a full-collection push
/// to all subscribers. Combined with `StoreWatcher`, writes from other
/// processes push here too, which gives every client the same contract:
/// any change by any writer emits the entire collection.
#[derive(Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    instance_id: Uuid,
    tasks_tx: broadcast::Sender<Vec<Task>>,
    contacts_tx: broadcast::Sender<Vec<Contact>>,
    // Serializes read-modify-write cycles between clones of this store.
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let (tasks_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (contacts_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            path: path.as_ref().to_path_buf(),
            instance_id: Uuid::new_v4(),
            tasks_tx,
            contacts_tx,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn load_document(&self) -> JoinResult<BoardDocument> {
        if !self.exists() {
            return Ok(BoardDocument::default());
        }
        let bytes = AtomicWriter::read_all(&self.path).await?;
        let envelope = BoardEnvelope::from_json(&bytes)?;
        Ok(envelope.data)
    }

    async fn save_document(&self, document: BoardDocument) -> JoinResult<()> {
        let envelope = BoardEnvelope::new(document, self.instance_id);
        let bytes = envelope.to_json()?;
        AtomicWriter::write_atomic(&self.path, &bytes).await?;
        tracing::debug!("saved board file {}", self.path.display());
        Ok(())
    }

    /// Load, mutate, save, then push the task collection to subscribers.
    async fn mutate<F, R>(&self, mutation: F) -> JoinResult<R>
    where
        F: FnOnce(&mut BoardDocument) -> JoinResult<R>,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load_document().await?;
        let result = mutation(&mut document)?;
        let tasks = document.tasks.clone();
        self.save_document(document).await?;
        let _ = self.tasks_tx.send(tasks);
        Ok(result)
    }

    /// Re-read the file and push both collections. Called by the watcher
    /// after an external change; also the echo path for our own writes,
    /// which is harmless because subscribers replace state wholesale.
    pub async fn reload_and_broadcast(&self) -> JoinResult<()> {
        let document = self.load_document().await?;
        let _ = self.tasks_tx.send(document.tasks);
        let _ = self.contacts_tx.send(document.contacts);
        Ok(())
    }

    /// Seed the contact collection. Exists for fixtures and imports; the
    /// board core itself never writes contacts.
    pub async fn seed_contacts(&self, contacts: Vec<Contact>) -> JoinResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.load_document().await?;
        document.contacts = contacts.clone();
        self.save_document(document).await?;
        let _ = self.contacts_tx.send(contacts);
        Ok(())
    }
}

#[async_trait]
impl TaskStore for JsonFileStore {
    fn subscribe(&self) -> broadcast::Receiver<Vec<Task>> {
        self.tasks_tx.subscribe()
    }

    async fn tasks(&self) -> JoinResult<Vec<Task>> {
        Ok(self.load_document().await?.tasks)
    }

    async fn create(&self, draft: TaskDraft) -> JoinResult<TaskId> {
        let id = Uuid::new_v4().to_string();
        let task = draft.into_task(id.clone(), Utc::now());
        self.mutate(move |document| {
            document.tasks.push(task);
            Ok(())
        })
        .await?;
        tracing::debug!(task_id = %id, "created task");
        Ok(id)
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> JoinResult<()> {
        let id = id.to_string();
        self.mutate(move |document| {
            let task = document
                .tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| JoinError::NotFound(format!("task {id}")))?;
            patch.apply_to(task);
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &str) -> JoinResult<()> {
        let id = id.to_string();
        self.mutate(move |document| {
            document.tasks.retain(|t| t.id != id);
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl ContactStore for JsonFileStore {
    fn subscribe_contacts(&self) -> broadcast::Receiver<Vec<Contact>> {
        self.contacts_tx.subscribe()
    }

    async fn contacts(&self) -> JoinResult<Vec<Contact>> {
        Ok(self.load_document().await?.contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use join_domain::TaskStatus;
    use tempfile::tempdir;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
    }

    #[tokio::test]
    async fn test_create_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");

        let store = JsonFileStore::new(&path);
        let id = store.create(draft("Persist me")).await.unwrap();
        assert!(path.exists());

        // A fresh store over the same file sees the task
        let reopened = JsonFileStore::new(&path);
        let tasks = reopened.tasks().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, id);
        assert_eq!(tasks[0].title, "Persist me");
    }

    #[tokio::test]
    async fn test_mutation_emits_full_collection() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("board.json"));
        let mut rx = store.subscribe();

        let id = store.create(draft("One")).await.unwrap();
        assert_eq!(rx.recv().await.unwrap().len(), 1);

        store
            .update_status(&id, TaskStatus::Done)
            .await
            .unwrap();
        let emitted = rx.recv().await.unwrap();
        assert_eq!(emitted[0].status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn test_update_missing_id() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("board.json"));
        let err = store
            .update("ghost", TaskPatch::position(0))
            .await
            .unwrap_err();
        assert!(matches!(err, JoinError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_absent_is_ok() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("board.json"));
        store.delete("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn test_reload_broadcasts_external_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");

        // Another instance writes behind our back
        let other = JsonFileStore::new(&path);
        other.create(draft("External")).await.unwrap();

        let store = JsonFileStore::new(&path);
        let mut rx = store.subscribe();
        store.reload_and_broadcast().await.unwrap();
        let emitted = rx.recv().await.unwrap();
        assert_eq!(emitted.len(), 1);
        assert_eq!(emitted[0].title, "External");
    }
}
