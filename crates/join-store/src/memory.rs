use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use join_core::{JoinError, JoinResult};
use join_domain::{Contact, Task, TaskDraft, TaskId, TaskPatch};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::traits::{ContactStore, TaskStore};

/// Broadcast buffer for collection emissions. Consumers that lag behind
/// only care about the latest emission anyway.
const CHANNEL_CAPACITY: usize = 16;

/// In-process document store: the stand-in for the remote collection when
/// running without a backing file, and the primary test double.
///
/// Mirrors the remote contract exactly: every successful mutation pushes the
/// full task collection to all subscribers.
#[derive(Clone)]
pub struct MemoryStore {
    tasks: Arc<RwLock<Vec<Task>>>,
    contacts: Arc<RwLock<Vec<Contact>>>,
    tasks_tx: broadcast::Sender<Vec<Task>>,
    contacts_tx: broadcast::Sender<Vec<Contact>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (tasks_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (contacts_tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            tasks: Arc::new(RwLock::new(Vec::new())),
            contacts: Arc::new(RwLock::new(Vec::new())),
            tasks_tx,
            contacts_tx,
        }
    }

    /// Seed the contact collection, emitting to contact subscribers.
    pub async fn set_contacts(&self, contacts: Vec<Contact>) {
        let mut guard = self.contacts.write().await;
        *guard = contacts;
        let _ = self.contacts_tx.send(guard.clone());
    }

    async fn broadcast_tasks(&self) {
        let tasks = self.tasks.read().await.clone();
        // Send fails only when no subscriber is listening, which is fine.
        let _ = self.tasks_tx.send(tasks);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    fn subscribe(&self) -> broadcast::Receiver<Vec<Task>> {
        self.tasks_tx.subscribe()
    }

    async fn tasks(&self) -> JoinResult<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn create(&self, draft: TaskDraft) -> JoinResult<TaskId> {
        let id = Uuid::new_v4().to_string();
        let task = draft.into_task(id.clone(), Utc::now());
        self.tasks.write().await.push(task);
        self.broadcast_tasks().await;
        tracing::debug!(task_id = %id, "created task");
        Ok(id)
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> JoinResult<()> {
        {
            let mut tasks = self.tasks.write().await;
            let task = tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| JoinError::NotFound(format!("task {id}")))?;
            patch.apply_to(task);
        }
        self.broadcast_tasks().await;
        Ok(())
    }

    async fn delete(&self, id: &str) -> JoinResult<()> {
        let removed = {
            let mut tasks = self.tasks.write().await;
            let before = tasks.len();
            tasks.retain(|t| t.id != id);
            tasks.len() != before
        };
        if removed {
            self.broadcast_tasks().await;
        } else {
            tracing::debug!(task_id = %id, "delete of absent task ignored");
        }
        Ok(())
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    fn subscribe_contacts(&self) -> broadcast::Receiver<Vec<Contact>> {
        self.contacts_tx.subscribe()
    }

    async fn contacts(&self) -> JoinResult<Vec<Contact>> {
        Ok(self.contacts.read().await.clone())
    }
}
