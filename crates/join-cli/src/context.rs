use std::sync::Arc;

use join_board::BoardCoordinator;
use join_core::JoinResult;
use join_domain::{Contact, Task, TaskId};
use join_store::{ContactStore, JsonFileStore};

/// One-shot process state: a file-backed store and a coordinator loaded
/// from it. Commands mutate through the coordinator so the same grouping
/// and position rules apply as in a long-lived board session.
pub struct CliContext {
    store: JsonFileStore,
    pub coordinator: BoardCoordinator,
}

impl CliContext {
    pub async fn load(file_path: &str) -> JoinResult<Self> {
        let store = JsonFileStore::new(file_path);
        let mut coordinator = BoardCoordinator::new(Arc::new(store.clone()));
        coordinator.load_initial().await?;
        Ok(Self { store, coordinator })
    }

    /// Re-read the file after writes so output reflects persisted state,
    /// store-assigned ids included.
    pub async fn refresh(&mut self) -> JoinResult<()> {
        self.coordinator.load_initial().await
    }

    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.coordinator.board().find(id)
    }

    pub async fn contacts(&self) -> JoinResult<Vec<Contact>> {
        self.store.contacts().await
    }
}
