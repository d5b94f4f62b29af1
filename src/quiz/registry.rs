// src/quiz/registry.rs

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{error::AppError, quiz::runner::SessionHandle};

/// Live sessions by id.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a running session. The entry is dropped again as soon as
    /// the session task stops, whether it was closed, went idle or finished.
    pub async fn insert(&self, handle: SessionHandle) {
        let id = handle.id();
        let watched = handle.clone();
        self.sessions.write().await.insert(id, handle);

        let sessions = Arc::downgrade(&self.sessions);
        tokio::spawn(async move {
            watched.closed().await;
            if let Some(sessions) = sessions.upgrade() {
                if sessions.write().await.remove(&id).is_some() {
                    tracing::debug!(session = %id, "Removed stopped quiz session");
                }
            }
        });
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Quiz session {} not found", id)))
    }

    /// Removes the session and waits for it to shut down.
    pub async fn close(&self, id: Uuid) -> Result<(), AppError> {
        let handle = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("Quiz session {} not found", id)))?;
        handle.close().await;
        Ok(())
    }

    pub async fn live_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
