// src/progress.rs

//! Progress views that depend on item completion.
//!
//! Progress percentages are cached separately per lesson, section, module
//! and enrollment list. A successful completion write publishes one
//! `ItemCompleted` event on the `CompletionBus`; every attached view
//! refreshes its own entry independently.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{
    sync::{RwLock, broadcast},
    task::JoinHandle,
};

use crate::{client::LearningApi, error::AppError, models::item::ItemScope};

/// Cache key of the current user's enrollment list.
pub const ENROLLMENT_SCOPE: &str = "current";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressView {
    Lesson,
    Section,
    Module,
    Enrollment,
}

impl ProgressView {
    pub const ALL: [ProgressView; 4] = [
        ProgressView::Lesson,
        ProgressView::Section,
        ProgressView::Module,
        ProgressView::Enrollment,
    ];

    /// The cache entry this view keeps for an item's scope, if any.
    pub fn scope_id<'a>(&self, scope: &'a ItemScope) -> Option<&'a str> {
        match self {
            ProgressView::Lesson => scope.lesson_id.as_deref(),
            ProgressView::Section => scope.section_id.as_deref(),
            ProgressView::Module => scope.module_id.as_deref(),
            ProgressView::Enrollment => Some(ENROLLMENT_SCOPE),
        }
    }
}

/// Broadcast after the completion write has succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemCompleted {
    pub item_id: String,
    pub scope: ItemScope,
    pub completed_at: DateTime<Utc>,
}

/// A named consumer of `ItemCompleted` events.
#[async_trait]
pub trait ProgressSubscriber: Send + Sync {
    fn view(&self) -> ProgressView;

    async fn on_item_completed(&self, event: &ItemCompleted) -> Result<(), AppError>;
}

#[derive(Debug, Clone)]
pub struct CompletionBus {
    sender: broadcast::Sender<ItemCompleted>,
}

impl CompletionBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns the number of listeners that received the event.
    pub fn publish(&self, event: ItemCompleted) -> usize {
        tracing::debug!(item = %event.item_id, "publishing item completion");
        self.sender.send(event).unwrap_or(0)
    }

    /// Spawns a listener that feeds every event to `subscriber` until the bus closes.
    pub fn attach(&self, subscriber: Arc<dyn ProgressSubscriber>) -> JoinHandle<()> {
        let mut receiver = self.sender.subscribe();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        if let Err(e) = subscriber.on_item_completed(&event).await {
                            tracing::error!(
                                view = ?subscriber.view(),
                                item = %event.item_id,
                                "Failed to refresh view: {}",
                                e
                            );
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            view = ?subscriber.view(),
                            "View listener lagged, skipped {} completion events",
                            skipped
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

/// One cached read of a progress view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEntry {
    pub view: ProgressView,
    pub scope_id: String,
    pub data: serde_json::Value,
    pub refreshed_at: DateTime<Utc>,
    pub refreshes: u32,
}

/// Server-side cache of one progress view, keyed by scope id.
pub struct CachedView {
    view: ProgressView,
    api: Arc<dyn LearningApi>,
    entries: RwLock<HashMap<String, ViewEntry>>,
}

impl CachedView {
    pub fn new(view: ProgressView, api: Arc<dyn LearningApi>) -> Self {
        Self {
            view,
            api,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached entry, fetching it on a miss.
    pub async fn get(&self, scope_id: &str) -> Result<ViewEntry, AppError> {
        if let Some(entry) = self.entries.read().await.get(scope_id) {
            return Ok(entry.clone());
        }
        self.refresh(scope_id).await
    }

    pub async fn refresh(&self, scope_id: &str) -> Result<ViewEntry, AppError> {
        let data = self.api.fetch_view(self.view, scope_id).await?;

        let mut entries = self.entries.write().await;
        let refreshes = entries.get(scope_id).map_or(0, |e| e.refreshes) + 1;
        let entry = ViewEntry {
            view: self.view,
            scope_id: scope_id.to_string(),
            data,
            refreshed_at: Utc::now(),
            refreshes,
        };
        entries.insert(scope_id.to_string(), entry.clone());
        Ok(entry)
    }
}

#[async_trait]
impl ProgressSubscriber for CachedView {
    fn view(&self) -> ProgressView {
        self.view
    }

    async fn on_item_completed(&self, event: &ItemCompleted) -> Result<(), AppError> {
        let Some(scope_id) = self.view.scope_id(&event.scope) else {
            tracing::debug!(view = ?self.view, item = %event.item_id, "item has no scope for view");
            return Ok(());
        };
        self.refresh(scope_id).await?;
        tracing::info!(view = ?self.view, scope = %scope_id, "View refreshed after completion");
        Ok(())
    }
}

/// The four progress views, one cache each.
#[derive(Clone)]
pub struct ProgressViews {
    views: Arc<HashMap<ProgressView, Arc<CachedView>>>,
}

impl ProgressViews {
    pub fn new(api: Arc<dyn LearningApi>) -> Self {
        let views = ProgressView::ALL
            .into_iter()
            .map(|view| (view, Arc::new(CachedView::new(view, api.clone()))))
            .collect();
        Self {
            views: Arc::new(views),
        }
    }

    pub fn get(&self, view: ProgressView) -> Option<Arc<CachedView>> {
        self.views.get(&view).cloned()
    }

    /// Subscribes every view to `bus`.
    pub fn attach_to(&self, bus: &CompletionBus) -> Vec<JoinHandle<()>> {
        self.views
            .values()
            .map(|view| bus.attach(view.clone()))
            .collect()
    }
}
