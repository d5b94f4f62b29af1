// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    client::LearningApi,
    config::{COMPLETION_BUS_CAPACITY, Config},
    progress::{CompletionBus, ProgressViews},
    quiz::{registry::SessionRegistry, runner::SessionDeps},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub api: Arc<dyn LearningApi>,
    pub sessions: SessionRegistry,
    pub bus: CompletionBus,
    pub views: ProgressViews,
}

impl AppState {
    /// Builds the state and subscribes the progress views to completion events.
    /// Must be called inside a tokio runtime.
    pub fn new(config: Config, api: Arc<dyn LearningApi>) -> Self {
        let bus = CompletionBus::new(COMPLETION_BUS_CAPACITY);
        let views = ProgressViews::new(api.clone());
        views.attach_to(&bus);

        Self {
            config,
            api,
            sessions: SessionRegistry::new(),
            bus,
            views,
        }
    }

    pub fn session_deps(&self) -> SessionDeps {
        SessionDeps::new(self.api.clone(), self.bus.clone())
            .with_revert_delay(self.config.revert_delay())
            .with_idle_timeout(self.config.session_idle_timeout())
    }
}

impl FromRef<AppState> for SessionRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for ProgressViews {
    fn from_ref(state: &AppState) -> Self {
        state.views.clone()
    }
}
