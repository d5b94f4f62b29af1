// src/client.rs

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use url::Url;

use crate::{config::Config, error::AppError, models::item::ItemContent, progress::ProgressView};

/// The learning platform's REST API, as far as the quiz engine needs it.
#[async_trait]
pub trait LearningApi: Send + Sync {
    /// Reads an item's content summary, including its quiz questions.
    async fn fetch_item_content(&self, item_id: &str) -> Result<ItemContent, AppError>;

    /// Marks the item as completed by the current user.
    async fn mark_item_complete(&self, item_id: &str) -> Result<(), AppError>;

    /// Re-reads one progress view (lesson items, section lessons, module sections, enrollments).
    async fn fetch_view(
        &self,
        view: ProgressView,
        scope_id: &str,
    ) -> Result<serde_json::Value, AppError>;
}

/// `LearningApi` over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpLearningApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpLearningApi {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, AppError> {
        // `Url::join` drops the last segment unless the base ends with a slash.
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        Ok(Self {
            client: Client::new(),
            base_url,
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(&config.learning_api_url, config.learning_api_token.clone())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn view_path(view: ProgressView, scope_id: &str) -> String {
        match view {
            ProgressView::Lesson => format!("lessons/{}/items", scope_id),
            ProgressView::Section => format!("sections/{}/lessons", scope_id),
            ProgressView::Module => format!("modules/{}/sections", scope_id),
            ProgressView::Enrollment => "enrollments".to_string(),
        }
    }
}

#[async_trait]
impl LearningApi for HttpLearningApi {
    async fn fetch_item_content(&self, item_id: &str) -> Result<ItemContent, AppError> {
        let url = self.base_url.join(&format!("items/{}/content", item_id))?;

        let response = self.authorized(self.client.get(url)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("Item {} not found", item_id)));
        }

        let content = response.error_for_status()?.json::<ItemContent>().await?;
        Ok(content)
    }

    async fn mark_item_complete(&self, item_id: &str) -> Result<(), AppError> {
        let url = self.base_url.join(&format!("items/{}/complete", item_id))?;

        self.authorized(self.client.patch(url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn fetch_view(
        &self,
        view: ProgressView,
        scope_id: &str,
    ) -> Result<serde_json::Value, AppError> {
        let url = self.base_url.join(&Self::view_path(view, scope_id))?;

        let value = self
            .authorized(self.client.get(url))
            .send()
            .await?
            .error_for_status()?
            .json::<serde_json::Value>()
            .await?;
        Ok(value)
    }
}
