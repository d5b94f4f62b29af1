// tests/common/mod.rs

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use quiz_engine::{
    client::LearningApi,
    error::AppError,
    models::{
        answer_key::{AnswerKey, Choice, MatchPair},
        item::{Exam, ItemContent, ItemScope},
    },
    progress::ProgressView,
};

/// In-memory learning API that records every call in order.
#[derive(Default)]
pub struct FakeLearningApi {
    items: Mutex<HashMap<String, ItemContent>>,
    calls: Mutex<Vec<String>>,
    fail_completion: AtomicBool,
}

impl FakeLearningApi {
    pub fn with_item(item: ItemContent) -> Self {
        let api = Self::default();
        api.add_item(item);
        api
    }

    pub fn add_item(&self, item: ItemContent) {
        self.items.lock().unwrap().insert(item.id.clone(), item);
    }

    pub fn fail_completion(&self, fail: bool) {
        self.fail_completion.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl LearningApi for FakeLearningApi {
    async fn fetch_item_content(&self, item_id: &str) -> Result<ItemContent, AppError> {
        self.record(format!("content:{}", item_id));
        self.items
            .lock()
            .unwrap()
            .get(item_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", item_id)))
    }

    async fn mark_item_complete(&self, item_id: &str) -> Result<(), AppError> {
        self.record(format!("complete:{}", item_id));
        if self.fail_completion.load(Ordering::SeqCst) {
            Err(AppError::UpstreamError("503 Service Unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    async fn fetch_view(
        &self,
        view: ProgressView,
        scope_id: &str,
    ) -> Result<serde_json::Value, AppError> {
        self.record(format!("view:{:?}:{}", view, scope_id).to_lowercase());
        Ok(serde_json::json!({ "scope": scope_id, "progress": 100 }))
    }
}

pub fn scope() -> ItemScope {
    ItemScope {
        lesson_id: Some("lesson-1".to_string()),
        section_id: Some("section-1".to_string()),
        module_id: Some("module-1".to_string()),
    }
}

/// Choice `[A:false, B:true]`.
pub fn single_choice_key() -> AnswerKey {
    AnswerKey::choice(
        "Which letter is right?",
        vec![Choice::new("A", false), Choice::new("B", true)],
    )
}

/// Matching `[(X,1), (Y,2)]`.
pub fn matching_key() -> AnswerKey {
    AnswerKey::matching(
        "Match the pairs",
        vec![MatchPair::new("X", "1"), MatchPair::new("Y", "2")],
    )
}

pub fn item(id: &str, quizzes: Vec<AnswerKey>) -> ItemContent {
    ItemContent {
        id: id.to_string(),
        title: "Quiz".to_string(),
        question_count: quizzes.len(),
        exam: Exam { quizzes },
        scope: scope(),
    }
}
