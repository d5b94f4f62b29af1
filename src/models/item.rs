// src/models/item.rs

use serde::{Deserialize, Serialize};

use crate::models::answer_key::AnswerKey;

/// Content summary of a quiz item, as returned by `GET items/{id}/content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemContent {
    pub id: String,

    #[serde(default)]
    pub title: String,

    pub exam: Exam,

    /// Number of questions the API claims the exam has.
    /// The engine trusts `exam.quizzes` and only logs a mismatch.
    pub question_count: usize,

    /// Owning lesson/section/module of the item.
    #[serde(default)]
    pub scope: ItemScope,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Exam {
    #[serde(default)]
    pub quizzes: Vec<AnswerKey>,
}

/// Ids of the containers whose cached progress depends on this item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemScope {
    #[serde(default)]
    pub lesson_id: Option<String>,
    #[serde(default)]
    pub section_id: Option<String>,
    #[serde(default)]
    pub module_id: Option<String>,
}
