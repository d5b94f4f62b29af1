// src/models/session.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::quiz::{Feedback, session::Phase};

/// Render state of one choice option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOptionView {
    pub label: String,
    pub selected: bool,
    pub feedback: Feedback,
    /// Only present once the option carries feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceView {
    pub multi_correct: bool,
    pub locked: bool,
    pub options: Vec<ChoiceOptionView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeftItemView {
    pub text: String,
    pub matched: bool,
    pub selected: bool,
    pub wrong: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RightItemView {
    pub text: String,
    pub used: bool,
    pub wrong: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingView {
    pub locked: bool,
    pub wrong_locked: bool,
    pub left: Vec<LeftItemView>,
    /// Right column in its shuffled display order.
    pub right: Vec<RightItemView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "answerType", rename_all = "camelCase")]
pub enum WidgetView {
    Choice(ChoiceView),
    Matching(MatchingView),
}

/// The mounted question as the front end renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub index: usize,
    pub question_text: String,
    #[serde(flatten)]
    pub widget: WidgetView,
}

/// State of the item-completion write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum CompletionStatus {
    NotStarted,
    Pending,
    Succeeded,
    Failed { message: String },
}

/// Everything the front end needs to render a session after any command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub item_id: String,
    pub current_index: usize,
    pub total: usize,
    pub phase: Phase,
    pub right_signal: bool,
    pub wrong_signal: bool,
    pub completed: bool,
    pub completion: CompletionStatus,
    pub celebrations: u32,
    pub question: Option<QuestionView>,
}

/// Body of `POST /api/sessions/{id}/dismiss`.
#[derive(Debug, Deserialize)]
pub struct DismissRequest {
    pub banner: crate::quiz::session::Banner,
}
