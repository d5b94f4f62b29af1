// src/models/answer_key.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// One selectable option of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub label: String,
    pub is_correct: bool,
    /// Shown next to the option once it has been answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// One left/right pair of a matching question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    pub left: String,
    pub right: String,
}

/// The answer data of a question. The `answerType` tag decides which widget mounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "answerType", rename_all = "camelCase")]
pub enum AnswerSet {
    Choice { choices: Vec<Choice> },
    Matching { pairs: Vec<MatchPair> },
}

/// Immutable definition of one quiz question, as delivered by the learning API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AnswerKey {
    #[validate(length(min = 1, message = "Question text must not be empty."))]
    pub question_text: String,

    #[serde(flatten)]
    #[validate(custom(function = validate_answer_set))]
    pub answers: AnswerSet,
}

impl AnswerKey {
    pub fn choice(question_text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            question_text: question_text.into(),
            answers: AnswerSet::Choice { choices },
        }
    }

    pub fn matching(question_text: impl Into<String>, pairs: Vec<MatchPair>) -> Self {
        Self {
            question_text: question_text.into(),
            answers: AnswerSet::Matching { pairs },
        }
    }
}

impl Choice {
    pub fn new(label: impl Into<String>, is_correct: bool) -> Self {
        Self {
            label: label.into(),
            is_correct,
            explanation: None,
        }
    }
}

impl MatchPair {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
        }
    }
}

/// Authoring-time rules. The quiz engine itself never rejects a key that breaks them.
fn validate_answer_set(answers: &AnswerSet) -> Result<(), ValidationError> {
    match answers {
        AnswerSet::Choice { choices } => {
            if choices.len() < 2 {
                return Err(ValidationError::new("choice_set_needs_two_options"));
            }
            if !choices.iter().any(|c| c.is_correct) {
                return Err(ValidationError::new("choice_set_has_no_correct_option"));
            }
            if choices.iter().any(|c| c.label.trim().is_empty()) {
                return Err(ValidationError::new("choice_label_empty"));
            }
        }
        AnswerSet::Matching { pairs } => {
            if pairs.len() < 2 {
                return Err(ValidationError::new("matching_set_needs_two_pairs"));
            }
            if pairs
                .iter()
                .any(|p| p.left.trim().is_empty() || p.right.trim().is_empty())
            {
                return Err(ValidationError::new("matching_pair_side_empty"));
            }
        }
    }
    Ok(())
}
