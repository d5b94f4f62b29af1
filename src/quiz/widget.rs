// src/quiz/widget.rs

use rand::Rng;

use crate::{
    error::AppError,
    models::{
        answer_key::{AnswerKey, AnswerSet},
        session::{QuestionView, WidgetView},
    },
    quiz::{
        RevertTicket, WidgetEffect,
        choice::{ChoiceEvent, ChoiceQuestion},
        matching::{MatchingEvent, MatchingQuestion},
    },
};

/// A user click routed to the mounted question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetInput {
    Choice(usize),
    Left(usize),
    Right(usize),
}

#[derive(Debug)]
enum Kind {
    Choice(ChoiceQuestion),
    Matching(MatchingQuestion),
}

/// The widget mounted for one question. Built fresh for every question.
#[derive(Debug)]
pub struct QuestionWidget {
    index: usize,
    question_text: String,
    kind: Kind,
}

impl QuestionWidget {
    pub fn mount<R: Rng + ?Sized>(index: usize, key: &AnswerKey, rng: &mut R) -> Self {
        let kind = match &key.answers {
            AnswerSet::Choice { choices } => Kind::Choice(ChoiceQuestion::new(choices.clone())),
            AnswerSet::Matching { pairs } => {
                Kind::Matching(MatchingQuestion::new(pairs.clone(), rng))
            }
        };
        Self {
            index,
            question_text: key.question_text.clone(),
            kind,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Applies a click. Clicks that do not fit this widget are rejected;
    /// clicks the widget itself ignores (locked, already matched) are not errors.
    pub fn handle(&mut self, input: WidgetInput) -> Result<Vec<WidgetEffect>, AppError> {
        match (&mut self.kind, input) {
            (Kind::Choice(question), WidgetInput::Choice(i)) => {
                check_range("option", i, question.option_count())?;
                Ok(question.apply(ChoiceEvent::Click(i)))
            }
            (Kind::Matching(question), WidgetInput::Left(i)) => {
                check_range("left item", i, question.pair_count())?;
                Ok(question.apply(MatchingEvent::SelectLeft(i)))
            }
            (Kind::Matching(question), WidgetInput::Right(i)) => {
                check_range("right item", i, question.pair_count())?;
                Ok(question.apply(MatchingEvent::SelectRight(i)))
            }
            (Kind::Choice(_), _) => Err(AppError::BadRequest(
                "question is a choice question; use /choices".to_string(),
            )),
            (Kind::Matching(_), _) => Err(AppError::BadRequest(
                "question is a matching question; use /left or /right".to_string(),
            )),
        }
    }

    pub fn revert_elapsed(&mut self, ticket: RevertTicket) -> Vec<WidgetEffect> {
        match &mut self.kind {
            Kind::Choice(question) => question.apply(ChoiceEvent::RevertElapsed(ticket)),
            Kind::Matching(question) => question.apply(MatchingEvent::RevertElapsed(ticket)),
        }
    }

    pub fn view(&self) -> QuestionView {
        let widget = match &self.kind {
            Kind::Choice(question) => WidgetView::Choice(question.view()),
            Kind::Matching(question) => WidgetView::Matching(question.view()),
        };
        QuestionView {
            index: self.index,
            question_text: self.question_text.clone(),
            widget,
        }
    }
}

fn check_range(what: &str, index: usize, len: usize) -> Result<(), AppError> {
    if index < len {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "{} index {} out of range (question has {})",
            what, index, len
        )))
    }
}
