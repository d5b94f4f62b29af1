// src/quiz/choice.rs

use std::collections::{BTreeMap, BTreeSet};

use crate::{
    models::{
        answer_key::Choice,
        session::{ChoiceOptionView, ChoiceView},
    },
    quiz::{Feedback, RevertTicket, Signal, TicketCounter, WidgetEffect},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceEvent {
    Click(usize),
    RevertElapsed(RevertTicket),
}

/// What a pending revert will undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RevertScope {
    /// Single-correct mode: clear the whole selection.
    All,
    /// Multi-correct mode: drop only the wrong option that was picked.
    Option(usize),
}

#[derive(Debug, Clone, Copy)]
struct PendingRevert {
    ticket: RevertTicket,
    scope: RevertScope,
}

/// Interaction state of a multiple-choice question.
///
/// With exactly one correct option a click locks the question: a correct pick
/// resolves it for good, a wrong pick reverts after the delay. With several
/// correct options clicks toggle selection until the selected set equals the
/// correct set.
#[derive(Debug)]
pub struct ChoiceQuestion {
    answers: Vec<Choice>,
    multi_correct: bool,
    correct_count: usize,
    selected: BTreeSet<usize>,
    feedback: BTreeMap<usize, Feedback>,
    locked: bool,
    resolved: bool,
    pending: Option<PendingRevert>,
    tickets: TicketCounter,
}

impl ChoiceQuestion {
    pub fn new(answers: Vec<Choice>) -> Self {
        let correct_count = answers.iter().filter(|c| c.is_correct).count();
        Self {
            multi_correct: correct_count > 1,
            correct_count,
            answers,
            selected: BTreeSet::new(),
            feedback: BTreeMap::new(),
            locked: false,
            resolved: false,
            pending: None,
            tickets: TicketCounter::default(),
        }
    }

    pub fn apply(&mut self, event: ChoiceEvent) -> Vec<WidgetEffect> {
        match event {
            ChoiceEvent::Click(index) => {
                if self.locked || index >= self.answers.len() {
                    return Vec::new();
                }
                if self.multi_correct {
                    self.toggle(index)
                } else {
                    self.pick(index)
                }
            }
            ChoiceEvent::RevertElapsed(ticket) => self.revert(ticket),
        }
    }

    fn pick(&mut self, index: usize) -> Vec<WidgetEffect> {
        self.selected = BTreeSet::from([index]);
        self.feedback.clear();
        self.locked = true;

        if self.answers[index].is_correct {
            self.feedback.insert(index, Feedback::Correct);
            self.resolved = true;
            vec![WidgetEffect::Emit(Signal::Correct)]
        } else {
            self.feedback.insert(index, Feedback::Wrong);
            self.schedule_revert(RevertScope::All)
        }
    }

    fn toggle(&mut self, index: usize) -> Vec<WidgetEffect> {
        if self.selected.remove(&index) {
            self.feedback.remove(&index);
            return self.check_resolved();
        }

        self.selected.insert(index);
        if self.answers[index].is_correct {
            self.feedback.insert(index, Feedback::Correct);
            self.check_resolved()
        } else {
            self.feedback.insert(index, Feedback::Wrong);
            self.locked = true;
            self.schedule_revert(RevertScope::Option(index))
        }
    }

    /// Resolves once every correct option is selected and nothing else is.
    fn check_resolved(&mut self) -> Vec<WidgetEffect> {
        let all_correct_selected = self
            .answers
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_correct)
            .all(|(i, _)| self.selected.contains(&i));

        if all_correct_selected && self.selected.len() == self.correct_count {
            self.locked = true;
            self.resolved = true;
            vec![WidgetEffect::Emit(Signal::Correct)]
        } else {
            Vec::new()
        }
    }

    fn schedule_revert(&mut self, scope: RevertScope) -> Vec<WidgetEffect> {
        let ticket = self.tickets.issue();
        self.pending = Some(PendingRevert { ticket, scope });
        vec![
            WidgetEffect::Emit(Signal::Wrong),
            WidgetEffect::ScheduleRevert(ticket),
        ]
    }

    fn revert(&mut self, ticket: RevertTicket) -> Vec<WidgetEffect> {
        let Some(pending) = self.pending.take_if(|p| p.ticket == ticket) else {
            return Vec::new();
        };

        match pending.scope {
            RevertScope::All => {
                self.selected.clear();
                self.feedback.clear();
            }
            RevertScope::Option(index) => {
                self.selected.remove(&index);
                self.feedback.remove(&index);
            }
        }
        self.locked = false;
        vec![WidgetEffect::ClearWrongSignal]
    }

    pub fn is_multi_correct(&self) -> bool {
        self.multi_correct
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn option_count(&self) -> usize {
        self.answers.len()
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn feedback(&self, index: usize) -> Feedback {
        self.feedback.get(&index).copied().unwrap_or_default()
    }

    pub fn view(&self) -> ChoiceView {
        let options = self
            .answers
            .iter()
            .enumerate()
            .map(|(i, choice)| {
                let feedback = self.feedback(i);
                ChoiceOptionView {
                    label: choice.label.clone(),
                    selected: self.selected.contains(&i),
                    feedback,
                    explanation: (feedback != Feedback::None)
                        .then(|| choice.explanation.clone())
                        .flatten(),
                }
            })
            .collect();

        ChoiceView {
            multi_correct: self.multi_correct,
            locked: self.locked,
            options,
        }
    }
}
