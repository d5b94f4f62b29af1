// src/quiz/session.rs

use serde::{Deserialize, Serialize};

use crate::quiz::Signal;

/// A banner the user can dismiss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Banner {
    Right,
    Wrong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Signal(Signal),
    /// The active widget reverted its wrong-answer state.
    WrongCleared,
    Dismiss(Banner),
    /// Explicit "Continue" click.
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEffect {
    /// Build a fresh widget for the question at this index.
    MountQuestion(usize),
    /// Persist the item completion and refresh the dependent views.
    CompleteItem,
    Celebrate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    InProgress,
    AwaitingAdvance,
    Completed,
}

/// Orchestrator state: which question is active and which banners show.
#[derive(Debug, Clone)]
pub struct QuizSession {
    total: usize,
    current_index: usize,
    right_signal: bool,
    wrong_signal: bool,
    awaiting_advance: bool,
}

impl QuizSession {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            current_index: 0,
            right_signal: false,
            wrong_signal: false,
            awaiting_advance: false,
        }
    }

    /// Effects to run when the session is first shown.
    /// An item without questions is completed straight away, without a celebration.
    pub fn start(&self) -> Vec<SessionEffect> {
        if self.is_completed() {
            vec![SessionEffect::CompleteItem]
        } else {
            vec![SessionEffect::MountQuestion(self.current_index)]
        }
    }

    pub fn apply(&mut self, event: SessionEvent) -> Vec<SessionEffect> {
        if self.is_completed() {
            return Vec::new();
        }

        match event {
            SessionEvent::Signal(Signal::Correct) => {
                self.awaiting_advance = true;
                self.right_signal = true;
                Vec::new()
            }
            SessionEvent::Signal(Signal::Wrong) => {
                if !self.awaiting_advance {
                    self.wrong_signal = true;
                }
                Vec::new()
            }
            SessionEvent::WrongCleared | SessionEvent::Dismiss(Banner::Wrong) => {
                self.wrong_signal = false;
                Vec::new()
            }
            SessionEvent::Dismiss(Banner::Right) => {
                self.right_signal = false;
                Vec::new()
            }
            SessionEvent::Continue => self.advance(),
        }
    }

    fn advance(&mut self) -> Vec<SessionEffect> {
        if !self.awaiting_advance {
            return Vec::new();
        }

        self.current_index += 1;
        self.awaiting_advance = false;
        self.right_signal = false;
        self.wrong_signal = false;

        if self.is_completed() {
            vec![SessionEffect::CompleteItem, SessionEffect::Celebrate]
        } else {
            vec![SessionEffect::MountQuestion(self.current_index)]
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_completed() {
            Phase::Completed
        } else if self.awaiting_advance {
            Phase::AwaitingAdvance
        } else {
            Phase::InProgress
        }
    }

    pub fn is_completed(&self) -> bool {
        self.current_index == self.total
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn right_signal(&self) -> bool {
        self.right_signal
    }

    pub fn wrong_signal(&self) -> bool {
        self.wrong_signal
    }
}
