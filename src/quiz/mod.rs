// src/quiz/mod.rs

//! The quiz interaction engine.
//!
//! Question widgets (`choice`, `matching`) and the session orchestrator
//! (`session`) are plain reducers: `apply(event)` mutates the state and
//! returns the effects the caller must perform. The `runner` actor performs
//! those effects on a tokio task: it schedules revert timers, mounts the next
//! question and fires the completion write.

pub mod choice;
pub mod matching;
pub mod registry;
pub mod runner;
pub mod session;
pub mod timer;
pub mod widget;

use serde::{Deserialize, Serialize};

/// Fully-resolved outcome a widget reports to its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Correct,
    Wrong,
}

/// Sound cue played by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Success,
    Failure,
}

/// Per-option answer highlight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Wrong,
}

/// Identifies one scheduled revert. A widget only honours the ticket it issued last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RevertTicket(u64);

/// Hands out increasing tickets for one widget instance.
#[derive(Debug, Default)]
pub(crate) struct TicketCounter(u64);

impl TicketCounter {
    pub(crate) fn issue(&mut self) -> RevertTicket {
        self.0 += 1;
        RevertTicket(self.0)
    }
}

/// Work a widget asks its owner to do after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEffect {
    /// Report an outcome to the session.
    Emit(Signal),
    /// The wrong-answer state has been reverted; the session should drop its wrong banner.
    ClearWrongSignal,
    /// Deliver `RevertElapsed(ticket)` back to the widget after the revert delay.
    ScheduleRevert(RevertTicket),
    Play(Cue),
}
