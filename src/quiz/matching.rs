// src/quiz/matching.rs

use std::collections::BTreeMap;

use rand::{Rng, seq::SliceRandom};

use crate::{
    models::{
        answer_key::MatchPair,
        session::{LeftItemView, MatchingView, RightItemView},
    },
    quiz::{Cue, RevertTicket, Signal, TicketCounter, WidgetEffect},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchingEvent {
    SelectLeft(usize),
    /// Position in the shuffled right column.
    SelectRight(usize),
    RevertElapsed(RevertTicket),
}

/// A rejected left/right attempt, highlighted until the revert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrongFlash {
    pub left: usize,
    pub right: usize,
}

/// Interaction state of a two-column matching question.
#[derive(Debug)]
pub struct MatchingQuestion {
    pairs: Vec<MatchPair>,
    right_order: Vec<String>,
    /// Left index -> position in `right_order`.
    matches: BTreeMap<usize, usize>,
    selected_left: Option<usize>,
    wrong_flash: Option<WrongFlash>,
    locked: bool,
    wrong_locked: bool,
    pending: Option<RevertTicket>,
    tickets: TicketCounter,
}

impl MatchingQuestion {
    /// Builds a fresh question, shuffling the right column with `rng`.
    pub fn new<R: Rng + ?Sized>(pairs: Vec<MatchPair>, rng: &mut R) -> Self {
        let mut right_order: Vec<String> = pairs.iter().map(|p| p.right.clone()).collect();
        right_order.shuffle(rng);

        Self {
            pairs,
            right_order,
            matches: BTreeMap::new(),
            selected_left: None,
            wrong_flash: None,
            locked: false,
            wrong_locked: false,
            pending: None,
            tickets: TicketCounter::default(),
        }
    }

    pub fn apply(&mut self, event: MatchingEvent) -> Vec<WidgetEffect> {
        match event {
            MatchingEvent::SelectLeft(left) => {
                self.select_left(left);
                Vec::new()
            }
            MatchingEvent::SelectRight(right) => self.select_right(right),
            MatchingEvent::RevertElapsed(ticket) => self.revert(ticket),
        }
    }

    fn accepts_clicks(&self) -> bool {
        !self.locked && !self.wrong_locked
    }

    fn select_left(&mut self, left: usize) {
        if !self.accepts_clicks() || left >= self.pairs.len() || self.matches.contains_key(&left) {
            return;
        }
        self.selected_left = if self.selected_left == Some(left) {
            None
        } else {
            Some(left)
        };
    }

    fn select_right(&mut self, right: usize) -> Vec<WidgetEffect> {
        if !self.accepts_clicks() || right >= self.right_order.len() || self.is_right_used(right) {
            return Vec::new();
        }
        let Some(left) = self.selected_left else {
            return Vec::new();
        };

        let left_word = &self.pairs[left].left;
        let right_word = &self.right_order[right];
        let valid = self
            .pairs
            .iter()
            .any(|p| &p.left == left_word && &p.right == right_word);

        if valid {
            self.matches.insert(left, right);
            self.selected_left = None;

            let mut effects = vec![WidgetEffect::Play(Cue::Success)];
            if self.matches.len() == self.pairs.len() {
                self.locked = true;
                effects.push(WidgetEffect::Emit(Signal::Correct));
            }
            effects
        } else {
            let ticket = self.tickets.issue();
            self.wrong_flash = Some(WrongFlash { left, right });
            self.wrong_locked = true;
            self.pending = Some(ticket);
            vec![
                WidgetEffect::Emit(Signal::Wrong),
                WidgetEffect::Play(Cue::Failure),
                WidgetEffect::ScheduleRevert(ticket),
            ]
        }
    }

    fn revert(&mut self, ticket: RevertTicket) -> Vec<WidgetEffect> {
        if self.pending.take_if(|pending| *pending == ticket).is_none() {
            return Vec::new();
        }
        self.wrong_flash = None;
        self.selected_left = None;
        self.wrong_locked = false;
        vec![WidgetEffect::ClearWrongSignal]
    }

    fn is_right_used(&self, right: usize) -> bool {
        self.matches.values().any(|&used| used == right)
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    pub fn right_order(&self) -> &[String] {
        &self.right_order
    }

    pub fn matches(&self) -> &BTreeMap<usize, usize> {
        &self.matches
    }

    pub fn selected_left(&self) -> Option<usize> {
        self.selected_left
    }

    pub fn wrong_flash(&self) -> Option<WrongFlash> {
        self.wrong_flash
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_wrong_locked(&self) -> bool {
        self.wrong_locked
    }

    pub fn is_resolved(&self) -> bool {
        self.locked
    }

    pub fn view(&self) -> MatchingView {
        let left = self
            .pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| LeftItemView {
                text: pair.left.clone(),
                matched: self.matches.contains_key(&i),
                selected: self.selected_left == Some(i),
                wrong: self.wrong_flash.is_some_and(|flash| flash.left == i),
            })
            .collect();

        let right = self
            .right_order
            .iter()
            .enumerate()
            .map(|(i, text)| RightItemView {
                text: text.clone(),
                used: self.is_right_used(i),
                wrong: self.wrong_flash.is_some_and(|flash| flash.right == i),
            })
            .collect();

        MatchingView {
            locked: self.locked,
            wrong_locked: self.wrong_locked,
            left,
            right,
        }
    }
}
