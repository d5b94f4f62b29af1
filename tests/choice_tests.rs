// tests/choice_tests.rs

use quiz_engine::{
    models::answer_key::Choice,
    quiz::{
        Feedback, Signal, WidgetEffect,
        choice::{ChoiceEvent, ChoiceQuestion},
    },
};

fn revert_ticket(effects: &[WidgetEffect]) -> quiz_engine::quiz::RevertTicket {
    effects
        .iter()
        .find_map(|e| match e {
            WidgetEffect::ScheduleRevert(ticket) => Some(*ticket),
            _ => None,
        })
        .expect("a revert should be scheduled")
}

fn count_signal(effects: &[WidgetEffect], signal: Signal) -> usize {
    effects
        .iter()
        .filter(|e| **e == WidgetEffect::Emit(signal))
        .count()
}

fn single() -> ChoiceQuestion {
    ChoiceQuestion::new(vec![Choice::new("A", false), Choice::new("B", true)])
}

fn multi() -> ChoiceQuestion {
    ChoiceQuestion::new(vec![
        Choice::new("A", true),
        Choice::new("B", false),
        Choice::new("C", true),
        Choice::new("D", false),
    ])
}

#[test]
fn single_correct_pick_locks_and_resolves_once() {
    let mut question = single();
    assert!(!question.is_multi_correct());

    let effects = question.apply(ChoiceEvent::Click(1));
    assert_eq!(effects, vec![WidgetEffect::Emit(Signal::Correct)]);
    assert!(question.is_locked());
    assert!(question.is_resolved());
    assert_eq!(question.feedback(1), Feedback::Correct);

    // Terminal: further clicks do nothing.
    assert!(question.apply(ChoiceEvent::Click(0)).is_empty());
    assert!(question.apply(ChoiceEvent::Click(1)).is_empty());
}

#[test]
fn single_wrong_pick_reverts_on_its_ticket() {
    let mut question = single();

    let effects = question.apply(ChoiceEvent::Click(0));
    assert_eq!(count_signal(&effects, Signal::Wrong), 1);
    assert_eq!(question.feedback(0), Feedback::Wrong);
    assert!(question.is_locked());

    let ticket = revert_ticket(&effects);
    let effects = question.apply(ChoiceEvent::RevertElapsed(ticket));
    assert_eq!(effects, vec![WidgetEffect::ClearWrongSignal]);
    assert!(!question.is_locked());
    assert!(question.selected().is_empty());
    assert_eq!(question.feedback(0), Feedback::None);

    // Widget is interactive again.
    let effects = question.apply(ChoiceEvent::Click(1));
    assert_eq!(count_signal(&effects, Signal::Correct), 1);
}

#[test]
fn clicks_during_wrong_lock_are_ignored() {
    let mut question = single();
    let effects = question.apply(ChoiceEvent::Click(0));
    let ticket = revert_ticket(&effects);

    assert!(question.apply(ChoiceEvent::Click(1)).is_empty());
    assert!(question.apply(ChoiceEvent::Click(0)).is_empty());
    assert_eq!(question.selected().iter().copied().collect::<Vec<_>>(), vec![0]);
    assert_eq!(question.feedback(1), Feedback::None);

    question.apply(ChoiceEvent::RevertElapsed(ticket));
    assert!(!question.is_locked());
}

#[test]
fn stale_ticket_does_not_revert() {
    let mut question = single();
    let first = revert_ticket(&question.apply(ChoiceEvent::Click(0)));
    question.apply(ChoiceEvent::RevertElapsed(first));

    let second = revert_ticket(&question.apply(ChoiceEvent::Click(0)));
    assert_ne!(first, second);

    // The old ticket must not unlock the new wrong state.
    assert!(question.apply(ChoiceEvent::RevertElapsed(first)).is_empty());
    assert!(question.is_locked());
    assert_eq!(question.feedback(0), Feedback::Wrong);

    question.apply(ChoiceEvent::RevertElapsed(second));
    assert!(!question.is_locked());
}

#[test]
fn out_of_range_click_is_ignored() {
    let mut question = single();
    assert!(question.apply(ChoiceEvent::Click(7)).is_empty());
    assert!(!question.is_locked());
}

#[test]
fn multi_correct_resolves_only_on_exact_set() {
    let mut question = multi();
    assert!(question.is_multi_correct());

    // One correct option is a subset: no lock.
    assert!(question.apply(ChoiceEvent::Click(0)).is_empty());
    assert!(!question.is_locked());
    assert_eq!(question.feedback(0), Feedback::Correct);

    let effects = question.apply(ChoiceEvent::Click(2));
    assert_eq!(effects, vec![WidgetEffect::Emit(Signal::Correct)]);
    assert!(question.is_locked());
    assert!(question.is_resolved());
}

#[test]
fn multi_correct_deselect_has_no_side_effects() {
    let mut question = multi();
    question.apply(ChoiceEvent::Click(0));

    let effects = question.apply(ChoiceEvent::Click(0));
    assert!(effects.is_empty());
    assert!(question.selected().is_empty());
    assert_eq!(question.feedback(0), Feedback::None);
    assert!(!question.is_locked());
}

#[test]
fn multi_correct_wrong_pick_reverts_only_that_option() {
    let mut question = multi();
    question.apply(ChoiceEvent::Click(0));

    let effects = question.apply(ChoiceEvent::Click(1));
    assert_eq!(count_signal(&effects, Signal::Wrong), 1);
    assert!(question.is_locked());

    // Locked: the remaining correct option cannot be picked yet.
    assert!(question.apply(ChoiceEvent::Click(2)).is_empty());

    question.apply(ChoiceEvent::RevertElapsed(revert_ticket(&effects)));
    assert!(!question.is_locked());
    assert_eq!(question.selected().iter().copied().collect::<Vec<_>>(), vec![0]);
    assert_eq!(question.feedback(0), Feedback::Correct);
    assert_eq!(question.feedback(1), Feedback::None);

    let effects = question.apply(ChoiceEvent::Click(2));
    assert_eq!(count_signal(&effects, Signal::Correct), 1);
}

#[test]
fn set_without_correct_option_never_resolves() {
    let mut question = ChoiceQuestion::new(vec![Choice::new("A", false), Choice::new("B", false)]);

    for index in 0..2 {
        let effects = question.apply(ChoiceEvent::Click(index));
        assert_eq!(count_signal(&effects, Signal::Correct), 0);
        question.apply(ChoiceEvent::RevertElapsed(revert_ticket(&effects)));
    }
    assert!(!question.is_resolved());
}

#[test]
fn explanation_is_revealed_with_feedback() {
    let mut choices = vec![Choice::new("A", false), Choice::new("B", true)];
    choices[0].explanation = Some("A is a vowel".to_string());
    let mut question = ChoiceQuestion::new(choices);

    assert_eq!(question.view().options[0].explanation, None);
    question.apply(ChoiceEvent::Click(0));

    let view = question.view();
    assert_eq!(view.options[0].explanation.as_deref(), Some("A is a vowel"));
    assert!(view.options[0].selected);
    assert!(view.locked);
}
