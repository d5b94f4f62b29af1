// tests/matching_tests.rs

use rand::{SeedableRng, rngs::StdRng};

use quiz_engine::{
    models::answer_key::MatchPair,
    quiz::{
        Cue, RevertTicket, Signal, WidgetEffect,
        matching::{MatchingEvent, MatchingQuestion, WrongFlash},
    },
};

fn pairs() -> Vec<MatchPair> {
    vec![MatchPair::new("X", "1"), MatchPair::new("Y", "2")]
}

fn question(seed: u64) -> MatchingQuestion {
    MatchingQuestion::new(pairs(), &mut StdRng::seed_from_u64(seed))
}

/// Display position of a right-column value.
fn right_pos(question: &MatchingQuestion, value: &str) -> usize {
    question
        .right_order()
        .iter()
        .position(|r| r == value)
        .expect("value is in the right column")
}

fn revert_ticket(effects: &[WidgetEffect]) -> RevertTicket {
    effects
        .iter()
        .find_map(|e| match e {
            WidgetEffect::ScheduleRevert(ticket) => Some(*ticket),
            _ => None,
        })
        .expect("a revert should be scheduled")
}

#[test]
fn right_column_is_a_permutation() {
    let pairs: Vec<MatchPair> = (0..8)
        .map(|i| MatchPair::new(format!("L{}", i), format!("R{}", i)))
        .collect();

    for seed in 0..20 {
        let question = MatchingQuestion::new(pairs.clone(), &mut StdRng::seed_from_u64(seed));
        let mut shuffled = question.right_order().to_vec();
        shuffled.sort();
        let mut original: Vec<String> = pairs.iter().map(|p| p.right.clone()).collect();
        original.sort();
        assert_eq!(shuffled, original);
    }
}

#[test]
fn each_mount_rolls_a_new_shuffle() {
    let pairs: Vec<MatchPair> = (0..8)
        .map(|i| MatchPair::new(format!("L{}", i), format!("R{}", i)))
        .collect();
    let mut rng = StdRng::seed_from_u64(7);

    let orders: Vec<Vec<String>> = (0..5)
        .map(|_| MatchingQuestion::new(pairs.clone(), &mut rng).right_order().to_vec())
        .collect();

    // 8! orderings: five identical rolls from one rng stream would mean no re-roll.
    assert!(orders.windows(2).any(|w| w[0] != w[1]));
}

#[test]
fn left_selection_toggles() {
    let mut question = question(1);

    question.apply(MatchingEvent::SelectLeft(0));
    assert_eq!(question.selected_left(), Some(0));

    question.apply(MatchingEvent::SelectLeft(1));
    assert_eq!(question.selected_left(), Some(1));

    question.apply(MatchingEvent::SelectLeft(1));
    assert_eq!(question.selected_left(), None);
}

#[test]
fn right_click_without_left_selection_is_ignored() {
    let mut question = question(1);
    let one = right_pos(&question, "1");
    assert!(question.apply(MatchingEvent::SelectRight(one)).is_empty());
    assert!(question.matches().is_empty());
}

#[test]
fn wrong_pair_flashes_locks_and_reverts() {
    let mut question = question(3);
    let one = right_pos(&question, "1");
    let two = right_pos(&question, "2");

    question.apply(MatchingEvent::SelectLeft(0));
    let effects = question.apply(MatchingEvent::SelectRight(two));
    assert!(effects.contains(&WidgetEffect::Emit(Signal::Wrong)));
    assert!(effects.contains(&WidgetEffect::Play(Cue::Failure)));
    assert_eq!(question.wrong_flash(), Some(WrongFlash { left: 0, right: two }));
    assert!(question.is_wrong_locked());
    assert!(question.matches().is_empty());

    // Locked window: nothing registers.
    question.apply(MatchingEvent::SelectLeft(1));
    assert!(question.apply(MatchingEvent::SelectRight(one)).is_empty());
    assert_eq!(question.selected_left(), Some(0));
    assert!(question.matches().is_empty());

    let effects = question.apply(MatchingEvent::RevertElapsed(revert_ticket(&effects)));
    assert_eq!(effects, vec![WidgetEffect::ClearWrongSignal]);
    assert_eq!(question.wrong_flash(), None);
    assert_eq!(question.selected_left(), None);
    assert!(!question.is_wrong_locked());
}

#[test]
fn matching_all_pairs_completes() {
    let mut question = question(3);
    let one = right_pos(&question, "1");
    let two = right_pos(&question, "2");

    // X -> 2 is wrong.
    question.apply(MatchingEvent::SelectLeft(0));
    let effects = question.apply(MatchingEvent::SelectRight(two));
    question.apply(MatchingEvent::RevertElapsed(revert_ticket(&effects)));

    // X -> 1 matches.
    question.apply(MatchingEvent::SelectLeft(0));
    let effects = question.apply(MatchingEvent::SelectRight(one));
    assert_eq!(effects, vec![WidgetEffect::Play(Cue::Success)]);
    assert_eq!(question.matches().get(&0), Some(&one));
    assert!(!question.is_locked());

    // Matched items leave the pool.
    question.apply(MatchingEvent::SelectLeft(0));
    assert_eq!(question.selected_left(), None);

    // Y -> 2 matches and completes.
    question.apply(MatchingEvent::SelectLeft(1));
    let effects = question.apply(MatchingEvent::SelectRight(two));
    assert_eq!(
        effects,
        vec![
            WidgetEffect::Play(Cue::Success),
            WidgetEffect::Emit(Signal::Correct)
        ]
    );
    assert!(question.is_locked());
    assert!(question.is_resolved());

    let view = question.view();
    assert!(view.left.iter().all(|l| l.matched));
    assert!(view.right.iter().all(|r| r.used));
}

#[test]
fn used_right_item_cannot_be_reused() {
    let pairs = vec![
        MatchPair::new("X", "1"),
        MatchPair::new("Y", "1"),
        MatchPair::new("Z", "3"),
    ];
    let mut question = MatchingQuestion::new(pairs, &mut StdRng::seed_from_u64(5));
    let positions: Vec<usize> = question
        .right_order()
        .iter()
        .enumerate()
        .filter(|(_, r)| *r == "1")
        .map(|(i, _)| i)
        .collect();

    question.apply(MatchingEvent::SelectLeft(0));
    question.apply(MatchingEvent::SelectRight(positions[0]));

    // Y still selectable, but the used "1" is not.
    question.apply(MatchingEvent::SelectLeft(1));
    assert!(question.apply(MatchingEvent::SelectRight(positions[0])).is_empty());
    assert_eq!(question.selected_left(), Some(1));

    let effects = question.apply(MatchingEvent::SelectRight(positions[1]));
    assert_eq!(effects, vec![WidgetEffect::Play(Cue::Success)]);
    assert_eq!(question.matches().len(), 2);
}
