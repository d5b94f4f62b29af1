// tests/model_tests.rs

use quiz_engine::models::{
    answer_key::{AnswerKey, AnswerSet, Choice, MatchPair},
    item::ItemContent,
};
use validator::Validate;

#[test]
fn item_content_parses_both_answer_types() {
    let raw = serde_json::json!({
        "id": "item-9",
        "title": "Week 1 quiz",
        "questionCount": 2,
        "scope": { "lessonId": "l-1", "sectionId": "s-1", "moduleId": "m-1" },
        "exam": {
            "quizzes": [
                {
                    "questionText": "Pick the vowel",
                    "answerType": "choice",
                    "choices": [
                        { "label": "A", "isCorrect": true, "explanation": "A is a vowel" },
                        { "label": "B", "isCorrect": false }
                    ]
                },
                {
                    "questionText": "Match capitals",
                    "answerType": "matching",
                    "pairs": [
                        { "left": "France", "right": "Paris" },
                        { "left": "Italy", "right": "Rome" }
                    ]
                }
            ]
        }
    });

    let item: ItemContent = serde_json::from_value(raw).unwrap();

    assert_eq!(item.question_count, 2);
    assert_eq!(item.scope.lesson_id.as_deref(), Some("l-1"));
    match &item.exam.quizzes[0].answers {
        AnswerSet::Choice { choices } => {
            assert!(choices[0].is_correct);
            assert_eq!(choices[0].explanation.as_deref(), Some("A is a vowel"));
        }
        other => panic!("expected choices, got {:?}", other),
    }
    assert_eq!(
        item.exam.quizzes[1].answers,
        AnswerSet::Matching {
            pairs: vec![MatchPair::new("France", "Paris"), MatchPair::new("Italy", "Rome")]
        }
    );
}

#[test]
fn authoring_rules_flag_unsolvable_keys() {
    let valid = AnswerKey::choice("Q", vec![Choice::new("A", true), Choice::new("B", false)]);
    assert!(valid.validate().is_ok());

    let no_correct = AnswerKey::choice("Q", vec![Choice::new("A", false), Choice::new("B", false)]);
    assert!(no_correct.validate().is_err());

    let one_pair = AnswerKey::matching("Q", vec![MatchPair::new("X", "1")]);
    assert!(one_pair.validate().is_err());

    let empty_side = AnswerKey::matching("Q", vec![MatchPair::new("X", "1"), MatchPair::new("Y", " ")]);
    assert!(empty_side.validate().is_err());

    let no_text = AnswerKey::matching("", vec![MatchPair::new("X", "1"), MatchPair::new("Y", "2")]);
    assert!(no_text.validate().is_err());
}
