use preflop_trainer::drill::{Drill, DrillConfig, DrillStatus, DrillSummary};
use preflop_trainer::range::{Action, RangeSummary, expand};
use preflop_trainer::scenario::Scenario;

fn drill(hands: u32, seed: u64, summary: &RangeSummary) -> Drill {
    Drill::new(
        DrillConfig {
            hands,
            seed: Some(seed),
            scenario: Scenario::default(),
            ..DrillConfig::default()
        },
        expand(summary).expect("valid summary"),
    )
}

#[test]
fn answering_with_the_chart_is_always_correct() {
    let summary = RangeSummary::new()
        .with(Action::Raise, &["22+", "A2s+", "KTo+"])
        .with(Action::AllIn, &["AA"]);
    let mut drill = drill(25, 2025, &summary);

    while let Some(expected) = drill.expected() {
        let grade = drill.answer(expected).expect("hand in progress");
        assert!(grade.correct);
    }

    let state = drill.snapshot();
    assert_eq!(state.status, DrillStatus::Completed);
    assert_eq!(state.summary.hands_played, 25);
    assert_eq!(state.summary.correct, 25);
    assert!(state.summary.mistakes.is_empty());
    assert!((state.summary.accuracy() - 1.0).abs() < f32::EPSILON);
}

#[test]
fn wrong_answers_are_recorded_as_mistakes() {
    let summary = RangeSummary::new().with(Action::Raise, &["AA"]);
    let mut drill = drill(1, 11, &summary);
    let first = drill.snapshot();
    assert_eq!(first.status, DrillStatus::AwaitingInput);
    assert_eq!(first.hand_index, 1);
    assert_eq!(first.options, [Action::Fold, Action::Raise]);
    assert_eq!(first.hero_cards.len(), 2);

    let expected = drill.expected().expect("hand in progress");
    let wrong = if expected == Action::Fold {
        Action::Raise
    } else {
        Action::Fold
    };
    let grade = drill.answer(wrong).expect("hand in progress");
    assert!(!grade.correct);
    assert_eq!(grade.expected, expected);
    assert_eq!(Some(grade.hand), first.hand);

    let done = drill.snapshot();
    assert_eq!(done.status, DrillStatus::Completed);
    assert_eq!(done.summary.mistakes, [grade]);
    assert_eq!(done.last_grade, Some(grade));
    assert!(done.options.is_empty());
    assert!(drill.answer(Action::Fold).is_none());
}

#[test]
fn actions_outside_the_options_are_not_graded() {
    let mut drill = drill(2, 11, &RangeSummary::new());
    let before = drill.snapshot();
    assert_eq!(before.options, [Action::Fold]);
    assert!(!drill.offers(Action::Raise));

    assert!(drill.answer(Action::Raise).is_none());
    assert!(drill.answer(Action::AllIn).is_none());

    let after = drill.snapshot();
    assert_eq!(after.hand_index, 1);
    assert_eq!(after.hand, before.hand);
    assert_eq!(after.summary, DrillSummary::default());
    assert_eq!(after.last_grade, None);

    let grade = drill.answer(Action::Fold).expect("fold is offered");
    assert!(grade.correct);
    assert_eq!(drill.snapshot().hand_index, 2);
}

#[test]
fn options_follow_the_processing_order() {
    let summary = RangeSummary::new()
        .with(Action::Call, &["22+"])
        .with(Action::Raise, &["AKs"])
        .with(Action::ThreeBet, &["AA"]);
    let drill = drill(3, 5, &summary);
    assert_eq!(
        drill.snapshot().options,
        [Action::Fold, Action::Raise, Action::Call, Action::ThreeBet]
    );
}

#[test]
fn seeded_drills_deal_the_same_hands() {
    let summary = RangeSummary::new().with(Action::Raise, &["TT+"]);
    let mut left = drill(5, 77, &summary);
    let mut right = drill(5, 77, &summary);
    for _ in 0..5 {
        assert_eq!(left.snapshot().hand, right.snapshot().hand);
        left.answer(Action::Fold);
        right.answer(Action::Fold);
    }
    assert_eq!(left.snapshot().summary, right.snapshot().summary);
}

#[test]
fn zero_hand_drill_starts_completed() {
    let drill = drill(0, 1, &RangeSummary::new());
    let state = drill.snapshot();
    assert_eq!(state.status, DrillStatus::Completed);
    assert!(state.hand.is_none());
    assert_eq!(state.summary.accuracy(), 0.0);
}
