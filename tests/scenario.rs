use std::io::Write;

use preflop_trainer::range::{Action, ActionOrder};
use preflop_trainer::scenario::{
    ChartBook, DecisionResponse, Facing, Position, RangeSource, Scenario, SourceError, TableType,
    resolve,
};

fn bb_vs_raise() -> Scenario {
    Scenario {
        position: Position::Bb,
        stack_depth_bb: 100,
        table: TableType::SixMax,
        facing: Facing::Raise,
    }
}

#[test]
fn scenario_serializes_in_snake_case() {
    insta::assert_json_snapshot!(Scenario::default(), @r#"
    {
      "position": "btn",
      "stack_depth_bb": 100,
      "table": "six_max",
      "facing": "unopened"
    }
    "#);
    assert_eq!(bb_vs_raise().key(), "six_max/bb/100bb/raise");
}

#[test]
fn key_parts_match_their_json_names() {
    for position in [
        Position::Utg,
        Position::Mp,
        Position::Co,
        Position::Btn,
        Position::Sb,
        Position::Bb,
    ] {
        assert_eq!(serde_json::to_value(position).expect("json"), position.as_str());
    }
    for table in [TableType::HeadsUp, TableType::SixMax, TableType::FullRing] {
        assert_eq!(serde_json::to_value(table).expect("json"), table.as_str());
    }
    for facing in [Facing::Unopened, Facing::Limp, Facing::Raise, Facing::ThreeBet] {
        assert_eq!(serde_json::to_value(facing).expect("json"), facing.as_str());
    }
    let scenario = Scenario {
        table: TableType::HeadsUp,
        facing: Facing::ThreeBet,
        ..Scenario::default()
    };
    assert_eq!(scenario.to_string(), "heads_up/btn/100bb/three_bet");
}

#[test]
fn builtin_charts_only_contain_valid_tokens() {
    let book = ChartBook::builtin().expect("builtin charts");
    assert!(book.scenarios().count() >= 5);
    for scenario in book.scenarios() {
        let table = resolve(&book, scenario, &ActionOrder::default()).expect("valid chart");
        assert_eq!(table.iter().count(), 169);
        assert!(table.count(Action::Fold) < 169, "{scenario} folds everything");
    }
}

#[test]
fn three_bets_override_calls_in_defence_chart() {
    let book = ChartBook::builtin().expect("builtin charts");
    let table = resolve(&book, &bb_vs_raise(), &ActionOrder::default()).expect("charted");
    assert_eq!(table.lookup("AA"), Ok(Action::ThreeBet));
    assert_eq!(table.lookup("A5s"), Ok(Action::ThreeBet));
    assert_eq!(table.lookup("99"), Ok(Action::Call));
    assert_eq!(table.lookup("72o"), Ok(Action::Fold));
}

#[test]
fn unknown_scenarios_are_reported() {
    let book = ChartBook::builtin().expect("builtin charts");
    let scenario = Scenario {
        position: Position::Mp,
        stack_depth_bb: 40,
        table: TableType::FullRing,
        facing: Facing::Limp,
    };
    match book.lookup(&scenario) {
        Err(SourceError::UnknownScenario(key)) => assert_eq!(key, "full_ring/mp/40bb/limp"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn full_range_responses_are_accepted_as_is() {
    let response: DecisionResponse =
        serde_json::from_str(r#"{"full_range": {"AA": "all-in", "KK": "raise"}}"#)
            .expect("full range");
    let table = response
        .into_table(&ActionOrder::default())
        .expect("no tokens to parse");
    assert_eq!(table.lookup("AA"), Ok(Action::AllIn));
    assert_eq!(table.lookup("KK"), Ok(Action::Raise));
    assert_eq!(table.count(Action::Fold), 167);
}

#[test]
fn malformed_chart_tokens_surface_through_resolve() {
    let json = r#"{
        "charts": [{
            "scenario": {"position": "co", "stack_depth_bb": 100, "table": "six_max", "facing": "unopened"},
            "response": {"range_summary": {"raise": ["22+", "AKx"]}}
        }]
    }"#;
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(json.as_bytes()).expect("write chart");

    let book = ChartBook::from_path(file.path()).expect("chart book");
    let scenario = *book.scenarios().next().expect("one scenario");
    match resolve(&book, &scenario, &ActionOrder::default()) {
        Err(SourceError::InvalidRange(err)) => {
            assert_eq!(err.token, "AKx");
            assert_eq!(err.action, Some(Action::Raise));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn missing_chart_file_is_an_io_error() {
    let err = ChartBook::from_path("/definitely/not/here.json").expect_err("missing file");
    assert!(matches!(err, SourceError::Io { .. }));
}
