use ultradrop::data::{DataRegistry, DungeonRecord, RecordId, UltraRecord};
use ultradrop::estimator::{
    effective_luck, format_runs, slugify, DropRateEstimator, EstimateError, EstimateOutcome,
    RecordKind, RunsEstimate, Selection, ZERO_CHANCE_DISPLAY,
};

fn approx_eq(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() <= tol, "expected {b}, got {a}");
}

fn registry() -> DataRegistry {
    DataRegistry::from_tables(
        vec![
            DungeonRecord::named("Cave", 1000.0),
            DungeonRecord::named("Dark Cave", 1000.0),
            DungeonRecord {
                name: None,
                id: Some(RecordId::from("ice_cave")),
                tickets: Some(800.0),
            },
            DungeonRecord {
                name: Some("Sunken Temple".to_string()),
                id: Some(RecordId::from(3)),
                tickets: Some(2500.0),
            },
            DungeonRecord::named("Broken Pit", 0.0),
            DungeonRecord::named("Negative Pit", -5.0),
            DungeonRecord {
                name: Some("Unweighted Hall".to_string()),
                id: None,
                tickets: None,
            },
        ],
        vec![
            UltraRecord::named("Slime", 10.0, Some("all")),
            UltraRecord::named("Rare Slime", 5.0, None),
            UltraRecord::named("Yeti", 6.0, Some("dark_cave, ice_cave")),
            UltraRecord::named("Eel", 4.0, Some("3")),
            UltraRecord::named("Dud", 0.0, Some("")),
            UltraRecord::named("Ghost", 2.0, Some("haunted_manor")),
            UltraRecord::named("Big Slime", 1000.0, Some("ALL")),
            UltraRecord {
                name: Some("Shade".to_string()),
                id: None,
                tickets: None,
                drops_in: None,
            },
        ],
    )
}

fn expect_runs(outcome: EstimateOutcome) -> RunsEstimate {
    match outcome {
        EstimateOutcome::Runs(estimate) => estimate,
        EstimateOutcome::Impossible(impossible) => {
            panic!("expected a runs estimate, got: {}", impossible.message)
        }
    }
}

#[test]
fn slugify_examples_hold() {
    assert_eq!(slugify("Dark Cave!!"), "dark_cave");
    assert_eq!(slugify(""), "");
    assert_eq!(slugify(&slugify("  Sunken   Temple ")), "sunken_temple");
}

#[test]
fn effective_luck_examples_hold() {
    assert_eq!(effective_luck(10, 1.0), 20);
    assert_eq!(effective_luck(25, 1.0), 25);
    for bonus in [0.0, 0.5, 1.0, 7.0] {
        assert_eq!(effective_luck(0, bonus), 0);
    }
}

#[test]
fn low_weight_ultra_renders_grouped_integer() {
    let registry = registry();
    let estimator = DropRateEstimator::new(&registry);
    let estimate = expect_runs(
        estimator
            .estimate(&Selection::new("Cave", "Rare Slime", 0, 0.0))
            .expect("estimate should succeed"),
    );

    approx_eq(estimate.drop_chance_percent, 0.003, 1e-12);
    approx_eq(estimate.avg_runs.unwrap(), 33_333.333, 1e-2);
    assert_eq!(estimate.display, "33,333 runs (average)");
}

#[test]
fn end_to_end_with_luck_and_no_bonus() {
    let registry = registry();
    let estimator = DropRateEstimator::new(&registry);

    let estimate = expect_runs(
        estimator
            .estimate(&Selection::new("Cave", "Big Slime", 10, 0.0))
            .expect("estimate should succeed"),
    );
    assert_eq!(estimate.effective_luck, 10);
    approx_eq(estimate.drop_chance_percent, 1.1, 1e-9);
    assert_eq!(estimate.display, "90.91 runs (average)");

    // Same luck with a ten-ticket ultra: the weight ratio shrinks the chance a hundredfold.
    let estimate = expect_runs(
        estimator
            .estimate(&Selection::new("Cave", "Slime", 10, 0.0))
            .expect("estimate should succeed"),
    );
    approx_eq(estimate.drop_chance_percent, 0.011, 1e-12);
    assert_eq!(estimate.display, "9,091 runs (average)");
}

#[test]
fn dice_bonus_raises_effective_luck_up_to_the_cap() {
    let registry = registry();
    let estimator = DropRateEstimator::new(&registry);

    let doubled = expect_runs(
        estimator
            .estimate(&Selection::new("Cave", "Big Slime", 10, 1.0))
            .unwrap(),
    );
    assert_eq!(doubled.effective_luck, 20);
    approx_eq(doubled.drop_chance_percent, 1.6, 1e-9);
    assert_eq!(doubled.display, "62.50 runs (average)");

    let capped = expect_runs(
        estimator
            .estimate(&Selection::new("Cave", "Big Slime", 99, 1.0))
            .unwrap(),
    );
    assert_eq!(capped.luck, 25);
    assert_eq!(capped.effective_luck, 25);
}

#[test]
fn zero_ticket_ultra_is_impossible_without_division_artifacts() {
    let registry = registry();
    let estimate = expect_runs(
        DropRateEstimator::new(&registry)
            .estimate(&Selection::new("Cave", "Dud", 25, 1.0))
            .unwrap(),
    );

    assert_eq!(estimate.drop_chance_percent, 0.0);
    assert_eq!(estimate.avg_runs, None);
    assert_eq!(estimate.display, ZERO_CHANCE_DISPLAY);
    assert_eq!(estimate.display, "Impossible (drop chance = 0)");
}

#[test]
fn sub_thousand_runs_use_two_decimals() {
    assert_eq!(format_runs(42.5), "42.50 runs (average)");
    assert_eq!(format_runs(0.0), "0.00 runs (average)");
}

#[test]
fn non_positive_or_missing_dungeon_tickets_are_data_errors() {
    let registry = registry();
    let estimator = DropRateEstimator::new(&registry);

    for dungeon in ["Broken Pit", "Negative Pit", "Unweighted Hall"] {
        let err = estimator
            .estimate(&Selection::new(dungeon, "Slime", 10, 0.5))
            .unwrap_err();
        assert_eq!(
            err,
            EstimateError::InvalidTickets {
                kind: RecordKind::Dungeon,
                key: dungeon.to_string(),
            }
        );
        assert!(err.to_string().contains("tickets data missing or invalid"));
    }
}

#[test]
fn missing_ultra_tickets_are_data_errors() {
    let registry = registry();
    let err = DropRateEstimator::new(&registry)
        .estimate(&Selection::new("Cave", "Shade", 10, 0.0))
        .unwrap_err();
    assert_eq!(
        err,
        EstimateError::InvalidTickets {
            kind: RecordKind::Ultra,
            key: "Shade".to_string(),
        }
    );
}

#[test]
fn ticket_validation_runs_before_eligibility() {
    let registry = registry();
    // Yeti cannot drop in Broken Pit, but the bad ticket data is reported first.
    let err = DropRateEstimator::new(&registry)
        .estimate(&Selection::new("Broken Pit", "Yeti", 0, 0.0))
        .unwrap_err();
    assert!(matches!(err, EstimateError::InvalidTickets { kind: RecordKind::Dungeon, .. }));
}

#[test]
fn ineligible_pair_names_the_valid_locations() {
    let registry = registry();
    let outcome = DropRateEstimator::new(&registry)
        .estimate(&Selection::new("Cave", "Yeti", 10, 0.0))
        .unwrap();

    let EstimateOutcome::Impossible(impossible) = outcome else {
        panic!("Yeti should not drop in Cave");
    };
    assert_eq!(impossible.valid_locations.as_deref(), Some("Dark Cave, ice_cave"));
    assert!(impossible.message.contains("Yeti cannot drop in Cave"));
    assert!(impossible.message.contains("Dark Cave, ice_cave"));
}

#[test]
fn ineligible_pair_with_unknown_restriction_suggests_another_dungeon() {
    let registry = registry();
    let outcome = DropRateEstimator::new(&registry)
        .estimate(&Selection::new("Cave", "Ghost", 10, 0.0))
        .unwrap();

    let EstimateOutcome::Impossible(impossible) = outcome else {
        panic!("Ghost has no resolvable dungeon");
    };
    assert_eq!(impossible.valid_locations, None);
    assert!(impossible.message.ends_with("Try another dungeon."));
}

#[test]
fn eligible_by_numeric_id_and_by_slug() {
    let registry = registry();
    let estimator = DropRateEstimator::new(&registry);

    let by_id = estimator.estimate(&Selection::new("3", "Eel", 0, 0.0)).unwrap();
    assert!(matches!(by_id, EstimateOutcome::Runs(_)));

    let by_slug = estimator
        .estimate(&Selection::new("dark cave", "yeti", 0, 0.0))
        .unwrap();
    let estimate = expect_runs(by_slug);
    assert_eq!(estimate.dungeon, "Dark Cave");
    assert_eq!(estimate.ultra, "Yeti");
}

#[test]
fn incomplete_and_unknown_selections_are_reported() {
    let registry = registry();
    let estimator = DropRateEstimator::new(&registry);

    let incomplete = Selection {
        dungeon: Some("Cave".to_string()),
        ultra: Some("   ".to_string()),
        ..Selection::default()
    };
    assert_eq!(
        estimator.estimate(&incomplete).unwrap_err(),
        EstimateError::SelectionIncomplete
    );
    assert_eq!(
        estimator.estimate(&Selection::default()).unwrap_err(),
        EstimateError::SelectionIncomplete
    );

    let err = estimator
        .estimate(&Selection::new("Atlantis", "Slime", 0, 0.0))
        .unwrap_err();
    assert_eq!(err.to_string(), "Dungeon 'Atlantis' not found.");

    let err = estimator
        .estimate(&Selection::new("Cave", "Kraken", 0, 0.0))
        .unwrap_err();
    assert_eq!(err.to_string(), "Ultra 'Kraken' not found.");
}

#[test]
fn locations_flow_lists_eligible_dungeons_in_table_order() {
    let registry = registry();
    let estimator = DropRateEstimator::new(&registry);

    let everywhere = estimator.locations("Slime").unwrap();
    assert!(everywhere.is_everywhere());
    assert_eq!(everywhere.dungeons.len(), registry.dungeons().len());
    assert_eq!(everywhere.description, "drops in all dungeons");

    let yeti = estimator.locations("Yeti").unwrap();
    assert_eq!(yeti.description, "drops in: Dark Cave, ice_cave");

    let ghost = estimator.locations("Ghost").unwrap();
    assert!(ghost.dungeons.is_empty());
    assert_eq!(ghost.description, "drops in: Unknown Dungeons");
}
