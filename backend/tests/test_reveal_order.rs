//! Tests for reveal-order generation
//!
//! The reveal order is the determinism anchor of a run: same table, same
//! tie-break, same sequence.

use efx_simulator_core_rs::{AgentRole, RevealOrder, Track, ValuationTable};
use std::collections::HashSet;

/// Ten items with plenty of rank disagreement between the two agents.
fn ten_item_table() -> ValuationTable {
    ValuationTable::from_triples(vec![
        ("g1", 9, 9),
        ("g2", 1, 18),
        ("g3", 18, 17),
        ("g4", 2, 14),
        ("g5", 17, 2),
        ("g6", 19, 19),
        ("g7", 3, 7),
        ("g8", 8, 5),
        ("g9", 12, 1),
        ("g10", 6, 11),
    ])
    .unwrap()
}

#[test]
fn test_two_item_example_order() {
    // Agent 1 ranks g1 (5 > 3) first; agent 2 ranks g2 (9 > 5) first.
    let table = ValuationTable::from_triples(vec![("g1", 5, 5), ("g2", 3, 9)]).unwrap();
    let order = RevealOrder::generate(&table);

    let entries = order.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].item_id, "g1");
    assert_eq!(entries[0].track, Track::Track1);
    assert_eq!(entries[1].item_id, "g2");
    assert_eq!(entries[1].track, Track::Track2);
}

#[test]
fn test_each_item_exactly_once() {
    let table = ten_item_table();
    let order = RevealOrder::generate(&table);

    assert_eq!(order.len(), table.len());
    let mut seen = HashSet::new();
    for entry in order.entries() {
        assert!(table.contains(&entry.item_id));
        assert!(
            seen.insert(entry.item_id.clone()),
            "item {} emitted twice",
            entry.item_id
        );
    }
}

#[test]
fn test_track1_entries_descend_by_agent1_value() {
    let table = ten_item_table();
    let order = RevealOrder::generate(&table);

    let track1_values: Vec<i64> = order
        .entries()
        .iter()
        .filter(|e| e.track == Track::Track1)
        .map(|e| table.value(AgentRole::Agent1, &e.item_id).unwrap())
        .collect();

    for pair in track1_values.windows(2) {
        assert!(
            pair[0] >= pair[1],
            "Track1 entries out of order: {} before {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_track2_entries_descend_by_agent2_value() {
    let table = ten_item_table();
    let order = RevealOrder::generate(&table);

    let track2_values: Vec<i64> = order
        .entries()
        .iter()
        .filter(|e| e.track == Track::Track2)
        .map(|e| table.value(AgentRole::Agent2, &e.item_id).unwrap())
        .collect();

    for pair in track2_values.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
}

#[test]
fn test_first_entry_is_agent1_favorite() {
    let table = ten_item_table();
    let order = RevealOrder::generate(&table);

    // g6 (19) is agent 1's top item and opens the sequence via Track 1.
    assert_eq!(order.entries()[0].item_id, "g6");
    assert_eq!(order.entries()[0].track, Track::Track1);
}

#[test]
fn test_dual_top_item_credited_to_track1() {
    // g6 is both agents' favorite: emitted once, via Track 1.
    let table = ten_item_table();
    let order = RevealOrder::generate(&table);

    let row = order
        .entries()
        .iter()
        .find(|e| e.item_id == "g6")
        .unwrap();
    assert_eq!(row.track, Track::Track1);
}

#[test]
fn test_generation_is_deterministic() {
    let table = ten_item_table();
    let first = RevealOrder::generate(&table);
    let second = RevealOrder::generate(&table);
    assert_eq!(first, second);
}

#[test]
fn test_track_home_agents() {
    assert_eq!(Track::Track1.home_agent(), AgentRole::Agent1);
    assert_eq!(Track::Track2.home_agent(), AgentRole::Agent2);
}

#[test]
fn test_position_lookup() {
    let table = ValuationTable::from_triples(vec![("g1", 5, 5), ("g2", 3, 9)]).unwrap();
    let order = RevealOrder::generate(&table);
    assert_eq!(order.position("g2"), Some(1));
    assert_eq!(order.position("g3"), None);
}
