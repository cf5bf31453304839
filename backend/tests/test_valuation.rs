//! Tests for the valuation table model
//!
//! Invalid input (empty set, negative values, duplicate ids) must be
//! rejected before any reveal order can be generated.

use efx_simulator_core_rs::{AgentRole, ItemValuation, ValuationError, ValuationTable};

#[test]
fn test_table_basic_accessors() {
    let table = ValuationTable::from_triples(vec![("g1", 5, 5), ("g2", 3, 9)]).unwrap();

    assert_eq!(table.len(), 2);
    assert!(!table.is_empty());
    assert!(table.contains("g1"));
    assert!(!table.contains("g3"));
    assert_eq!(table.value(AgentRole::Agent1, "g2"), Some(3));
    assert_eq!(table.value(AgentRole::Agent2, "g2"), Some(9));
    assert_eq!(table.value(AgentRole::Agent1, "missing"), None);
    assert_eq!(table.position("g2"), Some(1));
}

#[test]
fn test_empty_item_set_rejected() {
    let result = ValuationTable::new(vec![]);
    assert_eq!(result.unwrap_err(), ValuationError::EmptyItemSet);
}

#[test]
fn test_negative_valuation_rejected() {
    let result = ValuationTable::from_triples(vec![("g1", 5, -1)]);
    assert_eq!(
        result.unwrap_err(),
        ValuationError::NegativeValuation {
            item: "g1".to_string(),
            agent: AgentRole::Agent2,
            value: -1,
        }
    );
}

#[test]
fn test_duplicate_item_rejected() {
    let result = ValuationTable::from_triples(vec![("g1", 1, 2), ("g1", 3, 4)]);
    assert_eq!(
        result.unwrap_err(),
        ValuationError::DuplicateItem {
            item: "g1".to_string()
        }
    );
}

#[test]
fn test_items_keep_insertion_order() {
    let table =
        ValuationTable::from_triples(vec![("z", 1, 1), ("a", 2, 2), ("m", 3, 3)]).unwrap();
    let ids: Vec<&str> = table.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a", "m"]);
}

#[test]
fn test_value_for_maps_roles() {
    let item = ItemValuation::new("g1", 7, 11);
    assert_eq!(item.value_for(AgentRole::Agent1), 7);
    assert_eq!(item.value_for(AgentRole::Agent2), 11);
}

#[test]
fn test_serde_round_trip_revalidates() {
    let table = ValuationTable::from_triples(vec![("g1", 5, 5), ("g2", 3, 9)]).unwrap();

    let json = serde_json::to_string(&table).unwrap();
    let restored: ValuationTable = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, table);
    // The id index is rebuilt on deserialization, not serialized.
    assert_eq!(restored.position("g2"), Some(1));
}

#[test]
fn test_serde_rejects_invalid_payload() {
    // A duplicate id must fail deserialization the same way construction does.
    let json = r#"[
        {"id": "g1", "value_1": 1, "value_2": 2},
        {"id": "g1", "value_1": 3, "value_2": 4}
    ]"#;
    let result: Result<ValuationTable, _> = serde_json::from_str(json);
    assert!(result.is_err());
}
