use super::*;
use crate::error::StepwiseError;

#[derive(Clone, Debug, Default)]
struct Visits {
    previous: Vec<usize>,
    arrival: Vec<usize>,
    departure: Vec<usize>,
}

fn update_arrival(s: &mut Visits, i: usize) {
    s.arrival[i] = s.previous[i] * 10;
}

fn update_departure(s: &mut Visits, i: usize) {
    s.departure[i] = s.arrival[i] + 5;
}

#[test]
fn test_orders_dependents_after_sources() {
    let graph = ListenerGraph::new(vec![
        ShadowVariableListener::new("departure", 0, ["arrival"], update_departure),
        ShadowVariableListener::new("arrival", 0, ["previous"], update_arrival),
    ])
    .unwrap();

    let names: Vec<_> = graph.listeners().iter().map(|l| l.shadow_name()).collect();
    assert_eq!(names, vec!["arrival", "departure"]);

    let mut visits = Visits {
        previous: vec![3],
        arrival: vec![0],
        departure: vec![0],
    };
    for listener in graph.listeners() {
        listener.apply(&mut visits, 0);
    }
    assert_eq!(visits.departure[0], 35);
}

#[test]
fn test_listens_to() {
    let listener = ShadowVariableListener::<Visits>::new("arrival", 0, ["previous"], update_arrival);
    assert!(listener.listens_to("previous"));
    assert!(!listener.listens_to("arrival"));
}

#[test]
fn test_cycle_is_config_error() {
    let result = ListenerGraph::new(vec![
        ShadowVariableListener::<Visits>::new("arrival", 0, ["departure"], update_arrival),
        ShadowVariableListener::new("departure", 0, ["arrival"], update_departure),
    ]);
    assert!(matches!(result, Err(StepwiseError::Config(_))));
}

#[test]
fn test_duplicate_shadow_is_config_error() {
    let result = ListenerGraph::new(vec![
        ShadowVariableListener::<Visits>::new("arrival", 0, ["previous"], update_arrival),
        ShadowVariableListener::new("arrival", 0, ["previous"], update_arrival),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_entity_count_is_optional() {
    let listener = ShadowVariableListener::<Visits>::new("arrival", 0, ["previous"], update_arrival);
    let visits = Visits {
        previous: vec![1, 2],
        arrival: vec![0, 0],
        departure: vec![0, 0],
    };
    assert_eq!(listener.entity_count(&visits), None);

    let listener = listener.with_entity_count(|s| s.previous.len());
    assert_eq!(listener.entity_count(&visits), Some(2));
}
