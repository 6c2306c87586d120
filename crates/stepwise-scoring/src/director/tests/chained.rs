//! Chain supplies maintained through the director protocol.

use stepwise_core::domain::{ChainValue, ChainedVariableDescriptor, PlanningSolution};
use stepwise_core::score::SimpleScore;

use crate::director::{
    begin_variable_change, ScoreDirector, SimpleScoreDirector, VariableListenerSupport,
};

#[derive(Clone, Debug)]
struct Route {
    previous: Vec<Option<ChainValue>>,
    vehicles: usize,
    score: Option<SimpleScore>,
}

impl PlanningSolution for Route {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }
}

fn previous() -> ChainedVariableDescriptor<Route> {
    ChainedVariableDescriptor::new(
        "previous",
        0,
        |s, i| s.previous[i],
        |s, i, v| s.previous[i] = v,
        |s| s.previous.len(),
        |s| s.vehicles,
    )
}

// anchor#0 <- 0 <- 1 <- 2    anchor#1 <- 3
fn route() -> Route {
    Route {
        previous: vec![
            Some(ChainValue::Anchor(0)),
            Some(ChainValue::Entity(0)),
            Some(ChainValue::Entity(1)),
            Some(ChainValue::Anchor(1)),
        ],
        vehicles: 2,
        score: None,
    }
}

fn chain_director(route: Route) -> SimpleScoreDirector<Route, fn(&Route) -> SimpleScore> {
    fn zero(_: &Route) -> SimpleScore {
        SimpleScore::of(0)
    }
    let support = VariableListenerSupport::new(vec![previous()], Vec::new()).unwrap();
    SimpleScoreDirector::with_listeners(route, zero as fn(&Route) -> SimpleScore, support).unwrap()
}

fn set_previous(
    director: &mut SimpleScoreDirector<Route, fn(&Route) -> SimpleScore>,
    entity: usize,
    value: ChainValue,
) {
    let mut change = begin_variable_change(director, 0, entity, "previous");
    change.working_solution_mut().previous[entity] = Some(value);
}

#[test]
fn test_supply_follows_relocation() {
    let mut director = chain_director(route());

    // Relocate entity 1 behind entity 3.
    set_previous(&mut director, 2, ChainValue::Entity(0));
    set_previous(&mut director, 1, ChainValue::Entity(3));
    director.trigger_variable_listeners();

    let supply = director.chain_supply("previous").unwrap();
    assert_eq!(supply.chain(0), vec![0, 2]);
    assert_eq!(supply.chain(1), vec![3, 1]);
    assert_eq!(supply.trailing_entity(ChainValue::Entity(3)), Some(1));
    assert_eq!(supply.anchor_of(1), Some(1));
}

#[test]
fn test_unknown_variable_has_no_supply() {
    let director = chain_director(route());
    assert!(director.chain_supply("next").is_none());
}

#[test]
fn test_malformed_chain_is_rejected_on_install() {
    let mut branched = route();
    branched.previous[3] = Some(ChainValue::Entity(0));
    let support = VariableListenerSupport::new(vec![previous()], Vec::new()).unwrap();
    let result = SimpleScoreDirector::with_listeners(branched, |_: &Route| SimpleScore::of(0), support);
    assert!(result.is_err());
}

#[test]
#[should_panic(expected = "branches")]
fn test_branching_change_panics_on_trigger() {
    let mut director = chain_director(route());
    set_previous(&mut director, 3, ChainValue::Entity(0));
    director.trigger_variable_listeners();
}
