use std::collections::HashSet;

use stepwise_core::domain::ChainValue;
use stepwise_core::score::HardSoftScore;
use stepwise_scoring::ScoreDirector;
use stepwise_test::routing::{
    previous_descriptor, routing_director, RouteScoreFn, RoutingSolution, PREVIOUS_VARIABLE,
};
use stepwise_scoring::SimpleScoreDirector;

use super::*;

type Director = SimpleScoreDirector<RoutingSolution, RouteScoreFn>;

fn director(vehicles: usize, visits: usize, chains: &[&[usize]]) -> Director {
    routing_director(RoutingSolution::line(vehicles, visits, 10).with_chains(chains)).unwrap()
}

fn chains(director: &Director) -> Vec<Vec<usize>> {
    director
        .working_solution()
        .chains()
        .expect("chains must stay well formed")
}

/// Does `mv` and returns its undo move, with listeners triggered.
fn apply(director: &mut Director, mv: &ChainedMove<RoutingSolution>) -> ChainedMove<RoutingSolution> {
    let undo = mv.create_undo_move(director);
    mv.do_move(director);
    director.trigger_variable_listeners();
    undo
}

fn assert_supply_matches(director: &Director) {
    let supply = director.chain_supply(PREVIOUS_VARIABLE).unwrap();
    for (anchor, chain) in chains(director).iter().enumerate() {
        let mut previous = ChainValue::Anchor(anchor);
        for &entity in chain {
            assert_eq!(supply.trailing_entity(previous), Some(entity));
            assert_eq!(supply.anchor_of(entity), Some(anchor));
            previous = ChainValue::Entity(entity);
        }
        assert_eq!(supply.trailing_entity(previous), None);
    }
}

fn change(entity: usize, to: Option<ChainValue>) -> ChainedMove<RoutingSolution> {
    ChainedChangeMove::new(previous_descriptor(), entity, to).into()
}

fn sub_chain(entities: &[usize], to: ChainValue) -> ChainedMove<RoutingSolution> {
    SubChainChangeMove::new(previous_descriptor(), entities.to_vec(), to).into()
}

fn reversing(entities: &[usize], to: ChainValue) -> ChainedMove<RoutingSolution> {
    SubChainReversingChangeMove::new(previous_descriptor(), entities.to_vec(), to).into()
}

fn tail_swap(left: usize, right: ChainValue) -> ChainedMove<RoutingSolution> {
    TailChainSwapMove::new(previous_descriptor(), left, right).into()
}

fn two_opt(first: usize, last: usize) -> ChainedMove<RoutingSolution> {
    TwoOptMove::new(previous_descriptor(), first, last).into()
}

const A0: ChainValue = ChainValue::Anchor(0);
const A1: ChainValue = ChainValue::Anchor(1);

fn e(index: usize) -> ChainValue {
    ChainValue::Entity(index)
}

#[test]
fn test_change_to_other_chain_and_undo() {
    let mut director = director(2, 5, &[&[0, 1, 2], &[3, 4]]);
    let before = director.calculate_score();

    let mv = change(1, Some(A1));
    assert!(mv.is_doable(&director));
    let undo = apply(&mut director, &mv);
    assert_eq!(chains(&director), vec![vec![0, 2], vec![1, 3, 4]]);
    assert_supply_matches(&director);

    apply(&mut director, &undo);
    assert_eq!(chains(&director), vec![vec![0, 1, 2], vec![3, 4]]);
    assert_eq!(director.calculate_score(), before);
}

#[test]
fn test_change_behind_own_trailing_entity() {
    let mut director = director(1, 3, &[&[0, 1, 2]]);

    let undo = apply(&mut director, &change(0, Some(e(1))));
    assert_eq!(chains(&director), vec![vec![1, 0, 2]]);

    apply(&mut director, &undo);
    assert_eq!(chains(&director), vec![vec![0, 1, 2]]);
}

#[test]
fn test_change_inserts_unassigned_entity() {
    let mut director = director(1, 3, &[&[0, 2]]);
    assert_eq!(director.working_solution().visits[1].previous, None);

    let undo = apply(&mut director, &change(1, Some(e(0))));
    assert_eq!(chains(&director), vec![vec![0, 1, 2]]);
    assert_supply_matches(&director);

    apply(&mut director, &undo);
    assert_eq!(chains(&director), vec![vec![0, 2]]);
    assert_eq!(director.working_solution().visits[1].previous, None);
}

#[test]
fn test_change_not_doable() {
    let director = director(1, 3, &[&[0, 1], &[]]);
    assert!(!change(1, Some(e(0))).is_doable(&director), "same value");
    assert!(!change(1, Some(e(1))).is_doable(&director), "self reference");
    assert!(!change(0, Some(e(2))).is_doable(&director), "unassigned target");
    assert!(!change(0, Some(ChainValue::Anchor(7))).is_doable(&director), "no such anchor");
}

#[test]
fn test_sub_chain_change_and_undo() {
    let mut director = director(2, 6, &[&[0, 1, 2, 3], &[4, 5]]);
    let before = director.calculate_score();

    let mv = sub_chain(&[1, 2], e(4));
    assert!(mv.is_doable(&director));
    let undo = apply(&mut director, &mv);
    assert_eq!(chains(&director), vec![vec![0, 3], vec![4, 1, 2, 5]]);
    assert_supply_matches(&director);

    apply(&mut director, &undo);
    assert_eq!(chains(&director), vec![vec![0, 1, 2, 3], vec![4, 5]]);
    assert_eq!(director.calculate_score(), before);
}

#[test]
fn test_sub_chain_behind_its_trailing_entity() {
    let mut director = director(1, 4, &[&[0, 1, 2, 3]]);

    let undo = apply(&mut director, &sub_chain(&[0, 1], e(2)));
    assert_eq!(chains(&director), vec![vec![2, 0, 1, 3]]);

    apply(&mut director, &undo);
    assert_eq!(chains(&director), vec![vec![0, 1, 2, 3]]);
}

#[test]
fn test_sub_chain_not_doable() {
    let director = director(2, 4, &[&[0, 1, 2], &[3]]);
    assert!(!sub_chain(&[], A1).is_doable(&director), "empty");
    assert!(!sub_chain(&[1, 2], e(0)).is_doable(&director), "already there");
    assert!(!sub_chain(&[0, 1], e(1)).is_doable(&director), "into itself");
    assert!(!sub_chain(&[0, 2], A1).is_doable(&director), "not contiguous");
    assert!(sub_chain(&[1, 2], e(3)).is_doable(&director));
}

#[test]
fn test_reversing_change_and_undo() {
    let mut director = director(2, 6, &[&[0, 1, 2, 3], &[4, 5]]);
    let before = director.calculate_score();

    let undo = apply(&mut director, &reversing(&[1, 2], e(4)));
    assert_eq!(chains(&director), vec![vec![0, 3], vec![4, 2, 1, 5]]);
    assert_supply_matches(&director);

    apply(&mut director, &undo);
    assert_eq!(chains(&director), vec![vec![0, 1, 2, 3], vec![4, 5]]);
    assert_eq!(director.calculate_score(), before);
}

#[test]
fn test_unmoved_reverse_at_chain_end() {
    // anchor <- 0 <- 1 reversed back onto the anchor: anchor <- 1 <- 0
    let mut director = director(1, 2, &[&[0, 1]]);

    let mv = reversing(&[0, 1], A0);
    assert!(mv.is_doable(&director));
    let undo = apply(&mut director, &mv);
    assert_eq!(chains(&director), vec![vec![1, 0]]);
    assert_supply_matches(&director);

    apply(&mut director, &undo);
    assert_eq!(chains(&director), vec![vec![0, 1]]);
    assert_supply_matches(&director);
}

#[test]
fn test_unmoved_reverse_keeps_trailing_entity() {
    // A <- B <- C <- D with [B, C] reversed onto A: A <- C <- B <- D
    let mut director = director(1, 4, &[&[0, 1, 2, 3]]);
    let before = director.calculate_score();

    let undo = apply(&mut director, &reversing(&[1, 2], e(0)));
    assert_eq!(chains(&director), vec![vec![0, 2, 1, 3]]);
    let visits = &director.working_solution().visits;
    assert_eq!(visits[2].previous, Some(e(0)));
    assert_eq!(visits[1].previous, Some(e(2)));
    assert_eq!(visits[3].previous, Some(e(1)));

    apply(&mut director, &undo);
    assert_eq!(chains(&director), vec![vec![0, 1, 2, 3]]);
    assert_eq!(director.calculate_score(), before);
}

#[test]
fn test_unmoved_reverse_of_single_entity_not_doable() {
    let director = director(1, 2, &[&[0, 1]]);
    assert!(!reversing(&[1], e(0)).is_doable(&director));
    assert!(reversing(&[1], A0).is_doable(&director));
}

#[test]
fn test_tail_chain_swap_and_undo() {
    let mut director = director(2, 6, &[&[0, 1, 2, 3], &[4, 5]]);
    let before = director.calculate_score();

    let mv = tail_swap(2, e(4));
    assert!(mv.is_doable(&director));
    let undo = apply(&mut director, &mv);
    assert_eq!(chains(&director), vec![vec![0, 1, 5], vec![4, 2, 3]]);
    assert_supply_matches(&director);

    apply(&mut director, &undo);
    assert_eq!(chains(&director), vec![vec![0, 1, 2, 3], vec![4, 5]]);
    assert_eq!(director.calculate_score(), before);
}

#[test]
fn test_tail_chain_swap_onto_chain_end() {
    let mut director = director(2, 4, &[&[0, 1, 2], &[3]]);

    let undo = apply(&mut director, &tail_swap(1, e(3)));
    assert_eq!(chains(&director), vec![vec![0], vec![3, 1, 2]]);

    apply(&mut director, &undo);
    assert_eq!(chains(&director), vec![vec![0, 1, 2], vec![3]]);
}

#[test]
fn test_tail_chain_swap_within_one_chain_not_doable() {
    let director = director(2, 4, &[&[0, 1, 2], &[3]]);
    assert!(!tail_swap(1, e(2)).is_doable(&director));
    assert!(!tail_swap(1, e(0)).is_doable(&director), "same value");
    assert!(!tail_swap(1, e(1)).is_doable(&director), "self reference");
    assert!(tail_swap(1, A1).is_doable(&director));
}

#[test]
fn test_two_opt_and_undo() {
    let mut director = director(1, 5, &[&[0, 1, 2, 3, 4]]);
    let before = director.calculate_score();

    let mv = two_opt(1, 3);
    assert!(mv.is_doable(&director));
    let undo = apply(&mut director, &mv);
    assert_eq!(chains(&director), vec![vec![0, 3, 2, 1, 4]]);
    assert_supply_matches(&director);

    apply(&mut director, &undo);
    assert_eq!(chains(&director), vec![vec![0, 1, 2, 3, 4]]);
    assert_eq!(director.calculate_score(), before);
}

#[test]
fn test_two_opt_not_doable() {
    let director = director(2, 4, &[&[0, 1], &[2, 3]]);
    assert!(!two_opt(0, 0).is_doable(&director), "single entity");
    assert!(!two_opt(1, 0).is_doable(&director), "last before first");
    assert!(!two_opt(0, 3).is_doable(&director), "different chains");
}

#[test]
fn test_two_opt_improves_zigzag_route() {
    // Visits at x = 1..=4 driven as 1, 3, 2, 4.
    let mut director = director(1, 4, &[&[0, 2, 1, 3]]);
    let zigzag = director.calculate_score();

    apply(&mut director, &two_opt(2, 1));
    assert_eq!(chains(&director), vec![vec![0, 1, 2, 3]]);
    let straight = director.calculate_score();
    assert_eq!(straight, HardSoftScore::of(0, -4));
    assert!(straight > zigzag);
}

/// Every doable move of every kind keeps the chains acyclic and
/// unbranched, and its undo restores the exact starting links.
#[test]
fn test_all_moves_keep_chains_well_formed() {
    let start: &[&[usize]] = &[&[0, 1, 2], &[3, 4]];
    let mut director = director(2, 5, start);
    let original = director.working_solution().visits.clone();
    let original_score = director.calculate_score();

    let mut values = vec![A0, A1];
    values.extend((0..5).map(e));
    let slices: Vec<Vec<usize>> = start
        .iter()
        .flat_map(|chain| {
            (0..chain.len())
                .flat_map(move |i| (i + 1..=chain.len()).map(move |j| chain[i..j].to_vec()))
        })
        .collect();

    let mut moves = Vec::new();
    for entity in 0..5 {
        for &value in &values {
            moves.push(change(entity, Some(value)));
            moves.push(tail_swap(entity, value));
        }
        for last in 0..5 {
            moves.push(two_opt(entity, last));
        }
    }
    for slice in &slices {
        for &value in &values {
            moves.push(sub_chain(slice, value));
            moves.push(reversing(slice, value));
        }
    }

    let mut doable = 0;
    for mv in &moves {
        if !mv.is_doable(&director) {
            continue;
        }
        doable += 1;
        let undo = apply(&mut director, mv);
        let after = director.working_solution();
        assert!(after.is_well_formed(), "{:?} broke the chains", mv);
        assert_eq!(after.visits.iter().filter(|v| v.previous.is_some()).count(), 5);
        assert_supply_matches(&director);

        apply(&mut director, &undo);
        assert_eq!(director.working_solution().visits, original, "undo of {:?}", mv);
        assert_eq!(director.calculate_score(), original_score);
    }
    assert!(doable > 50, "only {} doable moves", doable);
}

#[test]
fn test_equal_moves_hash_equal() {
    let mut seen = HashSet::new();
    assert!(seen.insert(reversing(&[1, 2], A1)));
    assert!(!seen.insert(reversing(&[1, 2], A1)));
    assert!(seen.insert(sub_chain(&[1, 2], A1)), "different kind");
    assert!(seen.insert(reversing(&[2, 1], A1)), "different order");
    assert_eq!(two_opt(1, 3).planning_entities().as_slice(), &[1, 3]);
    assert_eq!(change(1, Some(A1)).planning_values().as_slice(), &[A1]);
    assert_eq!(tail_swap(1, A1).variable_name(), PREVIOUS_VARIABLE);
}
