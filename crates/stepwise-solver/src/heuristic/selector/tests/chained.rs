use std::collections::HashSet;

use stepwise_core::domain::ChainValue;
use stepwise_core::StepwiseError;
use stepwise_test::routing::{previous_descriptor, routing_director, RoutingSolution};

use super::*;
use crate::heuristic::r#move::ChainedMove;

fn solution() -> RoutingSolution {
    RoutingSolution::line(2, 5, 10).with_chains(&[&[0, 1, 2], &[3, 4]])
}

fn assert_all_doable<Sel>(mut selector: Sel) -> usize
where
    Sel: MoveSelector<RoutingSolution, ChainedMove<RoutingSolution>>,
{
    let director = routing_director(solution()).unwrap();
    let moves: Vec<_> = selector.iter_moves(&director).collect();
    for mv in &moves {
        assert!(mv.is_doable(&director), "{:?} is not doable", mv);
    }
    let distinct: HashSet<_> = moves.iter().cloned().collect();
    assert_eq!(distinct.len(), moves.len(), "duplicate moves");
    assert_eq!(selector.size(&director), moves.len());
    moves.len()
}

#[test]
fn test_chained_change_selector() {
    // 5 entities, 7 values, minus itself and its current predecessor
    assert_eq!(assert_all_doable(ChainedChangeMoveSelector::new(previous_descriptor())), 25);
}

#[test]
fn test_sub_chain_selector_without_reversing() {
    let selector = SubChainChangeMoveSelector::new(previous_descriptor()).with_reversing(false);
    let count = assert_all_doable(selector);
    assert!(count > 0);
}

#[test]
fn test_sub_chain_selector_with_reversing_adds_moves() {
    let plain = assert_all_doable(
        SubChainChangeMoveSelector::new(previous_descriptor()).with_reversing(false),
    );
    let with_reversing = assert_all_doable(SubChainChangeMoveSelector::new(previous_descriptor()));
    assert!(with_reversing > plain);
}

#[test]
fn test_sub_chain_selector_respects_size_bounds() {
    let director = routing_director(solution()).unwrap();
    let mut selector = SubChainChangeMoveSelector::new(previous_descriptor())
        .with_minimum_sub_chain_size(2)
        .unwrap()
        .with_maximum_sub_chain_size(2)
        .unwrap();
    for mv in selector.iter_moves(&director) {
        match mv {
            ChainedMove::SubChainChange(mv) => assert_eq!(mv.entities().len(), 2),
            ChainedMove::SubChainReversingChange(mv) => assert_eq!(mv.entities().len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }
}

#[test]
fn test_sub_chain_selector_rejects_invalid_size_bounds() {
    let selector = || SubChainChangeMoveSelector::new(previous_descriptor());

    assert!(matches!(
        selector().with_maximum_sub_chain_size(0),
        Err(StepwiseError::Config(_))
    ));
    assert!(matches!(
        selector().with_minimum_sub_chain_size(0),
        Err(StepwiseError::Config(_))
    ));
    assert!(matches!(
        selector()
            .with_minimum_sub_chain_size(3)
            .and_then(|s| s.with_maximum_sub_chain_size(2)),
        Err(StepwiseError::Config(_))
    ));
    assert!(matches!(
        selector()
            .with_maximum_sub_chain_size(2)
            .and_then(|s| s.with_minimum_sub_chain_size(3)),
        Err(StepwiseError::Config(_))
    ));
    assert!(selector()
        .with_minimum_sub_chain_size(2)
        .and_then(|s| s.with_maximum_sub_chain_size(2))
        .is_ok());
}

#[test]
fn test_tail_chain_swap_selector_crosses_chains() {
    // Entities of chain 0 pair with the 3 values of chain 1 and vice versa.
    assert_eq!(assert_all_doable(TailChainSwapMoveSelector::new(previous_descriptor())), 3 * 3 + 2 * 4);
}

#[test]
fn test_two_opt_selector_stays_in_chain() {
    // 3 pairs in the first chain, 1 in the second
    assert_eq!(assert_all_doable(TwoOptMoveSelector::new(previous_descriptor())), 4);
}

#[test]
fn test_chained_selector_random_order() {
    let director = routing_director(solution()).unwrap();
    let mut selector = TwoOptMoveSelector::new(previous_descriptor())
        .with_selection_order(SelectionOrder::Random);
    selector.phase_started(3);
    assert!(selector.is_never_ending());
    assert_eq!(selector.iter_moves(&director).take(20).count(), 20);
}

#[test]
fn test_empty_chains_yield_no_moves() {
    let director = routing_director(RoutingSolution::line(1, 2, 10)).unwrap();
    let mut selector = TwoOptMoveSelector::new(previous_descriptor());
    assert_eq!(selector.iter_moves(&director).count(), 0);
    let mut selector = ChainedChangeMoveSelector::new(previous_descriptor());
    // Unassigned entities may only go behind the anchor.
    let moves: Vec<_> = selector.iter_moves(&director).collect();
    assert_eq!(moves.len(), 2);
    for mv in moves {
        assert_eq!(mv.planning_values().as_slice(), &[ChainValue::Anchor(0)]);
    }
}
