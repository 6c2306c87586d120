use stepwise_test::routing::{previous_descriptor, routing_director, RoutingSolution};

use super::*;
use crate::heuristic::r#move::{ChainedMove, TwoOptMove};

#[test]
fn test_union_chains_children_in_order() {
    let director =
        routing_director(RoutingSolution::line(2, 4, 10).with_chains(&[&[0, 1], &[2, 3]])).unwrap();
    let mut union = UnionMoveSelector::new(
        TwoOptMoveSelector::new(previous_descriptor()),
        TailChainSwapMoveSelector::new(previous_descriptor()),
    );
    let moves: Vec<_> = union.iter_moves(&director).collect();
    assert_eq!(moves.len(), union.size(&director));
    assert_eq!(moves[0], ChainedMove::from(TwoOptMove::new(previous_descriptor(), 0, 1)));
    assert!(!union.is_never_ending());
}

#[test]
fn test_random_union_draws_from_both_children() {
    let director =
        routing_director(RoutingSolution::line(2, 4, 10).with_chains(&[&[0, 1], &[2, 3]])).unwrap();
    let mut union = UnionMoveSelector::random(
        TwoOptMoveSelector::new(previous_descriptor()).with_selection_order(SelectionOrder::Random),
        TailChainSwapMoveSelector::new(previous_descriptor())
            .with_selection_order(SelectionOrder::Random),
    );
    union.phase_started(11);
    assert!(union.is_never_ending());
    let moves: Vec<_> = union.iter_moves(&director).take(200).collect();
    assert!(moves.iter().any(|mv| matches!(mv, ChainedMove::TwoOpt(_))));
    assert!(moves.iter().any(|mv| matches!(mv, ChainedMove::TailChainSwap(_))));
}
