use std::collections::HashSet;

use stepwise_test::nqueens::{
    get_queen_row, nqueens_director, queen_count, row_values, set_queen_row, NQueensSolution,
};

use super::*;

fn selector() -> ChangeMoveSelector<NQueensSolution, i64> {
    ChangeMoveSelector::new(get_queen_row, set_queen_row, queen_count, row_values, "row", 0)
}

#[test]
fn test_original_order_is_entity_major() {
    let director = nqueens_director(&[0, 1, 2]);
    let mut selector = selector();
    let moves: Vec<(usize, i64)> = selector
        .iter_moves(&director)
        .map(|mv| (mv.entity_index(), *mv.to_value().unwrap()))
        .collect();
    assert_eq!(moves.len(), 9);
    assert_eq!(&moves[..4], &[(0, 0), (0, 1), (0, 2), (1, 0)]);
    assert_eq!(selector.size(&director), 9);
    assert!(!selector.is_never_ending());
}

#[test]
fn test_shuffled_order_yields_every_move_once() {
    let director = nqueens_director(&[0, 1, 2, 3]);
    let mut selector = selector().with_selection_order(SelectionOrder::Shuffled);
    selector.phase_started(7);
    let moves: Vec<_> = selector.iter_moves(&director).collect();
    assert_eq!(moves.len(), 16);
    let distinct: HashSet<_> = moves.iter().cloned().collect();
    assert_eq!(distinct.len(), 16);
}

#[test]
fn test_random_order_is_never_ending_and_seeded() {
    let director = nqueens_director(&[0, 1, 2, 3]);
    let mut first = selector().with_selection_order(SelectionOrder::Random);
    let mut second = selector().with_selection_order(SelectionOrder::Random);
    assert!(first.is_never_ending());

    first.phase_started(42);
    second.phase_started(42);
    let a: Vec<_> = first.iter_moves(&director).take(50).collect();
    let b: Vec<_> = second.iter_moves(&director).take(50).collect();
    assert_eq!(a.len(), 50);
    assert_eq!(a, b);
}

#[test]
fn test_random_order_without_entities_is_empty() {
    let director = nqueens_director(&[]);
    let mut selector = selector().with_selection_order(SelectionOrder::Random);
    assert_eq!(selector.iter_moves(&director).count(), 0);
}

#[test]
fn test_selected_moves_skip_nothing_but_doability_filters() {
    let director = nqueens_director(&[0, 1]);
    let mut selector = selector();
    let doable = selector
        .iter_moves(&director)
        .filter(|mv| mv.is_doable(&director))
        .count();
    // 2 queens, 2 rows, one current row each
    assert_eq!(doable, 2);
}
