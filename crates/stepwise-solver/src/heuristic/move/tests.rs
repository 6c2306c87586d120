//! Tests for the move module.

use std::collections::HashSet;

use stepwise_core::domain::PlanningSolution;
use stepwise_core::score::SimpleScore;
use stepwise_scoring::{ScoreDirector, SimpleScoreDirector};
use stepwise_test::nqueens::{
    get_queen_row, nqueens_director, set_queen_row, ConflictFn, NQueensSolution,
};

use super::*;

type Director = SimpleScoreDirector<NQueensSolution, ConflictFn>;

fn row_move(queen: usize, row: Option<i64>) -> ChangeMove<NQueensSolution, i64> {
    ChangeMove::new(queen, row, get_queen_row, set_queen_row, "row", 0)
}

fn rows(director: &Director) -> Vec<Option<i64>> {
    director.working_solution().rows()
}

#[test]
fn test_change_move_is_doable() {
    let director = nqueens_director(&[0, 1, 2, 3]);

    // Different value - doable
    assert!(row_move(0, Some(3)).is_doable(&director));
    // Same value - not doable
    assert!(!row_move(0, Some(0)).is_doable(&director));
    // Unassigning is a change
    assert!(row_move(0, None).is_doable(&director));
}

#[test]
fn test_change_move_do_and_undo() {
    let mut director = nqueens_director(&[0, 0, 0, 0]);
    let before = director.calculate_score();
    let mv = row_move(1, Some(2));

    let undo = mv.create_undo_move(&director);
    assert_eq!(undo.to_value(), Some(&0));

    mv.do_move(&mut director);
    director.trigger_variable_listeners();
    assert_eq!(rows(&director), vec![Some(0), Some(2), Some(0), Some(0)]);
    assert_ne!(director.calculate_score(), before);

    undo.do_move(&mut director);
    director.trigger_variable_listeners();
    assert_eq!(rows(&director), vec![Some(0); 4]);
    assert_eq!(director.calculate_score(), before);
}

#[test]
fn test_change_move_to_none() {
    let mut director = nqueens_director(&[1, 3]);
    let mv = row_move(0, None);
    let undo = mv.create_undo_move(&director);

    mv.do_move(&mut director);
    assert_eq!(rows(&director), vec![None, Some(3)]);
    assert_eq!(director.working_solution().uninitialized_variable_count(), 1);

    undo.do_move(&mut director);
    assert_eq!(rows(&director), vec![Some(1), Some(3)]);
}

#[test]
fn test_change_move_marks_score_dirty() {
    let mut director = nqueens_director(&[0, 1, 2, 3]);
    assert_eq!(director.calculate_score(), SimpleScore::of(-6));

    row_move(1, Some(3)).do_move(&mut director);
    director.trigger_variable_listeners();
    // [0, 3, 2, 3]: queens 1 and 3 share a row, four pairs share a diagonal
    assert_eq!(director.calculate_score(), SimpleScore::of(-5));
}

#[test]
fn test_change_move_metadata() {
    let mv = row_move(3, Some(5));
    assert_eq!(mv.entity_index(), 3);
    assert_eq!(mv.variable_name(), "row");
    assert_eq!(mv.descriptor_index(), 0);
    assert_eq!(mv.planning_entities().as_slice(), &[3]);
    assert_eq!(mv.planning_values().as_slice(), &[5]);
    assert!(row_move(3, None).planning_values().is_empty());
}

#[test]
fn test_change_move_equality_and_hash() {
    let moves: HashSet<_> = [
        row_move(0, Some(1)),
        row_move(0, Some(1)),
        row_move(0, Some(2)),
        row_move(1, Some(1)),
    ]
    .into_iter()
    .collect();
    assert_eq!(moves.len(), 3);
    assert_eq!(row_move(2, None), row_move(2, None).clone());
}
