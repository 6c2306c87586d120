//! N-Queens problem test fixtures.
//!
//! Places N queens on an N×N board, one per column, so that no two queens
//! share a row or a diagonal. The row of each queen is the planning
//! variable.
//!
//! # Example
//!
//! ```
//! use stepwise_scoring::ScoreDirector;
//! use stepwise_test::nqueens::{nqueens_incremental_director, NQueensSolution};
//!
//! let mut director = nqueens_incremental_director(NQueensSolution::with_rows(&[1, 3, 0, 2]));
//! assert_eq!(director.calculate_score().score(), 0);
//! ```

use std::collections::HashMap;

use stepwise_core::domain::PlanningSolution;
use stepwise_core::score::SimpleScore;
use stepwise_scoring::{
    ConstraintMatchTotal, IncrementalScoreCalculator, IncrementalScoreDirector,
    SimpleScoreDirector,
};

/// Name of the queen row variable.
pub const ROW_VARIABLE: &str = "row";

/// A queen fixed to its column, with the row as planning variable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Queen {
    pub column: i64,
    pub row: Option<i64>,
}

/// N-Queens problem solution.
#[derive(Clone, Debug)]
pub struct NQueensSolution {
    pub n: usize,
    pub queens: Vec<Queen>,
    pub score: Option<SimpleScore>,
}

impl NQueensSolution {
    /// Creates an N-Queens solution with n unassigned queens.
    pub fn uninitialized(n: usize) -> Self {
        Self {
            n,
            queens: (0..n)
                .map(|column| Queen {
                    column: column as i64,
                    row: None,
                })
                .collect(),
            score: None,
        }
    }

    /// Creates an N-Queens solution with queens at the specified rows.
    pub fn with_rows(rows: &[i64]) -> Self {
        let opt: Vec<Option<i64>> = rows.iter().copied().map(Some).collect();
        Self::with_optional_rows(&opt)
    }

    pub fn with_optional_rows(rows: &[Option<i64>]) -> Self {
        Self {
            n: rows.len(),
            queens: rows
                .iter()
                .enumerate()
                .map(|(column, &row)| Queen {
                    column: column as i64,
                    row,
                })
                .collect(),
            score: None,
        }
    }

    pub fn rows(&self) -> Vec<Option<i64>> {
        self.queens.iter().map(|q| q.row).collect()
    }
}

impl PlanningSolution for NQueensSolution {
    type Score = SimpleScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn uninitialized_variable_count(&self) -> usize {
        self.queens.iter().filter(|q| q.row.is_none()).count()
    }
}

/// Typed getter for the row variable.
pub fn get_queen_row(s: &NQueensSolution, idx: usize) -> Option<i64> {
    s.queens.get(idx).and_then(|q| q.row)
}

/// Typed setter for the row variable.
pub fn set_queen_row(s: &mut NQueensSolution, idx: usize, v: Option<i64>) {
    if let Some(queen) = s.queens.get_mut(idx) {
        queen.row = v;
    }
}

pub fn queen_count(s: &NQueensSolution) -> usize {
    s.queens.len()
}

/// The row value range: `0..n`.
pub fn row_values(s: &NQueensSolution) -> Vec<i64> {
    (0..s.n as i64).collect()
}

/// Counts row and diagonal conflicts between all pairs of assigned queens.
///
/// Returns a negative score where 0 means no conflicts.
pub fn calculate_conflicts(solution: &NQueensSolution) -> SimpleScore {
    let mut conflicts = 0i64;
    let queens = &solution.queens;

    for i in 0..queens.len() {
        for j in (i + 1)..queens.len() {
            if let (Some(row_i), Some(row_j)) = (queens[i].row, queens[j].row) {
                if row_i == row_j {
                    conflicts += 1;
                }
                let col_diff = (queens[j].column - queens[i].column).abs();
                if (row_i - row_j).abs() == col_diff {
                    conflicts += 1;
                }
            }
        }
    }

    SimpleScore::of(-conflicts)
}

/// Function pointer type of [`calculate_conflicts`].
pub type ConflictFn = fn(&NQueensSolution) -> SimpleScore;

/// Creates a from-scratch director for queens at the given rows.
pub fn nqueens_director(rows: &[i64]) -> SimpleScoreDirector<NQueensSolution, ConflictFn> {
    SimpleScoreDirector::new(
        NQueensSolution::with_rows(rows),
        calculate_conflicts as ConflictFn,
    )
}

/// Creates an incremental director over `solution`.
pub fn nqueens_incremental_director(
    solution: NQueensSolution,
) -> IncrementalScoreDirector<NQueensSolution, NQueensCalculator> {
    IncrementalScoreDirector::new(solution, NQueensCalculator::default())
}

/// Occupancy counter of one line family (rows, or one diagonal direction).
#[derive(Clone, Debug, Default)]
struct LineCounter {
    occupancy: HashMap<i64, usize>,
    conflicts: i64,
}

impl LineCounter {
    fn insert(&mut self, line: i64) {
        let count = self.occupancy.entry(line).or_insert(0);
        self.conflicts += *count as i64;
        *count += 1;
    }

    fn retract(&mut self, line: i64) {
        if let Some(count) = self.occupancy.get_mut(&line) {
            *count -= 1;
            self.conflicts -= *count as i64;
        }
    }
}

/// Incremental N-Queens calculator.
///
/// Keeps per-row and per-diagonal occupancy; a line holding `k` queens
/// contributes `k * (k - 1) / 2` conflicts.
#[derive(Clone, Debug, Default)]
pub struct NQueensCalculator {
    rows: LineCounter,
    ascending: LineCounter,
    descending: LineCounter,
}

impl NQueensCalculator {
    fn insert(&mut self, queen: &Queen) {
        if let Some(row) = queen.row {
            self.rows.insert(row);
            self.ascending.insert(row - queen.column);
            self.descending.insert(row + queen.column);
        }
    }

    fn retract(&mut self, queen: &Queen) {
        if let Some(row) = queen.row {
            self.rows.retract(row);
            self.ascending.retract(row - queen.column);
            self.descending.retract(row + queen.column);
        }
    }
}

impl IncrementalScoreCalculator<NQueensSolution> for NQueensCalculator {
    type Score = SimpleScore;

    fn reset_working_solution(&mut self, solution: &NQueensSolution) {
        *self = Self::default();
        for queen in &solution.queens {
            self.insert(queen);
        }
    }

    fn before_variable_changed(
        &mut self,
        solution: &NQueensSolution,
        _descriptor_index: usize,
        entity_index: usize,
        _variable_name: &str,
    ) {
        if let Some(queen) = solution.queens.get(entity_index) {
            self.retract(queen);
        }
    }

    fn after_variable_changed(
        &mut self,
        solution: &NQueensSolution,
        _descriptor_index: usize,
        entity_index: usize,
        _variable_name: &str,
    ) {
        if let Some(queen) = solution.queens.get(entity_index) {
            self.insert(queen);
        }
    }

    fn calculate_score(&self) -> SimpleScore {
        SimpleScore::of(-(self.rows.conflicts + self.ascending.conflicts + self.descending.conflicts))
    }

    fn constraint_match_totals(&self) -> Vec<ConstraintMatchTotal<SimpleScore>> {
        [
            ("row conflict", &self.rows),
            ("ascending diagonal conflict", &self.ascending),
            ("descending diagonal conflict", &self.descending),
        ]
        .into_iter()
        .map(|(name, counter)| {
            ConstraintMatchTotal::new(
                name,
                counter.conflicts as usize,
                SimpleScore::of(-counter.conflicts),
            )
        })
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_scoring::{begin_variable_change, ScoreDirector};

    #[test]
    fn test_conflicts() {
        assert_eq!(calculate_conflicts(&NQueensSolution::with_rows(&[1, 3, 0, 2])), SimpleScore::of(0));
        assert_eq!(calculate_conflicts(&NQueensSolution::with_rows(&[0, 0, 0, 0])), SimpleScore::of(-6));
        assert_eq!(calculate_conflicts(&NQueensSolution::with_rows(&[0, 1, 2, 3])), SimpleScore::of(-6));
    }

    #[test]
    fn test_uninitialized_queens_lower_init_score() {
        let solution = NQueensSolution::uninitialized(4);
        let mut director = SimpleScoreDirector::new(solution, calculate_conflicts as ConflictFn);
        let score = director.calculate_score();
        assert_eq!(score, SimpleScore::of_uninitialized(-4, 0));
    }

    #[test]
    fn test_incremental_matches_from_scratch() {
        let mut director = nqueens_incremental_director(NQueensSolution::with_rows(&[0, 2, 1, 3]));
        assert_eq!(director.calculate_score(), SimpleScore::of(-2));

        let assignments = [(0, 1), (1, 3), (2, 0), (3, 2), (2, 2), (0, 2)];
        for (entity, row) in assignments {
            {
                let mut change = begin_variable_change(&mut director, 0, entity, ROW_VARIABLE);
                set_queen_row(change.working_solution_mut(), entity, Some(row));
            }
            director.trigger_variable_listeners();
            let incremental = director.calculate_score();
            let expected = calculate_conflicts(director.working_solution());
            assert_eq!(incremental, expected);
        }
    }

    #[test]
    fn test_constraint_match_totals() {
        let director = nqueens_incremental_director(NQueensSolution::with_rows(&[0, 0, 2, 1]));
        let totals = director.constraint_match_totals();
        assert_eq!(totals.len(), 3);
        // (0,0)-(1,0) share a row, (2,2)-(3,1) share a descending diagonal,
        // (0,0)-(2,2) share an ascending diagonal.
        assert_eq!(totals[0].match_count, 1);
        assert_eq!(totals[1].match_count, 1);
        assert_eq!(totals[2].match_count, 1);
    }
}
