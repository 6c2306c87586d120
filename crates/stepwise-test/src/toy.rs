//! Four entities choosing between two values.
//!
//! Each entity has a cost per value, and pairs of neighbouring entities
//! with equal values cost one more point. The optimum for the default
//! costs is `[1, 0, 1, 0]` at `0hard/-4soft`.

use stepwise_core::domain::PlanningSolution;
use stepwise_core::score::HardSoftScore;
use stepwise_scoring::SimpleScoreDirector;

/// Name of the scalar variable.
pub const VALUE_VARIABLE: &str = "value";

/// Default per-entity costs of values 0 and 1.
pub const DEFAULT_COSTS: [[i64; 2]; 4] = [[3, 1], [1, 2], [2, 1], [1, 3]];

#[derive(Clone, Debug)]
pub struct ToySolution {
    pub costs: Vec<[i64; 2]>,
    pub values: Vec<Option<u8>>,
    pub score: Option<HardSoftScore>,
}

impl ToySolution {
    /// Four unassigned entities with the default costs.
    pub fn new() -> Self {
        Self {
            costs: DEFAULT_COSTS.to_vec(),
            values: vec![None; DEFAULT_COSTS.len()],
            score: None,
        }
    }

    pub fn with_values(values: &[u8]) -> Self {
        Self {
            values: values.iter().copied().map(Some).collect(),
            ..Self::new()
        }
    }
}

impl Default for ToySolution {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanningSolution for ToySolution {
    type Score = HardSoftScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn uninitialized_variable_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

pub fn get_value(s: &ToySolution, idx: usize) -> Option<u8> {
    s.values.get(idx).copied().flatten()
}

pub fn set_value(s: &mut ToySolution, idx: usize, v: Option<u8>) {
    if let Some(slot) = s.values.get_mut(idx) {
        *slot = v;
    }
}

pub fn entity_count(s: &ToySolution) -> usize {
    s.values.len()
}

pub fn value_range(_: &ToySolution) -> Vec<u8> {
    vec![0, 1]
}

/// Soft-only score: value costs plus one point per equal neighbour pair.
pub fn calculate_toy_score(solution: &ToySolution) -> HardSoftScore {
    let cost: i64 = solution
        .values
        .iter()
        .zip(&solution.costs)
        .filter_map(|(value, costs)| value.map(|v| costs[v as usize]))
        .sum();
    let equal_neighbours = solution
        .values
        .windows(2)
        .filter(|pair| pair[0].is_some() && pair[0] == pair[1])
        .count() as i64;
    HardSoftScore::of_soft(-(cost + equal_neighbours))
}

pub type ToyScoreFn = fn(&ToySolution) -> HardSoftScore;

pub fn toy_director(solution: ToySolution) -> SimpleScoreDirector<ToySolution, ToyScoreFn> {
    SimpleScoreDirector::new(solution, calculate_toy_score as ToyScoreFn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimum() {
        let best = calculate_toy_score(&ToySolution::with_values(&[1, 0, 1, 0]));
        assert_eq!(best, HardSoftScore::of_soft(-4));
        for bits in 0u8..16 {
            let values: Vec<u8> = (0..4).map(|i| (bits >> i) & 1).collect();
            let score = calculate_toy_score(&ToySolution::with_values(&values));
            assert!(score <= best, "{:?} scores {} above the optimum", values, score);
        }
    }

    #[test]
    fn test_all_zero_start() {
        // 3 + 1 + 2 + 1 cost, three equal neighbour pairs
        assert_eq!(
            calculate_toy_score(&ToySolution::with_values(&[0, 0, 0, 0])),
            HardSoftScore::of_soft(-10)
        );
    }
}
