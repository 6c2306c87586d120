//! Chained vehicle routing test fixtures.
//!
//! Each vehicle is an anchor; each visit points at its predecessor, either
//! a vehicle or another visit:
//!
//! ```text
//! vehicle#0 <- visit#0 <- visit#1 <- visit#2
//! vehicle#1 <- visit#3
//! ```
//!
//! The soft score is the negated Manhattan distance driven; the hard score
//! penalizes visits beyond a vehicle's capacity.

use stepwise_core::domain::{ChainValue, ChainedVariableDescriptor, PlanningSolution};
use stepwise_core::error::Result;
use stepwise_core::score::HardSoftScore;
use stepwise_scoring::{SimpleScoreDirector, VariableListenerSupport};

/// Name of the chained predecessor variable.
pub const PREVIOUS_VARIABLE: &str = "previous";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vehicle {
    pub depot: (i64, i64),
    pub capacity: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Visit {
    pub location: (i64, i64),
    pub previous: Option<ChainValue>,
}

#[derive(Clone, Debug)]
pub struct RoutingSolution {
    pub vehicles: Vec<Vehicle>,
    pub visits: Vec<Visit>,
    pub score: Option<HardSoftScore>,
}

impl RoutingSolution {
    /// Creates a solution with every visit unassigned.
    pub fn new(vehicles: Vec<Vehicle>, locations: &[(i64, i64)]) -> Self {
        Self {
            vehicles,
            visits: locations
                .iter()
                .map(|&location| Visit {
                    location,
                    previous: None,
                })
                .collect(),
            score: None,
        }
    }

    /// Links the visits of `chains[k]` behind vehicle `k`, in order.
    pub fn with_chains(mut self, chains: &[&[usize]]) -> Self {
        for (anchor, chain) in chains.iter().enumerate() {
            let mut previous = ChainValue::Anchor(anchor);
            for &visit in chain.iter() {
                self.visits[visit].previous = Some(previous);
                previous = ChainValue::Entity(visit);
            }
        }
        self
    }

    /// A line of `visit_count` visits at `(1, 0)..` served by vehicles at the origin.
    pub fn line(vehicle_count: usize, visit_count: usize, capacity: usize) -> Self {
        let vehicles = (0..vehicle_count)
            .map(|_| Vehicle {
                depot: (0, 0),
                capacity,
            })
            .collect();
        let locations: Vec<(i64, i64)> = (1..=visit_count as i64).map(|x| (x, 0)).collect();
        Self::new(vehicles, &locations)
    }

    /// Walks predecessor links and returns each vehicle's visits in driving order.
    ///
    /// Returns `None` if the links branch, cycle, or dangle.
    pub fn chains(&self) -> Option<Vec<Vec<usize>>> {
        let mut successor = std::collections::HashMap::new();
        for (entity, visit) in self.visits.iter().enumerate() {
            if let Some(previous) = visit.previous {
                if successor.insert(previous, entity).is_some() {
                    return None;
                }
            }
        }
        let mut seen = vec![false; self.visits.len()];
        let mut chains = Vec::with_capacity(self.vehicles.len());
        for anchor in 0..self.vehicles.len() {
            let mut chain = Vec::new();
            let mut cursor = ChainValue::Anchor(anchor);
            while let Some(&entity) = successor.get(&cursor) {
                if seen[entity] {
                    return None;
                }
                seen[entity] = true;
                chain.push(entity);
                cursor = ChainValue::Entity(entity);
            }
            chains.push(chain);
        }
        let assigned = self.visits.iter().filter(|v| v.previous.is_some()).count();
        if seen.iter().filter(|&&s| s).count() != assigned {
            return None;
        }
        Some(chains)
    }

    /// True if every assigned visit hangs off exactly one acyclic chain.
    pub fn is_well_formed(&self) -> bool {
        self.chains().is_some()
    }

    fn location_of(&self, value: ChainValue) -> (i64, i64) {
        match value {
            ChainValue::Anchor(anchor) => self.vehicles[anchor].depot,
            ChainValue::Entity(entity) => self.visits[entity].location,
        }
    }
}

impl PlanningSolution for RoutingSolution {
    type Score = HardSoftScore;

    fn score(&self) -> Option<Self::Score> {
        self.score
    }

    fn set_score(&mut self, score: Option<Self::Score>) {
        self.score = score;
    }

    fn uninitialized_variable_count(&self) -> usize {
        self.visits.iter().filter(|v| v.previous.is_none()).count()
    }
}

pub fn get_previous(s: &RoutingSolution, idx: usize) -> Option<ChainValue> {
    s.visits.get(idx).and_then(|v| v.previous)
}

pub fn set_previous(s: &mut RoutingSolution, idx: usize, v: Option<ChainValue>) {
    if let Some(visit) = s.visits.get_mut(idx) {
        visit.previous = v;
    }
}

pub fn visit_count(s: &RoutingSolution) -> usize {
    s.visits.len()
}

pub fn vehicle_count(s: &RoutingSolution) -> usize {
    s.vehicles.len()
}

/// Descriptor of the `previous` chained variable.
pub fn previous_descriptor() -> ChainedVariableDescriptor<RoutingSolution> {
    ChainedVariableDescriptor::new(
        PREVIOUS_VARIABLE,
        0,
        get_previous,
        set_previous,
        visit_count,
        vehicle_count,
    )
}

fn manhattan(a: (i64, i64), b: (i64, i64)) -> i64 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

/// Distance and capacity score, computed by walking the chains.
///
/// Broken chains score only the distances of the links themselves.
pub fn calculate_route_score(solution: &RoutingSolution) -> HardSoftScore {
    let distance: i64 = solution
        .visits
        .iter()
        .filter_map(|visit| {
            visit
                .previous
                .map(|previous| manhattan(solution.location_of(previous), visit.location))
        })
        .sum();
    let overload: i64 = solution
        .chains()
        .map(|chains| {
            chains
                .iter()
                .zip(&solution.vehicles)
                .map(|(chain, vehicle)| chain.len().saturating_sub(vehicle.capacity) as i64)
                .sum()
        })
        .unwrap_or(0);
    HardSoftScore::of(-overload, -distance)
}

/// Function pointer type of [`calculate_route_score`].
pub type RouteScoreFn = fn(&RoutingSolution) -> HardSoftScore;

/// Creates a director maintaining the chain supply of `previous`.
///
/// Fails if the solution's chains are malformed.
pub fn routing_director(
    solution: RoutingSolution,
) -> Result<SimpleScoreDirector<RoutingSolution, RouteScoreFn>> {
    let support = VariableListenerSupport::new(vec![previous_descriptor()], Vec::new())?;
    SimpleScoreDirector::with_listeners(solution, calculate_route_score as RouteScoreFn, support)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepwise_scoring::ScoreDirector;

    #[test]
    fn test_chains_in_driving_order() {
        let solution = RoutingSolution::line(2, 4, 10).with_chains(&[&[0, 1, 2], &[3]]);
        assert_eq!(solution.chains(), Some(vec![vec![0, 1, 2], vec![3]]));
    }

    #[test]
    fn test_branching_chain_is_not_well_formed() {
        let mut solution = RoutingSolution::line(1, 3, 10).with_chains(&[&[0, 1]]);
        solution.visits[2].previous = Some(ChainValue::Entity(0));
        assert!(!solution.is_well_formed());
    }

    #[test]
    fn test_cycle_is_not_well_formed() {
        let mut solution = RoutingSolution::line(1, 2, 10);
        solution.visits[0].previous = Some(ChainValue::Entity(1));
        solution.visits[1].previous = Some(ChainValue::Entity(0));
        assert!(!solution.is_well_formed());
    }

    #[test]
    fn test_route_score() {
        let solution = RoutingSolution::line(2, 4, 2).with_chains(&[&[0, 1, 2], &[3]]);
        // 0->1->2->3 along x, then 0->4 for the second vehicle; one visit over capacity.
        assert_eq!(calculate_route_score(&solution), HardSoftScore::of(-1, -7));
    }

    #[test]
    fn test_director_exposes_supply() {
        let solution = RoutingSolution::line(2, 4, 10).with_chains(&[&[0, 1, 2], &[3]]);
        let director = routing_director(solution).unwrap();
        let supply = director.chain_supply(PREVIOUS_VARIABLE).unwrap();
        assert_eq!(supply.trailing_entity(ChainValue::Entity(1)), Some(2));
        assert_eq!(supply.anchor_of(3), Some(1));
    }
}
