use crate::engine::BallSortState;
use crate::node::Cost;
use std::collections::HashMap;

/// Signature shared by every heuristic strategy.
pub type HeuristicFn = fn(&BallSortState) -> Cost;

/// Cost charged per adjacent pair of differing balls by
/// [`adjacency_mismatch_heuristic`].
pub const ADJACENCY_PENALTY: Cost = 2;

/// Always returns 0, which turns A* into uniform-cost search.
pub fn no_heuristic(_state: &BallSortState) -> Cost {
    0
}

/// Adds [`ADJACENCY_PENALTY`] for every pair of vertically adjacent balls with
/// different colors.
///
/// This overestimates on small puzzles (`["RB", ""]` scores 2 but is solved in
/// one move), so A* is not guaranteed optimal with it.
///
/// # Examples
/// ```
/// use ballsort_solver::heuristics::adjacency_mismatch_heuristic;
/// use ballsort_solver::utils::state_from_str_array;
///
/// let state = state_from_str_array(&["RBR", "BB", ""], 3).unwrap();
/// assert_eq!(adjacency_mismatch_heuristic(&state), 4);
/// ```
pub fn adjacency_mismatch_heuristic(state: &BallSortState) -> Cost {
    state
        .tubes()
        .iter()
        .map(|tube| {
            let mismatches = tube.windows(2).filter(|pair| pair[0] != pair[1]).count();
            mismatches as Cost * ADJACENCY_PENALTY
        })
        .sum()
}

/// Counts, per tube, the balls that do not match the tube's most frequent
/// color.
///
/// Each counted ball has to move at least once and a move shifts one ball, so
/// this never overestimates. It is also consistent: one move changes the
/// value by at most one.
///
/// # Examples
/// ```
/// use ballsort_solver::heuristics::majority_color_heuristic;
/// use ballsort_solver::utils::state_from_str_array;
///
/// let state = state_from_str_array(&["RBR", "BBG", ""], 3).unwrap();
/// assert_eq!(majority_color_heuristic(&state), 2);
/// ```
pub fn majority_color_heuristic(state: &BallSortState) -> Cost {
    state
        .tubes()
        .iter()
        .map(|tube| {
            let mut counts: HashMap<char, usize> = HashMap::new();
            for &ball in tube {
                *counts.entry(ball).or_insert(0) += 1;
            }
            let majority = counts.values().copied().max().unwrap_or(0);
            (tube.len() - majority) as Cost
        })
        .sum()
}

/// Named heuristic strategies, selectable from the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Heuristic {
    /// Constant zero.
    None,
    /// Two per adjacent mismatched pair.
    Adjacency,
    /// Balls outside each tube's majority color.
    Majority,
}

impl Heuristic {
    pub const ALL: [Heuristic; 3] = [Heuristic::None, Heuristic::Adjacency, Heuristic::Majority];

    pub fn function(self) -> HeuristicFn {
        match self {
            Heuristic::None => no_heuristic,
            Heuristic::Adjacency => adjacency_mismatch_heuristic,
            Heuristic::Majority => majority_color_heuristic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::None => "none",
            Heuristic::Adjacency => "adjacency",
            Heuristic::Majority => "majority",
        }
    }
}
