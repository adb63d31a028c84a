//! Ball sort puzzle rules.
//!
//! This module defines the puzzle the solver is exercised on:
//! - `Ball`: a ball label (one character per color).
//! - `BallSortState`: an immutable snapshot of every tube, bottom to top.
//! - `Move`: pouring the top ball of one tube onto another.
//! - `BallSortRules`: the [`MoveGenerator`] producing legal moves.
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashMap;
use std::fmt;

use crate::error::{MalformedStateError, MapError};
use crate::node::Cost;
use crate::solver::{MoveGenerator, SearchState, Successor};

/// A ball's color label.
pub type Ball = char;

/// Labels used for generated puzzles, in order.
pub const PALETTE: [Ball; 12] = ['R', 'G', 'B', 'Y', 'P', 'O', 'C', 'M', 'W', 'K', 'L', 'N'];

/// Moves the top ball of tube `from` onto tube `to` (0-based indices).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: usize,
    pub to: usize,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from + 1, self.to + 1)
    }
}

/// A ball sort position: `capacity` plus the tubes, each listed bottom to top.
///
/// Equality and hashing cover the whole value, so the state is its own
/// canonical representation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BallSortState {
    capacity: usize,
    tubes: Vec<Vec<Ball>>,
}

impl BallSortState {
    /// Creates a state after checking that no tube exceeds `capacity`.
    ///
    /// # Examples
    /// ```
    /// use ballsort_solver::engine::BallSortState;
    ///
    /// let state = BallSortState::new(2, vec![vec!['R', 'B'], vec![]]).unwrap();
    /// assert_eq!(state.tube_count(), 2);
    /// assert!(BallSortState::new(1, vec![vec!['R', 'B']]).is_err());
    /// ```
    pub fn new(capacity: usize, tubes: Vec<Vec<Ball>>) -> Result<Self, MalformedStateError> {
        let state = BallSortState { capacity, tubes };
        state.validate()?;
        Ok(state)
    }

    /// Builds a solvable puzzle by scrambling a solved one.
    ///
    /// Starts from `colors` full single-color tubes plus `empty_tubes` empty
    /// ones and applies `scramble_moves` random moves whose reverse is legal,
    /// so the result can always be solved. The same `seed` always yields the
    /// same puzzle.
    pub fn scrambled(
        colors: usize,
        capacity: usize,
        empty_tubes: usize,
        scramble_moves: usize,
        seed: u64,
    ) -> Result<Self, MapError> {
        if colors > PALETTE.len() {
            return Err(MapError::InvalidMap(format!(
                "at most {} colors are supported, asked for {}",
                PALETTE.len(),
                colors
            )));
        }
        if capacity == 0 {
            return Err(MapError::InvalidMap("capacity must be positive".to_string()));
        }

        let mut tubes: Vec<Vec<Ball>> = PALETTE[..colors]
            .iter()
            .map(|&ball| vec![ball; capacity])
            .collect();
        tubes.extend(std::iter::repeat(Vec::new()).take(empty_tubes));

        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..scramble_moves {
            let candidates = reverse_moves(&tubes, capacity);
            let Some(mv) = candidates.choose(&mut rng) else {
                break;
            };
            if let Some(ball) = tubes[mv.from].pop() {
                tubes[mv.to].push(ball);
            }
        }
        Ok(BallSortState { capacity, tubes })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn tubes(&self) -> &[Vec<Ball>] {
        &self.tubes
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    pub fn ball_count(&self) -> usize {
        self.tubes.iter().map(Vec::len).sum()
    }

    /// Number of balls of each label.
    pub fn color_counts(&self) -> HashMap<Ball, usize> {
        let mut counts = HashMap::new();
        for &ball in self.tubes.iter().flatten() {
            *counts.entry(ball).or_insert(0) += 1;
        }
        counts
    }

    /// Checks that every tube fits within `capacity`.
    pub fn validate(&self) -> Result<(), MalformedStateError> {
        if self.capacity == 0 {
            return Err(MalformedStateError::new("tube capacity must be positive"));
        }
        for (i, tube) in self.tubes.iter().enumerate() {
            if tube.len() > self.capacity {
                return Err(MalformedStateError::new(format!(
                    "tube {} holds {} balls, capacity is {}",
                    i + 1,
                    tube.len(),
                    self.capacity
                )));
            }
        }
        Ok(())
    }

    /// Whether `mv` can be played from this state.
    pub fn is_legal(&self, mv: Move) -> bool {
        if mv.from == mv.to || mv.from >= self.tubes.len() || mv.to >= self.tubes.len() {
            return false;
        }
        let Some(&ball) = self.tubes[mv.from].last() else {
            return false;
        };
        let target = &self.tubes[mv.to];
        target.len() < self.capacity && target.last().map_or(true, |&top| top == ball)
    }

    /// Every legal move, ordered by source tube then target tube.
    pub fn legal_moves(&self) -> Vec<Move> {
        let n = self.tubes.len();
        (0..n)
            .flat_map(|from| (0..n).map(move |to| Move { from, to }))
            .filter(|&mv| self.is_legal(mv))
            .collect()
    }

    /// The state after `mv`, or `None` if the move is illegal.
    pub fn apply_move(&self, mv: Move) -> Option<Self> {
        if !self.is_legal(mv) {
            return None;
        }
        let mut next = self.clone();
        let ball = next.tubes[mv.from].pop()?;
        next.tubes[mv.to].push(ball);
        Some(next)
    }
}

impl SearchState for BallSortState {
    /// Solved when every non-empty tube holds one color and no color is split
    /// across tubes.
    fn is_final(&self) -> bool {
        let mut seen = Vec::with_capacity(self.tubes.len());
        for tube in &self.tubes {
            let Some(&first) = tube.first() else {
                continue;
            };
            if tube.iter().any(|&ball| ball != first) || seen.contains(&first) {
                return false;
            }
            seen.push(first);
        }
        true
    }
}

impl fmt::Display for BallSortState {
    /// One tube per line, bottom to top, padded with `.` up to capacity.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tube) in self.tubes.iter().enumerate() {
            write!(f, "{:>3} |", i + 1)?;
            for ball in tube {
                write!(f, "{ball}")?;
            }
            for _ in tube.len()..self.capacity {
                write!(f, ".")?;
            }
            writeln!(f, "|")?;
        }
        Ok(())
    }
}

/// Moves `from -> to` whose reverse `to -> from` is a legal forward move.
fn reverse_moves(tubes: &[Vec<Ball>], capacity: usize) -> Vec<Move> {
    let mut moves = Vec::new();
    for (from, source) in tubes.iter().enumerate() {
        let Some((&ball, rest)) = source.split_last() else {
            continue;
        };
        if rest.last().map_or(false, |&below| below != ball) {
            continue;
        }
        for (to, target) in tubes.iter().enumerate() {
            if to != from && target.len() < capacity {
                moves.push(Move { from, to });
            }
        }
    }
    moves
}

/// Ball sort move generation with a fixed cost per move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BallSortRules {
    pub move_cost: Cost,
}

impl Default for BallSortRules {
    fn default() -> Self {
        BallSortRules { move_cost: 1 }
    }
}

impl BallSortRules {
    pub fn apply(&self, state: &BallSortState, mv: Move) -> Option<BallSortState> {
        state.apply_move(mv)
    }
}

impl MoveGenerator for BallSortRules {
    type State = BallSortState;
    type Action = Move;

    fn legal_moves(
        &self,
        state: &BallSortState,
    ) -> Result<Vec<Successor<BallSortState, Move>>, MalformedStateError> {
        let balls = state.ball_count();
        state
            .legal_moves()
            .into_iter()
            .map(|mv| {
                let next = state.apply_move(mv).ok_or_else(|| {
                    MalformedStateError::new(format!("generated move {mv} cannot be applied"))
                })?;
                next.validate()?;
                if next.ball_count() != balls {
                    return Err(MalformedStateError::new(format!(
                        "move {mv} changed the ball count from {balls} to {}",
                        next.ball_count()
                    )));
                }
                Ok(Successor {
                    state: next,
                    action: mv,
                    cost: self.move_cost,
                })
            })
            .collect()
    }
}
