//! # Ball Sort Solver Library
//!
//! This library finds move sequences that sort a ball sort puzzle, using
//! generic best-first search: A*, a lazy A* without duplicate detection, and
//! greedy best-first search.
//!
//! It is used by two binaries:
//! - `ai_solver`: Loads a map (or generates a seeded random one), runs the
//!   chosen algorithm and heuristic, and prints the moves and search statistics.
//! - `heuristic_evaluator`: Compares heuristics and algorithms over a batch of
//!   seeded random puzzles.
//!
//! ## Modules
//! - `solver`: The search engine (`Solver`) and the `SearchState` / `MoveGenerator`
//!   traits a puzzle implements to be searched.
//! - `queue`: The binary-heap open list.
//! - `node`: Search nodes, the node arena and solution reconstruction.
//! - `heuristics`: Heuristic strategies for ball sort states.
//! - `engine`: Ball sort rules (`BallSortState`, `Move`, `BallSortRules`).
//! - `config`: Search configuration and limits.
//! - `utils`: Map parsing from string rows and JSON files.
//! - `error`: Error types.

pub mod config;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod node;
pub mod queue;
pub mod solver;
pub mod utils;

pub use config::{Algorithm, SearchConfig, SearchLimits};
pub use error::{EmptyQueueError, MalformedStateError, MapError, SearchError};
pub use node::{Cost, Solution};
pub use solver::{
    MoveGenerator, SearchOutcome, SearchState, SearchStats, Solver, Successor, Termination,
};
