//! Best-first search engine: A*, lazy A* and greedy best-first.
//!
//! The engine knows nothing about the puzzle. States come from a
//! [`MoveGenerator`] and are ranked with a heuristic function supplied when the
//! [`Solver`] is built. All per-run structures (node arena, open list,
//! generated-set, counters) live in a `Run` that is created fresh by every call.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};

use crate::config::{Algorithm, SearchConfig, SearchLimits};
use crate::error::{MalformedStateError, SearchError};
use crate::node::{Cost, NodeArena, NodeId, SearchNode, Solution};
use crate::queue::OpenList;

const PROGRESS_INTERVAL: u64 = 100_000;

/// A puzzle configuration the engine can search over.
///
/// Equality and hashing must be canonical: two values that compare equal are
/// the same puzzle position.
pub trait SearchState: Clone + Eq + Hash {
    fn is_final(&self) -> bool;
}

/// One edge out of a state.
#[derive(Clone, Debug, PartialEq)]
pub struct Successor<S, A> {
    pub state: S,
    pub action: A,
    pub cost: Cost,
}

/// Produces the legal successors of a state.
pub trait MoveGenerator {
    type State: SearchState;
    type Action: Clone;

    /// Every `(next_state, action, step_cost)` reachable in one move.
    ///
    /// Returns an error if a produced successor breaks the domain's invariants.
    fn legal_moves(
        &self,
        state: &Self::State,
    ) -> Result<Vec<Successor<Self::State, Self::Action>>, MalformedStateError>;
}

impl<G: MoveGenerator + ?Sized> MoveGenerator for &G {
    type State = G::State;
    type Action = G::Action;

    fn legal_moves(
        &self,
        state: &Self::State,
    ) -> Result<Vec<Successor<Self::State, Self::Action>>, MalformedStateError> {
        (**self).legal_moves(state)
    }
}

/// Why a run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// A final state was extracted from the open list.
    GoalReached,
    /// The open list ran dry; no final state is reachable.
    Exhausted,
    /// An expansion or time limit from [`SearchLimits`] was hit.
    LimitReached,
}

/// Counters for one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchStats {
    /// Non-goal nodes extracted and expanded.
    pub expansions: u64,
    /// Nodes created, root included.
    pub generated: usize,
    /// Open-list entries discarded because their node was closed or improved.
    pub stale_skipped: u64,
    /// Closed nodes put back in the open list after a cheaper path was found.
    pub reopened: u64,
    pub elapsed: Duration,
    /// Open-list entries left when the run ended.
    pub open_size: usize,
    pub max_open_size: usize,
    /// False once an edge with `h(child) > h(parent) + cost` has been seen.
    pub admissible: bool,
    /// Keys of expanded or goal nodes in extraction order, when enabled.
    pub extracted_keys: Vec<f64>,
}

/// Result of a search run.
#[derive(Clone, Debug)]
pub struct SearchOutcome<S, A> {
    pub solution: Option<Solution<S, A>>,
    pub termination: Termination,
    pub stats: SearchStats,
}

impl<S, A> SearchOutcome<S, A> {
    pub fn is_solved(&self) -> bool {
        self.termination == Termination::GoalReached
    }
}

enum Next {
    Expand(NodeId),
    Done(Termination, Option<NodeId>),
}

/// Per-run search state.
struct Run<S, A> {
    algorithm: Algorithm,
    arena: NodeArena<S, A>,
    open: OpenList<(NodeId, u32)>,
    stats: SearchStats,
    started: Instant,
    limits: SearchLimits,
    record_keys: bool,
}

impl<S: SearchState, A: Clone> Run<S, A> {
    fn start(algorithm: Algorithm, config: &SearchConfig) -> Self {
        Run {
            algorithm,
            arena: NodeArena::new(),
            open: OpenList::new(),
            stats: SearchStats {
                admissible: true,
                ..SearchStats::default()
            },
            started: Instant::now(),
            limits: config.limits,
            record_keys: config.record_keys,
        }
    }

    fn push_open(&mut self, id: NodeId) {
        let node = self.arena.get(id);
        self.open.insert(node.key, (id, node.version));
    }

    fn check_edge(&mut self, parent_h: Cost, child_h: Cost, cost: Cost) {
        if child_h > parent_h.saturating_add(cost) && self.stats.admissible {
            warn!(
                "{}: heuristic is not consistent (h {} -> {} over a step of cost {})",
                self.algorithm, parent_h, child_h, cost
            );
            self.stats.admissible = false;
        }
    }

    fn limit_hit(&self) -> bool {
        if let Some(max) = self.limits.max_expansions {
            if self.stats.expansions >= max {
                return true;
            }
        }
        match self.limits.time_limit {
            Some(limit) => self.started.elapsed() >= limit,
            None => false,
        }
    }

    /// Pops the next live node, closing it if it is to be expanded.
    fn next(&mut self) -> Next {
        while !self.open.is_empty() {
            let Ok((key, (id, version))) = self.open.extract_min() else {
                break;
            };
            let node = self.arena.get(id);
            if node.closed || node.version != version {
                self.stats.stale_skipped += 1;
                debug!("skipping stale entry for node {} (key {})", id.index(), key);
                continue;
            }
            if node.state.is_final() {
                if self.record_keys {
                    self.stats.extracted_keys.push(key);
                }
                return Next::Done(Termination::GoalReached, Some(id));
            }
            if self.limit_hit() {
                self.open.insert(key, (id, version));
                return Next::Done(Termination::LimitReached, None);
            }
            if self.record_keys {
                self.stats.extracted_keys.push(key);
            }

            let node = self.arena.get_mut(id);
            node.closed = true;
            self.stats.expansions += 1;
            trace!(
                "expanding node {} (g={}, h={}, key={})",
                id.index(),
                node.g,
                node.h,
                key
            );
            if self.stats.expansions % PROGRESS_INTERVAL == 0 {
                debug!(
                    "{}: {} expansions, {} nodes, {} open",
                    self.algorithm,
                    self.stats.expansions,
                    self.arena.len(),
                    self.open.len()
                );
            }
            return Next::Expand(id);
        }
        Next::Done(Termination::Exhausted, None)
    }
}

/// Best-first solver over the states produced by `G`, ranked by `H`.
///
/// Each search method is independent of previous calls; the counters exposed
/// by [`Solver::expansions`] and [`Solver::is_admissible`] describe the most
/// recent run only.
pub struct Solver<G, H> {
    rules: G,
    heuristic: H,
    config: SearchConfig,
    expansions: u64,
    admissible: bool,
}

impl<G, H> Solver<G, H>
where
    G: MoveGenerator,
    H: Fn(&G::State) -> Cost,
{
    pub fn new(rules: G, heuristic: H) -> Self {
        Self::with_config(rules, heuristic, SearchConfig::default())
    }

    pub fn with_config(rules: G, heuristic: H, config: SearchConfig) -> Self {
        Solver {
            rules,
            heuristic,
            config,
            expansions: 0,
            admissible: true,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Expansions performed by the last run.
    pub fn expansions(&self) -> u64 {
        self.expansions
    }

    /// Whether the last run saw no inconsistent edge.
    pub fn is_admissible(&self) -> bool {
        self.admissible
    }

    /// Runs the selected algorithm from `initial`.
    pub fn run(
        &mut self,
        algorithm: Algorithm,
        initial: &G::State,
    ) -> Result<SearchOutcome<G::State, G::Action>, SearchError> {
        match algorithm {
            Algorithm::AStar => self.search(initial),
            Algorithm::LazyAStar => self.lazy_search(initial),
            Algorithm::Greedy => self.greedy_search(initial),
        }
    }

    fn key(&self, g: Cost, h: Cost) -> f64 {
        g as f64 + self.config.weight * h as f64
    }

    /// A* with a generated-set: at most one node per distinct state.
    ///
    /// A node whose path improves is pushed again with a bumped version; the
    /// older entries are discarded when they surface. A closed node whose path
    /// improves is reopened.
    pub fn search(
        &mut self,
        initial: &G::State,
    ) -> Result<SearchOutcome<G::State, G::Action>, SearchError> {
        let mut run = Run::start(Algorithm::AStar, &self.config);
        let mut generated: HashMap<G::State, NodeId> = HashMap::new();

        let h = (self.heuristic)(initial);
        let root = run
            .arena
            .push(SearchNode::root(initial.clone(), h, self.key(0, h)));
        generated.insert(initial.clone(), root);
        run.push_open(root);
        info!("{}: starting search (h0={})", run.algorithm, h);

        loop {
            let parent = match run.next() {
                Next::Expand(id) => id,
                Next::Done(termination, goal) => return Ok(self.finish(run, termination, goal)),
            };
            let (parent_g, parent_h) = {
                let node = run.arena.get(parent);
                (node.g, node.h)
            };
            let successors = self.rules.legal_moves(&run.arena.get(parent).state)?;

            for successor in successors {
                let child = match generated.entry(successor.state) {
                    Entry::Occupied(entry) => *entry.get(),
                    Entry::Vacant(entry) => {
                        let h = (self.heuristic)(entry.key());
                        let id = run
                            .arena
                            .push(SearchNode::unreached(entry.key().clone(), h));
                        entry.insert(id);
                        id
                    }
                };

                let g = parent_g.saturating_add(successor.cost);
                let child_h = run.arena.get(child).h;
                if g >= run.arena.get(child).g {
                    continue;
                }
                let key = self.key(g, child_h);
                let node = run.arena.get_mut(child);
                node.parent = Some(parent);
                node.action = Some(successor.action);
                node.g = g;
                node.key = key;
                node.version += 1;
                let reopened = node.closed;
                node.closed = false;
                if reopened {
                    run.stats.reopened += 1;
                }
                run.check_edge(parent_h, child_h, successor.cost);
                run.push_open(child);
            }
        }
    }

    /// A* without a generated-set: every successor becomes a new node and is
    /// always pushed, so a state may be expanded many times.
    pub fn lazy_search(
        &mut self,
        initial: &G::State,
    ) -> Result<SearchOutcome<G::State, G::Action>, SearchError> {
        let mut run = Run::start(Algorithm::LazyAStar, &self.config);

        let h = (self.heuristic)(initial);
        let root = run
            .arena
            .push(SearchNode::root(initial.clone(), h, self.key(0, h)));
        run.push_open(root);
        info!("{}: starting search (h0={})", run.algorithm, h);

        loop {
            let parent = match run.next() {
                Next::Expand(id) => id,
                Next::Done(termination, goal) => return Ok(self.finish(run, termination, goal)),
            };
            let (parent_g, parent_h) = {
                let node = run.arena.get(parent);
                (node.g, node.h)
            };
            let successors = self.rules.legal_moves(&run.arena.get(parent).state)?;

            for successor in successors {
                let h = (self.heuristic)(&successor.state);
                let g = parent_g.saturating_add(successor.cost);
                let mut node = SearchNode::unreached(successor.state, h);
                node.parent = Some(parent);
                node.action = Some(successor.action);
                node.g = g;
                node.key = self.key(g, h);
                run.check_edge(parent_h, h, successor.cost);
                let child = run.arena.push(node);
                run.push_open(child);
            }
        }
    }

    /// Greedy best-first: ordered by `h` alone; the first path found to a
    /// state is kept and no state is generated twice.
    pub fn greedy_search(
        &mut self,
        initial: &G::State,
    ) -> Result<SearchOutcome<G::State, G::Action>, SearchError> {
        let mut run = Run::start(Algorithm::Greedy, &self.config);
        let mut generated: HashMap<G::State, NodeId> = HashMap::new();

        let h = (self.heuristic)(initial);
        let root = run
            .arena
            .push(SearchNode::root(initial.clone(), h, h as f64));
        generated.insert(initial.clone(), root);
        run.push_open(root);
        info!("{}: starting search (h0={})", run.algorithm, h);

        loop {
            let parent = match run.next() {
                Next::Expand(id) => id,
                Next::Done(termination, goal) => return Ok(self.finish(run, termination, goal)),
            };
            let (parent_g, parent_h) = {
                let node = run.arena.get(parent);
                (node.g, node.h)
            };
            let successors = self.rules.legal_moves(&run.arena.get(parent).state)?;

            for successor in successors {
                match generated.entry(successor.state) {
                    Entry::Occupied(entry) => {
                        let child_h = run.arena.get(*entry.get()).h;
                        run.check_edge(parent_h, child_h, successor.cost);
                    }
                    Entry::Vacant(entry) => {
                        let h = (self.heuristic)(entry.key());
                        let mut node = SearchNode::unreached(entry.key().clone(), h);
                        node.parent = Some(parent);
                        node.action = Some(successor.action);
                        node.g = parent_g.saturating_add(successor.cost);
                        node.key = h as f64;
                        run.check_edge(parent_h, h, successor.cost);
                        let child = run.arena.push(node);
                        entry.insert(child);
                        run.push_open(child);
                    }
                }
            }
        }
    }

    fn finish(
        &mut self,
        run: Run<G::State, G::Action>,
        termination: Termination,
        goal: Option<NodeId>,
    ) -> SearchOutcome<G::State, G::Action> {
        let Run {
            algorithm,
            arena,
            open,
            mut stats,
            started,
            ..
        } = run;
        stats.elapsed = started.elapsed();
        stats.open_size = open.len();
        stats.max_open_size = open.high_water();
        stats.generated = arena.len();

        let solution = goal.map(|id| arena.trace(id));
        self.expansions = stats.expansions;
        self.admissible = stats.admissible;

        match &solution {
            Some(solution) => info!(
                "{}: solved in {} moves (cost {}), {} expansions, {} nodes, {:.3}s",
                algorithm,
                solution.len(),
                solution.cost,
                stats.expansions,
                stats.generated,
                stats.elapsed.as_secs_f64()
            ),
            None => info!(
                "{}: no solution ({:?}), {} expansions, {} nodes, {:.3}s",
                algorithm,
                termination,
                stats.expansions,
                stats.generated,
                stats.elapsed.as_secs_f64()
            ),
        }

        SearchOutcome {
            solution,
            termination,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{BallSortRules, BallSortState};
    use crate::heuristics::{majority_color_heuristic, no_heuristic};
    use crate::utils::state_from_str_array;
    use std::collections::HashSet;

    const GOAL: u32 = 99;

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    struct Vertex(u32);

    impl SearchState for Vertex {
        fn is_final(&self) -> bool {
            self.0 == GOAL
        }
    }

    /// Directed weighted graph; actions are the `(from, to)` pair.
    struct Graph {
        edges: Vec<(u32, u32, Cost)>,
    }

    impl MoveGenerator for Graph {
        type State = Vertex;
        type Action = (u32, u32);

        fn legal_moves(
            &self,
            state: &Vertex,
        ) -> Result<Vec<Successor<Vertex, (u32, u32)>>, MalformedStateError> {
            Ok(self
                .edges
                .iter()
                .filter(|(from, _, _)| *from == state.0)
                .map(|&(from, to, cost)| Successor {
                    state: Vertex(to),
                    action: (from, to),
                    cost,
                })
                .collect())
        }
    }

    struct PanickingGenerator;

    impl MoveGenerator for PanickingGenerator {
        type State = Vertex;
        type Action = ();

        fn legal_moves(
            &self,
            _state: &Vertex,
        ) -> Result<Vec<Successor<Vertex, ()>>, MalformedStateError> {
            panic!("move generator must not be called");
        }
    }

    struct BrokenGenerator;

    impl MoveGenerator for BrokenGenerator {
        type State = Vertex;
        type Action = ();

        fn legal_moves(
            &self,
            _state: &Vertex,
        ) -> Result<Vec<Successor<Vertex, ()>>, MalformedStateError> {
            Err(MalformedStateError::new("successor lost a ball"))
        }
    }

    fn zero(_: &Vertex) -> Cost {
        0
    }

    // 0 -1-> 1 -1-> 2 -1-> 3 -1-> 99 is optimal (cost 4); 0 -4-> 2 and
    // 1 -5-> 3 are worse first discoveries.
    fn diamond() -> Graph {
        Graph {
            edges: vec![
                (0, 1, 1),
                (0, 2, 4),
                (1, 2, 1),
                (1, 3, 5),
                (2, 3, 1),
                (3, GOAL, 1),
            ],
        }
    }

    fn path_cost(graph: &Graph, moves: &[(u32, u32)]) -> Cost {
        moves
            .iter()
            .map(|&(from, to)| {
                graph
                    .edges
                    .iter()
                    .filter(|e| e.0 == from && e.1 == to)
                    .map(|e| e.2)
                    .min()
                    .unwrap()
            })
            .sum()
    }

    #[test]
    fn test_astar_finds_cheapest_path_and_skips_stale_entries() {
        let graph = diamond();
        let mut solver = Solver::new(&graph, zero);
        let outcome = solver.search(&Vertex(0)).unwrap();

        assert_eq!(outcome.termination, Termination::GoalReached);
        let solution = outcome.solution.unwrap();
        assert_eq!(solution.moves, vec![(0, 1), (1, 2), (2, 3), (3, GOAL)]);
        assert_eq!(solution.cost, 4);
        assert_eq!(path_cost(&graph, &solution.moves), solution.cost);
        assert_eq!(outcome.stats.expansions, 4);
        assert_eq!(outcome.stats.stale_skipped, 1);
        assert_eq!(outcome.stats.generated, 5);
        assert_eq!(solver.expansions(), 4);
        assert!(solver.is_admissible());
    }

    #[test]
    fn test_root_goal_never_calls_move_generator() {
        let mut solver = Solver::new(PanickingGenerator, zero);
        for algorithm in [Algorithm::AStar, Algorithm::LazyAStar, Algorithm::Greedy] {
            let outcome = solver.run(algorithm, &Vertex(GOAL)).unwrap();
            assert!(outcome.is_solved());
            let solution = outcome.solution.unwrap();
            assert!(solution.is_empty());
            assert_eq!(solution.cost, 0);
            assert_eq!(outcome.stats.expansions, 0);
            assert_eq!(solver.expansions(), 0);
        }
    }

    #[test]
    fn test_unreachable_goal_is_exhausted_not_an_error() {
        let graph = Graph {
            edges: vec![(0, 1, 1), (1, 2, 1), (2, 0, 1), (5, GOAL, 1)],
        };
        let mut solver = Solver::new(&graph, zero);
        for algorithm in [Algorithm::AStar, Algorithm::Greedy] {
            let outcome = solver.run(algorithm, &Vertex(0)).unwrap();
            assert_eq!(outcome.termination, Termination::Exhausted);
            assert!(outcome.solution.is_none());
            assert_eq!(outcome.stats.expansions, 3);
            assert_eq!(outcome.stats.open_size, 0);
        }
    }

    #[test]
    fn test_inconsistent_heuristic_is_flagged_but_search_continues() {
        let graph = Graph {
            edges: vec![(0, 1, 1), (1, GOAL, 1)],
        };
        let mut solver = Solver::new(&graph, |v: &Vertex| if v.0 == 1 { 10 } else { 0 });
        let outcome = solver.search(&Vertex(0)).unwrap();
        assert!(outcome.is_solved());
        assert_eq!(outcome.solution.unwrap().cost, 2);
        assert!(!outcome.stats.admissible);
        assert!(!solver.is_admissible());

        // The flag is per run.
        let mut consistent = Solver::new(&graph, zero);
        assert!(consistent.search(&Vertex(0)).unwrap().stats.admissible);
    }

    #[test]
    fn test_closed_node_is_reopened_when_cheaper_path_appears() {
        let graph = Graph {
            edges: vec![(0, 1, 5), (0, 2, 1), (2, 1, 1), (1, 3, 1), (3, GOAL, 1)],
        };
        let heuristic = |v: &Vertex| match v.0 {
            2 | 3 => 10,
            _ => 0,
        };
        let mut solver = Solver::new(&graph, heuristic);
        let outcome = solver.search(&Vertex(0)).unwrap();

        let solution = outcome.solution.unwrap();
        assert_eq!(solution.cost, 4);
        assert_eq!(solution.moves, vec![(0, 2), (2, 1), (1, 3), (3, GOAL)]);
        assert_eq!(outcome.stats.reopened, 1);
        assert_eq!(outcome.stats.expansions, 5);
        assert!(!outcome.stats.admissible);
    }

    #[test]
    fn test_lazy_search_reexpands_but_keeps_optimal_cost() {
        let graph = diamond();
        let mut solver = Solver::new(&graph, zero);
        let astar = solver.search(&Vertex(0)).unwrap();
        let lazy = solver.lazy_search(&Vertex(0)).unwrap();

        assert_eq!(lazy.solution.as_ref().unwrap().cost, 4);
        assert_eq!(lazy.stats.expansions, 5);
        assert!(lazy.stats.expansions >= astar.stats.expansions);
        assert_eq!(lazy.stats.stale_skipped, 0);
        assert_eq!(solver.expansions(), 5);
    }

    #[test]
    fn test_greedy_keeps_first_path() {
        let graph = Graph {
            edges: vec![(0, 1, 1), (0, 2, 10), (2, GOAL, 1), (1, 3, 1), (3, GOAL, 1)],
        };
        let heuristic = |v: &Vertex| match v.0 {
            1 => 5,
            3 => 1,
            _ => 0,
        };
        let mut solver = Solver::new(&graph, heuristic);
        let greedy = solver.greedy_search(&Vertex(0)).unwrap();
        let greedy_solution = greedy.solution.unwrap();
        assert_eq!(greedy_solution.moves, vec![(0, 2), (2, GOAL)]);
        assert_eq!(greedy_solution.cost, 11);

        let mut optimal = Solver::new(&graph, zero);
        let astar = optimal.search(&Vertex(0)).unwrap().solution.unwrap();
        assert_eq!(astar.cost, 3);
        assert!(greedy_solution.cost >= astar.cost);
    }

    #[test]
    fn test_malformed_successor_is_propagated() {
        let mut solver = Solver::new(BrokenGenerator, zero);
        for algorithm in [Algorithm::AStar, Algorithm::LazyAStar, Algorithm::Greedy] {
            let err = solver.run(algorithm, &Vertex(0)).unwrap_err();
            assert_eq!(
                err,
                SearchError::MalformedState(MalformedStateError::new("successor lost a ball"))
            );
        }
    }

    #[test]
    fn test_expansion_limit_stops_the_run() {
        let graph = diamond();
        let config = SearchConfig::default().with_max_expansions(2);
        let mut solver = Solver::with_config(&graph, zero, config);
        let outcome = solver.search(&Vertex(0)).unwrap();
        assert_eq!(outcome.termination, Termination::LimitReached);
        assert!(outcome.solution.is_none());
        assert_eq!(outcome.stats.expansions, 2);
        assert!(outcome.stats.open_size > 0);
    }

    #[test]
    fn test_expansion_limit_bounds_lazy_search_on_cycles() {
        let graph = Graph {
            edges: vec![(0, 1, 1), (1, 0, 1), (1, 2, 1), (2, 0, 1)],
        };
        let config = SearchConfig::default().with_max_expansions(50);
        let mut solver = Solver::with_config(&graph, zero, config);
        let outcome = solver.lazy_search(&Vertex(0)).unwrap();
        assert_eq!(outcome.termination, Termination::LimitReached);
        assert_eq!(outcome.stats.expansions, 50);
    }

    #[test]
    fn test_zero_time_limit_stops_before_first_expansion() {
        let graph = diamond();
        let config = SearchConfig::default().with_time_limit(Duration::ZERO);
        let mut solver = Solver::with_config(&graph, zero, config);
        let outcome = solver.search(&Vertex(0)).unwrap();
        assert_eq!(outcome.termination, Termination::LimitReached);
        assert_eq!(outcome.stats.expansions, 0);
        assert_eq!(outcome.stats.open_size, 1);
    }

    #[test]
    fn test_repeated_runs_are_independent() {
        let graph = diamond();
        let mut solver = Solver::new(&graph, zero);
        let first = solver.search(&Vertex(0)).unwrap();
        let _ = solver.lazy_search(&Vertex(0)).unwrap();
        let second = solver.search(&Vertex(0)).unwrap();
        assert_eq!(first.solution, second.solution);
        assert_eq!(first.stats.expansions, second.stats.expansions);
        assert_eq!(first.stats.generated, second.stats.generated);
        assert_eq!(solver.expansions(), 4);
    }

    #[test]
    fn test_expansions_count_non_goal_extractions() {
        let graph = diamond();
        let config = SearchConfig::default().with_key_recording(true);
        let mut solver = Solver::with_config(&graph, zero, config);
        let outcome = solver.search(&Vertex(0)).unwrap();
        // One key per expansion plus the goal.
        assert_eq!(
            outcome.stats.extracted_keys.len() as u64,
            outcome.stats.expansions + 1
        );
        assert_eq!(outcome.stats.extracted_keys, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_weighted_astar_uses_weight_in_key() {
        let graph = diamond();
        let config = SearchConfig::default()
            .with_weight(3.0)
            .with_key_recording(true);
        let mut solver = Solver::with_config(&graph, |_: &Vertex| 1, config);
        let outcome = solver.search(&Vertex(0)).unwrap();
        assert_eq!(outcome.stats.extracted_keys[0], 3.0);
    }

    #[test]
    fn test_sorted_puzzle_needs_no_expansions() {
        let state = state_from_str_array(&["RR", "BB"], 2).unwrap();
        assert!(state.is_final());
        let mut solver = Solver::new(BallSortRules::default(), no_heuristic);
        let outcome = solver.search(&state).unwrap();
        assert!(outcome.solution.unwrap().is_empty());
        assert_eq!(outcome.stats.expansions, 0);
    }

    fn states_within(rules: &BallSortRules, root: &BallSortState, depth: usize) -> usize {
        let mut seen = HashSet::from([root.clone()]);
        let mut layer = vec![root.clone()];
        for _ in 0..depth {
            let mut next = Vec::new();
            for state in &layer {
                for successor in rules.legal_moves(state).unwrap() {
                    if seen.insert(successor.state.clone()) {
                        next.push(successor.state);
                    }
                }
            }
            layer = next;
        }
        seen.len()
    }

    #[test]
    fn test_two_move_puzzle_without_heuristic() {
        let state = state_from_str_array(&["RR", "BB", "RB"], 3).unwrap();
        let rules = BallSortRules::default();
        let mut solver = Solver::new(&rules, no_heuristic);
        let outcome = solver.search(&state).unwrap();

        let solution = outcome.solution.unwrap();
        assert_eq!(solution.len(), 2);
        assert_eq!(solution.cost, 2);
        assert!(solution.final_state().is_final());
        assert!(outcome.stats.expansions as usize <= states_within(&rules, &state, 2));

        // Replaying the moves reproduces the goal.
        let mut replay = state.clone();
        for mv in &solution.moves {
            replay = rules.apply(&replay, *mv).unwrap();
        }
        assert_eq!(&replay, solution.final_state());
    }

    #[test]
    fn test_astar_keys_never_decrease_with_consistent_heuristic() {
        let state = BallSortState::scrambled(3, 3, 2, 8, 7).unwrap();
        let config = SearchConfig::default().with_key_recording(true);
        let mut solver = Solver::with_config(BallSortRules::default(), majority_color_heuristic, config);
        let outcome = solver.search(&state).unwrap();
        assert!(outcome.is_solved());
        assert!(outcome.stats.admissible);
        assert!(outcome
            .stats
            .extracted_keys
            .windows(2)
            .all(|pair| pair[0] <= pair[1]));
    }
}
