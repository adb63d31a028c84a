//! Search nodes, the node arena, and solution reconstruction.
//!
//! Parent links are `NodeId` indices into the arena that owns every node of a
//! run, so the back-pointers never own anything and cannot form cycles.

/// Path and step cost.
pub type Cost = u64;

/// `g` of a node that has been generated but not yet reached by any path.
pub const UNREACHED: Cost = Cost::MAX;

/// Index of a node inside a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A state plus the bookkeeping the search needs for it.
#[derive(Clone, Debug)]
pub struct SearchNode<S, A> {
    pub state: S,
    /// Cost of the best known path from the root.
    pub g: Cost,
    /// Heuristic estimate, computed once when the node is created.
    pub h: Cost,
    /// Priority in the open list.
    pub key: f64,
    pub parent: Option<NodeId>,
    /// Move that leads from `parent` to this node.
    pub action: Option<A>,
    /// Set once the node has been extracted and expanded.
    pub closed: bool,
    /// Bumped whenever `g`/`parent` improve; open-list entries carrying an
    /// older version are stale.
    pub version: u32,
}

impl<S, A> SearchNode<S, A> {
    /// A node nothing has reached yet (`g` is [`UNREACHED`]).
    pub fn unreached(state: S, h: Cost) -> Self {
        SearchNode {
            state,
            g: UNREACHED,
            h,
            key: f64::INFINITY,
            parent: None,
            action: None,
            closed: false,
            version: 0,
        }
    }

    /// The root of a search tree.
    pub fn root(state: S, h: Cost, key: f64) -> Self {
        SearchNode {
            g: 0,
            key,
            ..SearchNode::unreached(state, h)
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Owner of every node created during one search run.
#[derive(Debug)]
pub struct NodeArena<S, A> {
    nodes: Vec<SearchNode<S, A>>,
}

impl<S, A> NodeArena<S, A> {
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: SearchNode<S, A>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn get(&self, id: NodeId) -> &SearchNode<S, A> {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode<S, A> {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<S: Clone, A: Clone> NodeArena<S, A> {
    /// Rebuilds the root-to-`goal` path by following parent links.
    ///
    /// # Panics
    /// Panics if a non-root node on the chain has no recorded action, which
    /// the solver never produces.
    pub fn trace(&self, goal: NodeId) -> Solution<S, A> {
        let goal_node = self.get(goal);
        let mut moves = Vec::new();
        let mut states = Vec::new();
        let mut current = goal_node;
        while let Some(parent) = current.parent {
            let action = current
                .action
                .clone()
                .expect("every non-root node records the action that reached it");
            moves.push(action);
            states.push(current.state.clone());
            current = self.get(parent);
        }
        moves.reverse();
        states.reverse();
        Solution {
            initial: current.state.clone(),
            moves,
            states,
            cost: goal_node.g,
        }
    }
}

impl<S, A> Default for NodeArena<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// A root-to-goal path.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution<S, A> {
    /// State the path starts from.
    pub initial: S,
    /// Moves in the order they are played.
    pub moves: Vec<A>,
    /// `states[i]` is the state reached after `moves[i]`.
    pub states: Vec<S>,
    /// Sum of step costs along the path.
    pub cost: Cost,
}

impl<S, A> Solution<S, A> {
    /// The goal state (the initial state for an empty path).
    pub fn final_state(&self) -> &S {
        self.states.last().unwrap_or(&self.initial)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
