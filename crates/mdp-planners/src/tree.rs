//! Arena-backed search tree for MCTS
//!
//! Nodes live in one `Vec` and refer to each other by index. The parent link
//! is non-owning and only walked during backpropagation.

/// Index of a node in its [`SearchTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug)]
pub(crate) struct Node<S, A> {
    pub state: S,
    pub parent: Option<(NodeId, A)>,
    /// Children in expansion order
    pub children: Vec<(A, NodeId)>,
    pub visits: u64,
    pub value_sum: f64,
}

impl<S, A> Node<S, A> {
    fn new(state: S, parent: Option<(NodeId, A)>) -> Self {
        Self {
            state,
            parent,
            children: Vec::new(),
            visits: 0,
            value_sum: 0.0,
        }
    }

    /// Mean backed-up return, 0 while unvisited
    pub fn q_value(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / self.visits as f64
        }
    }
}

#[derive(Debug)]
pub(crate) struct SearchTree<S, A> {
    nodes: Vec<Node<S, A>>,
}

impl<S, A: PartialEq> SearchTree<S, A> {
    pub fn new(root_state: S) -> Self {
        Self {
            nodes: vec![Node::new(root_state, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &Node<S, A> {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<S, A> {
        &mut self.nodes[id.0]
    }

    pub fn has_child(&self, id: NodeId, action: &A) -> bool {
        self.node(id).children.iter().any(|(a, _)| a == action)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (&A, &Node<S, A>)> + '_ {
        self.node(id)
            .children
            .iter()
            .map(move |(a, child)| (a, self.node(*child)))
    }

    /// Attach a fresh node for `state` under `parent` via `action`
    pub fn add_child(&mut self, parent: NodeId, action: A, state: S) -> NodeId
    where
        A: Clone,
    {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Node::new(state, Some((parent, action.clone()))));
        self.node_mut(parent).children.push((action, id));
        id
    }
}
