//! What a node asks the graph to do after it returns.

/// Control returned by `Node::run` alongside the new state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Next {
    /// Follow the node's outgoing edge or conditional edge; end if it has none.
    Continue,
    /// Run the node with this id next, bypassing the graph's edges.
    Node(String),
    /// Stop and return the current state.
    End,
}
