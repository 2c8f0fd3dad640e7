//! Shared state and nodes for state graph tests.

use async_trait::async_trait;
use caregraph::{AgentError, Next, Node};

/// Trail of node ids plus a counter the routers look at.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceState {
    pub trail: Vec<String>,
    pub count: u32,
}

/// Appends its id to the trail and bumps the counter.
pub struct StepNode {
    id: &'static str,
}

impl StepNode {
    pub fn new(id: &'static str) -> Self {
        Self { id }
    }
}

#[async_trait]
impl Node<TraceState> for StepNode {
    fn id(&self) -> &str {
        self.id
    }

    async fn run(&self, mut state: TraceState) -> Result<(TraceState, Next), AgentError> {
        state.trail.push(self.id.to_string());
        state.count += 1;
        Ok((state, Next::Continue))
    }
}
