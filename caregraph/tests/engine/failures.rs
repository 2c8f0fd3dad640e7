//! Soft collaborator failures, timeouts and invariant violations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use caregraph::graph::NodeRunFn;
use caregraph::mock::{MockRetriever, MockWebSearch};
use caregraph::nodes::{self, prompts};
use caregraph::{AgentError, MockLlm, Next, NodeMiddleware, TurnState};

use crate::common::{fast_config, guideline_hit, FixtureBuilder, GUIDELINES, SIDE_EFFECTS};

/// **Scenario**: A failing retriever degrades to no context; the turn still completes
/// and the error is recorded on the session.
#[tokio::test]
async fn retrieval_failure_is_soft() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("General advice.")))
        .retriever(MockRetriever::failing())
        .config(fast_config())
        .build();
    let id = f.identified_session().await;

    let out = f.engine.process_turn(Some(&id), SIDE_EFFECTS).await.unwrap();

    assert_eq!(out.reply, "General advice.");
    assert!(!out.used_prior_knowledge);
    let session = f.engine.session(&id).await.unwrap().unwrap();
    assert!(session
        .last_error
        .as_deref()
        .unwrap()
        .starts_with("knowledge retrieval"));
}

/// **Scenario**: A search slower than the deadline is treated as a failure, not a hang.
#[tokio::test]
async fn slow_search_times_out_softly() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("General advice.")))
        .search(
            MockWebSearch::with_hits(vec![guideline_hit()]).with_delay(Duration::from_secs(5)),
        )
        .config(fast_config())
        .build();
    let id = f.identified_session().await;

    let out = tokio::time::timeout(
        Duration::from_secs(2),
        f.engine.process_turn(Some(&id), GUIDELINES),
    )
    .await
    .expect("turn must not hang")
    .unwrap();

    assert_eq!(out.reply, "General advice.");
    assert!(!out.used_live_search);
}

/// **Scenario**: Failed generation in the composer yields the fixed fallback and no
/// source line even though passages were retrieved.
#[tokio::test]
async fn composer_generation_failure_returns_fallback() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::failing()))
        .retriever(MockRetriever::with_passages(&["passage"]))
        .config(fast_config())
        .build();
    let id = f.identified_session().await;

    let out = f.engine.process_turn(Some(&id), SIDE_EFFECTS).await.unwrap();

    assert_eq!(out.reply, prompts::CONCERN_FALLBACK);
    assert!(!out.used_prior_knowledge);
    assert_eq!(out.turn_count, 2);
}

#[tokio::test]
async fn intake_generation_timeout_returns_named_fallback() {
    let llm = MockLlm::with_reply("late").with_delay(Duration::from_secs(5));
    let f = FixtureBuilder::new(Arc::new(llm))
        .config(fast_config())
        .build();
    let id = f.identified_session().await;

    let out = f
        .engine
        .process_turn(Some(&id), "When is my appointment?")
        .await
        .unwrap();

    assert_eq!(out.reply, prompts::intake_fallback("Noah Bennett"));
}

/// **Scenario**: A clean turn after a failed one clears the recorded error.
#[tokio::test]
async fn clean_turn_clears_last_error() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("ok")))
        .retriever(MockRetriever::failing())
        .config(fast_config())
        .build();
    let id = f.identified_session().await;

    f.engine.process_turn(Some(&id), SIDE_EFFECTS).await.unwrap();
    assert!(f.engine.session(&id).await.unwrap().unwrap().last_error.is_some());

    f.engine
        .process_turn(Some(&id), "When is my appointment?")
        .await
        .unwrap();
    assert!(f.engine.session(&id).await.unwrap().unwrap().last_error.is_none());
}

/// Forces both retrieval flags after concern routing.
struct CorruptFlags;

#[async_trait]
impl NodeMiddleware<TurnState> for CorruptFlags {
    async fn around_run(
        &self,
        node_id: &str,
        state: TurnState,
        inner: NodeRunFn<TurnState>,
    ) -> Result<(TurnState, Next), AgentError> {
        let (mut state, next) = inner(state).await?;
        if node_id == nodes::CONCERN_ROUTER {
            state.context.needs_live_search = true;
            state.context.needs_prior_knowledge = true;
        }
        Ok((state, next))
    }
}

/// **Scenario**: Both retrieval flags set fails the turn loudly and persists nothing.
#[tokio::test]
async fn both_flags_fail_turn_without_persisting() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("ok")))
        .middleware(Arc::new(CorruptFlags))
        .build();
    let id = f.identified_session().await;

    let err = f
        .engine
        .process_turn(Some(&id), GUIDELINES)
        .await
        .unwrap_err();

    assert!(matches!(err, AgentError::InvariantViolation(_)));
    let session = f.engine.session(&id).await.unwrap().unwrap();
    assert_eq!(session.turn_count, 1);
    assert_eq!(session.messages.len(), 2);
    assert_eq!(f.search.call_count(), 0);
}
