//! Per-session serialization, concurrency across sessions, cancellation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use caregraph::{AgentError, GenerationRequest, LlmClient, MockLlm};
use tokio::sync::Barrier;

use crate::common::{FixtureBuilder, MEDICATIONS};

/// Tracks how many generations are in flight at once.
#[derive(Default)]
struct InFlightLlm {
    current: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl LlmClient for InFlightLlm {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AgentError> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(format!("re: {}", request.query))
    }
}

/// Completes only once two generations are waiting together.
struct RendezvousLlm {
    barrier: Barrier,
}

#[async_trait]
impl LlmClient for RendezvousLlm {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String, AgentError> {
        self.barrier.wait().await;
        Ok("together".into())
    }
}

/// **Scenario**: Concurrent turns on one session never overlap and keep each
/// user/assistant pair adjacent in the log.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_session_turns_are_serialized() {
    let llm = Arc::new(InFlightLlm::default());
    let f = Arc::new(FixtureBuilder::new(llm.clone()).build());
    let id = f.identified_session().await;

    let mut handles = Vec::new();
    for i in 0..6 {
        let f = f.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            f.engine
                .process_turn(Some(&id), &format!("question {}", i))
                .await
                .unwrap()
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(llm.peak.load(Ordering::SeqCst), 1);
    let session = f.engine.session(&id).await.unwrap().unwrap();
    assert_eq!(session.turn_count, 7);
    let history = f.engine.history(&id).await.unwrap();
    assert_eq!(history.len(), 14);
    for pair in history[2..].chunks(2) {
        assert_eq!(pair[1].text, format!("re: {}", pair[0].text));
    }
}

/// **Scenario**: Turns on different sessions run at the same time.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn different_sessions_run_concurrently() {
    let llm = Arc::new(RendezvousLlm {
        barrier: Barrier::new(2),
    });
    let f = Arc::new(FixtureBuilder::new(llm).build());
    let a = f.identified_session().await;
    let b = f.identified_session().await;

    let (fa, fb) = (f.clone(), f.clone());
    let both = async move {
        tokio::join!(
            fa.engine.process_turn(Some(&a), MEDICATIONS),
            fb.engine.process_turn(Some(&b), MEDICATIONS),
        )
    };
    let (ra, rb) = tokio::time::timeout(Duration::from_secs(5), both)
        .await
        .expect("sessions must not block each other");
    assert_eq!(ra.unwrap().reply, "together");
    assert_eq!(rb.unwrap().reply, "together");
}

/// **Scenario**: Dropping a turn mid-flight persists nothing and releases the session.
#[tokio::test]
async fn cancelled_turn_is_not_persisted() {
    let slow = Arc::new(MockLlm::with_reply("late").with_delay(Duration::from_secs(5)));
    let f = FixtureBuilder::new(slow).build();
    let id = f.identified_session().await;
    let before = f.engine.session(&id).await.unwrap().unwrap();

    let cancelled = tokio::time::timeout(
        Duration::from_millis(50),
        f.engine.process_turn(Some(&id), MEDICATIONS),
    )
    .await;
    assert!(cancelled.is_err());

    let after = f.engine.session(&id).await.unwrap().unwrap();
    assert_eq!(after, before);

    tokio::time::timeout(Duration::from_secs(1), f.engine.clear_patient(&id))
        .await
        .expect("lock released after cancellation")
        .unwrap();
}
