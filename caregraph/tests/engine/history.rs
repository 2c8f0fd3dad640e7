//! Message log and history replay.

use std::sync::Arc;

use caregraph::mock::{MockRetriever, MockWebSearch};
use caregraph::nodes::prompts;
use caregraph::{MockLlm, Role};

use crate::common::{guideline_hit, FixtureBuilder, GUIDELINES, MEDICATIONS, SIDE_EFFECTS};

/// **Scenario**: Each turn adds the user message then the one terminal reply; history
/// replays exactly the replies returned, whichever branches ran.
#[tokio::test]
async fn history_replays_turns_in_order() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("Answer.")))
        .retriever(MockRetriever::with_passages(&["passage"]))
        .search(MockWebSearch::with_hits(vec![guideline_hit()]))
        .build();

    let inputs = ["Noah Bennett", MEDICATIONS, GUIDELINES, SIDE_EFFECTS, "my leg hurts"];
    let mut session_id: Option<String> = None;
    let mut expected = Vec::new();
    for (i, input) in inputs.iter().enumerate() {
        let out = f
            .engine
            .process_turn(session_id.as_deref(), input)
            .await
            .unwrap();
        assert_eq!(out.turn_count, i as u64 + 1);
        expected.push((Role::User, input.to_string()));
        expected.push((Role::Assistant, out.reply.clone()));
        session_id = Some(out.session_id);

        let history = f.engine.history(session_id.as_deref().unwrap()).await.unwrap();
        assert_eq!(history.len(), 2 * (i + 1));
    }

    let id = session_id.unwrap();
    let replayed: Vec<(Role, String)> = f
        .engine
        .history(&id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| (e.role, e.text))
        .collect();
    assert_eq!(replayed, expected);

    let again: Vec<(Role, String)> = f
        .engine
        .history(&id)
        .await
        .unwrap()
        .into_iter()
        .map(|e| (e.role, e.text))
        .collect();
    assert_eq!(again, replayed);
}

/// **Scenario**: The intake acknowledgement on a routed turn is replaced, not logged.
#[tokio::test]
async fn handoff_acknowledgement_is_not_logged() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("Answer.")))
        .search(MockWebSearch::with_hits(vec![guideline_hit()]))
        .build();
    let id = f.identified_session().await;
    f.engine.process_turn(Some(&id), GUIDELINES).await.unwrap();

    let history = f.engine.history(&id).await.unwrap();
    assert_eq!(history.len(), 4);
    assert!(history.iter().all(|e| e.text != prompts::HANDOFF_ACK));
}

/// **Scenario**: Generation sees prior turns but not the current message as history.
#[tokio::test]
async fn generation_history_excludes_current_message() {
    let llm = Arc::new(MockLlm::with_reply("Answer."));
    let f = FixtureBuilder::new(llm.clone()).build();
    let id = f.identified_session().await;

    f.engine.process_turn(Some(&id), MEDICATIONS).await.unwrap();

    let req = &llm.requests()[0];
    assert_eq!(req.query, MEDICATIONS);
    assert_eq!(req.history.len(), 2);
    assert_eq!(req.history[0].text(), "Noah Bennett");
}

#[tokio::test]
async fn history_entries_serialize_with_role_and_text() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("unused"))).build();
    let id = f.identified_session().await;
    let history = f.engine.history(&id).await.unwrap();
    let json = serde_json::to_value(&history[0]).unwrap();
    assert_eq!(json["role"], "user");
    assert_eq!(json["text"], "Noah Bennett");
}
