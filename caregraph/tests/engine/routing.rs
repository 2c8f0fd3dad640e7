//! Handoff, concern routing and source lines.

use std::sync::Arc;

use caregraph::mock::{MockRetriever, MockWebSearch};
use caregraph::nodes::{self, prompts};
use caregraph::{ActiveRole, MockLlm};

use crate::common::{guideline_hit, FixtureBuilder, GUIDELINES, MEDICATIONS, SIDE_EFFECTS};

/// **Scenario**: "latest guidelines" goes to live search; the reply cites web results.
#[tokio::test]
async fn latest_guidelines_uses_live_search() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("Walk daily.")))
        .retriever(MockRetriever::with_passages(&["unused"]))
        .search(MockWebSearch::with_hits(vec![guideline_hit()]))
        .build();
    let id = f.identified_session().await;

    let out = f.engine.process_turn(Some(&id), GUIDELINES).await.unwrap();

    assert_eq!(
        out.path,
        vec![
            nodes::INTAKE,
            nodes::CONCERN_ROUTER,
            nodes::LIVE_SEARCH,
            nodes::RESPONSE
        ]
    );
    assert_eq!(
        out.reply,
        format!("Walk daily.{}", prompts::LIVE_SEARCH_SOURCE_SUFFIX)
    );
    assert!(out.used_live_search);
    assert!(!out.used_prior_knowledge);
    assert_eq!(out.active_role, ActiveRole::Concern);
    assert_eq!(
        f.search.queries(),
        vec![format!("{} medical health information", GUIDELINES)]
    );
    assert_eq!(f.retriever.call_count(), 0);
}

/// **Scenario**: A question about a new drug hands off and is answered from live search.
#[tokio::test]
async fn new_drug_question_reaches_live_search() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("Ask your nephrologist.")))
        .retriever(MockRetriever::with_passages(&["unused"]))
        .search(MockWebSearch::with_hits(vec![guideline_hit()]))
        .build();
    let id = f.identified_session().await;

    let out = f
        .engine
        .process_turn(Some(&id), "Is there a new drug for kidney disease?")
        .await
        .unwrap();

    assert_eq!(
        out.path,
        vec![
            nodes::INTAKE,
            nodes::CONCERN_ROUTER,
            nodes::LIVE_SEARCH,
            nodes::RESPONSE
        ]
    );
    assert!(out.used_live_search);
    assert_eq!(f.retriever.call_count(), 0);
}

/// **Scenario**: Live search with no hits produces no source line.
#[tokio::test]
async fn live_search_without_hits_has_no_source_line() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("Walk daily.")))
        .search(MockWebSearch::empty())
        .build();
    let id = f.identified_session().await;

    let out = f.engine.process_turn(Some(&id), GUIDELINES).await.unwrap();

    assert_eq!(out.reply, "Walk daily.");
    assert!(!out.used_live_search);
    assert_eq!(f.search.call_count(), 1);
}

/// **Scenario**: A side-effect question goes to the knowledge base and cites it.
#[tokio::test]
async fn side_effects_use_prior_knowledge() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("Dizziness can occur.")))
        .retriever(MockRetriever::with_passages(&["Lisinopril may cause dizziness."]))
        .search(MockWebSearch::with_hits(vec![guideline_hit()]))
        .build();
    let id = f.identified_session().await;

    let out = f.engine.process_turn(Some(&id), SIDE_EFFECTS).await.unwrap();

    assert_eq!(
        out.path,
        vec![
            nodes::INTAKE,
            nodes::CONCERN_ROUTER,
            nodes::KNOWLEDGE_RETRIEVAL,
            nodes::RESPONSE
        ]
    );
    assert_eq!(
        out.reply,
        format!("Dizziness can occur.{}", prompts::KNOWLEDGE_SOURCE_SUFFIX)
    );
    assert!(out.used_prior_knowledge);
    assert!(!out.used_live_search);
    assert_eq!(f.retriever.queries(), vec![SIDE_EFFECTS.to_string()]);
    assert_eq!(f.search.call_count(), 0);
}

#[tokio::test]
async fn knowledge_without_passages_has_no_source_line() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("Dizziness can occur.")))
        .retriever(MockRetriever::empty())
        .build();
    let id = f.identified_session().await;

    let out = f.engine.process_turn(Some(&id), SIDE_EFFECTS).await.unwrap();

    assert_eq!(out.reply, "Dizziness can occur.");
    assert!(!out.used_prior_knowledge);
}

/// **Scenario**: A routine question stays with intake; nothing is retrieved.
#[tokio::test]
async fn routine_question_stays_in_intake() {
    let llm = Arc::new(MockLlm::with_reply("You take Lisinopril and Furosemide."));
    let f = FixtureBuilder::new(llm.clone())
        .retriever(MockRetriever::with_passages(&["unused"]))
        .search(MockWebSearch::with_hits(vec![guideline_hit()]))
        .build();
    let id = f.identified_session().await;

    let out = f.engine.process_turn(Some(&id), MEDICATIONS).await.unwrap();

    assert_eq!(out.path, vec![nodes::INTAKE]);
    assert_eq!(out.reply, "You take Lisinopril and Furosemide.");
    assert_eq!(out.active_role, ActiveRole::Intake);
    assert_eq!(f.retriever.call_count(), 0);
    assert_eq!(f.search.call_count(), 0);
    assert_eq!(llm.call_count(), 1);
}

/// **Scenario**: A concern with neither vocabulary skips retrieval but still composes.
#[tokio::test]
async fn concern_without_retrieval_goes_straight_to_response() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("Please rest.")))
        .retriever(MockRetriever::with_passages(&["unused"]))
        .build();
    let id = f.identified_session().await;

    let out = f
        .engine
        .process_turn(Some(&id), "I am feeling worse tonight")
        .await
        .unwrap();

    assert_eq!(
        out.path,
        vec![nodes::INTAKE, nodes::CONCERN_ROUTER, nodes::RESPONSE]
    );
    assert_eq!(out.reply, "Please rest.");
    assert_eq!(f.retriever.call_count(), 0);
}

/// **Scenario**: Over a mix of turns every reply carries at most one source line, and the
/// one present matches the branch that ran.
#[tokio::test]
async fn source_line_matches_branch_across_turns() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("Answer.")))
        .retriever(MockRetriever::with_passages(&["passage"]))
        .search(MockWebSearch::with_hits(vec![guideline_hit()]))
        .build();
    let id = f.identified_session().await;

    for input in [GUIDELINES, SIDE_EFFECTS, MEDICATIONS, "my chest hurts", GUIDELINES] {
        let out = f.engine.process_turn(Some(&id), input).await.unwrap();
        let k = out.reply.matches(prompts::KNOWLEDGE_SOURCE_SUFFIX).count();
        let w = out.reply.matches(prompts::LIVE_SEARCH_SOURCE_SUFFIX).count();
        assert!(k + w <= 1, "{}", out.reply);
        assert_eq!(k == 1, out.path.iter().any(|n| n == nodes::KNOWLEDGE_RETRIEVAL));
        assert_eq!(w == 1, out.path.iter().any(|n| n == nodes::LIVE_SEARCH));
        assert_eq!(k == 1, out.used_prior_knowledge);
        assert_eq!(w == 1, out.used_live_search);
    }
}
