//! Patient identification on fresh sessions.

use std::sync::Arc;

use caregraph::nodes::{self, prompts};
use caregraph::{ActiveRole, MockLlm};

use crate::common::FixtureBuilder;

/// **Scenario**: A unique name attaches the record and replies with the discharge summary.
#[tokio::test]
async fn unique_name_attaches_record_and_summarizes() {
    let llm = Arc::new(MockLlm::with_reply("unused"));
    let f = FixtureBuilder::new(llm.clone()).build();

    let out = f.engine.process_turn(None, "Noah Bennett").await.unwrap();

    assert_eq!(out.patient_name.as_deref(), Some("Noah Bennett"));
    assert!(out.reply.contains("Chronic Kidney Disease Stage 3"));
    assert!(out.reply.contains("Lisinopril 10mg daily"));
    assert!(out.reply.contains("Nephrology in 2 weeks"));
    assert_eq!(out.path, vec![nodes::INTAKE]);
    assert_eq!(out.turn_count, 1);
    assert_eq!(out.active_role, ActiveRole::Intake);
    assert!(!out.used_prior_knowledge && !out.used_live_search);
    assert_eq!(llm.call_count(), 0);
}

/// **Scenario**: An unknown name gets a clarification; the session stays without a patient.
#[tokio::test]
async fn unknown_name_leaves_session_unidentified() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("unused"))).build();

    let out = f.engine.process_turn(None, "Noah Benet").await.unwrap();

    assert_eq!(out.reply, prompts::not_found("Noah Benet"));
    assert!(out.patient_name.is_none());
    let session = f.engine.session(&out.session_id).await.unwrap().unwrap();
    assert!(session.patient.is_none());
    assert_eq!(session.active_role, ActiveRole::Intake);
    assert_eq!(session.turn_count, 1);
}

/// **Scenario**: After a miss, the next message is again treated as a name.
#[tokio::test]
async fn retry_after_miss_identifies_patient() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("unused"))).build();

    let first = f.engine.process_turn(None, "Noah").await.unwrap();
    let second = f
        .engine
        .process_turn(Some(&first.session_id), "noah bennett")
        .await
        .unwrap();

    assert_eq!(second.patient_name.as_deref(), Some("Noah Bennett"));
    assert_eq!(second.turn_count, 2);
    assert_eq!(f.directory.queries(), vec!["Noah", "noah bennett"]);
}

/// **Scenario**: Once identified, a later name-like message is not looked up again.
#[tokio::test]
async fn identified_session_does_not_look_up_again() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("Hi Noah."))).build();
    let id = f.identified_session().await;

    let out = f.engine.process_turn(Some(&id), "Ava Chen").await.unwrap();

    assert_eq!(out.patient_name.as_deref(), Some("Noah Bennett"));
    assert_eq!(out.reply, "Hi Noah.");
    assert_eq!(f.directory.queries().len(), 1);
}

/// **Scenario**: clear_patient allows a different patient to be identified.
#[tokio::test]
async fn clear_patient_allows_new_identification() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("unused"))).build();
    let id = f.identified_session().await;

    assert!(f.engine.clear_patient(&id).await.unwrap());
    let out = f.engine.process_turn(Some(&id), "Ava Chen").await.unwrap();

    assert_eq!(out.patient_name.as_deref(), Some("Ava Chen"));
    assert_eq!(out.turn_count, 2);
}

#[tokio::test]
async fn empty_first_message_asks_for_name() {
    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("unused"))).build();
    let out = f.engine.process_turn(None, "").await.unwrap();
    assert_eq!(out.reply, prompts::ASK_FOR_NAME);
    assert!(f.directory.queries().is_empty());
}
