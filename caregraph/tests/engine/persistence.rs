//! Sessions stored in SQLite survive an engine restart.

use std::sync::Arc;

use caregraph::{MockLlm, SqliteSessionStore};

use crate::common::{FixtureBuilder, MEDICATIONS};

/// **Scenario**: A second engine over the same database continues the conversation.
#[tokio::test]
async fn sessions_survive_engine_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.db");

    let id = {
        let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("first")))
            .store(Arc::new(SqliteSessionStore::new(&path).unwrap()))
            .build();
        f.identified_session().await
    };

    let f = FixtureBuilder::new(Arc::new(MockLlm::with_reply("second")))
        .store(Arc::new(SqliteSessionStore::new(&path).unwrap()))
        .build();
    let out = f.engine.process_turn(Some(&id), MEDICATIONS).await.unwrap();

    assert_eq!(out.patient_name.as_deref(), Some("Noah Bennett"));
    assert_eq!(out.turn_count, 2);
    assert_eq!(out.reply, "second");
    assert_eq!(f.engine.history(&id).await.unwrap().len(), 4);
    assert!(f.directory.queries().is_empty());
}
