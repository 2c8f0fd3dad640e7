//! Session and per-turn state.
//!
//! [`Session`] is the durable per-conversation record. [`TurnState`] is what flows through
//! the graph during one turn: a read-only snapshot of the session, the transient routing
//! flags in [`TurnContext`], and the [`TurnDelta`] that nodes write into. At turn
//! completion the engine folds the delta into the session with [`Session::apply`]; that
//! function is the single place where each field's update rule lives.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;
use crate::message::Message;
use crate::patient::PatientRecord;

/// Role currently holding the conversation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveRole {
    #[default]
    Intake,
    Concern,
}

/// Durable per-conversation state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// Append-only, insertion order significant.
    pub messages: Vec<Message>,
    pub patient: Option<Arc<PatientRecord>>,
    pub active_role: ActiveRole,
    /// Completed turns; incremented once per turn by [`Session::apply`].
    pub turn_count: u64,
    pub last_error: Option<String>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: Vec::new(),
            patient: None,
            active_role: ActiveRole::Intake,
            turn_count: 0,
            last_error: None,
        }
    }

    pub fn patient_name(&self) -> Option<&str> {
        self.patient.as_ref().map(|p| p.name.as_str())
    }

    /// Folds a completed turn's delta into the session.
    ///
    /// Update rules:
    /// - `messages`: append `user_message` (if any) then `reply`.
    /// - `patient`: set when the delta carries one; the same patient is a no-op, a
    ///   different patient while one is attached is an invariant violation.
    /// - `active_role`: overwrite when the delta carries one.
    /// - `turn_count`: +1.
    /// - `last_error`: overwrite with the delta's error, so a clean turn clears it.
    ///
    /// Validates everything before mutating, so on error the session is unchanged.
    pub fn apply(&mut self, delta: TurnDelta) -> Result<(), AgentError> {
        if let (Some(current), Some(incoming)) = (&self.patient, &delta.patient) {
            if current.name != incoming.name {
                return Err(AgentError::InvariantViolation(format!(
                    "session {} already has patient {}; refusing to attach {}",
                    self.id, current.name, incoming.name
                )));
            }
        }
        let reply = delta.reply.ok_or_else(|| {
            AgentError::InvariantViolation(format!(
                "turn for session {} completed without a reply",
                self.id
            ))
        })?;

        if let Some(user) = delta.user_message {
            self.messages.push(Message::User(user));
        }
        self.messages.push(Message::Assistant(reply));
        if delta.patient.is_some() && self.patient.is_none() {
            self.patient = delta.patient;
        }
        if let Some(role) = delta.active_role {
            self.active_role = role;
        }
        self.turn_count += 1;
        self.last_error = delta.error;
        Ok(())
    }

    /// Detaches the patient record so a different patient can be identified.
    pub fn clear_patient(&mut self) {
        self.patient = None;
        self.active_role = ActiveRole::Intake;
    }
}

/// Routing flags and retrieval results for one turn. Dropped at turn end.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnContext {
    pub needs_handoff: bool,
    pub needs_prior_knowledge: bool,
    pub needs_live_search: bool,
    pub prior_knowledge_result: Option<String>,
    pub live_search_result: Option<String>,
    /// Set by the composer when its reply cites the knowledge base.
    pub used_prior_knowledge: bool,
    /// Set by the composer when its reply cites live search results.
    pub used_live_search: bool,
}

impl TurnContext {
    /// Clears retrieval results left by an earlier routing pass.
    pub fn clear_retrieval(&mut self) {
        self.prior_knowledge_result = None;
        self.live_search_result = None;
    }

    /// Fails when both strategies are selected or both produced content.
    pub fn check_exclusive(&self) -> Result<(), AgentError> {
        if self.needs_prior_knowledge && self.needs_live_search {
            return Err(AgentError::InvariantViolation(
                "both prior-knowledge and live-search selected".into(),
            ));
        }
        let has = |r: &Option<String>| r.as_deref().is_some_and(|s| !s.is_empty());
        if has(&self.prior_knowledge_result) && has(&self.live_search_result) {
            return Err(AgentError::InvariantViolation(
                "both prior-knowledge and live-search results present".into(),
            ));
        }
        Ok(())
    }
}

/// Changes a turn makes to its session, merged by [`Session::apply`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TurnDelta {
    pub user_message: Option<String>,
    /// Overwritten by each node that speaks; the last one is the terminal reply.
    pub reply: Option<String>,
    pub patient: Option<Arc<PatientRecord>>,
    pub active_role: Option<ActiveRole>,
    /// Latest non-fatal error recorded during the turn.
    pub error: Option<String>,
}

/// Graph state for one turn.
#[derive(Clone, Debug)]
pub struct TurnState {
    /// Snapshot taken at turn start; nodes read it, never write it.
    pub session: Session,
    pub input: String,
    pub context: TurnContext,
    pub delta: TurnDelta,
}

impl TurnState {
    pub fn new(session: Session, input: impl Into<String>) -> Self {
        let input = input.into();
        Self {
            session,
            delta: TurnDelta {
                user_message: Some(input.clone()),
                ..Default::default()
            },
            input,
            context: TurnContext::default(),
        }
    }

    /// Patient for this turn: the one attached earlier or one resolved during the turn.
    pub fn patient(&self) -> Option<&Arc<PatientRecord>> {
        self.delta.patient.as_ref().or(self.session.patient.as_ref())
    }

    /// Most recent user-authored text: this turn's input.
    pub fn latest_user_text(&self) -> &str {
        self.delta
            .user_message
            .as_deref()
            .or_else(|| {
                self.session.messages.iter().rev().find_map(|m| match m {
                    Message::User(s) => Some(s.as_str()),
                    Message::Assistant(_) => None,
                })
            })
            .unwrap_or(&self.input)
    }

    /// Conversation so far, excluding the current input.
    pub fn history(&self) -> &[Message] {
        &self.session.messages
    }
}
