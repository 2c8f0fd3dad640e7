//! Intake node: identifies the patient, then answers routine questions or hands off.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::classify;
use crate::collab::CallPolicy;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::{GenerationRequest, LlmClient};
use crate::patient::{PatientDirectory, PatientLookup, PatientRecord};
use crate::state::{ActiveRole, TurnState};

use super::prompts;

/// First node of every turn.
///
/// Without an attached patient the input is taken as a name and looked up: one match
/// attaches the record and replies with the discharge summary, anything else asks again.
/// With a patient attached, handoff terms produce a short acknowledgement and set
/// `needs_handoff`; other messages get a generated reply grounded in the patient record.
/// Every path writes a reply; collaborator failures become fixed fallback text.
pub struct IntakeNode {
    directory: Arc<dyn PatientDirectory>,
    llm: Arc<dyn LlmClient>,
    policy: CallPolicy,
}

impl IntakeNode {
    pub fn new(
        directory: Arc<dyn PatientDirectory>,
        llm: Arc<dyn LlmClient>,
        policy: CallPolicy,
    ) -> Self {
        Self {
            directory,
            llm,
            policy,
        }
    }

    async fn identify(&self, state: &mut TurnState) {
        let name = state.input.trim().to_string();
        if name.is_empty() {
            state.delta.reply = Some(prompts::ASK_FOR_NAME.to_string());
            return;
        }

        let lookup = self
            .policy
            .call("patient_directory", || self.directory.lookup(&name))
            .await;
        match lookup {
            Ok(PatientLookup::Found(record)) => {
                info!(session_id = %state.session.id, patient = %record.name, "patient identified");
                state.delta.reply = Some(prompts::discharge_summary(&record));
                state.delta.patient = Some(record);
                state.delta.active_role = Some(ActiveRole::Intake);
            }
            Ok(PatientLookup::NotFound) => {
                debug!(session_id = %state.session.id, candidate = %name, "no patient record");
                state.delta.reply = Some(prompts::not_found(&name));
            }
            Ok(PatientLookup::Ambiguous(count)) => {
                debug!(session_id = %state.session.id, candidate = %name, count, "ambiguous patient name");
                state.delta.reply = Some(prompts::ambiguous(&name, count));
            }
            Err(e) => {
                warn!(session_id = %state.session.id, error = %e, "patient lookup failed");
                state.delta.reply = Some(prompts::LOOKUP_FAILED.to_string());
                state.delta.error = Some(e.to_string());
            }
        }
    }

    async fn answer(&self, state: &mut TurnState, record: &PatientRecord) {
        let request = GenerationRequest::new(state.input.clone())
            .with_system(prompts::INTAKE_SYSTEM_PROMPT)
            .with_system(prompts::patient_brief(record))
            .with_history(state.history());
        let reply = match self
            .policy
            .call("llm", || self.llm.generate(&request))
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(session_id = %state.session.id, error = %e, "intake generation failed");
                state.delta.error = Some(e.to_string());
                prompts::intake_fallback(&record.name)
            }
        };
        state.delta.reply = Some(reply);
        state.delta.active_role = Some(ActiveRole::Intake);
    }
}

#[async_trait]
impl Node<TurnState> for IntakeNode {
    fn id(&self) -> &str {
        super::INTAKE
    }

    async fn run(&self, mut state: TurnState) -> Result<(TurnState, Next), AgentError> {
        let record = match state.patient() {
            Some(r) => r.clone(),
            None => {
                self.identify(&mut state).await;
                return Ok((state, Next::Continue));
            }
        };

        if classify::needs_handoff(&state.input) {
            debug!(
                session_id = %state.session.id,
                terms = ?classify::HANDOFF.matched_terms(&state.input),
                "handing off to concern routing"
            );
            state.context.needs_handoff = true;
            state.delta.reply = Some(prompts::HANDOFF_ACK.to_string());
        } else {
            self.answer(&mut state, &record).await;
        }
        Ok((state, Next::Continue))
    }
}
