//! System prompts and fixed reply texts.

use crate::patient::PatientRecord;

/// System prompt for intake replies that do not need concern routing.
pub const INTAKE_SYSTEM_PROMPT: &str = "You are a friendly post-discharge care receptionist. \
Answer routine questions about the patient's discharge information, medications, schedule \
and appointments using the patient information provided. Keep answers short and warm. \
Do not give clinical advice; if the patient describes symptoms, tell them a clinical \
specialist can help.";

/// System prompt for the response composer.
pub const CONCERN_SYSTEM_PROMPT: &str = "You are a clinical assistant supporting patients \
after hospital discharge. Answer the patient's question using their discharge record and \
any reference material in the context, and cite that material when you use it. Be clear \
and cautious. Tell the patient to contact their care team or emergency services when \
warning signs are present.";

/// Acknowledgement emitted by intake when it hands a turn to concern routing.
pub const HANDOFF_ACK: &str =
    "I understand you have medical concerns. Let me connect you with our clinical specialist.";

/// Reply to an empty message when no patient is identified yet.
pub const ASK_FOR_NAME: &str =
    "Hello! Please provide your full name so I can retrieve your patient records.";

/// Reply when the identity lookup itself failed.
pub const LOOKUP_FAILED: &str = "I apologize, but I'm having trouble processing your request. \
Could you please rephrase that?";

/// Composer reply when generation failed.
pub const CONCERN_FALLBACK: &str = "I apologize, but I'm having difficulty processing your \
medical query. Please try rephrasing or contact your healthcare provider directly for \
urgent concerns.";

/// Appended when the reply used knowledge base passages.
pub const KNOWLEDGE_SOURCE_SUFFIX: &str = "\n\n---\n**Source:** Medical Knowledge Base";

/// Appended when the reply used live search results.
pub const LIVE_SEARCH_SOURCE_SUFFIX: &str = "\n\n---\n**Source:** Recent Web Search Results";

pub fn not_found(name: &str) -> String {
    format!(
        "I couldn't find a patient record for '{}'. Please enter your full name exactly as it \
         appears in our system.",
        name
    )
}

pub fn ambiguous(name: &str, count: usize) -> String {
    format!(
        "I found {} patient records matching '{}'. Please contact the care team so we can \
         confirm which record is yours, or enter your full name exactly as registered.",
        count, name
    )
}

pub fn intake_fallback(name: &str) -> String {
    format!("I'm here to help, {}. Could you please rephrase your question?", name)
}

/// Greeting with the discharge summary, shown once the patient is identified.
pub fn discharge_summary(record: &PatientRecord) -> String {
    let medications = if record.medications.is_empty() {
        "None listed".to_string()
    } else {
        record.medications.join("\n  - ")
    };
    format!(
        "Hello {}! I've found your record. Here's your discharge information:\n\n\
         **Discharge Summary:**\n\
         - **Diagnosis:** {}\n\
         - **Discharge Date:** {}\n\
         - **Medications:**\n  - {}\n\
         - **Dietary Restrictions:** {}\n\
         - **Follow-up:** {}\n\
         - **Warning Signs:** {}\n\n\
         How can I assist you today? Do you have any questions about your medications, \
         recovery, or symptoms?",
        record.name,
        record.diagnosis,
        record.discharge_date.as_deref().unwrap_or("N/A"),
        medications,
        record.dietary_restrictions.as_deref().unwrap_or("None"),
        record.follow_up.as_deref().unwrap_or("Not scheduled"),
        record.warning_signs.as_deref().unwrap_or("None specified"),
    )
}

/// Short patient brief given to intake generation.
pub fn patient_brief(record: &PatientRecord) -> String {
    format!(
        "Patient Information:\n\
         - Name: {}\n\
         - Diagnosis: {}\n\
         - Discharge Date: {}\n\
         - Medications: {}",
        record.name,
        record.diagnosis,
        record.discharge_date.as_deref().unwrap_or("Not available"),
        record.medications.join(", "),
    )
}
