//! Unit tests for caregraph-cli, organized by module.
//!
//! Tests are BDD-style with Given/When/Then comments and descriptive names. Each
//! submodule documents the behaviour under test.


use caregraph::PatientRecord;

pub(crate) const NOAH_JSON: &str = r#"[
  {
    "patient_name": "Noah Bennett",
    "primary_diagnosis": "Chronic Kidney Disease Stage 3",
    "discharge_date": "2024-03-02",
    "medications": ["Lisinopril 10mg daily", "Furosemide 20mg"],
    "dietary_restrictions": "Low sodium",
    "follow_up": "Nephrology in 2 weeks",
    "warning_signs": "Swelling, shortness of breath",
    "discharge_instructions": "Monitor blood pressure daily"
  }
]"#;

pub(crate) fn noah() -> PatientRecord {
    serde_json::from_str::<Vec<PatientRecord>>(NOAH_JSON)
        .unwrap()
        .remove(0)
}
