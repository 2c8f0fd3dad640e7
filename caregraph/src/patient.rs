//! Patient records and identity lookup.
//!
//! Records are owned by the directory and shared with sessions through `Arc`; a session
//! references the record it resolved and never mutates it.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Discharge record for one patient.
///
/// Field names accept the keys used in the patient data JSON file
/// (`patient_name`, `primary_diagnosis`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(alias = "patient_name")]
    pub name: String,
    #[serde(alias = "primary_diagnosis")]
    pub diagnosis: String,
    #[serde(default)]
    pub discharge_date: Option<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub dietary_restrictions: Option<String>,
    #[serde(default)]
    pub follow_up: Option<String>,
    #[serde(default)]
    pub warning_signs: Option<String>,
    #[serde(default)]
    pub discharge_instructions: Option<String>,
}

impl PatientRecord {
    /// Multi-line summary used as generation context.
    pub fn context_block(&self) -> String {
        format!(
            "PATIENT INFORMATION:\n\
             Name: {}\n\
             Primary Diagnosis: {}\n\
             Discharge Date: {}\n\
             Current Medications: {}\n\
             Dietary Restrictions: {}\n\
             Follow-up Appointment: {}\n\
             Warning Signs to Monitor: {}\n\
             Discharge Instructions: {}",
            self.name,
            self.diagnosis,
            self.discharge_date.as_deref().unwrap_or("Not available"),
            self.medications.join(", "),
            self.dietary_restrictions.as_deref().unwrap_or("None"),
            self.follow_up.as_deref().unwrap_or("Not scheduled"),
            self.warning_signs.as_deref().unwrap_or("None"),
            self.discharge_instructions.as_deref().unwrap_or("None"),
        )
    }
}

/// Outcome of an identity lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum PatientLookup {
    Found(Arc<PatientRecord>),
    NotFound,
    /// More than one record has the name; carries the match count.
    Ambiguous(usize),
}

/// Error loading or querying a patient directory.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid patient data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("lookup failed: {0}")]
    Lookup(String),
}

/// Identity lookup collaborator: resolves a patient by name.
#[async_trait]
pub trait PatientDirectory: Send + Sync {
    /// Case-insensitive exact match on the full name.
    async fn lookup(&self, name: &str) -> Result<PatientLookup, DirectoryError>;
}

/// Directory held in memory, typically loaded once from the patient data JSON file.
#[derive(Debug, Default)]
pub struct InMemoryPatientDirectory {
    records: Vec<Arc<PatientRecord>>,
}

impl InMemoryPatientDirectory {
    pub fn new(records: Vec<PatientRecord>) -> Self {
        Self {
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    /// Parses a JSON array of patient records.
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        let records: Vec<PatientRecord> = serde_json::from_str(json)?;
        Ok(Self::new(records))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl PatientDirectory for InMemoryPatientDirectory {
    async fn lookup(&self, name: &str) -> Result<PatientLookup, DirectoryError> {
        let wanted = name.trim().to_lowercase();
        let mut matches = self
            .records
            .iter()
            .filter(|r| r.name.to_lowercase() == wanted);
        let first = match matches.next() {
            Some(r) => r.clone(),
            None => return Ok(PatientLookup::NotFound),
        };
        let extra = matches.count();
        if extra > 0 {
            return Ok(PatientLookup::Ambiguous(extra + 1));
        }
        Ok(PatientLookup::Found(first))
    }
}
