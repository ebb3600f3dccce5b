use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ConsultationId, ConsultationStatus};
use super::engine::DecisionRecord;

/// Stored consultation: the write-once decision plus the few fields that may change later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRecord {
    pub id: ConsultationId,
    decision: DecisionRecord,
    pub notes: Option<String>,
    pub status: ConsultationStatus,
    pub created_at: DateTime<Utc>,
}

impl ConsultationRecord {
    pub fn new(
        id: ConsultationId,
        decision: DecisionRecord,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            decision,
            notes,
            status: ConsultationStatus::Active,
            created_at,
        }
    }

    pub fn decision(&self) -> &DecisionRecord {
        &self.decision
    }

    /// Applies an update; classification fields are untouched by construction.
    pub fn apply(&mut self, update: ConsultationUpdate) {
        if let Some(notes) = update.notes {
            self.notes = Some(notes);
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }

    pub fn view(&self) -> ConsultationView {
        ConsultationView {
            id: self.id.clone(),
            status: self.status.label(),
            notes: self.notes.clone(),
            created_at: self.created_at,
            decision: self.decision.clone(),
        }
    }
}

/// Mutable subset of a consultation. Unknown fields are rejected so callers cannot smuggle in
/// classification changes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConsultationUpdate {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<ConsultationStatus>,
}

/// Persistence abstraction for consultations.
pub trait ConsultationRepository: Send + Sync {
    fn insert(&self, record: ConsultationRecord) -> Result<ConsultationRecord, RepositoryError>;
    fn update(&self, record: ConsultationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ConsultationId) -> Result<Option<ConsultationRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<ConsultationRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// API representation of a stored consultation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationView {
    pub id: ConsultationId,
    pub status: &'static str,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub decision: DecisionRecord,
}
