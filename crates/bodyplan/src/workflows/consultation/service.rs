use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{ConsultationId, ConsultationRequest};
use super::engine::{DecisionRecord, ProgramResolver, ResolutionError};
use super::intake::{IntakeGuard, IntakeViolation};
use super::report::MissingCombinationsReport;
use super::repository::{
    ConsultationRecord, ConsultationRepository, ConsultationUpdate, RepositoryError,
};
use super::store::{RuleStore, StoreError};

/// Service composing the intake guard, resolver, and consultation repository.
pub struct ConsultationService<R, S> {
    guard: Arc<IntakeGuard>,
    repository: Arc<R>,
    resolver: Arc<ProgramResolver<S>>,
}

static CONSULTATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_consultation_id() -> ConsultationId {
    let id = CONSULTATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ConsultationId(format!("cons-{id:06}"))
}

impl<R, S> ConsultationService<R, S>
where
    R: ConsultationRepository + 'static,
    S: RuleStore + 'static,
{
    pub fn new(repository: Arc<R>, rules: Arc<S>) -> Self {
        Self::with_guard(IntakeGuard::default(), repository, rules)
    }

    pub fn with_guard(guard: IntakeGuard, repository: Arc<R>, rules: Arc<S>) -> Self {
        Self {
            guard: Arc::new(guard),
            repository,
            resolver: Arc::new(ProgramResolver::new(rules)),
        }
    }

    /// Resolve a request without storing anything.
    pub fn preview(
        &self,
        request: &ConsultationRequest,
    ) -> Result<DecisionRecord, ConsultationServiceError> {
        let measurements = self.guard.measurements_from_request(request)?;
        Ok(self.resolver.resolve(&measurements)?)
    }

    /// Validate, resolve, and persist a new consultation.
    pub fn submit(
        &self,
        request: ConsultationRequest,
    ) -> Result<ConsultationRecord, ConsultationServiceError> {
        let decision = self.preview(&request)?;
        let record =
            ConsultationRecord::new(next_consultation_id(), decision, request.notes, Utc::now());

        let stored = self.repository.insert(record)?;
        info!(
            consultation = %stored.id,
            program = %stored.decision().program_code(),
            "consultation recorded"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &ConsultationId) -> Result<ConsultationRecord, ConsultationServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(&self) -> Result<Vec<ConsultationRecord>, ConsultationServiceError> {
        let mut records = self.repository.list()?;
        records.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(records)
    }

    /// Change notes or lifecycle status; the decision itself stays as recorded.
    pub fn update(
        &self,
        id: &ConsultationId,
        update: ConsultationUpdate,
    ) -> Result<ConsultationRecord, ConsultationServiceError> {
        let mut record = self.get(id)?;
        record.apply(update);
        self.repository.update(record.clone())?;
        Ok(record)
    }

    pub fn missing_combinations(
        &self,
    ) -> Result<MissingCombinationsReport, ConsultationServiceError> {
        Ok(MissingCombinationsReport::build(
            self.resolver.store().as_ref(),
        )?)
    }
}

/// Error raised by the consultation service.
#[derive(Debug, thiserror::Error)]
pub enum ConsultationServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeViolation),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
