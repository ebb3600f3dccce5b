use bodyplan::error::AppError;
use bodyplan::workflows::consultation::{
    ConsultationId, ConsultationRecord, ConsultationRepository, RepositoryError, RuleCatalog,
};
use bodyplan::workflows::rules_import::RulesImporter;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryConsultationRepository {
    records: Arc<Mutex<HashMap<ConsultationId, ConsultationRecord>>>,
}

impl InMemoryConsultationRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<ConsultationId, ConsultationRecord>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl ConsultationRepository for InMemoryConsultationRepository {
    fn insert(&self, record: ConsultationRecord) -> Result<ConsultationRecord, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ConsultationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ConsultationId) -> Result<Option<ConsultationRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ConsultationRecord>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.values().cloned().collect())
    }
}

/// Seeded catalog with optional CSV overrides applied.
pub(crate) fn load_catalog(overrides: Option<&Path>) -> Result<Arc<RuleCatalog>, AppError> {
    let catalog = RuleCatalog::seeded();

    if let Some(path) = overrides {
        let summary = RulesImporter::from_path(path, &catalog)?;
        info!(
            path = %path.display(),
            applied = summary.applied,
            deactivated = summary.deactivated,
            "applied rule overrides"
        );
    }

    Ok(Arc::new(catalog))
}
